use nova_spring_autowire::{AutowireConfig, ResolutionOutcome};
use nova_spring_model::{BeanCandidate, BeanId, BeanRegistry, InjectionPoint};
use pretty_assertions::assert_eq;

use super::{hierarchy, ids, resolve};

fn registry(beans: Vec<BeanCandidate>) -> BeanRegistry {
    let mut model = BeanRegistry::new(hierarchy(&[
        ("Alpha", &["Greeter"]),
        ("Beta", &["Greeter"]),
        ("Gamma", &["Greeter"]),
    ]));
    for bean in beans {
        model.register(bean);
    }
    model
}

#[test]
fn single_primary_wins() {
    let model = registry(vec![
        BeanCandidate::named(1, "alpha", "Alpha"),
        BeanCandidate::named(2, "beta", "Beta").primary(),
        BeanCandidate::named(3, "gamma", "Gamma"),
    ]);
    let config = AutowireConfig::default();

    let result = resolve(&model, &config, &InjectionPoint::by_type("Greeter"));
    assert_eq!(ids(&result), vec![2]);
}

#[test]
fn preferred_name_breaks_ties_between_primaries() {
    let model = registry(vec![
        BeanCandidate::named(1, "alpha", "Alpha").primary(),
        BeanCandidate::named(2, "beta", "Beta").primary(),
        BeanCandidate::named(3, "gamma", "Gamma"),
    ]);
    let config = AutowireConfig::default();

    let point = InjectionPoint::annotated("Greeter").with_preferred_name("beta");
    assert_eq!(ids(&resolve(&model, &config, &point)), vec![2]);

    let unnamed = InjectionPoint::annotated("Greeter");
    assert_eq!(ids(&resolve(&model, &config, &unnamed)), vec![1, 2]);
}

#[test]
fn preferred_name_selects_without_primaries() {
    let model = registry(vec![
        BeanCandidate::named(1, "alpha", "Alpha"),
        BeanCandidate::named(2, "beta", "Beta").with_alias("friendly"),
    ]);
    let config = AutowireConfig::default();

    let point = InjectionPoint::annotated("Greeter").with_preferred_name("friendly");
    assert_eq!(ids(&resolve(&model, &config, &point)), vec![2]);
}

#[test]
fn lowest_priority_value_wins() {
    let model = registry(vec![
        BeanCandidate::named(1, "alpha", "Alpha").with_priority("jakarta.annotation.Priority", "5"),
        BeanCandidate::named(2, "beta", "Beta").with_priority("jakarta.annotation.Priority", "-1"),
        BeanCandidate::named(3, "gamma", "Gamma").with_priority("Order", "0x10"),
    ]);
    let config = AutowireConfig::default();

    let result = resolve(&model, &config, &InjectionPoint::by_type("Greeter"));
    assert_eq!(ids(&result), vec![2]);
    assert_eq!(result.outcome(), ResolutionOutcome::Resolved);
}

#[test]
fn priority_needs_every_candidate_ranked() {
    let model = registry(vec![
        BeanCandidate::named(1, "alpha", "Alpha").with_priority("Priority", "1"),
        BeanCandidate::named(2, "beta", "Beta"),
    ]);
    let config = AutowireConfig::default();

    let result = resolve(&model, &config, &InjectionPoint::by_type("Greeter"));
    assert_eq!(ids(&result), vec![1, 2]);
}

#[test]
fn equal_priorities_stay_ambiguous() {
    let model = registry(vec![
        BeanCandidate::named(1, "alpha", "Alpha").with_priority("Priority", "3"),
        BeanCandidate::named(2, "beta", "Beta").with_priority("Priority", "3"),
        BeanCandidate::named(3, "gamma", "Gamma").with_priority("Priority", "4"),
    ]);
    let config = AutowireConfig::default();

    let result = resolve(&model, &config, &InjectionPoint::by_type("Greeter"));
    assert_eq!(ids(&result), vec![1, 2]);
    assert_eq!(result.outcome(), ResolutionOutcome::Ambiguous);
}

#[test]
fn redefinitions_and_identity_duplicates_collapse() {
    let model = registry(vec![
        BeanCandidate::named(1, "alpha", "Alpha"),
        BeanCandidate::named(2, "alphaOverride", "Alpha").redefining(BeanId(1)),
        BeanCandidate::named(3, "beta", "Beta").with_identity("Config#beta"),
        BeanCandidate::named(4, "betaAgain", "Beta").with_identity("Config#beta"),
    ]);
    let config = AutowireConfig::default();

    let result = resolve(&model, &config, &InjectionPoint::by_type("Greeter"));
    assert_eq!(ids(&result), vec![2, 3]);
}

#[test]
fn explicit_beans_shadow_implicit_ones() {
    let model = registry(vec![
        BeanCandidate::named(1, "greeter", "Alpha").implicit(),
        BeanCandidate::named(2, "greeter", "Greeter"),
    ]);
    let config = AutowireConfig::default();

    let result = resolve(&model, &config, &InjectionPoint::by_type("Greeter"));
    assert_eq!(ids(&result), vec![2]);
}
