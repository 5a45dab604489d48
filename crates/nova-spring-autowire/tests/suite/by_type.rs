use nova_spring_autowire::{AutowireConfig, ResolutionOutcome};
use nova_spring_model::{BeanCandidate, BeanId, BeanRegistry, InjectionPoint, TypeDescriptor};
use pretty_assertions::assert_eq;

use super::{hierarchy, ids, resolve};

fn registry() -> BeanRegistry {
    BeanRegistry::new(hierarchy(&[
        ("com.acme.JdbcRepo", &["com.acme.Repo"]),
        ("com.acme.MemoryRepo", &["com.acme.Repo"]),
        ("com.acme.Service", &["com.acme.Repo"]),
    ]))
    .with_bean(BeanCandidate::named(1, "jdbcRepo", "com.acme.JdbcRepo"))
    .with_bean(BeanCandidate::named(2, "memoryRepo", "com.acme.MemoryRepo"))
    .with_bean(BeanCandidate::named(3, "service", "com.acme.Service"))
}

#[test]
fn subtypes_are_candidates_in_model_order() {
    let model = registry();
    let config = AutowireConfig::default();
    let point = InjectionPoint::by_type("com.acme.Repo");

    let first = resolve(&model, &config, &point);
    let second = resolve(&model, &config, &point);
    assert_eq!(ids(&first), vec![1, 2, 3]);
    assert_eq!(first, second);
    assert_eq!(first.outcome(), ResolutionOutcome::Ambiguous);
}

#[test]
fn owner_is_never_its_own_candidate() {
    let model = registry();
    let config = AutowireConfig::default();
    let point = InjectionPoint::by_type("com.acme.Repo").with_owner(BeanId(3));

    assert_eq!(ids(&resolve(&model, &config, &point)), vec![1, 2]);
}

#[test]
fn collections_and_arrays_resolve_their_element_type() {
    let model = registry();
    let config = AutowireConfig::default();

    let list = InjectionPoint::by_type("java.util.List<com.acme.Repo>").with_owner(BeanId(3));
    assert_eq!(ids(&resolve(&model, &config, &list)), vec![1, 2]);

    let array = InjectionPoint::by_type(TypeDescriptor::array("com.acme.JdbcRepo".into()));
    assert_eq!(ids(&resolve(&model, &config, &array)), vec![1]);
}

#[test]
fn optional_and_provider_unwrap_to_their_argument() {
    let model = registry();
    let config = AutowireConfig::default();

    let optional = InjectionPoint::by_type("java.util.Optional<com.acme.MemoryRepo>");
    assert_eq!(ids(&resolve(&model, &config, &optional)), vec![2]);

    let provider = InjectionPoint::by_type("javax.inject.Provider<com.acme.JdbcRepo>");
    assert_eq!(ids(&resolve(&model, &config, &provider)), vec![1]);
}

#[test]
fn string_keyed_maps_collect_value_beans() {
    let model = registry();
    let config = AutowireConfig::default();
    let point = InjectionPoint::annotated("java.util.Map<java.lang.String, com.acme.JdbcRepo>");

    assert_eq!(ids(&resolve(&model, &config, &point)), vec![1]);
}

#[test]
fn ineligible_beans_are_skipped() {
    let model = BeanRegistry::new(hierarchy(&[("com.acme.JdbcRepo", &["com.acme.Repo"])]))
        .with_bean(BeanCandidate::named(1, "template", "com.acme.JdbcRepo").abstract_bean())
        .with_bean(
            BeanCandidate::named(2, "hidden", "com.acme.JdbcRepo").with_autowire_candidate(false),
        )
        .with_bean(
            BeanCandidate::named(3, "testRepo", "com.acme.JdbcRepo")
                .with_candidate_patterns(&["*Service,prod*"]),
        )
        .with_bean(
            BeanCandidate::named(4, "prodRepo", "com.acme.JdbcRepo")
                .with_candidate_patterns(&["*Service,prod*"]),
        );
    let config = AutowireConfig::default();

    let result = resolve(&model, &config, &InjectionPoint::by_type("com.acme.Repo"));
    assert_eq!(ids(&result), vec![4]);
    assert_eq!(result.outcome(), ResolutionOutcome::Resolved);
}

#[test]
fn by_name_ignores_types() {
    let model = registry();
    let config = AutowireConfig::default();
    let point = InjectionPoint::by_name("memoryRepo");

    assert_eq!(ids(&resolve(&model, &config, &point)), vec![2]);
    assert!(resolve(&model, &config, &InjectionPoint::by_name("missing")).is_empty());
}
