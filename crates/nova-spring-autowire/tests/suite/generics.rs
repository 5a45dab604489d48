use nova_spring_autowire::{AutowireConfig, AutowireResolver, CancellationToken};
use nova_spring_model::{BeanCandidate, BeanRegistry, InjectionPoint, TypeDescriptor};
use pretty_assertions::assert_eq;

use super::{hierarchy, ids, resolve};

#[test]
fn sole_raw_candidate_satisfies_parameterized_point() {
    let model = BeanRegistry::new(hierarchy(&[]))
        .with_bean(BeanCandidate::named(1, "names", "java.util.ArrayList"));
    let config = AutowireConfig::default();
    let point = InjectionPoint::by_type("java.util.List<com.acme.Foo>");

    assert_eq!(ids(&resolve(&model, &config, &point)), vec![1]);
}

#[test]
fn sole_candidate_with_conflicting_arguments_is_rejected() {
    let model = BeanRegistry::new(hierarchy(&[]))
        .with_bean(BeanCandidate::named(1, "bars", "java.util.ArrayList<com.acme.Bar>"));
    let config = AutowireConfig::default();
    let point = InjectionPoint::by_type("java.util.List<com.acme.Foo>");

    assert!(ids(&resolve(&model, &config, &point)).is_empty());
}

#[test]
fn raw_candidate_loses_once_generics_can_decide() {
    let model = BeanRegistry::new(hierarchy(&[]))
        .with_bean(BeanCandidate::named(1, "raw", "java.util.ArrayList"))
        .with_bean(BeanCandidate::named(2, "foos", "java.util.ArrayList<com.acme.Foo>"))
        .with_bean(BeanCandidate::named(3, "bars", "java.util.LinkedList<com.acme.Bar>"));
    let config = AutowireConfig::default();
    let point = InjectionPoint::by_type("java.util.List<com.acme.Foo>");

    assert_eq!(ids(&resolve(&model, &config, &point)), vec![2]);
}

#[test]
fn wildcard_requirements_use_containment() {
    let model = BeanRegistry::new(hierarchy(&[("com.acme.Apple", &["com.acme.Fruit"])]))
        .with_bean(BeanCandidate::named(1, "apples", "java.util.ArrayList<com.acme.Apple>"))
        .with_bean(BeanCandidate::named(2, "strings", "java.util.ArrayList<java.lang.String>"));
    let config = AutowireConfig::default();
    let required = TypeDescriptor::generic(
        "java.util.Collection",
        vec![TypeDescriptor::extends("com.acme.Fruit".into())],
    );

    let result = AutowireResolver::new(&model, &config)
        .autowire_by_type(&required, None, None, &CancellationToken::new())
        .expect("not cancelled");
    let ids: Vec<u32> = result.iter().map(|b| b.id.0).collect();
    assert_eq!(ids, vec![1]);
}

#[test]
fn wildcard_beans_are_found_through_their_declared_class() {
    let wrapper = TypeDescriptor::generic(
        "com.acme.Wrapper",
        vec![TypeDescriptor::extends("com.acme.Handler".into())],
    );
    let model = BeanRegistry::new(hierarchy(&[(
        "com.acme.LoggingHandler",
        &["com.acme.Handler"],
    )]))
    .with_bean(
        BeanCandidate::named(1, "handlerFactory", "com.acme.LoggingHandler")
            .with_effective_types(vec![wrapper]),
    )
    .with_bean(BeanCandidate::named(2, "unrelated", "com.acme.Other"));
    let config = AutowireConfig::default();

    let point = InjectionPoint::by_type("com.acme.Handler");
    assert_eq!(ids(&resolve(&model, &config, &point)), vec![1]);
}
