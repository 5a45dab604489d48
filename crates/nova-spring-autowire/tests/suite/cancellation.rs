use nova_spring_autowire::{
    AutowireConfig, AutowireResolver, CancellationToken, Cancelled, ConstructorResolver,
    Executable, Parameter,
};
use nova_spring_model::{
    AutowireMode, BeanCandidate, BeanId, BeanModel, BeanRegistry, InjectionPoint,
};

use super::hierarchy;

fn registry() -> BeanRegistry {
    let mut model = BeanRegistry::new(hierarchy(&[("Impl", &["Api"])]));
    for id in 1..=50 {
        model.register(BeanCandidate::named(id, &format!("impl{id}"), "Impl"));
    }
    model.register(
        BeanCandidate::named(100, "owner", "Owner").with_autowire(AutowireMode::Constructor),
    );
    model
}

#[test]
fn cancelled_requests_return_no_partial_result() {
    let model = registry();
    let config = AutowireConfig::default();
    let resolver = AutowireResolver::new(&model, &config);
    let cancel = CancellationToken::new();
    cancel.cancel();

    assert_eq!(
        resolver.resolve(&InjectionPoint::by_type("Api"), &cancel),
        Err(Cancelled)
    );
    assert_eq!(
        resolver.iterable_candidates(&"java.util.List<Api>".into(), None, &cancel),
        Err(Cancelled)
    );
}

#[test]
fn constructor_matching_observes_cancellation() {
    let model = registry();
    let config = AutowireConfig::default();
    let resolver = ConstructorResolver::new(&model, &config);
    let owner = model.find_by_id(BeanId(100)).expect("owner registered");
    let executables = [Executable::constructor(
        "Owner",
        vec![Parameter::new(Some("api"), "Api")],
    )];

    let cancel = CancellationToken::new();
    assert_eq!(
        resolver.matching_executables(owner, &executables, &[], &cancel),
        Ok(vec![0])
    );

    cancel.cancel();
    assert_eq!(
        resolver.matching_executables(owner, &executables, &[], &cancel),
        Err(Cancelled)
    );
}
