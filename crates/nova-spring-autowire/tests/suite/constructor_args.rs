use nova_spring_autowire::{
    ArgumentValue, AutowireConfig, AutowireResolver, CancellationToken, ConstructorResolver,
    Executable, ExecutableSelection, ExplicitArgument, Parameter,
};
use nova_spring_model::{
    AutowireMode, BeanCandidate, BeanId, BeanModel, BeanRegistry, InjectionPoint, Qualifier,
};
use pretty_assertions::assert_eq;

use super::{hierarchy, ids};

fn registry() -> BeanRegistry {
    BeanRegistry::new(hierarchy(&[("com.acme.JdbcRepo", &["com.acme.Repo"])]))
        .with_bean(BeanCandidate::named(1, "repo", "com.acme.JdbcRepo"))
        .with_bean(
            BeanCandidate::named(2, "auditRepo", "com.acme.JdbcRepo")
                .with_qualifier(Qualifier::named("audit")),
        )
        .with_bean(
            BeanCandidate::named(3, "service", "com.acme.Service")
                .with_autowire(AutowireMode::Constructor),
        )
        .with_bean(BeanCandidate::named(4, "client", "com.acme.Client"))
}

fn bean(model: &BeanRegistry, id: u32) -> &BeanCandidate {
    model.find_by_id(BeanId(id)).expect("bean registered")
}

fn param(name: &str, ty: &str) -> Parameter {
    Parameter::new(Some(name), ty)
}

#[test]
fn widest_satisfiable_constructor_is_selected() {
    let model = registry();
    let config = AutowireConfig::default();
    let resolver = ConstructorResolver::new(&model, &config);
    let executables = [
        Executable::constructor("Service", vec![]),
        Executable::constructor("Service", vec![param("repo", "com.acme.JdbcRepo")]),
        Executable::constructor(
            "Service",
            vec![param("repo", "com.acme.Repo"), param("clock", "java.time.Clock")],
        ),
    ];

    let cancel = CancellationToken::new();
    let owner = bean(&model, 3);
    let matching = resolver
        .matching_executables(owner, &executables, &[], &cancel)
        .expect("not cancelled");
    assert_eq!(matching, vec![0, 1]);
    assert_eq!(
        resolver
            .select(owner, &executables, &[], &cancel)
            .expect("not cancelled"),
        ExecutableSelection::Selected(1)
    );
}

#[test]
fn equally_wide_constructors_are_ambiguous() {
    let model = registry();
    let config = AutowireConfig::default();
    let resolver = ConstructorResolver::new(&model, &config);
    let executables = [
        Executable::constructor("Service", vec![param("repo", "com.acme.Repo")]),
        Executable::constructor("Service", vec![param("jdbc", "com.acme.JdbcRepo")]),
    ];

    let selection = resolver
        .select(bean(&model, 3), &executables, &[], &CancellationToken::new())
        .expect("not cancelled");
    assert_eq!(selection, ExecutableSelection::Ambiguous(vec![0, 1]));
}

#[test]
fn explicit_arguments_require_exact_arity_without_autowiring() {
    let model = registry();
    let config = AutowireConfig::default();
    let resolver = ConstructorResolver::new(&model, &config);
    let executables = [
        Executable::constructor("Client", vec![param("url", "java.lang.String")]),
        Executable::constructor(
            "Client",
            vec![param("url", "java.lang.String"), param("timeout", "int")],
        ),
        Executable::factory_method(
            "create",
            vec![param("timeout", "int"), param("url", "java.lang.String")],
        ),
    ];
    let args = [
        ExplicitArgument::at(1, ArgumentValue::Literal("30".into())),
        ExplicitArgument::new(ArgumentValue::Literal("http://localhost".into())),
    ];

    let matching = resolver
        .matching_executables(bean(&model, 4), &executables, &args, &CancellationToken::new())
        .expect("not cancelled");
    assert_eq!(matching, vec![1]);
}

#[test]
fn named_and_typed_arguments_match_parameters() {
    let model = registry();
    let config = AutowireConfig::default();
    let resolver = ConstructorResolver::new(&model, &config);
    let executables = [
        Executable::constructor(
            "Client",
            vec![param("repo", "com.acme.Repo"), param("retries", "java.lang.Integer")],
        ),
        Executable::constructor(
            "Client",
            vec![param("repo", "com.acme.Repo"), param("label", "java.lang.String")],
        ),
    ];
    let args = [
        ExplicitArgument::named("repo", ArgumentValue::BeanRef("repo".into())),
        ExplicitArgument::new(ArgumentValue::Typed("java.lang.Integer".into())),
    ];

    let matching = resolver
        .matching_executables(bean(&model, 4), &executables, &args, &CancellationToken::new())
        .expect("not cancelled");
    assert_eq!(matching, vec![0]);
}

#[test]
fn string_parameters_take_literals_last() {
    let model = registry();
    let config = AutowireConfig::default();
    let resolver = ConstructorResolver::new(&model, &config);
    let executables = [Executable::constructor(
        "Client",
        vec![param("host", "java.lang.String"), param("port", "int")],
    )];
    let args = [
        ExplicitArgument::new(ArgumentValue::Literal("8080".into())),
        ExplicitArgument::new(ArgumentValue::Literal("localhost".into())),
    ];

    let matching = resolver
        .matching_executables(bean(&model, 4), &executables, &args, &CancellationToken::new())
        .expect("not cancelled");
    assert_eq!(matching, vec![0]);
}

#[test]
fn leftover_explicit_arguments_reject_executable() {
    let model = registry();
    let config = AutowireConfig::default();
    let resolver = ConstructorResolver::new(&model, &config);
    let executables = [Executable::constructor(
        "Client",
        vec![
            Parameter::new(Some("url"), "java.lang.String").value_injected(),
            param("repo", "com.acme.Repo"),
        ],
    )];
    let args = [
        ExplicitArgument::new(ArgumentValue::BeanRef("repo".into())),
        ExplicitArgument::new(ArgumentValue::BeanRef("repo".into())),
    ];

    let matching = resolver
        .matching_executables(bean(&model, 4), &executables, &args, &CancellationToken::new())
        .expect("not cancelled");
    assert!(matching.is_empty());
}

#[test]
fn collection_provider_and_container_parameters_are_autowirable() {
    let model = registry();
    let config = AutowireConfig::default();
    let resolver = ConstructorResolver::new(&model, &config);
    let executables = [
        Executable::constructor("Service", vec![param("repos", "java.util.List<com.acme.Repo>")]),
        Executable::constructor(
            "Service",
            vec![param("context", "org.springframework.context.ApplicationContext")],
        ),
        Executable::constructor(
            "Service",
            vec![param("repo", "javax.inject.Provider<com.acme.Repo>")],
        ),
    ];

    let matching = resolver
        .matching_executables(bean(&model, 3), &executables, &[], &CancellationToken::new())
        .expect("not cancelled");
    assert_eq!(matching, vec![0, 1, 2]);
}

#[test]
fn value_injected_parameters_need_no_bean() {
    let model = registry();
    let config = AutowireConfig::default();
    let resolver = ConstructorResolver::new(&model, &config);
    let executables = [Executable::constructor(
        "Client",
        vec![Parameter::new(Some("clock"), "java.time.Clock").value_injected()],
    )];

    let matching = resolver
        .matching_executables(bean(&model, 3), &executables, &[], &CancellationToken::new())
        .expect("not cancelled");
    assert_eq!(matching, vec![0]);
}

#[test]
fn autowired_arguments_respect_parameter_qualifiers() {
    let model = registry();
    let config = AutowireConfig::default();
    let resolver = ConstructorResolver::new(&model, &config);
    let executable = Executable::constructor(
        "Service",
        vec![
            param("repos", "java.util.List<com.acme.Repo>"),
            param("audit", "com.acme.Repo").with_qualifier(Qualifier::named("audit")),
            param("clock", "java.time.Clock"),
        ],
    );

    let autowired = resolver
        .autowired_arguments(bean(&model, 3), &executable, &[], &CancellationToken::new())
        .expect("not cancelled");
    let summary: Vec<(usize, Vec<u32>)> = autowired
        .iter()
        .map(|(idx, result)| (*idx, ids(result)))
        .collect();
    assert_eq!(summary, vec![(0, vec![1, 2]), (1, vec![2])]);
}

#[test]
fn constructor_injection_points_exclude_their_owner() {
    let model = BeanRegistry::new(hierarchy(&[
        ("com.acme.LoggingRepo", &["com.acme.Repo"]),
        ("com.acme.JdbcRepo", &["com.acme.Repo"]),
    ]))
    .with_bean(BeanCandidate::named(1, "jdbc", "com.acme.JdbcRepo"))
    .with_bean(BeanCandidate::named(2, "logging", "com.acme.LoggingRepo"));
    let config = AutowireConfig::default();
    let point = InjectionPoint::constructor_param("com.acme.Repo", BeanId(2));

    let result = AutowireResolver::new(&model, &config)
        .resolve(&point, &CancellationToken::new())
        .expect("not cancelled");
    assert_eq!(ids(&result), vec![1]);
}
