use crate::{BeanId, Qualifier, TypeDescriptor};

/// How an injection point asks to be resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InjectionKind {
    /// XML `autowire="byType"` style property injection.
    ByType,
    /// XML `autowire="byName"` style property injection.
    ByName,
    /// A constructor or factory-method parameter.
    Constructor,
    /// `@Autowired`/`@Inject` fields, setters and parameters. `@Resource` resolves by name
    /// and is a [`InjectionKind::ByName`] point.
    AnnotationDriven,
}

/// The consumer side of one resolution request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InjectionPoint {
    pub required_type: TypeDescriptor,
    pub qualifier: Option<Qualifier>,
    /// Field, property or parameter name; used as a name-based tie-break.
    pub preferred_name: Option<String>,
    pub owner: Option<BeanId>,
    pub kind: InjectionKind,
}

impl InjectionPoint {
    pub fn new(kind: InjectionKind, required_type: impl Into<TypeDescriptor>) -> Self {
        Self {
            required_type: required_type.into(),
            qualifier: None,
            preferred_name: None,
            owner: None,
            kind,
        }
    }

    pub fn by_type(required_type: impl Into<TypeDescriptor>) -> Self {
        Self::new(InjectionKind::ByType, required_type)
    }

    /// By-name points carry no meaningful type; the name is the whole request.
    pub fn by_name(name: impl Into<String>) -> Self {
        Self::new(InjectionKind::ByName, TypeDescriptor::Unresolved).with_preferred_name(name)
    }

    pub fn annotated(required_type: impl Into<TypeDescriptor>) -> Self {
        Self::new(InjectionKind::AnnotationDriven, required_type)
    }

    pub fn constructor_param(required_type: impl Into<TypeDescriptor>, owner: BeanId) -> Self {
        Self::new(InjectionKind::Constructor, required_type).with_owner(owner)
    }

    pub fn with_qualifier(mut self, qualifier: Qualifier) -> Self {
        self.qualifier = Some(qualifier);
        self
    }

    pub fn with_preferred_name(mut self, name: impl Into<String>) -> Self {
        self.preferred_name = Some(name.into());
        self
    }

    pub fn with_owner(mut self, owner: BeanId) -> Self {
        self.owner = Some(owner);
        self
    }
}
