use std::collections::BTreeMap;
use std::fmt;

use crate::TypeDescriptor;

/// Stable identity of a bean within one model snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BeanId(pub u32);

impl fmt::Display for BeanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bean#{}", self.0)
    }
}

/// Opaque handle shared by candidates that denote the same underlying declaration.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IdentityElement(pub String);

impl IdentityElement {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }
}

/// A qualifier value as supplied by the metadata provider.
///
/// `annotation` is the qualifier annotation type (`Qualifier`, `javax.inject.Named`, a custom
/// qualifier annotation, ...). `value` is the `value` attribute; other attributes participate in
/// comparison for custom qualifiers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Qualifier {
    pub annotation: String,
    pub value: Option<String>,
    pub attributes: BTreeMap<String, String>,
}

impl Qualifier {
    pub fn new(annotation: impl Into<String>) -> Self {
        Self {
            annotation: annotation.into(),
            value: None,
            attributes: BTreeMap::new(),
        }
    }

    /// `@Qualifier("value")`.
    pub fn named(value: impl Into<String>) -> Self {
        Self::new("Qualifier").with_value(value)
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// An unparsed priority annotation (`@Priority(5)`, `@Order(...)`).
///
/// The value stays textual; malformed values are treated as absent when priorities are compared.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PriorityMarker {
    pub annotation: String,
    pub value: String,
}

impl PriorityMarker {
    pub fn new(annotation: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            annotation: annotation.into(),
            value: value.into(),
        }
    }
}

/// The `autowire` mode of a bean definition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AutowireMode {
    No,
    ByName,
    ByType,
    Constructor,
    #[default]
    Default,
}

/// One bean definition as seen by the bean model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BeanCandidate {
    pub id: BeanId,
    pub name: Option<String>,
    pub aliases: Vec<String>,
    /// Types the bean produces, most specific first. Never empty for a registered bean.
    pub effective_types: Vec<TypeDescriptor>,
    /// The bean class. Differs from `effective_types` for factory beans.
    pub declared_type: TypeDescriptor,
    pub is_abstract: bool,
    pub is_primary: bool,
    pub autowire_candidate: Option<bool>,
    pub priority: Option<PriorityMarker>,
    pub qualifiers: Vec<Qualifier>,
    pub identity: Option<IdentityElement>,
    /// Implicitly registered (default/infrastructure) bean that an explicit declaration may shadow.
    pub implicit: bool,
    /// The bean this definition explicitly redefines.
    pub redefines: Option<BeanId>,
    /// Default-autowire-candidate globs of the enclosing bean collection.
    pub candidate_patterns: Vec<String>,
    pub autowire: AutowireMode,
}

impl BeanCandidate {
    /// A bean whose declared and effective type is `ty`.
    pub fn new(id: u32, name: Option<&str>, ty: impl Into<TypeDescriptor>) -> Self {
        let ty = ty.into();
        Self {
            id: BeanId(id),
            name: name.map(str::to_string),
            aliases: Vec::new(),
            effective_types: vec![ty.clone()],
            declared_type: ty,
            is_abstract: false,
            is_primary: false,
            autowire_candidate: None,
            priority: None,
            qualifiers: Vec::new(),
            identity: None,
            implicit: false,
            redefines: None,
            candidate_patterns: Vec::new(),
            autowire: AutowireMode::Default,
        }
    }

    pub fn named(id: u32, name: &str, ty: impl Into<TypeDescriptor>) -> Self {
        Self::new(id, Some(name), ty)
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Replaces the effective types; the declared type is left as is.
    pub fn with_effective_types(mut self, types: Vec<TypeDescriptor>) -> Self {
        self.effective_types = types;
        self
    }

    pub fn with_declared_type(mut self, ty: impl Into<TypeDescriptor>) -> Self {
        self.declared_type = ty.into();
        self
    }

    pub fn primary(mut self) -> Self {
        self.is_primary = true;
        self
    }

    pub fn abstract_bean(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn with_autowire_candidate(mut self, value: bool) -> Self {
        self.autowire_candidate = Some(value);
        self
    }

    pub fn with_priority(mut self, annotation: &str, value: &str) -> Self {
        self.priority = Some(PriorityMarker::new(annotation, value));
        self
    }

    pub fn with_qualifier(mut self, qualifier: Qualifier) -> Self {
        self.qualifiers.push(qualifier);
        self
    }

    pub fn with_identity(mut self, key: impl Into<String>) -> Self {
        self.identity = Some(IdentityElement::new(key));
        self
    }

    pub fn implicit(mut self) -> Self {
        self.implicit = true;
        self
    }

    pub fn redefining(mut self, other: BeanId) -> Self {
        self.redefines = Some(other);
        self
    }

    pub fn with_candidate_patterns(mut self, patterns: &[&str]) -> Self {
        self.candidate_patterns = patterns.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn with_autowire(mut self, mode: AutowireMode) -> Self {
        self.autowire = mode;
        self
    }

    /// Primary name followed by aliases.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.name
            .as_deref()
            .into_iter()
            .chain(self.aliases.iter().map(String::as_str))
    }

    pub fn has_name(&self, name: &str) -> bool {
        self.names().any(|n| n == name)
    }
}
