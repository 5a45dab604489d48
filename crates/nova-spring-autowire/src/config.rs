use std::collections::{HashSet, VecDeque};
use std::path::Path;

use indexmap::{IndexMap, IndexSet};
use nova_spring_model::PriorityMarker;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read autowire config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse autowire toml config: {0}")]
    Toml(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        // Keep the message only; the default `Display` embeds a snippet of the input.
        ConfigError::Toml(err.message().to_string())
    }
}

/// Type names the engine treats specially.
///
/// Every set holds raw class names as they appear in [`nova_spring_model::TypeDescriptor`]s;
/// both fully qualified and simple names are listed by default since bean models built from
/// partially resolved sources carry either form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutowireConfig {
    /// Single-argument containers whose element type is injected (`List<Foo>` gets every `Foo`).
    #[serde(default = "default_iterable_types")]
    pub iterable_types: IndexSet<String>,

    /// Deferred-access wrappers whose argument is the real dependency type.
    #[serde(default = "default_provider_types")]
    pub provider_types: IndexSet<String>,

    #[serde(default = "default_optional_types")]
    pub optional_types: IndexSet<String>,

    #[serde(default = "default_map_types")]
    pub map_types: IndexSet<String>,

    #[serde(default = "default_string_types")]
    pub string_types: IndexSet<String>,

    #[serde(default = "default_properties_types")]
    pub properties_types: IndexSet<String>,

    /// Root types every reference type is assignable to.
    #[serde(default = "default_object_types")]
    pub object_types: IndexSet<String>,

    /// Container-provided types that are satisfiable without a declared bean.
    #[serde(default = "default_implicitly_autowired_types")]
    pub implicitly_autowired_types: IndexSet<String>,

    /// Types an untyped literal constructor argument can be converted to.
    #[serde(default = "default_literal_types")]
    pub literal_types: IndexSet<String>,

    #[serde(default)]
    pub annotations: AnnotationMetadata,
}

impl Default for AutowireConfig {
    fn default() -> Self {
        Self {
            iterable_types: default_iterable_types(),
            provider_types: default_provider_types(),
            optional_types: default_optional_types(),
            map_types: default_map_types(),
            string_types: default_string_types(),
            properties_types: default_properties_types(),
            object_types: default_object_types(),
            implicitly_autowired_types: default_implicitly_autowired_types(),
            literal_types: default_literal_types(),
            annotations: AnnotationMetadata::default(),
        }
    }
}

impl AutowireConfig {
    /// Load a config file from TOML. Missing keys keep their defaults.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::load_from_str(&text)?;
        tracing::debug!(
            target: "nova.spring.config",
            path = %path.display(),
            qualifiers = config.annotations.qualifier_annotations.len(),
            "loaded autowire config"
        );
        Ok(config)
    }

    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn is_iterable(&self, raw: &str) -> bool {
        self.iterable_types.contains(raw)
    }

    pub fn is_provider(&self, raw: &str) -> bool {
        self.provider_types.contains(raw)
    }

    pub fn is_optional(&self, raw: &str) -> bool {
        self.optional_types.contains(raw)
    }

    pub fn is_map(&self, raw: &str) -> bool {
        self.map_types.contains(raw)
    }

    pub fn is_string(&self, raw: &str) -> bool {
        self.string_types.contains(raw)
    }

    pub fn is_object(&self, raw: &str) -> bool {
        self.object_types.contains(raw)
    }
}

/// Qualifier and priority metadata for one analysis scope.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationMetadata {
    /// Annotation types recognized as qualifiers.
    #[serde(default = "default_qualifier_annotations")]
    pub qualifier_annotations: IndexSet<String>,

    /// Qualifier types that all mean "the bean called `value`" and compare by value alone.
    #[serde(default = "default_name_qualifiers")]
    pub name_qualifiers: IndexSet<String>,

    /// Custom annotation -> annotations it is meta-annotated with.
    #[serde(default)]
    pub meta_annotations: IndexMap<String, Vec<String>>,

    #[serde(default = "default_priority_annotations")]
    pub priority_annotations: IndexSet<String>,
}

impl Default for AnnotationMetadata {
    fn default() -> Self {
        Self {
            qualifier_annotations: default_qualifier_annotations(),
            name_qualifiers: default_name_qualifiers(),
            meta_annotations: IndexMap::new(),
            priority_annotations: default_priority_annotations(),
        }
    }
}

impl AnnotationMetadata {
    /// Returns the first annotation of `wanted` reachable from `annotation` through
    /// meta-annotation edges (including `annotation` itself).
    pub fn resolve_through_meta<'a>(
        &'a self,
        annotation: &'a str,
        wanted: &IndexSet<String>,
    ) -> Option<&'a str> {
        let mut queue = VecDeque::<&str>::new();
        let mut visited = HashSet::<&str>::new();
        queue.push_back(annotation);

        while let Some(current) = queue.pop_front() {
            if !visited.insert(current) {
                continue;
            }
            if wanted.contains(current) {
                return Some(current);
            }
            if let Some(parents) = self.meta_annotations.get(current) {
                queue.extend(parents.iter().map(String::as_str));
            }
        }
        None
    }

    pub fn is_qualifier(&self, annotation: &str) -> bool {
        self.resolve_through_meta(annotation, &self.qualifier_annotations)
            .is_some()
    }

    /// Whether qualifiers of type `annotation` compare by value alone.
    pub fn is_name_qualifier(&self, annotation: &str) -> bool {
        self.name_qualifiers.contains(annotation)
    }

    /// The numeric value of a priority marker, if its annotation is recognized and its value
    /// parses. Anything else counts as "no priority".
    pub fn priority_value(&self, marker: &PriorityMarker) -> Option<i64> {
        self.resolve_through_meta(&marker.annotation, &self.priority_annotations)?;
        match parse_priority(&marker.value) {
            Some(value) => Some(value),
            None => {
                tracing::debug!(
                    target: "nova.spring.autowire",
                    annotation = %marker.annotation,
                    value = %marker.value,
                    "ignoring unparsable priority value"
                );
                None
            }
        }
    }
}

/// Parses a Java integer literal as it appears in an annotation attribute.
fn parse_priority(text: &str) -> Option<i64> {
    let text = text.trim();
    let text = text
        .strip_suffix('L')
        .or_else(|| text.strip_suffix('l'))
        .unwrap_or(text);
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, text),
    };
    let digits = digits.replace('_', "");
    let value = if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        i64::from_str_radix(hex, 16).ok()?
    } else {
        digits.parse::<i64>().ok()?
    };
    Some(if negative { -value } else { value })
}

fn set(items: &[&str]) -> IndexSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_iterable_types() -> IndexSet<String> {
    set(&[
        "java.lang.Iterable",
        "java.util.Collection",
        "java.util.List",
        "java.util.Set",
        "java.util.SortedSet",
        "java.util.NavigableSet",
        "java.util.Queue",
        "java.util.Deque",
        "Iterable",
        "Collection",
        "List",
        "Set",
        "SortedSet",
        "NavigableSet",
        "Queue",
        "Deque",
    ])
}

fn default_provider_types() -> IndexSet<String> {
    set(&[
        "javax.inject.Provider",
        "jakarta.inject.Provider",
        "org.springframework.beans.factory.ObjectFactory",
        "org.springframework.beans.factory.ObjectProvider",
        "Provider",
        "ObjectFactory",
        "ObjectProvider",
    ])
}

fn default_optional_types() -> IndexSet<String> {
    set(&["java.util.Optional", "Optional"])
}

fn default_map_types() -> IndexSet<String> {
    set(&["java.util.Map", "Map"])
}

fn default_string_types() -> IndexSet<String> {
    set(&["java.lang.String", "String"])
}

fn default_properties_types() -> IndexSet<String> {
    set(&["java.util.Properties", "Properties"])
}

fn default_object_types() -> IndexSet<String> {
    set(&["java.lang.Object", "Object"])
}

fn default_implicitly_autowired_types() -> IndexSet<String> {
    set(&[
        "org.springframework.beans.factory.BeanFactory",
        "org.springframework.context.ApplicationContext",
        "org.springframework.context.ApplicationEventPublisher",
        "org.springframework.context.event.ApplicationEventMulticaster",
        "org.springframework.context.MessageSource",
        "org.springframework.core.io.ResourceLoader",
        "org.springframework.core.env.Environment",
    ])
}

fn default_literal_types() -> IndexSet<String> {
    set(&[
        "boolean",
        "byte",
        "short",
        "int",
        "long",
        "float",
        "double",
        "char",
        "java.lang.Boolean",
        "java.lang.Byte",
        "java.lang.Short",
        "java.lang.Integer",
        "java.lang.Long",
        "java.lang.Float",
        "java.lang.Double",
        "java.lang.Character",
        "java.math.BigDecimal",
        "java.math.BigInteger",
        "java.lang.Class",
        "java.io.File",
        "java.net.URL",
        "java.net.URI",
        "java.nio.file.Path",
        "java.nio.charset.Charset",
        "java.util.Locale",
        "java.util.UUID",
        "java.time.Duration",
        "org.springframework.core.io.Resource",
    ])
}

fn default_qualifier_annotations() -> IndexSet<String> {
    set(&[
        "org.springframework.beans.factory.annotation.Qualifier",
        "javax.inject.Qualifier",
        "jakarta.inject.Qualifier",
        "javax.inject.Named",
        "jakarta.inject.Named",
        "Qualifier",
        "Named",
    ])
}

fn default_name_qualifiers() -> IndexSet<String> {
    set(&[
        "org.springframework.beans.factory.annotation.Qualifier",
        "javax.inject.Named",
        "jakarta.inject.Named",
        "Qualifier",
        "Named",
    ])
}

fn default_priority_annotations() -> IndexSet<String> {
    set(&[
        "javax.annotation.Priority",
        "jakarta.annotation.Priority",
        "org.springframework.core.annotation.Order",
        "Priority",
        "Order",
    ])
}
