//! Autowiring candidate resolution for Spring bean models.
//!
//! Given an [`InjectionPoint`](nova_spring_model::InjectionPoint) and a
//! [`BeanModel`](nova_spring_model::BeanModel), [`AutowireResolver`] computes the beans the
//! container would consider for injection:
//! - [`TypeMatcher`] decides type compatibility, including container wrapper idioms
//! - [`QualifierMatcher`] narrows by qualifier annotations and bean names
//! - [`FilterPipeline`] applies the container's tie-breaking rules in a fixed order
//! - [`ConstructorResolver`] matches explicit constructor arguments and autowires the rest
//!
//! All entry points take a [`CancellationToken`] and return [`Cancelled`] instead of a partial
//! result once it fires.

mod assignability;
mod cancel;
mod config;
mod constructor;
pub mod pipeline;
mod qualifier;
mod resolve;

pub use assignability::TypeMatcher;
pub use cancel::{CancellationToken, Cancelled};
pub use config::{AnnotationMetadata, AutowireConfig, ConfigError};
pub use constructor::{
    ArgumentValue, ConstructorResolver, Executable, ExecutableKind, ExecutableSelection,
    ExplicitArgument, Parameter,
};
pub use pipeline::FilterPipeline;
pub use qualifier::QualifierMatcher;
pub use resolve::{AutowireResolver, ResolutionOutcome, ResolutionResult};
