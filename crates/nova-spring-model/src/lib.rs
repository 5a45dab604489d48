//! Bean model for Spring autowiring analysis.
//!
//! This crate holds the data the autowiring engine reasons about:
//! - [`TypeDescriptor`], a small closed model of Java types (plain, generic, array, wildcard)
//! - [`ClassHierarchy`], supertype metadata with cycle-safe walks
//! - [`BeanCandidate`] and [`InjectionPoint`], the two sides of a resolution request
//! - [`BeanModel`], the read-only registry seam, and [`BeanRegistry`], its in-memory implementation

mod bean;
pub mod hierarchy;
mod injection;
mod model;
mod registry;
mod ty;

pub use bean::{
    AutowireMode, BeanCandidate, BeanId, IdentityElement, PriorityMarker, Qualifier,
};
pub use hierarchy::{ClassHierarchy, ClassInfo, TypeHierarchy};
pub use injection::{InjectionKind, InjectionPoint};
pub use model::BeanModel;
pub use registry::BeanRegistry;
pub use ty::{TypeDescriptor, WildcardBound};
