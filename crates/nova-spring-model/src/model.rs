use crate::{BeanCandidate, BeanId, TypeDescriptor, TypeHierarchy};

/// Read-only snapshot of the beans known to one analysis scope.
///
/// Implementations must be deterministic: the same query against the same snapshot returns
/// the same beans in the same order.
pub trait BeanModel {
    /// Beans with an effective type whose raw class is `ty`'s raw class, or (with
    /// `include_subtypes`) a subclass of it. Type arguments are ignored.
    fn find_by_type(&self, ty: &TypeDescriptor, include_subtypes: bool) -> Vec<&BeanCandidate>;

    /// Exact name or alias lookup (alias chains resolved).
    fn find_by_name(&self, name: &str) -> Option<&BeanCandidate>;

    fn find_by_id(&self, id: BeanId) -> Option<&BeanCandidate>;

    fn all_candidates(&self) -> Vec<&BeanCandidate>;

    /// Name and every alias, including aliases declared outside the bean definition.
    fn all_names_of(&self, bean: &BeanCandidate) -> Vec<String>;

    fn hierarchy(&self) -> &dyn TypeHierarchy;
}
