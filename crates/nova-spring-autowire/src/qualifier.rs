use nova_spring_model::{BeanCandidate, BeanModel, Qualifier};

use crate::config::AnnotationMetadata;

/// Compares injection-point qualifiers against candidate qualifiers.
#[derive(Clone, Copy)]
pub struct QualifierMatcher<'a> {
    metadata: &'a AnnotationMetadata,
    model: &'a dyn BeanModel,
}

impl<'a> QualifierMatcher<'a> {
    pub fn new(metadata: &'a AnnotationMetadata, model: &'a dyn BeanModel) -> Self {
        Self { metadata, model }
    }

    /// Returns the point qualifier if its annotation type is recognized.
    pub fn effective_point_qualifier<'q>(
        &self,
        qualifier: Option<&'q Qualifier>,
    ) -> Option<&'q Qualifier> {
        qualifier.filter(|q| self.metadata.is_qualifier(&q.annotation))
    }

    /// Qualifiers of `candidate` whose annotation type is recognized, directly or through
    /// meta-annotations. Unrecognized ones are treated as absent.
    pub fn effective_qualifiers<'c>(&self, candidate: &'c BeanCandidate) -> Vec<&'c Qualifier> {
        candidate
            .qualifiers
            .iter()
            .filter(|q| self.metadata.is_qualifier(&q.annotation))
            .collect()
    }

    /// Whether `candidate` passes the qualifier stage for an injection point carrying
    /// `point_qualifier`. `consumer_name` is the field or parameter name.
    pub fn matches(
        &self,
        point_qualifier: Option<&Qualifier>,
        candidate: &BeanCandidate,
        consumer_name: Option<&str>,
    ) -> bool {
        let candidate_qualifiers = self.effective_qualifiers(candidate);
        let named_by_consumer = || {
            consumer_name.is_some_and(|name| {
                candidate_qualifiers
                    .iter()
                    .any(|q| q.value.as_deref() == Some(name))
            })
        };

        match self.effective_point_qualifier(point_qualifier) {
            Some(qualifier) => {
                if candidate_qualifiers
                    .iter()
                    .any(|candidate_qualifier| self.compare(qualifier, candidate_qualifier))
                {
                    return true;
                }
                // The container falls back to the bean name for by-name qualifiers.
                if let Some(value) = qualifier.value.as_deref() {
                    if self.metadata.is_name_qualifier(&qualifier.annotation)
                        && self.model.all_names_of(candidate).iter().any(|n| n == value)
                    {
                        return true;
                    }
                }
                let comparable = candidate_qualifiers
                    .iter()
                    .any(|q| self.same_kind(qualifier, q));
                !comparable && named_by_consumer()
            }
            None => candidate_qualifiers.is_empty() || named_by_consumer(),
        }
    }

    /// Type + value + attribute comparison; by-name qualifier types compare by value only.
    pub fn compare(&self, left: &Qualifier, right: &Qualifier) -> bool {
        if !self.same_kind(left, right) {
            return false;
        }
        if self.is_by_name(left) {
            return left.value == right.value;
        }
        left.value == right.value && left.attributes == right.attributes
    }

    fn is_by_name(&self, qualifier: &Qualifier) -> bool {
        self.metadata.is_name_qualifier(&qualifier.annotation)
    }

    fn same_kind(&self, left: &Qualifier, right: &Qualifier) -> bool {
        left.annotation == right.annotation || (self.is_by_name(left) && self.is_by_name(right))
    }
}
