//! Candidate filter pipeline.
//!
//! Each stage is a pure function from one candidate list to a narrower one; none of them
//! mutates a [`BeanCandidate`]. Lists keep model order so results are deterministic.

use std::collections::HashSet;

use globset::{Glob, GlobSet, GlobSetBuilder};
use nova_spring_model::{BeanCandidate, BeanId, BeanModel, TypeDescriptor};

use crate::cancel::{self, CancellationToken, Cancelled};
use crate::config::AnnotationMetadata;
use crate::{AutowireConfig, TypeMatcher};

type Candidates<'m> = Vec<&'m BeanCandidate>;

/// Drops abstract beans, beans with `autowire-candidate="false"`, and beans whose names miss
/// every default-autowire-candidate pattern of their bean collection.
pub fn filter_eligible<'m>(candidates: &[&'m BeanCandidate]) -> Candidates<'m> {
    candidates
        .iter()
        .copied()
        .filter(|bean| {
            !bean.is_abstract
                && bean.autowire_candidate != Some(false)
                && matches_candidate_patterns(bean)
        })
        .collect()
}

fn matches_candidate_patterns(bean: &BeanCandidate) -> bool {
    let Some(patterns) = candidate_globs(bean) else {
        return true;
    };
    bean.names().any(|name| patterns.is_match(name))
}

/// `None` when no usable pattern is configured.
fn candidate_globs(bean: &BeanCandidate) -> Option<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    let mut usable = 0usize;
    for pattern in bean
        .candidate_patterns
        .iter()
        .flat_map(|p| p.split(','))
        .map(str::trim)
        .filter(|p| !p.is_empty())
    {
        match Glob::new(pattern) {
            Ok(glob) => {
                builder.add(glob);
                usable += 1;
            }
            Err(err) => {
                tracing::warn!(
                    target: "nova.spring.autowire",
                    bean = %bean.id,
                    pattern,
                    error = %err,
                    "ignoring invalid default-autowire-candidates pattern"
                );
            }
        }
    }
    if usable == 0 {
        return None;
    }
    match builder.build() {
        Ok(set) => Some(set),
        Err(err) => {
            tracing::warn!(
                target: "nova.spring.autowire",
                bean = %bean.id,
                error = %err,
                "failed to build default-autowire-candidates globset"
            );
            None
        }
    }
}

/// Narrows a multi-candidate list to primary beans, with `preferred_name` as tie-break.
pub fn select_primary<'m>(
    candidates: &[&'m BeanCandidate],
    preferred_name: Option<&str>,
    model: &dyn BeanModel,
) -> Candidates<'m> {
    if candidates.len() <= 1 {
        return candidates.to_vec();
    }

    let is_named = |bean: &BeanCandidate| {
        preferred_name.is_some_and(|name| {
            bean.has_name(name) || model.all_names_of(bean).iter().any(|n| n == name)
        })
    };

    let primaries: Candidates<'m> = candidates
        .iter()
        .copied()
        .filter(|bean| bean.is_primary)
        .collect();

    let named_primaries: Candidates<'m> =
        primaries.iter().copied().filter(|&b| is_named(b)).collect();
    if named_primaries.len() == 1 {
        return named_primaries;
    }
    if !primaries.is_empty() {
        return primaries;
    }

    let named: Candidates<'m> = candidates.iter().copied().filter(|&b| is_named(b)).collect();
    if named.is_empty() {
        candidates.to_vec()
    } else {
        named
    }
}

/// Keeps the first candidate for each identity element. Candidates without one are never
/// collapsed.
pub fn dedup_by_identity<'m>(candidates: &[&'m BeanCandidate]) -> Candidates<'m> {
    let mut seen = HashSet::new();
    candidates
        .iter()
        .copied()
        .filter(|&bean| match &bean.identity {
            Some(identity) => seen.insert(identity),
            None => true,
        })
        .collect()
}

/// Drops candidates that another candidate in the list explicitly redefines.
pub fn drop_redefined<'m>(candidates: &[&'m BeanCandidate]) -> Candidates<'m> {
    if candidates.len() <= 1 {
        return candidates.to_vec();
    }
    let redefined: HashSet<BeanId> = candidates.iter().filter_map(|b| b.redefines).collect();
    candidates
        .iter()
        .copied()
        .filter(|bean| !redefined.contains(&bean.id))
        .collect()
}

/// Drops implicit beans shadowed by an explicit bean of the same name and a compatible type.
pub fn drop_overridden_implicit<'m>(
    candidates: &[&'m BeanCandidate],
    matcher: &TypeMatcher<'_>,
) -> Candidates<'m> {
    if candidates.len() <= 1 {
        return candidates.to_vec();
    }
    candidates
        .iter()
        .copied()
        .filter(|bean| !is_overridden(bean, candidates, matcher))
        .collect()
}

fn is_overridden(
    bean: &BeanCandidate,
    all: &[&BeanCandidate],
    matcher: &TypeMatcher<'_>,
) -> bool {
    if !bean.implicit {
        return false;
    }
    let Some(name) = bean.name.as_deref() else {
        return false;
    };
    all.iter().any(|other| {
        other.id != bean.id
            && other.name.as_deref() == Some(name)
            && other
                .effective_types
                .iter()
                .any(|ty| matcher.is_direct_assignable(ty, &bean.declared_type))
    })
}

/// Keeps the highest-precedence (lowest value) candidates, but only when every candidate
/// carries a usable priority. Ties stay ambiguous.
pub fn narrow_by_priority<'m>(
    candidates: &[&'m BeanCandidate],
    metadata: &AnnotationMetadata,
) -> Candidates<'m> {
    if candidates.is_empty() {
        return Vec::new();
    }

    let mut values = Vec::with_capacity(candidates.len());
    for bean in candidates {
        let Some(value) = bean
            .priority
            .as_ref()
            .and_then(|marker| metadata.priority_value(marker))
        else {
            return candidates.to_vec();
        };
        values.push(value);
    }

    let Some(&best) = values.iter().min() else {
        return candidates.to_vec();
    };
    candidates
        .iter()
        .copied()
        .zip(values)
        .filter(|(_, value)| *value == best)
        .map(|(bean, _)| bean)
        .collect()
}

pub fn exclude_self<'m>(
    candidates: &[&'m BeanCandidate],
    owner: Option<BeanId>,
) -> Candidates<'m> {
    match owner {
        Some(owner) => candidates
            .iter()
            .copied()
            .filter(|bean| bean.id != owner)
            .collect(),
        None => candidates.to_vec(),
    }
}

/// Re-checks full generic assignability of each candidate's effective types against
/// `required`. A sole candidate may also be raw (unchecked conversion).
pub fn filter_by_generics<'m>(
    candidates: &[&'m BeanCandidate],
    required: &TypeDescriptor,
    matcher: &TypeMatcher<'_>,
) -> Candidates<'m> {
    let lenient = candidates.len() == 1;
    if lenient {
        tracing::debug!(
            target: "nova.spring.autowire",
            required = %required,
            "lenient generics check for single candidate"
        );
    }
    candidates
        .iter()
        .copied()
        .filter(|bean| {
            bean.effective_types.iter().any(|ty| {
                if lenient {
                    matcher.is_unchecked_assignable(required, ty)
                } else {
                    matcher.is_direct_assignable(required, ty)
                }
            })
        })
        .collect()
}

/// The seven narrowing stages in order.
pub struct FilterPipeline<'a> {
    model: &'a dyn BeanModel,
    config: &'a AutowireConfig,
}

impl<'a> FilterPipeline<'a> {
    pub fn new(model: &'a dyn BeanModel, config: &'a AutowireConfig) -> Self {
        Self { model, config }
    }

    pub fn run<'m>(
        &self,
        candidates: Candidates<'m>,
        preferred_name: Option<&str>,
        owner: Option<BeanId>,
        cancel: &CancellationToken,
    ) -> Result<Candidates<'m>, Cancelled> {
        let matcher = TypeMatcher::new(self.model.hierarchy(), self.config);
        let annotations = &self.config.annotations;

        let current = stage("eligibility", candidates, cancel, |c| filter_eligible(c))?;
        let current = stage("primary", current, cancel, |c| {
            select_primary(c, preferred_name, self.model)
        })?;
        let current = stage("identity", current, cancel, |c| dedup_by_identity(c))?;
        let current = stage("redefinition", current, cancel, |c| drop_redefined(c))?;
        let current = stage("implicit-override", current, cancel, |c| {
            drop_overridden_implicit(c, &matcher)
        })?;
        let current = stage("priority", current, cancel, |c| {
            narrow_by_priority(c, annotations)
        })?;
        stage("self", current, cancel, |c| exclude_self(c, owner))
    }
}

fn stage<'m>(
    name: &str,
    input: Candidates<'m>,
    cancel: &CancellationToken,
    apply: impl FnOnce(&[&'m BeanCandidate]) -> Candidates<'m>,
) -> Result<Candidates<'m>, Cancelled> {
    cancel::check(cancel)?;
    let output = apply(&input);
    tracing::trace!(
        target: "nova.spring.autowire",
        stage = name,
        before = input.len(),
        after = output.len(),
        "filter stage"
    );
    Ok(output)
}
