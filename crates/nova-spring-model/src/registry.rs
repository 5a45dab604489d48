use std::collections::{HashMap, HashSet};

use crate::hierarchy::is_subclass;
use crate::{BeanCandidate, BeanId, BeanModel, ClassHierarchy, TypeDescriptor, TypeHierarchy};

/// In-memory [`BeanModel`] over an already materialized bean list.
///
/// Beans are kept in registration order. Standalone aliases (`<alias name="a" alias="b"/>`)
/// may point at bean names or at other aliases.
#[derive(Clone, Debug, Default)]
pub struct BeanRegistry {
    beans: Vec<BeanCandidate>,
    by_id: HashMap<BeanId, usize>,
    aliases: HashMap<String, String>,
    hierarchy: ClassHierarchy,
}

impl BeanRegistry {
    pub fn new(hierarchy: ClassHierarchy) -> Self {
        Self {
            hierarchy,
            ..Self::default()
        }
    }

    /// Registers `bean`.
    ///
    /// Panics when a bean with the same id is already registered, or when the bean has no
    /// effective type: both are bugs in whatever materialized the model.
    pub fn register(&mut self, bean: BeanCandidate) -> &mut Self {
        assert!(
            !bean.effective_types.is_empty(),
            "bean {} registered without an effective type",
            bean.id
        );
        let idx = self.beans.len();
        let previous = self.by_id.insert(bean.id, idx);
        assert!(previous.is_none(), "duplicate bean id {}", bean.id);
        self.beans.push(bean);
        self
    }

    pub fn with_bean(mut self, bean: BeanCandidate) -> Self {
        self.register(bean);
        self
    }

    /// Declares `alias` as another name for `target` (a bean name or another alias).
    pub fn register_alias(&mut self, alias: impl Into<String>, target: impl Into<String>) {
        self.aliases.insert(alias.into(), target.into());
    }

    pub fn len(&self) -> usize {
        self.beans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beans.is_empty()
    }

    /// Follows standalone aliases until a name that is not itself an alias is reached.
    fn canonical_name<'a>(&'a self, name: &'a str) -> &'a str {
        let mut current = name;
        let mut visited = HashSet::<&str>::new();
        while let Some(target) = self.aliases.get(current) {
            if !visited.insert(current) {
                tracing::debug!(
                    target: "nova.spring.model",
                    alias = name,
                    "alias cycle detected"
                );
                break;
            }
            current = target;
        }
        current
    }

    fn type_matches(
        &self,
        candidate: &TypeDescriptor,
        wanted: &TypeDescriptor,
        subtypes: bool,
    ) -> bool {
        match (candidate.raw_name(), wanted.raw_name()) {
            (Some(have), Some(want)) => {
                have == want || (subtypes && is_subclass(&self.hierarchy, have, want))
            }
            _ => candidate.erasure() == wanted.erasure(),
        }
    }
}

impl BeanModel for BeanRegistry {
    fn find_by_type(&self, ty: &TypeDescriptor, include_subtypes: bool) -> Vec<&BeanCandidate> {
        if !ty.is_resolved() {
            return Vec::new();
        }
        self.beans
            .iter()
            .filter(|bean| {
                bean.effective_types
                    .iter()
                    .any(|eff| self.type_matches(eff, ty, include_subtypes))
            })
            .collect()
    }

    fn find_by_name(&self, name: &str) -> Option<&BeanCandidate> {
        let name = self.canonical_name(name);
        // Later declarations of the same name win.
        self.beans.iter().rev().find(|bean| bean.has_name(name))
    }

    fn find_by_id(&self, id: BeanId) -> Option<&BeanCandidate> {
        self.by_id.get(&id).map(|&idx| &self.beans[idx])
    }

    fn all_candidates(&self) -> Vec<&BeanCandidate> {
        self.beans.iter().collect()
    }

    fn all_names_of(&self, bean: &BeanCandidate) -> Vec<String> {
        let mut names: Vec<String> = bean.names().map(str::to_string).collect();
        let mut seen: HashSet<String> = names.iter().cloned().collect();

        // Standalone aliases may alias aliases; walk the reverse edges breadth-first.
        let mut cursor = 0;
        while cursor < names.len() {
            let target = names[cursor].clone();
            cursor += 1;
            let mut found: Vec<&String> = self
                .aliases
                .iter()
                .filter(|(_, to)| **to == target)
                .map(|(alias, _)| alias)
                .collect();
            found.sort();
            for alias in found {
                if seen.insert(alias.clone()) {
                    names.push(alias.clone());
                }
            }
        }
        names
    }

    fn hierarchy(&self) -> &dyn TypeHierarchy {
        &self.hierarchy
    }
}
