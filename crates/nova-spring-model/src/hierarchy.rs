use std::collections::{HashMap, HashSet, VecDeque};

use crate::TypeDescriptor;

/// Supertype information for one class.
///
/// `supertypes` may reference the class's own type parameters by name
/// (`ArrayList<E>` declares `List<E>`); they are substituted when walking.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassInfo {
    pub type_params: Vec<String>,
    pub supertypes: Vec<TypeDescriptor>,
}

impl ClassInfo {
    pub fn new(supertypes: Vec<TypeDescriptor>) -> Self {
        Self {
            type_params: Vec::new(),
            supertypes,
        }
    }

    pub fn with_type_params(mut self, params: &[&str]) -> Self {
        self.type_params = params.iter().map(|p| p.to_string()).collect();
        self
    }
}

/// Read-only view over class supertype metadata.
pub trait TypeHierarchy {
    fn class_info(&self, raw_name: &str) -> Option<&ClassInfo>;
}

#[derive(Clone, Debug, Default)]
pub struct ClassHierarchy {
    classes: HashMap<String, ClassInfo>,
}

impl ClassHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hierarchy pre-seeded with the JDK collection and map types autowiring cares about.
    pub fn with_jdk_defaults() -> Self {
        let mut hierarchy = Self::new();
        let decl = |text: &str| TypeDescriptor::parse(text);

        hierarchy.insert(
            "java.util.Collection",
            ClassInfo::new(vec![decl("java.lang.Iterable<E>")]).with_type_params(&["E"]),
        );
        for (class, parent) in [
            ("java.util.List", "java.util.Collection<E>"),
            ("java.util.Set", "java.util.Collection<E>"),
            ("java.util.Queue", "java.util.Collection<E>"),
            ("java.util.SortedSet", "java.util.Set<E>"),
            ("java.util.NavigableSet", "java.util.SortedSet<E>"),
            ("java.util.Deque", "java.util.Queue<E>"),
            ("java.util.ArrayList", "java.util.List<E>"),
            ("java.util.LinkedList", "java.util.List<E>"),
            ("java.util.HashSet", "java.util.Set<E>"),
            ("java.util.LinkedHashSet", "java.util.HashSet<E>"),
            ("java.util.TreeSet", "java.util.NavigableSet<E>"),
            ("java.util.ArrayDeque", "java.util.Deque<E>"),
        ] {
            hierarchy.insert(
                class,
                ClassInfo::new(vec![decl(parent)]).with_type_params(&["E"]),
            );
        }
        for (class, parent) in [
            ("java.util.SortedMap", "java.util.Map<K, V>"),
            ("java.util.NavigableMap", "java.util.SortedMap<K, V>"),
            ("java.util.HashMap", "java.util.Map<K, V>"),
            ("java.util.LinkedHashMap", "java.util.HashMap<K, V>"),
            ("java.util.TreeMap", "java.util.NavigableMap<K, V>"),
            ("java.util.Hashtable", "java.util.Map<K, V>"),
        ] {
            hierarchy.insert(
                class,
                ClassInfo::new(vec![decl(parent)]).with_type_params(&["K", "V"]),
            );
        }
        hierarchy.insert(
            "java.util.Properties",
            ClassInfo::new(vec![decl("java.util.Hashtable<java.lang.Object, java.lang.Object>")]),
        );
        hierarchy
    }

    pub fn insert(&mut self, class: impl Into<String>, info: ClassInfo) {
        self.classes.insert(class.into(), info);
    }

    /// Convenience for non-generic declarations: `class` extends/implements `supertypes`.
    pub fn declare(&mut self, class: impl Into<String>, supertypes: &[&str]) {
        self.insert(
            class,
            ClassInfo::new(supertypes.iter().map(|s| TypeDescriptor::parse(s)).collect()),
        );
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl TypeHierarchy for ClassHierarchy {
    fn class_info(&self, raw_name: &str) -> Option<&ClassInfo> {
        self.classes.get(raw_name)
    }
}

/// Returns whether raw class `from` is `to` or one of its (transitive) subclasses.
pub fn is_subclass(hierarchy: &dyn TypeHierarchy, from: &str, to: &str) -> bool {
    if from == to {
        return true;
    }

    let mut queue = VecDeque::<&str>::new();
    queue.push_back(from);

    let mut visited = HashSet::<&str>::new();
    while let Some(current) = queue.pop_front() {
        if !visited.insert(current) {
            continue;
        }
        let Some(info) = hierarchy.class_info(current) else {
            continue;
        };
        for sup in &info.supertypes {
            let Some(raw) = sup.raw_name() else {
                continue;
            };
            if raw == to {
                return true;
            }
            queue.push_back(raw);
        }
    }

    false
}

/// Returns `ty` viewed as raw class `target`, with type arguments substituted along the way.
///
/// Example: `ArrayList<Foo>` viewed as `java.util.List` is `java.util.List<Foo>`.
/// A raw starting type stays raw: supertypes are erased rather than half-substituted.
pub fn as_supertype(
    hierarchy: &dyn TypeHierarchy,
    ty: &TypeDescriptor,
    target: &str,
) -> Option<TypeDescriptor> {
    if !ty.is_class_type() {
        return None;
    }

    let mut queue = VecDeque::<TypeDescriptor>::new();
    let mut visited = HashSet::<String>::new();
    queue.push_back(ty.clone());

    while let Some(current) = queue.pop_front() {
        let Some(raw) = current.raw_name() else {
            continue;
        };
        if raw == target {
            return Some(current);
        }
        if !visited.insert(raw.to_string()) {
            continue;
        }
        let Some(info) = hierarchy.class_info(raw) else {
            continue;
        };

        let args = current.type_args();
        let is_raw = args.is_empty() && !info.type_params.is_empty();
        for sup in &info.supertypes {
            let next = if is_raw {
                sup.erasure()
            } else {
                sup.substitute(&info.type_params, args)
            };
            queue.push_back(next);
        }
    }

    None
}
