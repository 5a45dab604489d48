//! Type compatibility between injection points and bean types.
//!
//! "Direct" assignability follows Java's rules for the shapes [`TypeDescriptor`] can express:
//! subclassing through the [`TypeHierarchy`], invariant concrete type arguments, and
//! `? extends`/`? super` containment. The compound [`TypeMatcher::is_assignable`] adds the
//! container's wrapper idioms on top: collections, arrays, providers, `Optional` and
//! string-keyed maps.

use nova_spring_model::hierarchy::{as_supertype, is_subclass};
use nova_spring_model::{BeanCandidate, TypeDescriptor, TypeHierarchy, WildcardBound};

use crate::AutowireConfig;

#[derive(Clone, Copy)]
pub struct TypeMatcher<'a> {
    hierarchy: &'a dyn TypeHierarchy,
    config: &'a AutowireConfig,
}

impl<'a> TypeMatcher<'a> {
    pub fn new(hierarchy: &'a dyn TypeHierarchy, config: &'a AutowireConfig) -> Self {
        Self { hierarchy, config }
    }

    /// Whether a value of type `candidate` can be assigned to `required`, generics included.
    ///
    /// A raw candidate never satisfies a parameterized requirement here; see
    /// [`TypeMatcher::is_unchecked_assignable`] for the lenient variant.
    pub fn is_direct_assignable(
        &self,
        required: &TypeDescriptor,
        candidate: &TypeDescriptor,
    ) -> bool {
        if !required.is_resolved() || !candidate.is_resolved() {
            return false;
        }

        match required {
            TypeDescriptor::Wildcard(bound) => self.wildcard_accepts(bound, candidate),
            TypeDescriptor::Array(required_component) => match candidate {
                TypeDescriptor::Array(candidate_component) => {
                    self.is_direct_assignable(required_component, candidate_component)
                }
                _ => false,
            },
            TypeDescriptor::Plain(raw) | TypeDescriptor::Generic { base: raw, .. } => {
                if self.config.is_object(raw) {
                    return !matches!(candidate, TypeDescriptor::Wildcard(_));
                }
                let Some(view) = as_supertype(self.hierarchy, candidate, raw) else {
                    return false;
                };

                let required_args = required.type_args();
                if required_args.is_empty() {
                    return true;
                }
                let candidate_args = view.type_args();
                if candidate_args.len() != required_args.len() {
                    return false;
                }
                required_args
                    .iter()
                    .zip(candidate_args)
                    .all(|(req, cand)| self.contains(req, cand))
            }
            TypeDescriptor::Unresolved => false,
        }
    }

    /// Assignability after erasing type arguments on both sides.
    pub fn is_erasure_assignable(
        &self,
        required: &TypeDescriptor,
        candidate: &TypeDescriptor,
    ) -> bool {
        match (required, candidate) {
            (TypeDescriptor::Unresolved, _) | (_, TypeDescriptor::Unresolved) => false,
            (TypeDescriptor::Wildcard(WildcardBound::Unbounded), _) => true,
            (TypeDescriptor::Wildcard(WildcardBound::Extends(bound)), _) => {
                self.is_erasure_assignable(bound, candidate)
            }
            (TypeDescriptor::Wildcard(WildcardBound::Super(bound)), _) => {
                self.is_erasure_assignable(candidate, bound)
            }
            (TypeDescriptor::Array(req), TypeDescriptor::Array(cand)) => {
                self.is_erasure_assignable(req, cand)
            }
            (TypeDescriptor::Array(_), _) => false,
            (_, _) => {
                let Some(required_raw) = required.raw_name() else {
                    return false;
                };
                if self.config.is_object(required_raw) {
                    return !matches!(candidate, TypeDescriptor::Wildcard(_));
                }
                candidate
                    .raw_name()
                    .is_some_and(|raw| is_subclass(self.hierarchy, raw, required_raw))
            }
        }
    }

    /// [`TypeMatcher::is_direct_assignable`] plus Java's unchecked conversion: a raw candidate
    /// satisfies a parameterized requirement of a compatible class. Conflicting type arguments
    /// still fail.
    pub fn is_unchecked_assignable(
        &self,
        required: &TypeDescriptor,
        candidate: &TypeDescriptor,
    ) -> bool {
        if self.is_direct_assignable(required, candidate) {
            return true;
        }
        match (required, candidate) {
            (TypeDescriptor::Array(required), TypeDescriptor::Array(candidate)) => {
                self.is_unchecked_assignable(required, candidate)
            }
            (TypeDescriptor::Generic { base, .. }, _) => {
                as_supertype(self.hierarchy, candidate, base)
                    .is_some_and(|view| view.type_args().is_empty())
            }
            _ => false,
        }
    }

    /// One level of wrapper unwrapping: array component, iterable element, or provider argument.
    /// Returns `required` unchanged when no rule applies.
    pub fn effective_required_type(&self, required: &TypeDescriptor) -> TypeDescriptor {
        if let TypeDescriptor::Array(component) = required {
            return (**component).clone();
        }
        if let Some(element) = self.iterable_element(required) {
            return element;
        }
        if let Some(argument) = self.provider_argument(required) {
            return argument;
        }
        required.clone()
    }

    /// `T` for `Optional<T>`.
    pub fn optional_element(&self, required: &TypeDescriptor) -> Option<TypeDescriptor> {
        self.single_argument_of(required, |raw| self.config.is_optional(raw))
    }

    /// The full compatibility check used when filtering beans against an injection point.
    pub fn is_assignable(&self, required: &TypeDescriptor, candidate: &TypeDescriptor) -> bool {
        if self.is_direct_assignable(required, candidate) {
            return true;
        }

        let secondary = self.effective_required_type(required);
        if secondary != *required && self.is_direct_assignable(&secondary, candidate) {
            return true;
        }

        if let Some(element) = self.optional_element(required) {
            if self.is_direct_assignable(&element, candidate) {
                return true;
            }
        }

        if let Some(value) = self.string_keyed_map_value(required) {
            if self.is_direct_assignable(&value, candidate) {
                return true;
            }
        }

        // A bean exposed through a provider satisfies its provided type.
        if let Some(provided) = self.provider_argument(candidate) {
            if self.is_direct_assignable(required, &provided) {
                return true;
            }
        }

        self.is_properties(candidate) && self.is_string_map(required)
    }

    /// The element type to search for when `required` asks for "all beans of some type":
    /// an array or iterable element, the value type of a `Map<String, V>`, a provider argument,
    /// or an `Optional` element.
    pub fn iterable_search_type(&self, required: &TypeDescriptor) -> Option<TypeDescriptor> {
        if let TypeDescriptor::Array(component) = required {
            return Some((**component).clone());
        }
        self.iterable_element(required)
            .or_else(|| self.string_keyed_map_value(required))
            .or_else(|| self.provider_argument(required))
            .or_else(|| self.optional_element(required))
    }

    /// Whether `bean` declares a wildcard type argument whose bound accepts `required`.
    pub fn is_wildcard_candidate(&self, required: &TypeDescriptor, bean: &BeanCandidate) -> bool {
        bean.effective_types.iter().any(|effective| {
            effective.type_args().iter().any(|arg| match arg {
                TypeDescriptor::Wildcard(bound) => self.wildcard_accepts(bound, required),
                _ => false,
            })
        })
    }

    /// Container-provided types (`BeanFactory`, `Environment`, ...) and their subtypes.
    pub fn is_autowired_by_default(&self, ty: &TypeDescriptor) -> bool {
        let Some(raw) = ty.raw_name() else {
            return false;
        };
        self.config
            .implicitly_autowired_types
            .iter()
            .any(|implicit| is_subclass(self.hierarchy, raw, implicit))
    }

    pub fn is_string(&self, ty: &TypeDescriptor) -> bool {
        matches!(ty, TypeDescriptor::Plain(raw) if self.config.is_string(raw))
    }

    fn is_properties(&self, ty: &TypeDescriptor) -> bool {
        let Some(raw) = ty.raw_name() else {
            return false;
        };
        self.config
            .properties_types
            .iter()
            .any(|properties| is_subclass(self.hierarchy, raw, properties))
    }

    fn is_string_map(&self, ty: &TypeDescriptor) -> bool {
        match ty.raw_name() {
            Some(raw) if self.config.is_map(raw) => {
                let args = ty.type_args();
                args.len() == 2 && self.is_string(&args[0]) && self.is_string(&args[1])
            }
            _ => false,
        }
    }

    /// `V` for a required `Map<String, V>`; only the configured map types qualify.
    fn string_keyed_map_value(&self, ty: &TypeDescriptor) -> Option<TypeDescriptor> {
        let raw = ty.raw_name()?;
        if !self.config.is_map(raw) {
            return None;
        }
        match ty.type_args() {
            [key, value] if self.is_string(key) => Some(value.clone()),
            _ => None,
        }
    }

    fn iterable_element(&self, ty: &TypeDescriptor) -> Option<TypeDescriptor> {
        let raw = ty.raw_name()?;
        if self.config.is_iterable(raw) {
            return match ty.type_args() {
                [element] => Some(element.clone()),
                _ => None,
            };
        }
        if ty.type_args().is_empty() {
            return None;
        }
        // Concrete collection classes (`ArrayList<Foo>`) are iterable through their supertypes.
        self.config.iterable_types.iter().find_map(|iterable| {
            let view = as_supertype(self.hierarchy, ty, iterable)?;
            match view.type_args() {
                [element] => Some(element.clone()),
                _ => None,
            }
        })
    }

    fn provider_argument(&self, ty: &TypeDescriptor) -> Option<TypeDescriptor> {
        self.single_argument_of(ty, |raw| self.config.is_provider(raw))
    }

    fn single_argument_of(
        &self,
        ty: &TypeDescriptor,
        is_wrapper: impl Fn(&str) -> bool,
    ) -> Option<TypeDescriptor> {
        match ty {
            TypeDescriptor::Generic { base, args } if is_wrapper(base) && args.len() == 1 => {
                Some(args[0].clone())
            }
            _ => None,
        }
    }

    fn wildcard_accepts(&self, bound: &WildcardBound, ty: &TypeDescriptor) -> bool {
        match bound {
            WildcardBound::Unbounded => true,
            WildcardBound::Extends(upper) => self.is_direct_assignable(upper, ty),
            WildcardBound::Super(lower) => self.is_direct_assignable(ty, lower),
        }
    }

    /// Java type-argument containment: does `required` contain `candidate`?
    fn contains(&self, required: &TypeDescriptor, candidate: &TypeDescriptor) -> bool {
        match (required, candidate) {
            (TypeDescriptor::Wildcard(WildcardBound::Unbounded), _) => true,
            (
                TypeDescriptor::Wildcard(WildcardBound::Extends(upper)),
                TypeDescriptor::Wildcard(WildcardBound::Extends(candidate_upper)),
            ) => self.is_direct_assignable(upper, candidate_upper),
            (
                TypeDescriptor::Wildcard(WildcardBound::Extends(upper)),
                TypeDescriptor::Wildcard(_),
            ) => upper.raw_name().is_some_and(|raw| self.config.is_object(raw)),
            (TypeDescriptor::Wildcard(WildcardBound::Extends(upper)), _) => {
                self.is_direct_assignable(upper, candidate)
            }
            (
                TypeDescriptor::Wildcard(WildcardBound::Super(lower)),
                TypeDescriptor::Wildcard(WildcardBound::Super(candidate_lower)),
            ) => self.is_direct_assignable(candidate_lower, lower),
            (TypeDescriptor::Wildcard(WildcardBound::Super(_)), TypeDescriptor::Wildcard(_)) => {
                false
            }
            (TypeDescriptor::Wildcard(WildcardBound::Super(lower)), _) => {
                self.is_direct_assignable(candidate, lower)
            }
            _ => required == candidate,
        }
    }
}
