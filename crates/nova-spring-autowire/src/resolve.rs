use nova_spring_model::hierarchy::is_subclass;
use nova_spring_model::{
    BeanCandidate, BeanId, BeanModel, InjectionKind, InjectionPoint, Qualifier, TypeDescriptor,
};

use crate::cancel::{self, CancellationToken, Cancelled};
use crate::constructor::ConstructorResolver;
use crate::pipeline::{filter_by_generics, filter_eligible, FilterPipeline};
use crate::{AutowireConfig, QualifierMatcher, TypeMatcher};

/// How the diagnostics layer should read a [`ResolutionResult`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResolutionOutcome {
    Unresolved,
    Resolved,
    Ambiguous,
}

/// Candidates for one injection point, in model order and unique by id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolutionResult<'m> {
    candidates: Vec<&'m BeanCandidate>,
    satisfied_by_container: bool,
}

impl<'m> ResolutionResult<'m> {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_candidates(candidates: impl IntoIterator<Item = &'m BeanCandidate>) -> Self {
        let mut out = Self::empty();
        out.extend(candidates);
        out
    }

    fn extend(&mut self, candidates: impl IntoIterator<Item = &'m BeanCandidate>) {
        for candidate in candidates {
            if !self.contains(candidate.id) {
                self.candidates.push(candidate);
            }
        }
    }

    pub fn candidates(&self) -> &[&'m BeanCandidate] {
        &self.candidates
    }

    pub fn ids(&self) -> Vec<BeanId> {
        self.candidates.iter().map(|b| b.id).collect()
    }

    pub fn contains(&self, id: BeanId) -> bool {
        self.candidates.iter().any(|b| b.id == id)
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Whether the required type is provided by the container itself (`BeanFactory`,
    /// `Environment`, ...), so an empty candidate list is not an error.
    pub fn is_satisfied_by_container(&self) -> bool {
        self.satisfied_by_container
    }

    pub fn outcome(&self) -> ResolutionOutcome {
        match self.candidates.len() {
            0 if self.satisfied_by_container => ResolutionOutcome::Resolved,
            0 => ResolutionOutcome::Unresolved,
            1 => ResolutionOutcome::Resolved,
            _ => ResolutionOutcome::Ambiguous,
        }
    }
}

/// Resolves injection points against one bean model snapshot.
///
/// The resolver keeps no state between calls; every working set is local to one request.
#[derive(Clone, Copy)]
pub struct AutowireResolver<'a> {
    model: &'a dyn BeanModel,
    config: &'a AutowireConfig,
}

impl<'a> AutowireResolver<'a> {
    pub fn new(model: &'a dyn BeanModel, config: &'a AutowireConfig) -> Self {
        Self { model, config }
    }

    pub fn model(&self) -> &'a dyn BeanModel {
        self.model
    }

    pub fn config(&self) -> &'a AutowireConfig {
        self.config
    }

    pub fn type_matcher(&self) -> TypeMatcher<'a> {
        TypeMatcher::new(self.model.hierarchy(), self.config)
    }

    pub fn qualifier_matcher(&self) -> QualifierMatcher<'a> {
        QualifierMatcher::new(&self.config.annotations, self.model)
    }

    /// Candidates the container would inject into `point`.
    ///
    /// Panics for a constructor injection point without an owner, or whose owner is not part
    /// of the model.
    pub fn resolve(
        &self,
        point: &InjectionPoint,
        cancel: &CancellationToken,
    ) -> Result<ResolutionResult<'a>, Cancelled> {
        cancel::check(cancel)?;
        let mut result = match point.kind {
            InjectionKind::ByType => self.resolve_by_type(point, cancel)?,
            InjectionKind::ByName => self.resolve_by_name(point),
            InjectionKind::AnnotationDriven => self.resolve_annotated(point, cancel)?,
            InjectionKind::Constructor => {
                let owner_id = point.owner.unwrap_or_else(|| {
                    panic!(
                        "constructor injection point for `{}` has no owning bean",
                        point.required_type
                    )
                });
                let owner = self.model.find_by_id(owner_id).unwrap_or_else(|| {
                    panic!("constructor injection point owner {owner_id} is not in the bean model")
                });
                let candidates = ConstructorResolver::from_resolver(*self).parameter_candidates(
                    owner,
                    &point.required_type,
                    point.qualifier.as_ref(),
                    cancel,
                )?;
                ResolutionResult::from_candidates(candidates)
            }
        };

        if point.kind != InjectionKind::ByName {
            result.satisfied_by_container =
                self.type_matcher().is_autowired_by_default(&point.required_type);
        }
        tracing::debug!(
            target: "nova.spring.autowire",
            kind = ?point.kind,
            required = %point.required_type,
            candidates = result.len(),
            "resolved injection point"
        );
        Ok(result)
    }

    /// The by-type primitive: raw-type gather (with subtypes), wildcard fallback, filter
    /// pipeline, then the generics pass.
    pub fn autowire_by_type(
        &self,
        required: &TypeDescriptor,
        preferred_name: Option<&str>,
        owner: Option<BeanId>,
        cancel: &CancellationToken,
    ) -> Result<Vec<&'a BeanCandidate>, Cancelled> {
        self.autowire_by_type_with(required, preferred_name, owner, true, cancel)
    }

    /// [`AutowireResolver::autowire_by_type`] with the generics pass optional.
    pub fn autowire_by_type_with(
        &self,
        required: &TypeDescriptor,
        preferred_name: Option<&str>,
        owner: Option<BeanId>,
        filter_generics: bool,
        cancel: &CancellationToken,
    ) -> Result<Vec<&'a BeanCandidate>, Cancelled> {
        cancel::check(cancel)?;
        if !required.is_resolved() {
            return Ok(Vec::new());
        }

        let matcher = self.type_matcher();
        let mut filter_generics = filter_generics;
        let mut found = self.model.find_by_type(required, true);
        if found.is_empty() && required.is_class_type() {
            found = self.wildcard_candidates(required, &matcher, cancel)?;
            if !found.is_empty() {
                tracing::debug!(
                    target: "nova.spring.autowire",
                    required = %required,
                    candidates = found.len(),
                    "using wildcard fallback"
                );
            }
            filter_generics = false;
        }

        let filtered = FilterPipeline::new(self.model, self.config).run(
            found,
            preferred_name,
            owner,
            cancel,
        )?;
        if filter_generics {
            Ok(filter_by_generics(&filtered, required, &matcher))
        } else {
            Ok(filtered)
        }
    }

    /// "All beans of the element type" for collection, array, string-keyed map, provider and
    /// `Optional` injection points. Empty when `required` is none of those.
    pub fn iterable_candidates(
        &self,
        required: &TypeDescriptor,
        owner: Option<BeanId>,
        cancel: &CancellationToken,
    ) -> Result<Vec<&'a BeanCandidate>, Cancelled> {
        match self.type_matcher().iterable_search_type(required) {
            Some(search) => self.autowire_by_type(&search, None, owner, cancel),
            None => Ok(Vec::new()),
        }
    }

    /// Qualifier-first resolution: beans whose qualifiers match (or whose name equals the
    /// qualifier value), restricted to types compatible with `required`, then the pipeline.
    pub fn qualified_candidates(
        &self,
        qualifier: &Qualifier,
        required: &TypeDescriptor,
        owner: Option<BeanId>,
        cancel: &CancellationToken,
    ) -> Result<Vec<&'a BeanCandidate>, Cancelled> {
        if !required.is_resolved() {
            return Ok(Vec::new());
        }

        let qualifiers = self.qualifier_matcher();
        let mut matched = Vec::new();
        for bean in self.model.all_candidates() {
            cancel::check(cancel)?;
            if qualifiers.matches(Some(qualifier), bean, None) {
                matched.push(bean);
            }
        }
        if let Some(named) = qualifier
            .value
            .as_deref()
            .and_then(|value| self.model.find_by_name(value))
        {
            if !matched.iter().any(|b| b.id == named.id) {
                matched.push(named);
            }
        }

        let matcher = self.type_matcher();
        let typed: Vec<_> = matched
            .into_iter()
            .filter(|bean| {
                bean.effective_types
                    .iter()
                    .any(|ty| matcher.is_assignable(required, ty))
            })
            .collect();

        FilterPipeline::new(self.model, self.config).run(typed, None, owner, cancel)
    }

    /// The injection points among `points` that could receive `bean`.
    pub fn injection_points_for<'p>(
        &self,
        bean: &BeanCandidate,
        points: &'p [InjectionPoint],
        cancel: &CancellationToken,
    ) -> Result<Vec<&'p InjectionPoint>, Cancelled> {
        if filter_eligible(&[bean]).is_empty() {
            return Ok(Vec::new());
        }

        let matcher = self.type_matcher();
        let qualifiers = self.qualifier_matcher();
        let mut out = Vec::new();
        for point in points {
            cancel::check(cancel)?;
            if point.owner == Some(bean.id) {
                continue;
            }
            let accepts = match point.kind {
                InjectionKind::ByName => point
                    .preferred_name
                    .as_deref()
                    .is_some_and(|name| self.model.all_names_of(bean).iter().any(|n| n == name)),
                _ => {
                    self.accepts_type(&matcher, &point.required_type, bean)
                        && qualifiers.matches(
                            point.qualifier.as_ref(),
                            bean,
                            point.preferred_name.as_deref(),
                        )
                }
            };
            if accepts {
                out.push(point);
            }
        }
        Ok(out)
    }

    fn accepts_type(
        &self,
        matcher: &TypeMatcher<'_>,
        required: &TypeDescriptor,
        bean: &BeanCandidate,
    ) -> bool {
        if !required.is_resolved() {
            return false;
        }
        let search = matcher.iterable_search_type(required);
        bean.effective_types.iter().any(|ty| {
            matcher.is_assignable(required, ty)
                || search
                    .as_ref()
                    .is_some_and(|search| matcher.is_direct_assignable(search, ty))
        }) || matcher.is_wildcard_candidate(required, bean)
    }

    fn resolve_by_type(
        &self,
        point: &InjectionPoint,
        cancel: &CancellationToken,
    ) -> Result<ResolutionResult<'a>, Cancelled> {
        let required = &point.required_type;
        if !required.is_resolved() {
            return Ok(ResolutionResult::empty());
        }

        let preferred_name = point.preferred_name.as_deref();
        let mut result = ResolutionResult::from_candidates(self.autowire_by_type(
            required,
            preferred_name,
            point.owner,
            cancel,
        )?);

        let matcher = self.type_matcher();
        let unwrapped = matcher
            .optional_element(required)
            .unwrap_or_else(|| matcher.effective_required_type(required));
        if unwrapped != *required {
            result.extend(self.autowire_by_type(&unwrapped, preferred_name, point.owner, cancel)?);
        }
        Ok(result)
    }

    fn resolve_by_name(&self, point: &InjectionPoint) -> ResolutionResult<'a> {
        let Some(name) = point.preferred_name.as_deref() else {
            return ResolutionResult::empty();
        };
        match self.model.find_by_name(name) {
            Some(bean) if Some(bean.id) != point.owner => ResolutionResult::from_candidates([bean]),
            _ => ResolutionResult::empty(),
        }
    }

    fn resolve_annotated(
        &self,
        point: &InjectionPoint,
        cancel: &CancellationToken,
    ) -> Result<ResolutionResult<'a>, Cancelled> {
        if let Some(qualifier) = self
            .qualifier_matcher()
            .effective_point_qualifier(point.qualifier.as_ref())
        {
            let candidates =
                self.qualified_candidates(qualifier, &point.required_type, point.owner, cancel)?;
            return Ok(ResolutionResult::from_candidates(candidates));
        }

        let result = self.resolve_by_type(point, cancel)?;
        if !result.is_empty() {
            return Ok(result);
        }

        let fallback = self.iterable_candidates(&point.required_type, point.owner, cancel)?;
        if !fallback.is_empty() {
            tracing::debug!(
                target: "nova.spring.autowire",
                required = %point.required_type,
                candidates = fallback.len(),
                "using iterable fallback"
            );
        }
        Ok(ResolutionResult::from_candidates(fallback))
    }

    /// Beans whose declared class is a subclass of `required`'s class and that declare a
    /// wildcard type argument accepting `required`.
    fn wildcard_candidates(
        &self,
        required: &TypeDescriptor,
        matcher: &TypeMatcher<'_>,
        cancel: &CancellationToken,
    ) -> Result<Vec<&'a BeanCandidate>, Cancelled> {
        let Some(required_raw) = required.raw_name() else {
            return Ok(Vec::new());
        };
        let hierarchy = self.model.hierarchy();
        let mut out = Vec::new();
        for bean in self.model.all_candidates() {
            cancel::check(cancel)?;
            let by_class = bean
                .declared_type
                .raw_name()
                .is_some_and(|raw| is_subclass(hierarchy, raw, required_raw));
            if by_class && matcher.is_wildcard_candidate(required, bean) {
                out.push(bean);
            }
        }
        Ok(out)
    }
}
