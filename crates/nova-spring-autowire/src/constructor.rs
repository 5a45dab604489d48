//! Constructor and factory-method argument resolution.
//!
//! Given the executables of a bean class and the explicit arguments of its definition, this
//! module decides which executables can be invoked, which one the container would pick, and
//! which parameters are left to autowiring.

use std::collections::HashMap;

use nova_spring_model::hierarchy::is_subclass;
use nova_spring_model::{AutowireMode, BeanCandidate, BeanModel, Qualifier, TypeDescriptor};

use crate::cancel::{self, CancellationToken, Cancelled};
use crate::resolve::{AutowireResolver, ResolutionResult};
use crate::AutowireConfig;

const PRIMITIVES: &[&str] = &[
    "boolean", "byte", "short", "int", "long", "float", "double", "char",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExecutableKind {
    Constructor,
    FactoryMethod,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parameter {
    pub name: Option<String>,
    pub ty: TypeDescriptor,
    pub qualifier: Option<Qualifier>,
    /// Filled by a value annotation (`@Value`) rather than by a bean.
    pub value_injected: bool,
}

impl Parameter {
    pub fn new(name: Option<&str>, ty: impl Into<TypeDescriptor>) -> Self {
        Self {
            name: name.map(str::to_string),
            ty: ty.into(),
            qualifier: None,
            value_injected: false,
        }
    }

    pub fn with_qualifier(mut self, qualifier: Qualifier) -> Self {
        self.qualifier = Some(qualifier);
        self
    }

    pub fn value_injected(mut self) -> Self {
        self.value_injected = true;
        self
    }
}

/// A constructor or factory method of a bean class.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Executable {
    pub kind: ExecutableKind,
    pub name: String,
    pub params: Vec<Parameter>,
}

impl Executable {
    pub fn constructor(name: impl Into<String>, params: Vec<Parameter>) -> Self {
        Self {
            kind: ExecutableKind::Constructor,
            name: name.into(),
            params,
        }
    }

    pub fn factory_method(name: impl Into<String>, params: Vec<Parameter>) -> Self {
        Self {
            kind: ExecutableKind::FactoryMethod,
            name: name.into(),
            params,
        }
    }
}

/// The value side of an explicit constructor argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArgumentValue {
    /// A value with an explicit type attribute.
    Typed(TypeDescriptor),
    /// An untyped literal; convertible when the target type accepts its text.
    Literal(String),
    /// A reference to another bean by name.
    BeanRef(String),
    Null,
    List,
    Set,
    Map,
    Properties,
    /// An array value with the given component type.
    Array(TypeDescriptor),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExplicitArgument {
    pub index: Option<usize>,
    pub name: Option<String>,
    pub value: ArgumentValue,
}

impl ExplicitArgument {
    pub fn new(value: ArgumentValue) -> Self {
        Self {
            index: None,
            name: None,
            value,
        }
    }

    pub fn at(index: usize, value: ArgumentValue) -> Self {
        Self {
            index: Some(index),
            ..Self::new(value)
        }
    }

    pub fn named(name: impl Into<String>, value: ArgumentValue) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new(value)
        }
    }
}

/// Which executable the container would invoke.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExecutableSelection {
    None,
    Selected(usize),
    /// Several matching executables share the widest parameter count.
    Ambiguous(Vec<usize>),
}

#[derive(Clone, Copy)]
pub struct ConstructorResolver<'a> {
    autowire: AutowireResolver<'a>,
}

impl<'a> ConstructorResolver<'a> {
    pub fn new(model: &'a dyn BeanModel, config: &'a AutowireConfig) -> Self {
        Self::from_resolver(AutowireResolver::new(model, config))
    }

    pub fn from_resolver(autowire: AutowireResolver<'a>) -> Self {
        Self { autowire }
    }

    /// Indices into `executables` that accept the explicit arguments, in declaration order.
    pub fn matching_executables(
        &self,
        owner: &BeanCandidate,
        executables: &[Executable],
        args: &[ExplicitArgument],
        cancel: &CancellationToken,
    ) -> Result<Vec<usize>, Cancelled> {
        let autowire = owner.autowire == AutowireMode::Constructor;
        let mut out = Vec::new();
        for (idx, executable) in executables.iter().enumerate() {
            cancel::check(cancel)?;
            if !accepts_arity(autowire, executable.params.len(), args.len()) {
                continue;
            }
            if self.accepts_parameters(owner, executable, args, autowire, cancel)? {
                out.push(idx);
            }
        }
        tracing::debug!(
            target: "nova.spring.autowire",
            owner = %owner.id,
            executables = executables.len(),
            matching = out.len(),
            "matched executables"
        );
        Ok(out)
    }

    /// The widest matching executable. Ties on parameter count are reported as ambiguous.
    pub fn select(
        &self,
        owner: &BeanCandidate,
        executables: &[Executable],
        args: &[ExplicitArgument],
        cancel: &CancellationToken,
    ) -> Result<ExecutableSelection, Cancelled> {
        let matching = self.matching_executables(owner, executables, args, cancel)?;
        let Some(widest) = matching.iter().map(|&idx| executables[idx].params.len()).max() else {
            return Ok(ExecutableSelection::None);
        };
        let mut best: Vec<usize> = matching
            .into_iter()
            .filter(|&idx| executables[idx].params.len() == widest)
            .collect();
        Ok(match best.len() {
            1 => ExecutableSelection::Selected(best.remove(0)),
            _ => ExecutableSelection::Ambiguous(best),
        })
    }

    /// Candidates for each parameter not covered by an explicit argument, keyed by parameter
    /// index. Parameters without candidates are omitted. Empty unless the owner autowires by
    /// constructor.
    pub fn autowired_arguments(
        &self,
        owner: &BeanCandidate,
        executable: &Executable,
        args: &[ExplicitArgument],
        cancel: &CancellationToken,
    ) -> Result<Vec<(usize, ResolutionResult<'a>)>, Cancelled> {
        if owner.autowire != AutowireMode::Constructor {
            return Ok(Vec::new());
        }

        let indexed = indexed_arguments(args);
        let mut consumed = vec![false; args.len()];
        let mut out = Vec::new();
        for idx in self.visit_order(&executable.params) {
            cancel::check(cancel)?;
            let param = &executable.params[idx];
            if self.explicitly_satisfied(param, idx, args, &indexed, &mut consumed) {
                continue;
            }
            let candidates =
                self.parameter_candidates(owner, &param.ty, param.qualifier.as_ref(), cancel)?;
            if !candidates.is_empty() {
                out.push((idx, ResolutionResult::from_candidates(candidates)));
            }
        }
        out.sort_by_key(|(idx, _)| *idx);
        Ok(out)
    }

    /// Autowire candidates for one parameter of `owner`'s constructor: qualifier-first when a
    /// recognized qualifier is present, otherwise by the unwrapped parameter type.
    pub fn parameter_candidates(
        &self,
        owner: &BeanCandidate,
        ty: &TypeDescriptor,
        qualifier: Option<&Qualifier>,
        cancel: &CancellationToken,
    ) -> Result<Vec<&'a BeanCandidate>, Cancelled> {
        let qualifier = self
            .autowire
            .qualifier_matcher()
            .effective_point_qualifier(qualifier);
        match qualifier {
            Some(qualifier) => self
                .autowire
                .qualified_candidates(qualifier, ty, Some(owner.id), cancel),
            None => {
                let required = self.autowire.type_matcher().effective_required_type(ty);
                self.autowire
                    .autowire_by_type(&required, None, Some(owner.id), cancel)
            }
        }
    }

    fn accepts_parameters(
        &self,
        owner: &BeanCandidate,
        executable: &Executable,
        args: &[ExplicitArgument],
        autowire: bool,
        cancel: &CancellationToken,
    ) -> Result<bool, Cancelled> {
        let indexed = indexed_arguments(args);
        let mut consumed = vec![false; args.len()];
        for idx in self.visit_order(&executable.params) {
            let param = &executable.params[idx];
            if self.explicitly_satisfied(param, idx, args, &indexed, &mut consumed) {
                continue;
            }
            if !autowire || !self.is_autowirable(owner, param, cancel)? {
                return Ok(false);
            }
        }
        // Without autowiring every explicit argument has to land on a parameter.
        Ok(autowire || consumed.iter().all(|&used| used))
    }

    /// Whether the container can supply `param` by itself: a bean of the parameter type or of
    /// its unwrapped element type, or a container-provided type.
    fn is_autowirable(
        &self,
        owner: &BeanCandidate,
        param: &Parameter,
        cancel: &CancellationToken,
    ) -> Result<bool, Cancelled> {
        let matcher = self.autowire.type_matcher();
        if matcher.is_autowired_by_default(&param.ty) {
            return Ok(true);
        }

        let unwrapped = matcher.effective_required_type(&param.ty);
        let mut lookups = vec![&param.ty];
        if unwrapped != param.ty {
            lookups.push(&unwrapped);
        }
        for required in lookups {
            let found = self.autowire.autowire_by_type_with(
                required,
                param.name.as_deref(),
                Some(owner.id),
                false,
                cancel,
            )?;
            if !found.is_empty() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Parameter indices with `String`-like parameters last, so untyped literals reach the
    /// typed parameters first.
    fn visit_order(&self, params: &[Parameter]) -> Vec<usize> {
        let matcher = self.autowire.type_matcher();
        let (strings, others): (Vec<usize>, Vec<usize>) =
            (0..params.len()).partition(|&idx| match &params[idx].ty {
                TypeDescriptor::Array(component) => matcher.is_string(component),
                ty => matcher.is_string(ty),
            });
        others.into_iter().chain(strings).collect()
    }

    /// Whether `param` is covered by a value annotation or an explicit argument. A matched
    /// argument is marked consumed.
    fn explicitly_satisfied(
        &self,
        param: &Parameter,
        idx: usize,
        args: &[ExplicitArgument],
        indexed: &HashMap<usize, usize>,
        consumed: &mut [bool],
    ) -> bool {
        if let Some(&arg) = indexed.get(&idx) {
            let accepted =
                param.value_injected || self.accepts_value(&param.ty, &args[arg].value);
            if accepted {
                consumed[arg] = true;
            }
            return accepted;
        }
        if param.value_injected {
            return true;
        }

        for (arg_idx, arg) in args.iter().enumerate() {
            if consumed[arg_idx] || arg.index.is_some() {
                continue;
            }
            let accepted = match &arg.name {
                Some(name) => param.name.as_deref() == Some(name.as_str()),
                None => self.accepts_value(&param.ty, &arg.value),
            };
            if accepted {
                consumed[arg_idx] = true;
                return true;
            }
        }
        false
    }

    /// Whether an explicit argument value can be passed for a parameter of type `required`.
    fn accepts_value(&self, required: &TypeDescriptor, value: &ArgumentValue) -> bool {
        let matcher = self.autowire.type_matcher();
        match value {
            ArgumentValue::Typed(ty) => matcher.is_direct_assignable(required, ty),
            ArgumentValue::Literal(text) => self.accepts_literal(required, text),
            ArgumentValue::BeanRef(name) => {
                let erased = required.erasure();
                self.autowire.model().find_by_name(name).is_some_and(|bean| {
                    bean.effective_types
                        .iter()
                        .any(|ty| matcher.is_erasure_assignable(&erased, ty))
                })
            }
            ArgumentValue::Null => !is_primitive(required),
            ArgumentValue::List => self.accepts_container(required, "java.util.List"),
            ArgumentValue::Set => self.accepts_container(required, "java.util.Set"),
            ArgumentValue::Map => self.accepts_container(required, "java.util.Map"),
            ArgumentValue::Properties => self.accepts_container(required, "java.util.Properties"),
            ArgumentValue::Array(component) => {
                matches!(required, TypeDescriptor::Array(_))
                    && matcher.is_erasure_assignable(
                        required,
                        &TypeDescriptor::array(component.clone()),
                    )
            }
        }
    }

    fn accepts_literal(&self, required: &TypeDescriptor, text: &str) -> bool {
        let matcher = self.autowire.type_matcher();
        if matcher.is_string(required) {
            return true;
        }
        let raw = match required {
            TypeDescriptor::Array(component) => return matcher.is_string(component),
            TypeDescriptor::Plain(raw) | TypeDescriptor::Generic { base: raw, .. } => raw.as_str(),
            _ => return false,
        };
        let config = self.autowire.config();
        if config.is_object(raw) {
            return true;
        }
        if !config.literal_types.contains(raw) {
            return false;
        }

        let text = text.trim();
        match raw {
            "int" | "long" | "short" | "byte" | "java.lang.Integer" | "java.lang.Long"
            | "java.lang.Short" | "java.lang.Byte" => text.parse::<i64>().is_ok(),
            "float" | "double" | "java.lang.Float" | "java.lang.Double" => {
                text.parse::<f64>().is_ok()
            }
            "boolean" | "java.lang.Boolean" => {
                text.eq_ignore_ascii_case("true") || text.eq_ignore_ascii_case("false")
            }
            "char" | "java.lang.Character" => text.chars().count() == 1,
            _ => true,
        }
    }

    /// A collection-valued argument fits parameters of its own type, its supertypes, and the
    /// concrete subtypes the container can instantiate.
    fn accepts_container(&self, required: &TypeDescriptor, container: &str) -> bool {
        if matches!(required, TypeDescriptor::Array(_)) {
            return matches!(container, "java.util.List" | "java.util.Set");
        }
        let Some(raw) = required.raw_name() else {
            return false;
        };
        if self.autowire.config().is_object(raw) {
            return true;
        }
        let hierarchy = self.autowire.model().hierarchy();
        is_subclass(hierarchy, container, raw)
            || is_subclass(hierarchy, raw, container)
            || (!raw.contains('.') && container.rsplit('.').next() == Some(raw))
    }
}

fn accepts_arity(autowire: bool, params: usize, args: usize) -> bool {
    if autowire {
        params >= args
    } else {
        params == args
    }
}

/// Explicit argument index to position in `args`; a later duplicate index wins.
fn indexed_arguments(args: &[ExplicitArgument]) -> HashMap<usize, usize> {
    args.iter()
        .enumerate()
        .filter_map(|(pos, arg)| arg.index.map(|index| (index, pos)))
        .collect()
}

fn is_primitive(ty: &TypeDescriptor) -> bool {
    matches!(ty, TypeDescriptor::Plain(raw) if PRIMITIVES.contains(&raw.as_str()))
}
