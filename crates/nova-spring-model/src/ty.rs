use std::fmt;

/// Bound of a wildcard type argument (`?`, `? extends X`, `? super X`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum WildcardBound {
    Unbounded,
    Extends(Box<TypeDescriptor>),
    Super(Box<TypeDescriptor>),
}

/// The closed set of type shapes autowiring reasons about.
///
/// Names are opaque: `List` and `java.util.List` are different raw names unless
/// the hierarchy or configuration says otherwise.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    Plain(String),
    Generic {
        base: String,
        args: Vec<TypeDescriptor>,
    },
    Array(Box<TypeDescriptor>),
    Wildcard(WildcardBound),
    Unresolved,
}

impl TypeDescriptor {
    pub fn plain(name: impl Into<String>) -> Self {
        TypeDescriptor::Plain(name.into())
    }

    /// Builds a generic type; an empty argument list collapses to [`TypeDescriptor::Plain`].
    pub fn generic(base: impl Into<String>, args: Vec<TypeDescriptor>) -> Self {
        let base = base.into();
        if args.is_empty() {
            TypeDescriptor::Plain(base)
        } else {
            TypeDescriptor::Generic { base, args }
        }
    }

    pub fn array(component: TypeDescriptor) -> Self {
        TypeDescriptor::Array(Box::new(component))
    }

    pub fn wildcard() -> Self {
        TypeDescriptor::Wildcard(WildcardBound::Unbounded)
    }

    pub fn extends(bound: TypeDescriptor) -> Self {
        TypeDescriptor::Wildcard(WildcardBound::Extends(Box::new(bound)))
    }

    pub fn super_of(bound: TypeDescriptor) -> Self {
        TypeDescriptor::Wildcard(WildcardBound::Super(Box::new(bound)))
    }

    /// Raw class name for `Plain` and `Generic` types.
    pub fn raw_name(&self) -> Option<&str> {
        match self {
            TypeDescriptor::Plain(name) => Some(name),
            TypeDescriptor::Generic { base, .. } => Some(base),
            _ => None,
        }
    }

    pub fn type_args(&self) -> &[TypeDescriptor] {
        match self {
            TypeDescriptor::Generic { args, .. } => args,
            _ => &[],
        }
    }

    pub fn is_class_type(&self) -> bool {
        matches!(
            self,
            TypeDescriptor::Plain(_) | TypeDescriptor::Generic { .. }
        )
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, TypeDescriptor::Unresolved)
    }

    /// Drops all type arguments (recursively through array components).
    pub fn erasure(&self) -> TypeDescriptor {
        match self {
            TypeDescriptor::Generic { base, .. } => TypeDescriptor::Plain(base.clone()),
            TypeDescriptor::Array(component) => TypeDescriptor::array(component.erasure()),
            other => other.clone(),
        }
    }

    /// Replaces occurrences of the type variables `params` with `args`.
    ///
    /// A parameter/argument count mismatch erases the type instead of guessing.
    pub fn substitute(&self, params: &[String], args: &[TypeDescriptor]) -> TypeDescriptor {
        if params.is_empty() {
            return self.clone();
        }
        if params.len() != args.len() {
            return self.erasure();
        }
        match self {
            TypeDescriptor::Plain(name) => params
                .iter()
                .position(|p| p == name)
                .map(|idx| args[idx].clone())
                .unwrap_or_else(|| self.clone()),
            TypeDescriptor::Generic { base, args: inner } => TypeDescriptor::Generic {
                base: base.clone(),
                args: inner.iter().map(|a| a.substitute(params, args)).collect(),
            },
            TypeDescriptor::Array(component) => {
                TypeDescriptor::array(component.substitute(params, args))
            }
            TypeDescriptor::Wildcard(WildcardBound::Extends(bound)) => {
                TypeDescriptor::extends(bound.substitute(params, args))
            }
            TypeDescriptor::Wildcard(WildcardBound::Super(bound)) => {
                TypeDescriptor::super_of(bound.substitute(params, args))
            }
            other => other.clone(),
        }
    }

    /// Parses the Java-like textual form (`Map<String, List<Foo>>`, `Foo[]`, `? extends Bar`).
    ///
    /// Anything that does not parse completely becomes [`TypeDescriptor::Unresolved`].
    pub fn parse(text: &str) -> TypeDescriptor {
        let mut parser = Parser {
            text: text.as_bytes(),
            pos: 0,
        };
        match parser.parse_type() {
            Some(ty) => {
                parser.skip_ws();
                if parser.pos == parser.text.len() {
                    ty
                } else {
                    TypeDescriptor::Unresolved
                }
            }
            None => TypeDescriptor::Unresolved,
        }
    }
}

impl From<&str> for TypeDescriptor {
    fn from(text: &str) -> Self {
        TypeDescriptor::parse(text)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Plain(name) => f.write_str(name),
            TypeDescriptor::Generic { base, args } => {
                write!(f, "{base}<")?;
                for (idx, arg) in args.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(">")
            }
            TypeDescriptor::Array(component) => write!(f, "{component}[]"),
            TypeDescriptor::Wildcard(WildcardBound::Unbounded) => f.write_str("?"),
            TypeDescriptor::Wildcard(WildcardBound::Extends(bound)) => {
                write!(f, "? extends {bound}")
            }
            TypeDescriptor::Wildcard(WildcardBound::Super(bound)) => write!(f, "? super {bound}"),
            TypeDescriptor::Unresolved => f.write_str("<unresolved>"),
        }
    }
}

struct Parser<'a> {
    text: &'a [u8],
    pos: usize,
}

impl Parser<'_> {
    fn skip_ws(&mut self) {
        while self.pos < self.text.len() && self.text[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn eat(&mut self, byte: u8) -> bool {
        self.skip_ws();
        if self.text.get(self.pos) == Some(&byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn keyword(&mut self, kw: &str) -> bool {
        self.skip_ws();
        let end = self.pos + kw.len();
        if self.text.get(self.pos..end) != Some(kw.as_bytes()) {
            return false;
        }
        if self
            .text
            .get(end)
            .is_some_and(|&b| is_ident_continue(b as char))
        {
            return false;
        }
        self.pos = end;
        true
    }

    fn ident(&mut self) -> Option<String> {
        self.skip_ws();
        let start = self.pos;
        while self.pos < self.text.len() {
            let ch = self.text[self.pos] as char;
            if is_ident_continue(ch) || ch == '.' {
                self.pos += 1;
            } else {
                break;
            }
        }
        if start == self.pos {
            return None;
        }
        std::str::from_utf8(&self.text[start..self.pos])
            .ok()
            .map(str::to_string)
    }

    fn parse_type(&mut self) -> Option<TypeDescriptor> {
        let mut ty = if self.eat(b'?') {
            if self.keyword("extends") {
                TypeDescriptor::extends(self.parse_type()?)
            } else if self.keyword("super") {
                TypeDescriptor::super_of(self.parse_type()?)
            } else {
                TypeDescriptor::wildcard()
            }
        } else {
            let name = self.ident()?;
            if self.eat(b'<') {
                let mut args = Vec::new();
                loop {
                    args.push(self.parse_type()?);
                    if self.eat(b',') {
                        continue;
                    }
                    if self.eat(b'>') {
                        break;
                    }
                    return None;
                }
                TypeDescriptor::generic(name, args)
            } else {
                TypeDescriptor::Plain(name)
            }
        };

        while self.eat(b'[') {
            if !self.eat(b']') {
                return None;
            }
            ty = TypeDescriptor::array(ty);
        }
        Some(ty)
    }
}

fn is_ident_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '$'
}
