//! Expression trees handed over by a front-end.
//!
//! These are owned, plain-data trees. [`CodeModel::parse_file_unit`]
//! lowers them into arena nodes.
//!
//! [`CodeModel::parse_file_unit`]: crate::model::CodeModel::parse_file_unit

use smol_str::SmolStr;

use super::language::{Accessibility, LiteralKind};
use crate::base::SourceRange;

/// A qualifying chain such as `A::B` in `A::B::C`, or the bare `::` of `::Foo`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NameChain {
    /// The chain started at the global scope (`::A::B`).
    pub is_global: bool,
    pub names: Vec<SmolStr>,
}

impl NameChain {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        Self {
            is_global: false,
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// The chain consisting only of the global-scope token.
    pub fn global() -> Self {
        Self {
            is_global: true,
            names: Vec::new(),
        }
    }

    /// Split a qualified name on `::` (or on `.` when it has no `::`).
    ///
    /// A leading `::` marks the chain as global.
    pub fn parse(text: &str) -> Self {
        let (is_global, rest) = match text.strip_prefix("::") {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let separator = if rest.contains("::") { "::" } else { "." };
        let names = rest
            .split(separator)
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(SmolStr::new)
            .collect();
        Self { is_global, names }
    }

    pub fn is_empty(&self) -> bool {
        !self.is_global && self.names.is_empty()
    }

    /// Split off the last segment, returning `(prefix, last)`.
    ///
    /// The prefix is `None` when the chain has a single, non-global segment.
    pub fn split_last(mut self) -> Option<(Option<NameChain>, SmolStr)> {
        let last = self.names.pop()?;
        if self.names.is_empty() && !self.is_global {
            Some((None, last))
        } else {
            Some((Some(self), last))
        }
    }
}

/// A use of a plain name, optionally qualified.
#[derive(Debug, Clone, PartialEq)]
pub struct NameRef {
    pub name: SmolStr,
    pub prefix: Option<NameChain>,
    pub range: Option<SourceRange>,
}

impl NameRef {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            prefix: None,
            range: None,
        }
    }

    /// Parse a possibly qualified name such as `A::B::c` or `::c`.
    pub fn parse(text: &str) -> Self {
        match NameChain::parse(text).split_last() {
            Some((prefix, name)) => Self {
                name,
                prefix,
                range: None,
            },
            None => Self::new(text),
        }
    }
}

/// A use of a type, with optional qualifying prefix and generic arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeRef {
    pub name: SmolStr,
    pub prefix: Option<NameChain>,
    pub type_arguments: Vec<TypeRef>,
    pub range: Option<SourceRange>,
}

impl TypeRef {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            prefix: None,
            type_arguments: Vec::new(),
            range: None,
        }
    }

    /// Parse a possibly qualified type name such as `std::vector` or `System.String`.
    pub fn parse(text: &str) -> Self {
        let named = NameRef::parse(text);
        Self {
            name: named.name,
            prefix: named.prefix,
            type_arguments: Vec::new(),
            range: None,
        }
    }

    /// Attach generic arguments (`vector<int>`).
    pub fn with_arguments(mut self, arguments: impl IntoIterator<Item = TypeRef>) -> Self {
        self.type_arguments.extend(arguments);
        self
    }

    pub fn at(mut self, range: SourceRange) -> Self {
        self.range = Some(range);
        self
    }
}

/// A method, function, or constructor call.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub name: SmolStr,
    pub prefix: Option<NameChain>,
    pub arguments: Vec<Expr>,
    pub type_arguments: Vec<TypeRef>,
    pub is_constructor: bool,
    pub is_destructor: bool,
    pub range: Option<SourceRange>,
}

impl CallExpr {
    pub fn new(name: impl Into<SmolStr>, arguments: Vec<Expr>) -> Self {
        let name: SmolStr = name.into();
        let named = NameRef::parse(&name);
        Self {
            name: named.name,
            prefix: named.prefix,
            arguments,
            type_arguments: Vec::new(),
            is_constructor: false,
            is_destructor: false,
            range: None,
        }
    }

    /// A constructor call: `new Foo(...)`, or an entry of a constructor initializer list.
    pub fn constructor(name: impl Into<SmolStr>, arguments: Vec<Expr>) -> Self {
        Self {
            is_constructor: true,
            ..Self::new(name, arguments)
        }
    }

    pub fn with_type_arguments(mut self, arguments: impl IntoIterator<Item = TypeRef>) -> Self {
        self.type_arguments.extend(arguments);
        self
    }

    pub fn at(mut self, range: SourceRange) -> Self {
        self.range = Some(range);
        self
    }
}

/// A variable, field, or parameter declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub name: SmolStr,
    pub ty: Option<TypeRef>,
    pub initializer: Option<Box<Expr>>,
    pub accessibility: Accessibility,
    pub range: Option<SourceRange>,
}

impl VarDecl {
    pub fn new(ty: TypeRef, name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            ty: Some(ty),
            initializer: None,
            accessibility: Accessibility::None,
            range: None,
        }
    }

    /// Shorthand for `VarDecl::new(TypeRef::parse(ty), name)`.
    pub fn of(ty: &str, name: impl Into<SmolStr>) -> Self {
        Self::new(TypeRef::parse(ty), name)
    }

    /// Attach an initializer; for parameters this is the default value.
    pub fn init(mut self, value: Expr) -> Self {
        self.initializer = Some(Box::new(value));
        self
    }

    pub fn access(mut self, accessibility: Accessibility) -> Self {
        self.accessibility = accessibility;
        self
    }

    pub fn at(mut self, range: SourceRange) -> Self {
        self.range = Some(range);
        self
    }
}

/// A literal value.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub kind: LiteralKind,
    pub text: SmolStr,
}

/// An expression handed over by a front-end.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Name(NameRef),
    Variable {
        name: NameRef,
        index: Option<Box<Expr>>,
    },
    Type(TypeRef),
    Call(CallExpr),
    Declaration(VarDecl),
    Operator(SmolStr),
    Literal(Literal),
    /// A flat component sequence; parenthesized sub-expressions nest as their own `Compound`.
    Compound(Vec<Expr>),
}

impl Expr {
    /// A plain name use.
    pub fn name(text: &str) -> Self {
        Expr::Name(NameRef::parse(text))
    }

    /// A variable use.
    pub fn var(text: &str) -> Self {
        Expr::Variable {
            name: NameRef::parse(text),
            index: None,
        }
    }

    /// An indexed variable use, `name[index]`.
    pub fn indexed(text: &str, index: Expr) -> Self {
        Expr::Variable {
            name: NameRef::parse(text),
            index: Some(Box::new(index)),
        }
    }

    pub fn ty(text: &str) -> Self {
        Expr::Type(TypeRef::parse(text))
    }

    pub fn call(name: &str, arguments: Vec<Expr>) -> Self {
        Expr::Call(CallExpr::new(name, arguments))
    }

    /// `new Name(arguments)`.
    pub fn new_object(name: &str, arguments: Vec<Expr>) -> Self {
        Expr::Compound(vec![
            Expr::op("new"),
            Expr::Call(CallExpr::constructor(name, arguments)),
        ])
    }

    pub fn op(text: &str) -> Self {
        Expr::Operator(SmolStr::new(text))
    }

    pub fn int(value: i64) -> Self {
        Expr::Literal(Literal {
            kind: LiteralKind::Number,
            text: SmolStr::new(value.to_string()),
        })
    }

    pub fn float(text: &str) -> Self {
        Expr::Literal(Literal {
            kind: LiteralKind::Number,
            text: SmolStr::new(text),
        })
    }

    pub fn bool(value: bool) -> Self {
        Expr::Literal(Literal {
            kind: LiteralKind::Boolean,
            text: SmolStr::new(if value { "true" } else { "false" }),
        })
    }

    pub fn string(text: &str) -> Self {
        Expr::Literal(Literal {
            kind: LiteralKind::String,
            text: SmolStr::new(format!("\"{text}\"")),
        })
    }

    pub fn null() -> Self {
        Expr::Literal(Literal {
            kind: LiteralKind::Null,
            text: SmolStr::new("null"),
        })
    }

    pub fn compound(components: Vec<Expr>) -> Self {
        Expr::Compound(components)
    }

    /// Join components with the `.` member-access operator: `a.b.Foo()`.
    pub fn dotted(components: Vec<Expr>) -> Self {
        Self::joined(components, ".")
    }

    /// Join components with the `->` member-access operator.
    pub fn arrow(components: Vec<Expr>) -> Self {
        Self::joined(components, "->")
    }

    /// `target = value`.
    pub fn assign(target: Expr, value: Expr) -> Self {
        Expr::Compound(vec![target, Expr::op("="), value])
    }

    pub fn decl(decl: VarDecl) -> Self {
        Expr::Declaration(decl)
    }

    fn joined(components: Vec<Expr>, operator: &str) -> Self {
        let mut joined = Vec::with_capacity(components.len() * 2);
        for (i, component) in components.into_iter().enumerate() {
            if i > 0 {
                joined.push(Expr::op(operator));
            }
            joined.push(component);
        }
        Expr::Compound(joined)
    }
}

impl From<CallExpr> for Expr {
    fn from(call: CallExpr) -> Self {
        Expr::Call(call)
    }
}

impl From<VarDecl> for Expr {
    fn from(decl: VarDecl) -> Self {
        Expr::Declaration(decl)
    }
}

impl From<TypeRef> for Expr {
    fn from(ty: TypeRef) -> Self {
        Expr::Type(ty)
    }
}
