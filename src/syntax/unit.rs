//! Statement trees and file units handed over by a front-end.
//!
//! A [`FileUnit`] is the output contract of a language front-end: one
//! file's declarations and statements, already classified by kind and
//! annotated with names, accessibility, parameter and return types.

use smol_str::SmolStr;

use super::expr::{CallExpr, Expr, NameChain, TypeRef, VarDecl};
use super::language::{Accessibility, Language, TypeKind};
use crate::base::SourceRange;

/// One source file, as produced by a front-end.
#[derive(Debug, Clone, PartialEq)]
pub struct FileUnit {
    pub path: SmolStr,
    pub language: Language,
    pub statements: Vec<Stmt>,
}

impl FileUnit {
    pub fn new(path: impl Into<SmolStr>, language: Language) -> Self {
        Self {
            path: path.into(),
            language,
            statements: Vec::new(),
        }
    }

    /// Create a unit, inferring the language from the path's extension.
    ///
    /// Unknown extensions fall back to C++.
    pub fn from_path(path: impl Into<SmolStr>) -> Self {
        let path = path.into();
        let language = Language::from_path(&path).unwrap_or(Language::CPlusPlus);
        Self::new(path, language)
    }

    pub fn with(mut self, statements: Vec<Stmt>) -> Self {
        self.statements.extend(statements);
        self
    }
}

/// A statement with its source range.
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub range: Option<SourceRange>,
    /// Declaration-only site (prototype, forward declaration).
    pub is_reference: bool,
}

/// A `catch` clause of a `try` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    pub parameter: Option<VarDecl>,
    pub body: Vec<Stmt>,
    pub range: Option<SourceRange>,
}

impl CatchClause {
    pub fn new(parameter: Option<VarDecl>, body: Vec<Stmt>) -> Self {
        Self {
            parameter,
            body,
            range: None,
        }
    }
}

/// The statement variants a front-end can produce.
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    Namespace {
        name: SmolStr,
        body: Vec<Stmt>,
    },
    Type(TypeDecl),
    Method(MethodDecl),
    Property(PropertyDecl),
    /// `using X = A::B;`, `namespace X = A::B;`, Java `import a.b.X;`.
    Alias {
        name: SmolStr,
        target: NameChain,
    },
    /// `using namespace std;`, `using System;`, Java `import a.b.*;`.
    Import {
        namespace: NameChain,
    },
    /// One declaration statement; every declarator shares the single type.
    Declaration {
        ty: Option<TypeRef>,
        declarators: Vec<(SmolStr, Option<Expr>)>,
        accessibility: Accessibility,
    },
    Expression(Expr),
    Return(Option<Expr>),
    Throw(Option<Expr>),
    Break,
    Continue,
    Goto(SmolStr),
    Label(SmolStr),
    Block(Vec<Stmt>),
    If {
        condition: Option<Expr>,
        then_branch: Vec<Stmt>,
        else_branch: Vec<Stmt>,
    },
    While {
        condition: Option<Expr>,
        body: Vec<Stmt>,
    },
    Do {
        condition: Option<Expr>,
        body: Vec<Stmt>,
    },
    For {
        initializer: Option<Expr>,
        condition: Option<Expr>,
        incrementer: Option<Expr>,
        body: Vec<Stmt>,
    },
    /// `foreach (var x in xs)` / `for (T x : xs)`; the header holds the declaration and collection.
    Foreach {
        header: Option<Expr>,
        body: Vec<Stmt>,
    },
    Switch {
        condition: Option<Expr>,
        body: Vec<Stmt>,
    },
    Case(Option<Expr>),
    Try {
        body: Vec<Stmt>,
        catches: Vec<CatchClause>,
        finally: Vec<Stmt>,
    },
    Lock {
        target: Option<Expr>,
        body: Vec<Stmt>,
    },
    /// C# `using (resource) { ... }`.
    Using {
        resource: Option<Expr>,
        body: Vec<Stmt>,
    },
    /// C++ `extern "C" { ... }`.
    Extern {
        linkage: SmolStr,
        body: Vec<Stmt>,
    },
    Empty,
}

impl Stmt {
    pub fn new(kind: StmtKind) -> Self {
        Self {
            kind,
            range: None,
            is_reference: false,
        }
    }

    pub fn at(mut self, range: SourceRange) -> Self {
        self.range = Some(range);
        self
    }

    /// Mark this statement as a declaration-only site.
    pub fn declaration_only(mut self) -> Self {
        self.is_reference = true;
        self
    }

    pub fn namespace(name: &str, body: Vec<Stmt>) -> Self {
        Self::new(StmtKind::Namespace {
            name: SmolStr::new(name),
            body,
        })
    }

    /// Nest namespaces for a dotted or `::`-separated name (`A.B.C`, Java packages).
    pub fn nested_namespace(qualified: &str, body: Vec<Stmt>) -> Self {
        let chain = NameChain::parse(qualified);
        let mut names = chain.names.into_iter().rev();
        let Some(innermost) = names.next() else {
            return Self::new(StmtKind::Block(body));
        };
        let mut stmt = Self::new(StmtKind::Namespace {
            name: innermost,
            body,
        });
        for name in names {
            stmt = Self::new(StmtKind::Namespace {
                name,
                body: vec![stmt],
            });
        }
        stmt
    }

    pub fn import(namespace: &str) -> Self {
        Self::new(StmtKind::Import {
            namespace: NameChain::parse(namespace),
        })
    }

    pub fn alias(name: &str, target: &str) -> Self {
        Self::new(StmtKind::Alias {
            name: SmolStr::new(name),
            target: NameChain::parse(target),
        })
    }

    /// A declaration statement such as `int a = 1, b;`.
    pub fn declare(ty: &str, declarators: Vec<(&str, Option<Expr>)>) -> Self {
        Self::new(StmtKind::Declaration {
            ty: Some(TypeRef::parse(ty)),
            declarators: declarators
                .into_iter()
                .map(|(name, init)| (SmolStr::new(name), init))
                .collect(),
            accessibility: Accessibility::None,
        })
    }

    /// A single-variable declaration statement with a fully built type.
    pub fn declare_typed(ty: TypeRef, name: &str, init: Option<Expr>) -> Self {
        Self::new(StmtKind::Declaration {
            ty: Some(ty),
            declarators: vec![(SmolStr::new(name), init)],
            accessibility: Accessibility::None,
        })
    }

    /// A field or local variable without an initializer.
    pub fn field(ty: &str, name: &str) -> Self {
        Self::declare(ty, vec![(name, None)])
    }

    pub fn expr(expr: Expr) -> Self {
        Self::new(StmtKind::Expression(expr))
    }

    pub fn ret(value: Option<Expr>) -> Self {
        Self::new(StmtKind::Return(value))
    }

    pub fn block(body: Vec<Stmt>) -> Self {
        Self::new(StmtKind::Block(body))
    }

    pub fn if_else(condition: Expr, then_branch: Vec<Stmt>, else_branch: Vec<Stmt>) -> Self {
        Self::new(StmtKind::If {
            condition: Some(condition),
            then_branch,
            else_branch,
        })
    }

    pub fn while_loop(condition: Expr, body: Vec<Stmt>) -> Self {
        Self::new(StmtKind::While {
            condition: Some(condition),
            body,
        })
    }

    pub fn for_loop(
        initializer: Option<Expr>,
        condition: Option<Expr>,
        incrementer: Option<Expr>,
        body: Vec<Stmt>,
    ) -> Self {
        Self::new(StmtKind::For {
            initializer,
            condition,
            incrementer,
            body,
        })
    }

    /// `foreach (decl in collection)`.
    pub fn foreach(decl: VarDecl, collection: Expr, body: Vec<Stmt>) -> Self {
        Self::new(StmtKind::Foreach {
            header: Some(Expr::Compound(vec![
                Expr::Declaration(decl),
                Expr::op("in"),
                collection,
            ])),
            body,
        })
    }

    pub fn try_catch(body: Vec<Stmt>, catches: Vec<CatchClause>, finally: Vec<Stmt>) -> Self {
        Self::new(StmtKind::Try {
            body,
            catches,
            finally,
        })
    }

    pub fn lock(target: Expr, body: Vec<Stmt>) -> Self {
        Self::new(StmtKind::Lock {
            target: Some(target),
            body,
        })
    }

    pub fn using(resource: Expr, body: Vec<Stmt>) -> Self {
        Self::new(StmtKind::Using {
            resource: Some(resource),
            body,
        })
    }

    pub fn extern_block(linkage: &str, body: Vec<Stmt>) -> Self {
        Self::new(StmtKind::Extern {
            linkage: SmolStr::new(linkage),
            body,
        })
    }
}

/// A class, struct, interface, union, or enum declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    pub name: SmolStr,
    /// Qualifier of an out-of-line name (`class A::Inner { }`).
    pub prefix: Option<NameChain>,
    pub kind: TypeKind,
    pub parents: Vec<TypeRef>,
    pub accessibility: Accessibility,
    pub is_partial: bool,
    pub body: Vec<Stmt>,
}

impl TypeDecl {
    pub fn new(kind: TypeKind, name: &str) -> Self {
        let (prefix, name) = split_qualified(name);
        Self {
            name,
            prefix,
            kind,
            parents: Vec::new(),
            accessibility: Accessibility::None,
            is_partial: false,
            body: Vec::new(),
        }
    }

    pub fn class(name: &str) -> Self {
        Self::new(TypeKind::Class, name)
    }

    pub fn structure(name: &str) -> Self {
        Self::new(TypeKind::Struct, name)
    }

    pub fn interface(name: &str) -> Self {
        Self::new(TypeKind::Interface, name)
    }

    /// Add parent types (base classes, implemented interfaces) in declared order.
    pub fn extends<'a>(mut self, parents: impl IntoIterator<Item = &'a str>) -> Self {
        self.parents.extend(parents.into_iter().map(TypeRef::parse));
        self
    }

    pub fn extends_type(mut self, parent: TypeRef) -> Self {
        self.parents.push(parent);
        self
    }

    pub fn access(mut self, accessibility: Accessibility) -> Self {
        self.accessibility = accessibility;
        self
    }

    pub fn partial(mut self) -> Self {
        self.is_partial = true;
        self
    }

    pub fn body(mut self, body: Vec<Stmt>) -> Self {
        self.body.extend(body);
        self
    }
}

impl From<TypeDecl> for Stmt {
    fn from(decl: TypeDecl) -> Self {
        Stmt::new(StmtKind::Type(decl))
    }
}

/// A function, method, constructor, or destructor.
///
/// `body: None` is a prototype (`function_decl`); `Some(vec![])` is an empty body.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    pub name: SmolStr,
    /// Qualifier of an out-of-line definition (`void A::foo() { }`).
    pub prefix: Option<NameChain>,
    pub parameters: Vec<VarDecl>,
    pub return_type: Option<TypeRef>,
    pub is_constructor: bool,
    pub is_destructor: bool,
    pub is_partial: bool,
    pub initializers: Vec<CallExpr>,
    pub accessibility: Accessibility,
    pub body: Option<Vec<Stmt>>,
}

impl MethodDecl {
    /// A method or free function; `name` may be qualified (`A::foo`).
    pub fn new(name: &str) -> Self {
        let (prefix, name) = split_qualified(name);
        Self {
            name,
            prefix,
            parameters: Vec::new(),
            return_type: None,
            is_constructor: false,
            is_destructor: false,
            is_partial: false,
            initializers: Vec::new(),
            accessibility: Accessibility::None,
            body: None,
        }
    }

    pub fn constructor(name: &str) -> Self {
        Self {
            is_constructor: true,
            ..Self::new(name)
        }
    }

    pub fn destructor(name: &str) -> Self {
        Self {
            is_destructor: true,
            ..Self::new(name)
        }
    }

    pub fn returns(mut self, ty: &str) -> Self {
        self.return_type = Some(TypeRef::parse(ty));
        self
    }

    pub fn returns_type(mut self, ty: TypeRef) -> Self {
        self.return_type = Some(ty);
        self
    }

    pub fn param(mut self, parameter: VarDecl) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Add a constructor initializer (`: base(x)`, `: this(0)`, `: field(1)`).
    pub fn initializer(mut self, call: CallExpr) -> Self {
        self.initializers.push(call);
        self
    }

    pub fn access(mut self, accessibility: Accessibility) -> Self {
        self.accessibility = accessibility;
        self
    }

    pub fn partial(mut self) -> Self {
        self.is_partial = true;
        self
    }

    pub fn body(mut self, body: Vec<Stmt>) -> Self {
        self.body = Some(body);
        self
    }
}

impl From<MethodDecl> for Stmt {
    /// Methods without a body become declaration-only statements.
    fn from(decl: MethodDecl) -> Self {
        let is_reference = decl.body.is_none();
        Stmt {
            kind: StmtKind::Method(decl),
            range: None,
            is_reference,
        }
    }
}

/// A C# property.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDecl {
    pub name: SmolStr,
    pub ty: Option<TypeRef>,
    pub getter: Option<Vec<Stmt>>,
    pub setter: Option<Vec<Stmt>>,
    pub accessibility: Accessibility,
}

impl PropertyDecl {
    pub fn new(ty: &str, name: &str) -> Self {
        Self {
            name: SmolStr::new(name),
            ty: Some(TypeRef::parse(ty)),
            getter: None,
            setter: None,
            accessibility: Accessibility::None,
        }
    }

    pub fn getter(mut self, body: Vec<Stmt>) -> Self {
        self.getter = Some(body);
        self
    }

    pub fn setter(mut self, body: Vec<Stmt>) -> Self {
        self.setter = Some(body);
        self
    }

    pub fn access(mut self, accessibility: Accessibility) -> Self {
        self.accessibility = accessibility;
        self
    }
}

impl From<PropertyDecl> for Stmt {
    fn from(decl: PropertyDecl) -> Self {
        Stmt::new(StmtKind::Property(decl))
    }
}

fn split_qualified(name: &str) -> (Option<NameChain>, SmolStr) {
    match NameChain::parse(name).split_last() {
        Some((prefix, last)) => (prefix, last),
        None => (None, SmolStr::new(name)),
    }
}
