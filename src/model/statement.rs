//! Statement nodes.

use smol_str::SmolStr;

use super::ids::{ExprId, StatementId};
use crate::base::SourceLocation;
use crate::syntax::{Accessibility, Language, TypeKind};

/// A namespace, package, or the implicit global namespace of a file.
#[derive(Debug, Clone, PartialEq)]
pub struct NamespaceDef {
    pub name: SmolStr,
    pub is_global: bool,
    /// Synthesized for a prefix segment of an out-of-line definition.
    pub is_placeholder: bool,
}

/// A class, struct, interface, union, enum, or built-in type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDef {
    pub name: SmolStr,
    pub kind: TypeKind,
    /// Unresolved type uses naming base classes and interfaces, in declared order.
    pub parent_type_names: Vec<ExprId>,
    pub accessibility: Accessibility,
    pub is_partial: bool,
    pub prefix: Option<ExprId>,
}

/// A function, method, constructor, destructor, or property accessor.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDef {
    pub name: SmolStr,
    /// Variable declarations, in declared order.
    pub parameters: Vec<ExprId>,
    /// `None` for `void` in languages that omit it and for constructors.
    pub return_type: Option<ExprId>,
    pub is_constructor: bool,
    pub is_destructor: bool,
    pub is_partial: bool,
    /// `: base(...)`, `: this(...)`, `: field(...)` calls, in order.
    pub constructor_initializers: Vec<ExprId>,
    pub accessibility: Accessibility,
    pub prefix: Option<ExprId>,
}

/// A C# property with optional accessor bodies.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDef {
    pub name: SmolStr,
    pub return_type: Option<ExprId>,
    /// Accessor bodies are method statements owned by the property.
    pub getter: Option<StatementId>,
    pub setter: Option<StatementId>,
    pub accessibility: Accessibility,
}

/// Variant data of a [`Statement`].
#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    Namespace(NamespaceDef),
    Type(TypeDef),
    Method(MethodDef),
    Property(PropertyDef),
    /// A local rename binding; `target` is a name use with a prefix chain.
    Alias {
        alias_name: SmolStr,
        target: ExprId,
    },
    Import {
        imported_namespace: ExprId,
    },
    Declaration,
    Expression,
    Return,
    Throw,
    Break,
    Continue,
    Goto(SmolStr),
    Label(SmolStr),
    Block,
    /// Condition in `content`; the then-branch is the child list.
    If {
        else_statements: Vec<StatementId>,
    },
    While,
    Do,
    /// Condition in `content`.
    For {
        initializer: Option<ExprId>,
        incrementer: Option<ExprId>,
    },
    Foreach,
    Switch,
    Case,
    Try {
        catch_statements: Vec<StatementId>,
        finally_statements: Vec<StatementId>,
    },
    Catch {
        parameter: Option<ExprId>,
    },
    Lock,
    Using,
    Extern {
        linkage: SmolStr,
    },
    Empty,
}

/// Fieldless discriminant of [`StatementKind`], used to filter traversals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementTag {
    Namespace,
    Type,
    Method,
    Property,
    Alias,
    Import,
    Declaration,
    Expression,
    Return,
    Throw,
    Break,
    Continue,
    Goto,
    Label,
    Block,
    If,
    While,
    Do,
    For,
    Foreach,
    Switch,
    Case,
    Try,
    Catch,
    Lock,
    Using,
    Extern,
    Empty,
}

impl StatementKind {
    pub fn tag(&self) -> StatementTag {
        match self {
            StatementKind::Namespace(_) => StatementTag::Namespace,
            StatementKind::Type(_) => StatementTag::Type,
            StatementKind::Method(_) => StatementTag::Method,
            StatementKind::Property(_) => StatementTag::Property,
            StatementKind::Alias { .. } => StatementTag::Alias,
            StatementKind::Import { .. } => StatementTag::Import,
            StatementKind::Declaration => StatementTag::Declaration,
            StatementKind::Expression => StatementTag::Expression,
            StatementKind::Return => StatementTag::Return,
            StatementKind::Throw => StatementTag::Throw,
            StatementKind::Break => StatementTag::Break,
            StatementKind::Continue => StatementTag::Continue,
            StatementKind::Goto(_) => StatementTag::Goto,
            StatementKind::Label(_) => StatementTag::Label,
            StatementKind::Block => StatementTag::Block,
            StatementKind::If { .. } => StatementTag::If,
            StatementKind::While => StatementTag::While,
            StatementKind::Do => StatementTag::Do,
            StatementKind::For { .. } => StatementTag::For,
            StatementKind::Foreach => StatementTag::Foreach,
            StatementKind::Switch => StatementTag::Switch,
            StatementKind::Case => StatementTag::Case,
            StatementKind::Try { .. } => StatementTag::Try,
            StatementKind::Catch { .. } => StatementTag::Catch,
            StatementKind::Lock => StatementTag::Lock,
            StatementKind::Using => StatementTag::Using,
            StatementKind::Extern { .. } => StatementTag::Extern,
            StatementKind::Empty => StatementTag::Empty,
        }
    }
}

/// A statement node in the [`CodeModel`](super::CodeModel) arena.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub kind: StatementKind,
    /// Expression statement, declaration list, condition, or return value.
    pub content: Option<ExprId>,
    /// Authoritative ordered child list.
    pub children: Vec<StatementId>,
    pub parent: Option<StatementId>,
    /// One entry per declaration or definition site.
    pub locations: Vec<SourceLocation>,
    pub language: Language,
    /// Set once this node has been absorbed into another by a merge.
    pub merged_into: Option<StatementId>,
}

impl Statement {
    pub fn new(kind: StatementKind, language: Language) -> Self {
        Self {
            kind,
            content: None,
            children: Vec::new(),
            parent: None,
            locations: Vec::new(),
            language,
            merged_into: None,
        }
    }

    pub fn tag(&self) -> StatementTag {
        self.kind.tag()
    }

    pub fn is(&self, tag: StatementTag) -> bool {
        self.tag() == tag
    }

    /// The declared name of a namespace, type, method, property, alias, or label.
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            StatementKind::Namespace(ns) => Some(&ns.name),
            StatementKind::Type(ty) => Some(&ty.name),
            StatementKind::Method(method) => Some(&method.name),
            StatementKind::Property(prop) => Some(&prop.name),
            StatementKind::Alias { alias_name, .. } => Some(alias_name),
            StatementKind::Label(label) => Some(label),
            _ => None,
        }
    }

    pub fn as_namespace(&self) -> Option<&NamespaceDef> {
        match &self.kind {
            StatementKind::Namespace(ns) => Some(ns),
            _ => None,
        }
    }

    pub fn as_type(&self) -> Option<&TypeDef> {
        match &self.kind {
            StatementKind::Type(ty) => Some(ty),
            _ => None,
        }
    }

    pub fn as_method(&self) -> Option<&MethodDef> {
        match &self.kind {
            StatementKind::Method(method) => Some(method),
            _ => None,
        }
    }

    pub fn as_property(&self) -> Option<&PropertyDef> {
        match &self.kind {
            StatementKind::Property(prop) => Some(prop),
            _ => None,
        }
    }

    pub fn is_namespace(&self) -> bool {
        matches!(self.kind, StatementKind::Namespace(_))
    }

    pub fn is_type(&self) -> bool {
        matches!(self.kind, StatementKind::Type(_))
    }

    pub fn is_global(&self) -> bool {
        matches!(&self.kind, StatementKind::Namespace(ns) if ns.is_global)
    }

    pub fn is_builtin(&self) -> bool {
        matches!(&self.kind, StatementKind::Type(ty) if ty.kind == TypeKind::BuiltIn)
    }

    /// Namespaces and types: the scopes whose members are visible regardless of order.
    pub fn is_declaration_scope(&self) -> bool {
        self.is_namespace() || self.is_type()
    }

    /// The qualifying prefix of an out-of-line type or method definition.
    pub fn prefix(&self) -> Option<ExprId> {
        match &self.kind {
            StatementKind::Type(ty) => ty.prefix,
            StatementKind::Method(method) => method.prefix,
            _ => None,
        }
    }

    /// True when every recorded site is declaration-only (prototype, forward declaration).
    pub fn is_declaration_only(&self) -> bool {
        !self.locations.is_empty() && self.locations.iter().all(|loc| loc.is_reference)
    }
}
