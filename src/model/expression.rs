//! Expression nodes.

use smol_str::SmolStr;

use super::ids::{ExprId, StatementId};
use crate::base::SourceLocation;
use crate::syntax::{Accessibility, LiteralKind};

/// A name and its optional qualifying prefix.
#[derive(Debug, Clone, PartialEq)]
pub struct NameUse {
    pub name: SmolStr,
    /// A [`ExprKind::Prefix`] node.
    pub prefix: Option<ExprId>,
}

/// A method, function, or constructor call.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodCall {
    pub name: SmolStr,
    pub prefix: Option<ExprId>,
    pub arguments: Vec<ExprId>,
    pub type_arguments: Vec<ExprId>,
    pub is_constructor: bool,
    pub is_destructor: bool,
    /// An entry of a constructor's initializer list.
    pub is_constructor_initializer: bool,
}

/// A variable, field, or parameter declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDecl {
    pub name: SmolStr,
    /// Shared by every declarator of one declaration statement.
    pub variable_type: Option<ExprId>,
    pub accessibility: Accessibility,
    pub initializer: Option<ExprId>,
}

/// A qualifying chain of name uses (`A::B::` in `A::B::c`).
#[derive(Debug, Clone, PartialEq)]
pub struct NamePrefix {
    /// The chain starts with the global-scope token (`::c`).
    pub is_global: bool,
    /// [`ExprKind::Name`] nodes, outermost first.
    pub segments: Vec<ExprId>,
}

/// Variant data of an [`Expression`].
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// A plain expression; parenthesized sub-expressions nest as their own `Compound`.
    Compound,
    Name(NameUse),
    Variable {
        name: NameUse,
        index: Option<ExprId>,
    },
    Type {
        name: NameUse,
        type_parameters: Vec<ExprId>,
    },
    Call(MethodCall),
    Declaration(VariableDecl),
    Operator(SmolStr),
    Literal {
        kind: LiteralKind,
        text: SmolStr,
    },
    Prefix(NamePrefix),
}

/// An expression node in the [`CodeModel`](super::CodeModel) arena.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub kind: ExprKind,
    /// Ordered components of a [`ExprKind::Compound`].
    pub components: Vec<ExprId>,
    pub parent_expression: Option<ExprId>,
    pub parent_statement: Option<StatementId>,
    pub location: SourceLocation,
}

impl Expression {
    pub fn new(kind: ExprKind, location: SourceLocation) -> Self {
        Self {
            kind,
            components: Vec::new(),
            parent_expression: None,
            parent_statement: None,
            location,
        }
    }

    /// The name of a name use, variable use, type use, call, or declaration.
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Name(name)
            | ExprKind::Variable { name, .. }
            | ExprKind::Type { name, .. } => Some(&name.name),
            ExprKind::Call(call) => Some(&call.name),
            ExprKind::Declaration(decl) => Some(&decl.name),
            _ => None,
        }
    }

    pub fn prefix(&self) -> Option<ExprId> {
        match &self.kind {
            ExprKind::Name(name)
            | ExprKind::Variable { name, .. }
            | ExprKind::Type { name, .. } => name.prefix,
            ExprKind::Call(call) => call.prefix,
            _ => None,
        }
    }

    pub fn as_call(&self) -> Option<&MethodCall> {
        match &self.kind {
            ExprKind::Call(call) => Some(call),
            _ => None,
        }
    }

    pub fn as_declaration(&self) -> Option<&VariableDecl> {
        match &self.kind {
            ExprKind::Declaration(decl) => Some(decl),
            _ => None,
        }
    }

    pub fn as_prefix(&self) -> Option<&NamePrefix> {
        match &self.kind {
            ExprKind::Prefix(prefix) => Some(prefix),
            _ => None,
        }
    }

    pub fn operator(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Operator(op) => Some(op),
            _ => None,
        }
    }

    pub fn is_type_use(&self) -> bool {
        matches!(self.kind, ExprKind::Type { .. })
    }

    /// Name uses that resolution applies to: names, variables, types and calls.
    pub fn is_use(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::Name(_) | ExprKind::Variable { .. } | ExprKind::Type { .. } | ExprKind::Call(_)
        )
    }

    /// A type use carrying generic arguments (`vector<int>`).
    pub fn is_generic(&self) -> bool {
        matches!(&self.kind, ExprKind::Type { type_parameters, .. } if !type_parameters.is_empty())
    }

    pub fn type_parameters(&self) -> &[ExprId] {
        match &self.kind {
            ExprKind::Type {
                type_parameters, ..
            } => type_parameters,
            _ => &[],
        }
    }

    /// Every expression slot of this node, including ones owned elsewhere.
    ///
    /// A declaration's `variable_type` is listed even when a sibling
    /// declarator owns it; filter on `parent_expression` for ownership.
    pub fn sub_expressions(&self) -> Vec<ExprId> {
        let mut out = Vec::new();
        match &self.kind {
            ExprKind::Compound | ExprKind::Operator(_) | ExprKind::Literal { .. } => {}
            ExprKind::Name(name) => out.extend(name.prefix),
            ExprKind::Variable { name, index } => {
                out.extend(name.prefix);
                out.extend(*index);
            }
            ExprKind::Type {
                name,
                type_parameters,
            } => {
                out.extend(name.prefix);
                out.extend(type_parameters.iter().copied());
            }
            ExprKind::Call(call) => {
                out.extend(call.prefix);
                out.extend(call.type_arguments.iter().copied());
                out.extend(call.arguments.iter().copied());
            }
            ExprKind::Declaration(decl) => {
                out.extend(decl.variable_type);
                out.extend(decl.initializer);
            }
            ExprKind::Prefix(prefix) => out.extend(prefix.segments.iter().copied()),
        }
        out.extend(self.components.iter().copied());
        out
    }
}
