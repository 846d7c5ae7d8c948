//! Handles into the [`CodeModel`](super::CodeModel) arena.

use std::fmt;

/// Identifies a statement node.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct StatementId(pub u32);

impl StatementId {
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for StatementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StatementId({})", self.0)
    }
}

/// Identifies an expression node.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ExprId(pub u32);

impl ExprId {
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExprId({})", self.0)
    }
}

/// Anything a name use can resolve to.
///
/// Namespaces, types, methods and properties are statements; variables,
/// fields and parameters are declaration expressions.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Declaration {
    Statement(StatementId),
    Variable(ExprId),
}

impl Declaration {
    pub fn as_statement(self) -> Option<StatementId> {
        match self {
            Declaration::Statement(id) => Some(id),
            Declaration::Variable(_) => None,
        }
    }

    pub fn as_variable(self) -> Option<ExprId> {
        match self {
            Declaration::Variable(id) => Some(id),
            Declaration::Statement(_) => None,
        }
    }
}

impl From<StatementId> for Declaration {
    fn from(id: StatementId) -> Self {
        Declaration::Statement(id)
    }
}

impl From<ExprId> for Declaration {
    fn from(id: ExprId) -> Self {
        Declaration::Variable(id)
    }
}
