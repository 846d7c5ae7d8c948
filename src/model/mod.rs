//! Semantic model: statement and expression nodes in one arena.
//!
//! ## Key Types
//!
//! - [`CodeModel`] - Arena owning every node, the file table and built-in types
//! - [`StatementId`], [`ExprId`] - Copyable handles; identity is handle equality
//! - [`Statement`], [`StatementKind`] - Namespaces, types, methods, control flow
//! - [`Expression`], [`ExprKind`] - Name uses, calls, declarations, operators
//! - [`BuiltInTypes`] - Canonical primitive type nodes
//!
//! ## Lifecycle
//!
//! ```text
//! FileUnit ──parse_file_unit──▶ global namespace (one per file)
//!                                   │
//!                                 merge
//!                                   ▼
//!                          one merged global root ──▶ Resolver queries
//! ```
//!
//! Nodes are created once during lowering. Afterwards only merging
//! changes the tree shape, by grafting children of one scope onto another.

mod arena;
mod builtins;
mod expression;
mod ids;
mod lower;
mod merge;
mod statement;
mod traverse;

pub use arena::CodeModel;
pub use builtins::BuiltInTypes;
pub use expression::{ExprKind, Expression, MethodCall, NamePrefix, NameUse, VariableDecl};
pub use ids::{Declaration, ExprId, StatementId};
pub use statement::{
    MethodDef, NamespaceDef, PropertyDef, Statement, StatementKind, StatementTag, TypeDef,
};
pub use traverse::{Ancestors, Descendants, ExprDescendants};
