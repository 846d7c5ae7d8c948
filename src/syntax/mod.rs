//! Front-end input contract.
//!
//! Language front-ends hand the model owned, plain-data trees:
//! - [`FileUnit`] - one source file's top-level statements
//! - [`Stmt`], [`StmtKind`] - classified statements (namespaces, types, methods, control flow)
//! - [`Expr`] - name uses, calls, declarations, operators and literals
//! - [`FrontEnd`] - the translation capability each source language implements

mod expr;
mod front_end;
mod language;
mod unit;

pub use expr::{CallExpr, Expr, Literal, NameChain, NameRef, TypeRef, VarDecl};
pub use front_end::FrontEnd;
pub use language::{Accessibility, Language, LiteralKind, TypeKind};
pub use unit::{CatchClause, FileUnit, MethodDecl, PropertyDecl, Stmt, StmtKind, TypeDecl};
