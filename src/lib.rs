//! # srcgraph-base
//!
//! Core library for multi-language (C++, C#, Java) program models:
//! building a semantic tree per file, merging trees across files, and
//! resolving name uses to their declarations.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! resolve   → FindMatches, ResolveType, imports/aliases, reference index
//!   ↓
//! model     → Arena of statements/expressions, built-ins, lowering, merging
//!   ↓
//! syntax    → Front-end contract: FileUnit trees, Language, FrontEnd trait
//!   ↓
//! base      → Primitives (FileId, SourceLocation, LineCol)
//! ```
//!
//! ## Example
//!
//! ```
//! use srcgraph::model::CodeModel;
//! use srcgraph::syntax::{FileUnit, Language, MethodDecl, Stmt};
//!
//! let mut model = CodeModel::new();
//! let a = model
//!     .parse_file_unit(FileUnit::new("a.cpp", Language::CPlusPlus).with(vec![
//!         Stmt::namespace("A", vec![MethodDecl::new("foo").returns("int").into()]),
//!     ]))
//!     .unwrap();
//! let b = model
//!     .parse_file_unit(FileUnit::new("b.cpp", Language::CPlusPlus).with(vec![
//!         Stmt::namespace("A", vec![MethodDecl::new("bar").returns("int").into()]),
//!     ]))
//!     .unwrap();
//!
//! let root = model.merge(a, b).unwrap();
//! let namespace = model.children(root)[0];
//! assert_eq!(model.full_name(namespace), "A");
//! assert_eq!(model.children(namespace).len(), 2);
//! ```

// ============================================================================
// MODULES (dependency order: base → syntax → model → resolve)
// ============================================================================

/// Foundation types: FileId, SourceLocation, line/column conversion
pub mod base;

/// Errors raised while building and merging models
pub mod error;

/// Front-end contract: per-file statement and expression trees
pub mod syntax;

/// Semantic model: arena, built-in types, lowering, merging, traversal
pub mod model;

/// Name resolution over a merged model
pub mod resolve;

// Re-export foundation types
pub use base::{FileId, FileTable, LineCol, SourceLocation, SourceRange};

// Re-export the main entry points
pub use error::{ModelError, Result};
pub use model::{CodeModel, Declaration, ExprId, StatementId};
pub use resolve::{ReferenceIndex, Resolver, ResolverOptions};
pub use syntax::{FileUnit, FrontEnd, Language};
