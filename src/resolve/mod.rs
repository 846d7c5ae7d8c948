//! Name resolution: binding uses to the declarations they denote.
//!
//! Resolution is pull-based. Nothing is precomputed; every query walks the
//! merged tree from the use outward:
//!
//! 1. **Lexical scopes** - innermost statement first. Local scopes see only
//!    declarations that precede the use; namespaces and types see all of
//!    their members. A type scope that has no match falls back to its
//!    inherited members, depth-first per parent in declared order.
//! 2. **Aliases** visible at the use (single-level substitution).
//! 3. **Imports** visible at the use, searching each imported namespace.
//! 4. **The global namespace**.
//!
//! Qualified names resolve their prefix first and then look the trailing
//! name up as a member; a bare `::` prefix searches the global namespace
//! only. A call preceded by a calling object (`a.b.Foo()`) is looked up
//! among the members of the object's type, never in the caller's scope.
//!
//! ## Key Types
//!
//! - [`Resolver`] - Query surface borrowing a [`CodeModel`](crate::model::CodeModel)
//! - [`ResolverOptions`] - Behaviour knobs
//! - [`ReferenceIndex`] - Batch resolution of every use below a root

mod reference_index;
mod resolver;
mod scope;
mod types;

pub use reference_index::ReferenceIndex;
pub use resolver::Resolver;

/// Behaviour knobs for a [`Resolver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Only honour imports and aliases declared in the use's own file.
    ///
    /// Merged namespaces collect directives from every file; with this
    /// off, a `using` in one file leaks into every other file that shares
    /// the namespace.
    pub file_scoped_imports: bool,
    /// Nesting limit for resolution that recurses through prefixes,
    /// calling objects, aliases and parent types.
    pub max_depth: usize,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            file_scoped_imports: true,
            max_depth: 64,
        }
    }
}
