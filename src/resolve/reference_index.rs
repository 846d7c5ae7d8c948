//! Batch resolution of every use below a statement.
//!
//! Queries only read the merged model, so uses are resolved in parallel and
//! the answers are folded into forward and reverse maps.

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use tracing::debug;

use super::Resolver;
use crate::model::{Declaration, ExprId, StatementId};

/// Forward (use → declarations) and reverse (declaration → uses) references.
#[derive(Debug, Default, Clone)]
pub struct ReferenceIndex {
    resolved: FxHashMap<ExprId, Vec<Declaration>>,
    uses: FxHashMap<Declaration, Vec<ExprId>>,
    /// Uses in traversal order.
    order: Vec<ExprId>,
}

impl ReferenceIndex {
    /// Declarations a use resolved to; empty when unresolved or not indexed.
    pub fn declarations_of(&self, expr: ExprId) -> &[Declaration] {
        self.resolved.get(&expr).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Uses that resolved to `decl`, in traversal order.
    pub fn uses_of(&self, decl: impl Into<Declaration>) -> &[ExprId] {
        self.uses
            .get(&decl.into())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Indexed uses that resolved to nothing.
    pub fn unresolved(&self) -> impl Iterator<Item = ExprId> + '_ {
        self.order
            .iter()
            .copied()
            .filter(|expr| self.declarations_of(*expr).is_empty())
    }

    /// Number of indexed uses.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn resolved_count(&self) -> usize {
        self.order.len() - self.unresolved().count()
    }
}

impl Resolver<'_> {
    /// Resolve every use in the subtree rooted at `root`.
    pub fn reference_index(&self, root: StatementId) -> ReferenceIndex {
        let order: Vec<ExprId> = self
            .model
            .all_expressions(root)
            .filter(|&expr| self.model.expression(expr).is_use())
            .collect();

        let answers: Vec<(ExprId, Vec<Declaration>)> = order
            .par_iter()
            .map(|&expr| (expr, self.find_matches(expr)))
            .collect();

        let mut index = ReferenceIndex {
            order,
            ..ReferenceIndex::default()
        };
        for (expr, decls) in answers {
            for &decl in &decls {
                index.uses.entry(decl).or_default().push(expr);
            }
            index.resolved.insert(expr, decls);
        }

        debug!(
            uses = index.len(),
            unresolved = index.len() - index.resolved_count(),
            "built reference index"
        );
        index
    }
}
