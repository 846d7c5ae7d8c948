//! The [`CodeModel`] arena.

use std::ops::Index;

use super::builtins::BuiltInTypes;
use super::expression::Expression;
use super::ids::{ExprId, StatementId};
use super::statement::Statement;
use crate::base::FileTable;

/// Arena owning every statement and expression of an analysis run.
///
/// Nodes are stored contiguously and referenced by [`StatementId`] and
/// [`ExprId`]. Parent links are plain handles, so merging re-parents
/// subtrees by rewriting ids and never invalidates a reference. Nodes
/// are never removed; a node absorbed by a merge records the surviving
/// node in [`Statement::merged_into`].
#[derive(Debug, Clone)]
pub struct CodeModel {
    statements: Vec<Statement>,
    expressions: Vec<Expression>,
    files: FileTable,
    builtins: BuiltInTypes,
    roots: Vec<StatementId>,
}

impl Default for CodeModel {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeModel {
    /// Create an empty model with the built-in types registered.
    pub fn new() -> Self {
        let mut model = Self {
            statements: Vec::new(),
            expressions: Vec::new(),
            files: FileTable::new(),
            builtins: BuiltInTypes::default(),
            roots: Vec::new(),
        };
        model.builtins = BuiltInTypes::populate(&mut model);
        model
    }

    pub fn statement(&self, id: StatementId) -> &Statement {
        &self.statements[id.index()]
    }

    pub fn expression(&self, id: ExprId) -> &Expression {
        &self.expressions[id.index()]
    }

    /// Look up a statement handle that may not belong to this model.
    pub fn get_statement(&self, id: StatementId) -> Option<&Statement> {
        self.statements.get(id.index())
    }

    pub fn statement_count(&self) -> usize {
        self.statements.len()
    }

    pub fn expression_count(&self) -> usize {
        self.expressions.len()
    }

    pub fn files(&self) -> &FileTable {
        &self.files
    }

    pub fn builtins(&self) -> &BuiltInTypes {
        &self.builtins
    }

    /// Global namespaces that have not been absorbed by a merge.
    pub fn roots(&self) -> impl Iterator<Item = StatementId> + '_ {
        self.roots
            .iter()
            .copied()
            .filter(|&root| self.statement(root).merged_into.is_none())
    }

    /// Follow merge forwarding to the node that survived.
    pub fn canonical(&self, mut id: StatementId) -> StatementId {
        while let Some(next) = self.statement(id).merged_into {
            id = next;
        }
        id
    }

    // ------------------------------------------------------------------
    // Construction (crate-internal)
    // ------------------------------------------------------------------

    pub(crate) fn files_mut(&mut self) -> &mut FileTable {
        &mut self.files
    }

    pub(crate) fn push_root(&mut self, root: StatementId) {
        self.roots.push(root);
    }

    pub(crate) fn alloc_statement(&mut self, statement: Statement) -> StatementId {
        let id = StatementId::new(self.statements.len() as u32);
        self.statements.push(statement);
        id
    }

    pub(crate) fn alloc_expression(&mut self, expression: Expression) -> ExprId {
        let id = ExprId::new(self.expressions.len() as u32);
        self.expressions.push(expression);
        id
    }

    pub(crate) fn statement_mut(&mut self, id: StatementId) -> &mut Statement {
        &mut self.statements[id.index()]
    }

    pub(crate) fn expression_mut(&mut self, id: ExprId) -> &mut Expression {
        &mut self.expressions[id.index()]
    }

    /// Append `child` to the child list of `parent` and set its parent link.
    pub(crate) fn append_child(&mut self, parent: StatementId, child: StatementId) {
        self.statement_mut(child).parent = Some(parent);
        self.statement_mut(parent).children.push(child);
    }

    /// Remove `child` from whichever statement list of its parent holds it.
    pub(crate) fn detach(&mut self, child: StatementId) {
        let Some(parent) = self.statement(child).parent else {
            return;
        };
        self.statement_mut(parent).children.retain(|&c| c != child);
        self.statement_mut(child).parent = None;
    }
}

impl Index<StatementId> for CodeModel {
    type Output = Statement;

    fn index(&self, id: StatementId) -> &Statement {
        self.statement(id)
    }
}

impl Index<ExprId> for CodeModel {
    type Output = Expression;

    fn index(&self, id: ExprId) -> &Expression {
        self.expression(id)
    }
}
