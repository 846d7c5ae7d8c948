//! Builders for models lowered from hand-built file units, and node lookups.

use srcgraph::model::{CodeModel, ExprId, ExprKind, StatementId};
use srcgraph::syntax::{FileUnit, Language, Stmt};

pub fn cpp(path: &str, statements: Vec<Stmt>) -> FileUnit {
    FileUnit::new(path, Language::CPlusPlus).with(statements)
}

pub fn csharp(path: &str, statements: Vec<Stmt>) -> FileUnit {
    FileUnit::new(path, Language::CSharp).with(statements)
}

pub fn java(path: &str, statements: Vec<Stmt>) -> FileUnit {
    FileUnit::new(path, Language::Java).with(statements)
}

/// Lower every unit and merge the roots, in order, into the first one.
pub fn build(units: Vec<FileUnit>) -> (CodeModel, StatementId) {
    let mut model = CodeModel::new();
    let mut merged: Option<StatementId> = None;
    for unit in units {
        let path = unit.path.clone();
        let root = model
            .parse_file_unit(unit)
            .unwrap_or_else(|e| panic!("Failed to lower '{}': {}", path, e));
        merged = Some(match merged {
            None => root,
            Some(receiver) => model
                .merge(receiver, root)
                .unwrap_or_else(|e| panic!("Failed to merge '{}': {}", path, e)),
        });
    }
    (model, merged.expect("build() needs at least one file unit"))
}

pub fn build_one(unit: FileUnit) -> (CodeModel, StatementId) {
    build(vec![unit])
}

/// Named statements below `root` whose full name is `full_name`.
pub fn statements_named(model: &CodeModel, root: StatementId, full_name: &str) -> Vec<StatementId> {
    model
        .descendants_and_self(root)
        .filter(|&id| model.statement(id).name().is_some_and(|n| !n.is_empty()))
        .filter(|&id| model.full_name(id) == full_name)
        .collect()
}

/// The single named statement with the given full name.
pub fn statement_named(model: &CodeModel, root: StatementId, full_name: &str) -> StatementId {
    let found = statements_named(model, root, full_name);
    assert_eq!(
        found.len(),
        1,
        "Expected exactly one statement named '{}', found {}",
        full_name,
        found.len()
    );
    found[0]
}

/// Use expressions named `name` below `scope`, in traversal order.
pub fn uses_named(model: &CodeModel, scope: StatementId, name: &str) -> Vec<ExprId> {
    model
        .all_expressions(scope)
        .filter(|&e| {
            let expr = model.expression(e);
            expr.is_use() && expr.name() == Some(name)
        })
        .collect()
}

/// The first use expression named `name` below `scope`.
pub fn use_named(model: &CodeModel, scope: StatementId, name: &str) -> ExprId {
    uses_named(model, scope, name)
        .into_iter()
        .next()
        .unwrap_or_else(|| panic!("Expected a use of '{}'", name))
}

/// Call expressions named `name` below `scope`, in traversal order.
pub fn calls_named(model: &CodeModel, scope: StatementId, name: &str) -> Vec<ExprId> {
    uses_named(model, scope, name)
        .into_iter()
        .filter(|&e| matches!(model.expression(e).kind, ExprKind::Call(_)))
        .collect()
}

/// Variable declarations named `name` below `scope`, in traversal order.
pub fn declarations_named(model: &CodeModel, scope: StatementId, name: &str) -> Vec<ExprId> {
    model
        .all_expressions(scope)
        .filter(|&e| {
            model
                .expression(e)
                .as_declaration()
                .is_some_and(|d| d.name == name)
        })
        .collect()
}

/// The single variable declaration named `name` below `scope`.
pub fn declaration_named(model: &CodeModel, scope: StatementId, name: &str) -> ExprId {
    let found = declarations_named(model, scope, name);
    assert_eq!(
        found.len(),
        1,
        "Expected exactly one declaration of '{}', found {}",
        name,
        found.len()
    );
    found[0]
}
