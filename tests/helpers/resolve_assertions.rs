//! Assertions over resolver answers.

use srcgraph::model::{Declaration, ExprId, StatementId};
use srcgraph::resolve::Resolver;

fn describe(resolver: &Resolver<'_>, decl: Declaration) -> String {
    let model = resolver.model();
    match decl {
        Declaration::Statement(id) => format!("{:?} '{}'", id, model.full_name(id)),
        Declaration::Variable(id) => format!(
            "{:?} variable '{}'",
            id,
            model.expression(id).name().unwrap_or_default()
        ),
    }
}

fn describe_all(resolver: &Resolver<'_>, decls: &[Declaration]) -> Vec<String> {
    decls.iter().map(|&d| describe(resolver, d)).collect()
}

/// Assert the primary match of `expr` is `expected`.
pub fn assert_resolves_to(resolver: &Resolver<'_>, expr: ExprId, expected: impl Into<Declaration>) {
    let expected = expected.into();
    let matches = resolver.find_matches(expr);
    assert_eq!(
        matches.first().copied(),
        Some(expected),
        "Expected {:?} to resolve to {}, got {:?}",
        expr,
        describe(resolver, expected),
        describe_all(resolver, &matches)
    );
}

/// Assert `expr` resolves to exactly `expected` and nothing else.
pub fn assert_single_match(resolver: &Resolver<'_>, expr: ExprId, expected: impl Into<Declaration>) {
    let expected = expected.into();
    let matches = resolver.find_matches(expr);
    assert_eq!(
        matches,
        vec![expected],
        "Expected {:?} to resolve only to {}, got {:?}",
        expr,
        describe(resolver, expected),
        describe_all(resolver, &matches)
    );
}

/// Assert `expr` resolves to nothing.
pub fn assert_unresolved(resolver: &Resolver<'_>, expr: ExprId) {
    let matches = resolver.find_matches(expr);
    assert!(
        matches.is_empty(),
        "Expected {:?} to stay unresolved, got {:?}",
        expr,
        describe_all(resolver, &matches)
    );
}

/// Assert the resolved type of `expr` is exactly `expected`.
pub fn assert_type_is(resolver: &Resolver<'_>, expr: ExprId, expected: StatementId) {
    let types = resolver.resolve_type(expr);
    assert_eq!(
        types,
        vec![expected],
        "Expected {:?} to have type '{}', got {:?}",
        expr,
        resolver.model().full_name(expected),
        types
            .iter()
            .map(|&t| resolver.model().full_name(t))
            .collect::<Vec<_>>()
    );
}
