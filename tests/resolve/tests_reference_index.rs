//! Batch reference indexing over a merged model.

use srcgraph::model::{Declaration, ExprId};
use srcgraph::resolve::Resolver;
use srcgraph::syntax::{Expr, MethodDecl, Stmt, TypeDecl};

use crate::helpers::model_helpers::*;

#[test]
fn test_index_maps_uses_both_ways() {
    let (model, root) = build(vec![
        cpp(
            "counter.h",
            vec![TypeDecl::class("Counter")
                .body(vec![
                    Stmt::field("int", "count"),
                    MethodDecl::new("bump").returns("void").into(),
                ])
                .into()],
        ),
        cpp(
            "counter.cpp",
            vec![
                MethodDecl::new("Counter::bump")
                    .returns("void")
                    .body(vec![
                        Stmt::expr(Expr::assign(Expr::var("count"), Expr::int(1))),
                        Stmt::expr(Expr::var("count")),
                        Stmt::expr(Expr::call("undefined_helper", vec![])),
                    ])
                    .into(),
            ],
        ),
    ]);
    let resolver = Resolver::new(&model);
    let index = resolver.reference_index(root);

    let count = Declaration::Variable(declaration_named(&model, root, "count"));
    let uses = uses_named(&model, root, "count");
    assert_eq!(index.uses_of(count), uses.as_slice());
    for &use_of_count in &uses {
        assert_eq!(index.declarations_of(use_of_count), &[count]);
    }

    let unresolved: Vec<ExprId> = index.unresolved().collect();
    assert_eq!(unresolved, calls_named(&model, root, "undefined_helper"));

    assert_eq!(index.len(), model.all_expressions(root).filter(|&e| model.expression(e).is_use()).count());
    assert_eq!(index.resolved_count(), index.len() - 1);
}

#[test]
fn test_index_of_empty_unit() {
    let (model, root) = build_one(cpp("empty.cpp", vec![]));
    let index = Resolver::new(&model).reference_index(root);

    assert!(index.is_empty());
    assert_eq!(index.unresolved().count(), 0);
}

#[test]
fn test_index_agrees_with_single_queries() {
    let (model, root) = build_one(csharp(
        "Shapes.cs",
        vec![
            TypeDecl::class("Shape")
                .body(vec![MethodDecl::new("Area").returns("double").body(vec![]).into()])
                .into(),
            TypeDecl::class("Square")
                .extends(["Shape"])
                .body(vec![MethodDecl::new("Print")
                    .body(vec![
                        Stmt::field("Square", "other"),
                        Stmt::expr(Expr::dotted(vec![Expr::var("other"), Expr::call("Area", vec![])])),
                    ])
                    .into()])
                .into(),
        ],
    ));
    let resolver = Resolver::new(&model);
    let index = resolver.reference_index(root);

    for expr in model.all_expressions(root).filter(|&e| model.expression(e).is_use()) {
        assert_eq!(index.declarations_of(expr), resolver.find_matches(expr).as_slice());
    }
    let area = statement_named(&model, root, "Shape.Area");
    assert_eq!(index.uses_of(area), calls_named(&model, root, "Area").as_slice());
}
