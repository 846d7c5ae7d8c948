//! Imports (`using Lib;`, `using namespace std;`) and aliases (`using H = Lib.Helper;`).

use rstest::rstest;
use srcgraph::base::SourceRange;
use srcgraph::resolve::{Resolver, ResolverOptions};
use srcgraph::syntax::{Expr, FileUnit, MethodDecl, Stmt, TypeDecl};

use crate::helpers::model_helpers::*;
use crate::helpers::resolve_assertions::*;

fn library() -> FileUnit {
    csharp(
        "Lib.cs",
        vec![Stmt::namespace(
            "Lib",
            vec![TypeDecl::class("Helper")
                .body(vec![MethodDecl::new("Run").body(vec![]).into()])
                .into()],
        )],
    )
}

/// `class <name> { void Go() { Helper h; } }` inside namespace App.
fn app(path: &str, directives: Vec<Stmt>, class: &str) -> FileUnit {
    let mut statements = directives;
    statements.push(Stmt::namespace(
        "App",
        vec![TypeDecl::class(class)
            .body(vec![MethodDecl::new("Go")
                .body(vec![Stmt::field("Helper", "h")])
                .into()])
            .into()],
    ));
    csharp(path, statements)
}

#[test]
fn test_import_exposes_namespace_members() {
    let (model, root) = build(vec![library(), app("App.cs", vec![Stmt::import("Lib")], "Main")]);
    let resolver = Resolver::new(&model);

    let helper = use_named(&model, statement_named(&model, root, "App.Main"), "Helper");
    assert_single_match(&resolver, helper, statement_named(&model, root, "Lib.Helper"));
}

#[test]
fn test_imports_are_file_scoped_by_default() {
    let (model, root) = build(vec![
        library(),
        app("App.cs", vec![Stmt::import("Lib")], "Main"),
        app("Other.cs", vec![], "Other"),
    ]);
    let other = statement_named(&model, root, "App.Other");
    let helper = use_named(&model, other, "Helper");

    let resolver = Resolver::new(&model);
    assert_unresolved(&resolver, helper);
    assert!(resolver.imports(helper).is_empty());

    let shared = Resolver::with_options(
        &model,
        ResolverOptions {
            file_scoped_imports: false,
            ..ResolverOptions::default()
        },
    );
    assert_single_match(&shared, helper, statement_named(&model, root, "Lib.Helper"));
    assert_eq!(shared.imports(helper).len(), 1);
}

#[rstest]
#[case::directive_first(0, 4, true)]
#[case::directive_after_use(4, 0, false)]
fn test_import_only_applies_after_its_position(
    #[case] import_line: u32,
    #[case] use_line: u32,
    #[case] visible: bool,
) {
    let (model, root) = build(vec![
        library(),
        cpp(
            "main.cpp",
            vec![
                Stmt::import("Lib").at(SourceRange::from_coords(import_line, 0, import_line, 20)),
                MethodDecl::new("main")
                    .body(vec![
                        Stmt::field("Helper", "h").at(SourceRange::from_coords(use_line, 4, use_line, 13)),
                    ])
                    .into(),
            ],
        ),
    ]);
    let resolver = Resolver::new(&model);

    let helper = use_named(&model, root, "Helper");
    assert_eq!(resolver.imports(helper).len(), usize::from(visible));
    assert_eq!(!resolver.find_matches(helper).is_empty(), visible);
}

#[test]
fn test_imports_innermost_first() {
    let (model, root) = build_one(cpp(
        "scopes.cpp",
        vec![
            Stmt::import("Lib"),
            MethodDecl::new("main")
                .body(vec![
                    Stmt::if_else(
                        Expr::var("ready"),
                        vec![Stmt::import("Extra"), Stmt::expr(Expr::var("inner"))],
                        vec![],
                    ),
                    Stmt::expr(Expr::var("outer")),
                ])
                .into(),
        ],
    ));
    let resolver = Resolver::new(&model);

    let inner = resolver.imports(use_named(&model, root, "inner"));
    let names: Vec<String> = inner
        .iter()
        .map(|&i| match &model.statement(i).kind {
            srcgraph::model::StatementKind::Import { imported_namespace } => {
                model.type_text(*imported_namespace)
            }
            _ => String::new(),
        })
        .collect();
    assert_eq!(names, vec!["Extra", "Lib"]);
    assert_eq!(resolver.imports(use_named(&model, root, "outer")).len(), 1);
}

#[test]
fn test_import_of_missing_namespace_resolves_nothing() {
    let (model, root) = build_one(cpp(
        "missing.cpp",
        vec![
            Stmt::import("std"),
            MethodDecl::new("main")
                .body(vec![Stmt::field("vector", "v")])
                .into(),
        ],
    ));
    let resolver = Resolver::new(&model);

    assert_unresolved(&resolver, use_named(&model, root, "vector"));
}

// =============================================================================
// ALIASES
// =============================================================================

#[test]
fn test_alias_to_type() {
    let (model, root) = build(vec![
        library(),
        csharp(
            "App.cs",
            vec![
                Stmt::alias("H", "Lib.Helper"),
                TypeDecl::class("Main")
                    .body(vec![MethodDecl::new("Go")
                        .body(vec![
                            Stmt::field("H", "h"),
                            Stmt::expr(Expr::dotted(vec![Expr::var("h"), Expr::call("Run", vec![])])),
                        ])
                        .into()])
                    .into(),
            ],
        ),
    ]);
    let resolver = Resolver::new(&model);

    let alias_use = use_named(&model, root, "H");
    assert_single_match(&resolver, alias_use, statement_named(&model, root, "Lib.Helper"));
    assert_eq!(resolver.aliases(alias_use).len(), 1);

    let run = calls_named(&model, root, "Run")[0];
    assert_single_match(&resolver, run, statement_named(&model, root, "Lib.Helper.Run"));
}

#[test]
fn test_alias_to_namespace_used_as_prefix() {
    let (model, root) = build(vec![
        library(),
        csharp(
            "App.cs",
            vec![
                Stmt::alias("L", "Lib"),
                TypeDecl::class("Main")
                    .body(vec![MethodDecl::new("Go")
                        .body(vec![Stmt::field("L.Helper", "h")])
                        .into()])
                    .into(),
            ],
        ),
    ]);
    let resolver = Resolver::new(&model);

    let helper = use_named(&model, root, "Helper");
    assert_single_match(&resolver, helper, statement_named(&model, root, "Lib.Helper"));
}

#[test]
fn test_alias_called_constructs_its_target() {
    let (model, root) = build(vec![
        csharp(
            "Lib.cs",
            vec![Stmt::namespace(
                "Lib",
                vec![TypeDecl::class("Helper")
                    .body(vec![MethodDecl::constructor("Helper").body(vec![]).into()])
                    .into()],
            )],
        ),
        csharp(
            "App.cs",
            vec![
                Stmt::alias("H", "Lib.Helper"),
                TypeDecl::class("Main")
                    .body(vec![MethodDecl::new("Go")
                        .body(vec![Stmt::expr(Expr::new_object("H", vec![]))])
                        .into()])
                    .into(),
            ],
        ),
    ]);
    let resolver = Resolver::new(&model);

    let ctor = statement_named(&model, root, "Lib.Helper.Helper");
    assert_single_match(&resolver, calls_named(&model, root, "H")[0], ctor);
}

#[test]
fn test_alias_target_does_not_resolve_through_itself() {
    let (model, root) = build_one(csharp(
        "Loop.cs",
        vec![
            Stmt::alias("X", "X"),
            TypeDecl::class("Main")
                .body(vec![MethodDecl::new("Go").body(vec![Stmt::field("X", "x")]).into()])
                .into(),
        ],
    ));
    let resolver = Resolver::new(&model);

    let x_type = uses_named(&model, root, "X")
        .into_iter()
        .find(|&e| model.expression(e).is_type_use())
        .expect("type use of X");
    assert_unresolved(&resolver, x_type);
}

#[test]
fn test_enclosing_namespaces_are_searched_before_imports() {
    let (model, root) = build(vec![
        library(),
        csharp(
            "Outer.cs",
            vec![Stmt::namespace(
                "Outer",
                vec![
                    TypeDecl::class("Helper").into(),
                    Stmt::namespace(
                        "Inner",
                        vec![
                            Stmt::import("Lib"),
                            TypeDecl::class("Main")
                                .body(vec![MethodDecl::new("Go")
                                    .body(vec![Stmt::field("Helper", "h")])
                                    .into()])
                                .into(),
                        ],
                    ),
                ],
            )],
        ),
    ]);
    let resolver = Resolver::new(&model);

    let helper = use_named(&model, statement_named(&model, root, "Outer.Inner.Main"), "Helper");
    assert_single_match(&resolver, helper, statement_named(&model, root, "Outer.Helper"));
    assert_eq!(resolver.imports(helper).len(), 1);
}
