//! Merge tests over namespaces, types, methods and properties.

use srcgraph::model::{CodeModel, StatementTag};
use srcgraph::syntax::{Expr, MethodDecl, PropertyDecl, Stmt, TypeDecl, VarDecl};
use srcgraph::ModelError;

use crate::helpers::model_helpers::*;

// =============================================================================
// NAMESPACES
// =============================================================================

#[test]
fn test_disjoint_namespaces_keep_every_child() {
    let mut model = CodeModel::new();
    let a = model
        .parse_file_unit(cpp(
            "a.cpp",
            vec![Stmt::namespace("A", vec![]), Stmt::namespace("A2", vec![])],
        ))
        .unwrap();
    let b = model
        .parse_file_unit(cpp("b.cpp", vec![Stmt::namespace("B", vec![])]))
        .unwrap();
    let expected = model.children(a).len() + model.children(b).len();

    let merged = model.merge(a, b).unwrap();
    assert_eq!(merged, a);
    assert_eq!(model.children(merged).len(), expected);
    assert!(model.statement(merged).is_global());
}

#[test]
fn test_shared_namespace_merges_once_with_both_locations() {
    let file = |path: &str| {
        cpp(
            path,
            vec![Stmt::namespace("N", vec![TypeDecl::class("C").into()])],
        )
    };
    let (model, root) = build(vec![file("one.cpp"), file("two.cpp")]);

    let ns = statement_named(&model, root, "N");
    let class = statement_named(&model, root, "N.C");
    assert_eq!(model.children(root), &[ns]);
    assert_eq!(model.statement(ns).locations.len(), 2);
    assert_eq!(model.statement(class).locations.len(), 2);
}

#[test]
fn test_receiver_order_then_new_children() {
    let (model, root) = build(vec![
        csharp(
            "a.cs",
            vec![Stmt::namespace(
                "N",
                vec![TypeDecl::class("X").into(), TypeDecl::class("Y").into()],
            )],
        ),
        csharp(
            "b.cs",
            vec![Stmt::namespace(
                "N",
                vec![TypeDecl::class("Z").into(), TypeDecl::class("X").into()],
            )],
        ),
    ]);

    let ns = statement_named(&model, root, "N");
    let names: Vec<&str> = model
        .children(ns)
        .iter()
        .filter_map(|&c| model.statement(c).name())
        .collect();
    assert_eq!(names, vec!["X", "Y", "Z"]);
}

#[test]
fn test_anonymous_namespaces_stay_file_private() {
    let file = |path: &str| cpp(path, vec![Stmt::namespace("", vec![Stmt::field("int", "hidden")])]);
    let (model, root) = build(vec![file("a.cpp"), file("b.cpp")]);

    assert_eq!(model.descendants_of(root, StatementTag::Namespace).count(), 2);
}

#[test]
fn test_merge_order_does_not_change_names() {
    let units = || {
        vec![
            cpp("a.cpp", vec![Stmt::namespace("N", vec![TypeDecl::class("A").into()])]),
            cpp("b.cpp", vec![Stmt::namespace("N", vec![TypeDecl::class("B").into()])]),
            cpp("c.cpp", vec![Stmt::namespace("M", vec![TypeDecl::class("C").into()])]),
        ]
    };
    let names = |model: &CodeModel, root| {
        let mut names: Vec<String> = model
            .descendants(root)
            .map(|id| model.full_name(id))
            .collect();
        names.sort();
        names
    };

    // (a + b) + c
    let (left, left_root) = build(units());

    // a + (b + c)
    let mut right = CodeModel::new();
    let roots: Vec<_> = units()
        .into_iter()
        .map(|unit| right.parse_file_unit(unit).unwrap())
        .collect();
    let bc = right.merge(roots[1], roots[2]).unwrap();
    let right_root = right.merge(roots[0], bc).unwrap();

    assert_eq!(names(&left, left_root), names(&right, right_root));
}

#[test]
fn test_absorbed_root_forwards_to_receiver() {
    let mut model = CodeModel::new();
    let a = model.parse_file_unit(cpp("a.cpp", vec![])).unwrap();
    let b = model.parse_file_unit(cpp("b.cpp", vec![])).unwrap();
    model.merge(a, b).unwrap();

    assert_eq!(model.canonical(b), a);
    assert_eq!(model.roots().collect::<Vec<_>>(), vec![a]);
}

// =============================================================================
// TYPES AND MEMBERS
// =============================================================================

#[test]
fn test_partial_classes_union_members_and_parents() {
    let (model, root) = build(vec![
        csharp(
            "P1.cs",
            vec![TypeDecl::class("P")
                .partial()
                .extends(["IFirst"])
                .body(vec![Stmt::field("int", "a")])
                .into()],
        ),
        csharp(
            "P2.cs",
            vec![TypeDecl::class("P")
                .partial()
                .extends(["IFirst", "ISecond"])
                .body(vec![Stmt::field("int", "b")])
                .into()],
        ),
    ]);

    let p = statement_named(&model, root, "P");
    let def = model.statement(p).as_type().unwrap();
    assert!(def.is_partial);
    let parents: Vec<String> = def.parent_type_names.iter().map(|&e| model.type_text(e)).collect();
    assert_eq!(parents, vec!["IFirst", "ISecond"]);
    for &parent in &def.parent_type_names {
        assert_eq!(model.expression(parent).parent_statement, Some(p));
    }
    assert_eq!(model.children(p).len(), 2);
}

#[test]
fn test_overloads_stay_separate() {
    let (model, root) = build(vec![
        cpp(
            "a.cpp",
            vec![MethodDecl::new("f").param(VarDecl::of("int", "x")).body(vec![]).into()],
        ),
        cpp(
            "b.cpp",
            vec![MethodDecl::new("f").param(VarDecl::of("double", "x")).body(vec![]).into()],
        ),
    ]);

    assert_eq!(statements_named(&model, root, "f").len(), 2);
}

#[test]
fn test_prototype_adopts_definition_from_other_file() {
    let (model, root) = build(vec![
        cpp(
            "util.h",
            vec![MethodDecl::new("helper").returns("int").param(VarDecl::of("int", "x")).into()],
        ),
        cpp(
            "util.cpp",
            vec![MethodDecl::new("helper")
                .returns("int")
                .param(VarDecl::of("int", "y"))
                .body(vec![Stmt::ret(Some(Expr::var("y")))])
                .into()],
        ),
    ]);

    let helper = statement_named(&model, root, "helper");
    let stmt = model.statement(helper);
    assert_eq!(stmt.locations.len(), 2);
    assert!(!stmt.is_declaration_only());
    assert_eq!(model.children(helper).len(), 1);
    let body = model.children(helper)[0];
    assert_eq!(model.parent(body), Some(helper));
}

#[test]
fn test_two_definitions_keep_the_first_body() {
    let (model, root) = build(vec![
        cpp(
            "a.cpp",
            vec![MethodDecl::new("run").body(vec![Stmt::expr(Expr::call("first", vec![]))]).into()],
        ),
        cpp(
            "b.cpp",
            vec![MethodDecl::new("run").body(vec![Stmt::expr(Expr::call("second", vec![]))]).into()],
        ),
    ]);

    let run = statement_named(&model, root, "run");
    assert_eq!(model.statement(run).locations.len(), 2);
    assert_eq!(calls_named(&model, run, "first").len(), 1);
    assert!(calls_named(&model, run, "second").is_empty());
}

#[test]
fn test_property_adopts_missing_accessor() {
    let (model, root) = build(vec![
        csharp(
            "a.cs",
            vec![TypeDecl::class("A")
                .partial()
                .body(vec![PropertyDecl::new("int", "Size").getter(vec![]).into()])
                .into()],
        ),
        csharp(
            "b.cs",
            vec![TypeDecl::class("A")
                .partial()
                .body(vec![PropertyDecl::new("int", "Size").setter(vec![]).into()])
                .into()],
        ),
    ]);

    let size = statement_named(&model, root, "A.Size");
    let def = model.statement(size).as_property().unwrap();
    assert!(def.getter.is_some());
    let setter = def.setter.expect("setter adopted");
    assert_eq!(model.parent(setter), Some(size));
}

// =============================================================================
// PRECONDITIONS
// =============================================================================

#[test]
fn test_merge_rejects_invalid_operands() {
    let mut model = CodeModel::new();
    let a = model
        .parse_file_unit(cpp("a.cpp", vec![TypeDecl::class("T").into()]))
        .unwrap();
    let b = model.parse_file_unit(cpp("b.cpp", vec![])).unwrap();
    let class = model.children(a)[0];

    assert!(matches!(model.merge(a, a), Err(ModelError::InvalidMerge(_))));
    assert!(matches!(model.merge(a, class), Err(ModelError::NotANamespace(id)) if id == class));

    model.merge(a, b).unwrap();
    assert!(matches!(model.merge(a, b), Err(ModelError::InvalidMerge(_))));
}
