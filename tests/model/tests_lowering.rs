//! Lowering contract tests: node shapes, locations and input validation.

use rstest::rstest;
use srcgraph::base::SourceRange;
use srcgraph::model::{CodeModel, ExprKind, StatementKind};
use srcgraph::syntax::{
    CatchClause, Expr, FileUnit, FrontEnd, Language, MethodDecl, PropertyDecl, Stmt, TypeDecl,
    TypeRef, VarDecl,
};
use srcgraph::ModelError;

use crate::helpers::model_helpers::*;

// =============================================================================
// GENERIC TYPE USES
// =============================================================================

#[rstest]
#[case("vector", false)]
#[case("std::vector", true)]
fn test_generic_variable_type(#[case] type_name: &str, #[case] has_prefix: bool) {
    let ty = TypeRef::parse(type_name).with_arguments([TypeRef::new("int")]);
    let (model, root) = build_one(cpp(
        "generic.cpp",
        vec![Stmt::declare_typed(ty, "a", None)],
    ));

    let decl = declaration_named(&model, root, "a");
    let variable_type = model
        .expression(decl)
        .as_declaration()
        .and_then(|d| d.variable_type)
        .expect("declaration carries its type");
    let ty = model.expression(variable_type);

    assert!(ty.is_generic());
    assert_eq!(ty.name(), Some("vector"));
    assert_eq!(ty.type_parameters().len(), 1);
    assert_eq!(model.expression(ty.type_parameters()[0]).name(), Some("int"));
    assert_eq!(ty.prefix().is_some(), has_prefix);
}

// =============================================================================
// STATEMENT SHAPES
// =============================================================================

#[test]
fn test_every_expression_has_owner_and_location() {
    let (model, root) = build_one(csharp(
        "Shapes.cs",
        vec![TypeDecl::class("A")
            .body(vec![MethodDecl::new("Run")
                .param(VarDecl::of("int", "n"))
                .body(vec![
                    Stmt::for_loop(
                        Some(Expr::decl(VarDecl::of("int", "i").init(Expr::int(0)))),
                        Some(Expr::compound(vec![Expr::var("i"), Expr::op("<"), Expr::var("n")])),
                        Some(Expr::compound(vec![Expr::var("i"), Expr::op("++")])),
                        vec![Stmt::expr(Expr::call("Print", vec![Expr::var("i")]))],
                    )
                    .at(SourceRange::from_coords(3, 9, 5, 10)),
                ])
                .into()])
            .into()],
    ));

    let file = model.files().get("Shapes.cs").expect("file interned");
    let mut seen = 0;
    for expr in model.all_expressions(root) {
        let node = model.expression(expr);
        assert!(node.parent_statement.is_some(), "{:?} has no owning statement", expr);
        assert_eq!(node.location.file, file);
        seen += 1;
    }
    assert!(seen > 8);

    let for_stmt = model
        .descendants(root)
        .find(|&s| matches!(model.statement(s).kind, StatementKind::For { .. }))
        .expect("for statement lowered");
    let loop_var = declaration_named(&model, root, "i");
    assert_eq!(model.declared_variables(for_stmt), vec![loop_var]);
    // Unranged expressions inherit the statement's range.
    assert_eq!(
        model.expression(loop_var).location.range,
        Some(SourceRange::from_coords(3, 9, 5, 10))
    );
}

#[rstest]
#[case(SourceRange::from_coords(1, 1, 4, 2))]
#[case(SourceRange::from_offsets(0, 42))]
fn test_both_positional_schemes_are_kept(#[case] range: SourceRange) {
    let (model, root) = build_one(cpp(
        "ranges.cpp",
        vec![Stmt::from(TypeDecl::class("A")).at(range)],
    ));

    let a = statement_named(&model, root, "A");
    assert_eq!(model.statement(a).locations[0].range, Some(range));
}

#[test]
fn test_try_catch_and_finally_lists() {
    let (model, root) = build_one(csharp(
        "Try.cs",
        vec![MethodDecl::new("Run")
            .body(vec![Stmt::try_catch(
                vec![Stmt::expr(Expr::call("Work", vec![]))],
                vec![CatchClause::new(
                    Some(VarDecl::of("Exception", "e")),
                    vec![Stmt::expr(Expr::var("e"))],
                )],
                vec![Stmt::expr(Expr::call("Cleanup", vec![]))],
            )])
            .into()],
    ));

    let try_stmt = model
        .descendants(root)
        .find(|&s| matches!(model.statement(s).kind, StatementKind::Try { .. }))
        .expect("try statement lowered");
    let StatementKind::Try {
        catch_statements,
        finally_statements,
    } = &model.statement(try_stmt).kind
    else {
        unreachable!()
    };
    assert_eq!(model.children(try_stmt).len(), 1);
    assert_eq!(catch_statements.len(), 1);
    assert_eq!(finally_statements.len(), 1);
    assert_eq!(model.parent(catch_statements[0]), Some(try_stmt));
    assert_eq!(model.parent(finally_statements[0]), Some(try_stmt));
    assert_eq!(
        model.declared_variables(catch_statements[0]),
        vec![declaration_named(&model, root, "e")]
    );
}

#[test]
fn test_property_accessors_are_owned_not_children() {
    let (model, root) = build_one(csharp(
        "Prop.cs",
        vec![TypeDecl::class("A")
            .body(vec![PropertyDecl::new("int", "Count")
                .getter(vec![Stmt::ret(Some(Expr::int(1)))])
                .setter(vec![])
                .into()])
            .into()],
    ));

    let prop = statement_named(&model, root, "A.Count");
    let def = model.statement(prop).as_property().expect("property");
    assert!(model.children(prop).is_empty());
    assert_eq!(model.owned_statements(prop).len(), 2);
    let setter = def.setter.expect("setter lowered");
    assert_eq!(model.parent(setter), Some(prop));
    assert_eq!(model.declared_variables(setter).len(), 1);
}

#[test]
fn test_foreach_header_declares_loop_variable() {
    let (model, root) = build_one(csharp(
        "Loop.cs",
        vec![MethodDecl::new("Run")
            .body(vec![Stmt::foreach(
                VarDecl::of("var", "item"),
                Expr::var("items"),
                vec![Stmt::expr(Expr::var("item"))],
            )])
            .into()],
    ));

    let item = declaration_named(&model, root, "item");
    let header = model.expression(item).parent_expression.expect("inside the header");
    assert!(matches!(model.expression(header).kind, ExprKind::Compound));
}

// =============================================================================
// VALIDATION
// =============================================================================

#[rstest]
#[case(MethodDecl::new("").into(), "method")]
#[case(TypeDecl::class("").into(), "type")]
#[case(PropertyDecl::new("int", "").into(), "property")]
fn test_unnamed_declarations_are_rejected(#[case] stmt: Stmt, #[case] kind: &str) {
    let mut model = CodeModel::new();
    let err = model
        .parse_file_unit(cpp("bad.cpp", vec![stmt]))
        .expect_err("an unnamed declaration must be rejected");
    match err {
        ModelError::MissingName { kind: found, file } => {
            assert_eq!(found, kind);
            assert_eq!(file, "bad.cpp");
        }
        other => panic!("Expected MissingName, got {:?}", other),
    }
}

#[test]
fn test_empty_alias_target_is_rejected() {
    let mut model = CodeModel::new();
    let err = model
        .parse_file_unit(csharp("bad.cs", vec![Stmt::alias("X", "")]))
        .expect_err("an empty alias target must be rejected");
    assert!(matches!(err, ModelError::EmptyChain { .. }));
}

#[test]
fn test_rejected_unit_leaves_model_untouched() {
    let mut model = CodeModel::new();
    let before = model.statement_count();
    let _ = model.parse_file_unit(cpp("bad.cpp", vec![MethodDecl::new("").into()]));
    assert_eq!(model.statement_count(), before);
    assert_eq!(model.roots().count(), 0);
}

// =============================================================================
// FRONT-ENDS
// =============================================================================

/// One class per whitespace-separated word; anything but identifiers is rejected.
struct WordsFrontEnd;

impl FrontEnd for WordsFrontEnd {
    type Source = str;

    fn language(&self) -> Language {
        Language::CSharp
    }

    fn translate(&self, path: &str, source: &str) -> srcgraph::Result<FileUnit> {
        let statements = source
            .split_whitespace()
            .map(|word| {
                if word.chars().all(|c| c.is_alphanumeric() || c == '_') {
                    Ok(Stmt::from(TypeDecl::class(word)))
                } else {
                    Err(ModelError::front_end(format!("bad identifier `{word}` in {path}")))
                }
            })
            .collect::<srcgraph::Result<Vec<_>>>()?;
        Ok(FileUnit::new(path, self.language()).with(statements))
    }
}

#[test]
fn test_parse_with_front_end_builds_tree() {
    let mut model = CodeModel::new();
    let root = model
        .parse_with(&WordsFrontEnd, "Shapes.cs", "Circle Square")
        .expect("valid input");

    let names: Vec<_> = model
        .children(root)
        .iter()
        .filter_map(|&c| model.statement(c).name())
        .collect();
    assert_eq!(names, ["Circle", "Square"]);
}

#[test]
fn test_parse_with_propagates_front_end_errors() {
    let mut model = CodeModel::new();
    let err = model
        .parse_with(&WordsFrontEnd, "Shapes.cs", "Circle 2-D")
        .expect_err("the front-end rejects `2-D`");

    assert!(matches!(err, ModelError::FrontEnd(_)));
    assert_eq!(err.to_string(), "front-end error: bad identifier `2-D` in Shapes.cs");
    assert_eq!(model.roots().count(), 0);
}
