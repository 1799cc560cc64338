#![allow(clippy::unwrap_used, clippy::expect_used)]

use molang_diagnostic::ErrorCode;
use molang_ir::{BinaryOp, ExprKind, MathFn, ScopeKind};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use crate::{resolve, ResolvedProgram, SemanticError};

fn resolve_src(source: &str) -> Result<ResolvedProgram, SemanticError> {
    let tokens = molang_lexer::lex(source).unwrap();
    let parsed = molang_parse::parse(&tokens).unwrap();
    resolve(parsed)
}

fn root_kind(source: &str) -> ExprKind {
    let program = resolve_src(source).unwrap();
    program.arena().get_expr(program.root()).kind
}

fn folded(source: &str) -> f64 {
    match root_kind(source) {
        ExprKind::Number(n) => n,
        other => panic!("`{source}` did not fold: {other:?}"),
    }
}

fn error_code(source: &str) -> ErrorCode {
    resolve_src(source).unwrap_err().code()
}

#[test]
fn test_paths_become_scoped() {
    let program = resolve_src("v.speed").unwrap();
    let ExprKind::Scoped { scope, members } = program.arena().get_expr(program.root()).kind else {
        panic!("expected scoped path");
    };
    assert_eq!(scope, ScopeKind::Variable);
    assert_eq!(program.arena().path_text(members), "speed");
}

#[test]
fn test_deep_paths_keep_all_members() {
    let program = resolve_src("query.entity.position.x").unwrap();
    let ExprKind::Scoped { scope, members } = program.arena().get_expr(program.root()).kind else {
        panic!("expected scoped path");
    };
    assert_eq!(scope, ScopeKind::Query);
    assert_eq!(program.arena().path_text(members), "entity.position.x");
}

#[test]
fn test_unknown_scope() {
    let err = resolve_src("unknown_scope.x").unwrap_err();
    assert_eq!(err.code(), ErrorCode::E2001);
    assert_eq!(err.to_string(), "unknown scope `unknown_scope`");
    assert_eq!(error_code("foo"), ErrorCode::E2001);
}

#[test]
fn test_scope_without_member() {
    assert_eq!(error_code("variable"), ErrorCode::E2002);
    assert_eq!(error_code("t = 1"), ErrorCode::E2002);
}

#[test]
fn test_unknown_builtin() {
    let err = resolve_src("math.tan(1)").unwrap_err();
    assert_eq!(err.code(), ErrorCode::E2003);
    assert_eq!(err.to_string(), "unknown math member `math.tan`");
    assert_eq!(error_code("math.e"), ErrorCode::E2003);
}

#[test]
fn test_arity_mismatch() {
    let err = resolve_src("math.clamp(1, 2)").unwrap_err();
    assert_eq!(err.code(), ErrorCode::E2004);
    assert_eq!(
        err.to_string(),
        "`math.clamp` expects 3 argument(s), found 2"
    );
    assert_eq!(error_code("math.sqrt()"), ErrorCode::E2004);
}

#[test]
fn test_invalid_assignment_targets() {
    assert_eq!(error_code("math.pi = 3"), ErrorCode::E2005);
    assert_eq!(error_code("1 = 2"), ErrorCode::E2005);
    assert_eq!(error_code("for_each(1, q.list, { })"), ErrorCode::E2005);
}

#[test]
fn test_control_outside_loop() {
    let err = resolve_src("break").unwrap_err();
    assert_eq!(err.code(), ErrorCode::E2006);
    assert_eq!(err.to_string(), "`break` outside of a loop");
    assert_eq!(error_code("t.a = 1; continue;"), ErrorCode::E2006);
    assert!(resolve_src("loop(2, { v.a ? break; continue; })").is_ok());
    assert!(resolve_src("for_each(t.x, q.list, { break; })").is_ok());
}

#[test]
fn test_builtin_misuse() {
    assert_eq!(error_code("math.pi()"), ErrorCode::E2007);
    assert_eq!(error_code("math.sqrt"), ErrorCode::E2007);
    assert_eq!(error_code("math.sqrt.x"), ErrorCode::E2007);
}

#[test]
fn test_first_error_wins() {
    let err = resolve_src("foo.a + math.nope(1)").unwrap_err();
    assert_eq!(err.code(), ErrorCode::E2001);
}

#[test]
fn test_host_members_are_not_checked() {
    assert!(resolve_src("query.anything_at_all(1, 2, 3)").is_ok());
    assert!(resolve_src("c.owner.item.count").is_ok());
}

#[test]
fn test_folds_arithmetic() {
    assert_eq!(folded("1 + 2 * 3"), 7.0);
    assert_eq!(folded("-(4 - 6)"), 2.0);
    assert_eq!(folded("3 > 2 && 1"), 1.0);
    assert!(folded("1 / 0").is_infinite());
}

#[test]
fn test_folds_pure_math() {
    assert_eq!(folded("math.sqrt(9)"), 3.0);
    assert_eq!(folded("math.clamp(10, 0, 5)"), 5.0);
    assert_eq!(folded("math.abs(-20) + math.floor(2.5)"), 22.0);
    assert!((folded("math.pi") - std::f64::consts::PI).abs() < 1e-12);
}

#[test]
fn test_folds_literal_conditions() {
    assert_eq!(folded("1 ? 10 : 20"), 10.0);
    assert_eq!(folded("0 ? 10 : 20"), 20.0);
    assert_eq!(folded("1 ? 5"), 5.0);
    assert_eq!(folded("0 ? 5"), 0.0);
    assert_eq!(folded("false ? 200 * 500"), 0.0);
    assert!(matches!(root_kind("v.x ? 5"), ExprKind::Conditional { .. }));
}

#[test]
fn test_short_circuit_folding() {
    assert_eq!(folded("0 && v.x"), 0.0);
    assert_eq!(folded("2 || v.x"), 1.0);
    assert_eq!(folded("4 ?? v.x"), 4.0);
    assert!(matches!(
        root_kind("1 && v.x"),
        ExprKind::Binary {
            op: BinaryOp::And,
            ..
        }
    ));
}

#[test]
fn test_random_is_not_folded() {
    assert!(matches!(
        root_kind("math.random(0, 1)"),
        ExprKind::MathCall {
            func: MathFn::Random,
            ..
        }
    ));
    assert!(matches!(root_kind("math.die_roll(1, 1, 6)"), ExprKind::MathCall { .. }));
}

#[test]
fn test_scoped_operands_are_not_folded() {
    assert!(matches!(root_kind("v.a + 1"), ExprKind::Binary { .. }));
    assert!(matches!(root_kind("math.sqrt(q.x)"), ExprKind::MathCall { .. }));
}

#[test]
fn test_diagnostic_carries_code_and_span() {
    let err = resolve_src("1 + unknown_scope.x").unwrap_err();
    let diag = err.to_diagnostic();
    assert_eq!(diag.code, ErrorCode::E2001);
    let span = diag.primary_span().unwrap();
    assert_eq!((span.start, span.end), (4, 19));
}

proptest! {
    #[test]
    fn folding_matches_operator_semantics(
        a in -1000.0f64..1000.0,
        b in -1000.0f64..1000.0,
        op_index in 0usize..11,
    ) {
        let ops = [
            BinaryOp::Add,
            BinaryOp::Sub,
            BinaryOp::Mul,
            BinaryOp::Div,
            BinaryOp::Eq,
            BinaryOp::NotEq,
            BinaryOp::Lt,
            BinaryOp::LtEq,
            BinaryOp::Gt,
            BinaryOp::GtEq,
            BinaryOp::Or,
        ];
        let op = ops[op_index];
        // Parenthesize so negative literals stay unary operands.
        let source = format!("({a}) {} ({b})", op.symbol());
        let expected = op.apply_numeric(a, b);
        let actual = folded(&source);
        prop_assert!(
            actual == expected || (actual.is_nan() && expected.is_nan()),
            "{source}: {actual} != {expected}"
        );
    }
}
