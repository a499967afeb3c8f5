use vistrace_ast::ast::{BinOp, BoolOp, CmpOp, Expr, Lit, Stmt};
use vistrace_parse::parse_str;

/// Helper: parse an assignment and return its value expression
fn parse_expr_only(src: &str) -> Expr {
    let m = parse_str("<mem>", &format!("x = {src}\n")).expect("parse ok");
    let Stmt::Assign { value, .. } = &m.body[0] else {
        panic!("expected Assign");
    };
    value.clone()
}

// ============ Literals ============

#[test]
fn int_and_float_literals() {
    assert!(matches!(parse_expr_only("42"), Expr::Lit(Lit::Int(42), _)));
    let Expr::Lit(Lit::Float(f), _) = parse_expr_only("2.5") else {
        panic!("expected Float");
    };
    assert_eq!(f, 2.5);
}

#[test]
fn negative_literals_fold() {
    assert!(matches!(parse_expr_only("-7"), Expr::Lit(Lit::Int(-7), _)));
    let Expr::Lit(Lit::Float(f), _) = parse_expr_only("-1.5") else {
        panic!("expected Float");
    };
    assert_eq!(f, -1.5);
}

#[test]
fn string_literals_either_quote() {
    let Expr::Lit(Lit::Str(s), _) = parse_expr_only("'hi'") else {
        panic!("expected Str");
    };
    assert_eq!(s, "hi");
    let Expr::Lit(Lit::Str(s), _) = parse_expr_only("\"there\"") else {
        panic!("expected Str");
    };
    assert_eq!(s, "there");
}

#[test]
fn bool_literals() {
    assert!(matches!(
        parse_expr_only("True"),
        Expr::Lit(Lit::Bool(true), _)
    ));
    assert!(matches!(
        parse_expr_only("False"),
        Expr::Lit(Lit::Bool(false), _)
    ));
}

#[test]
fn list_display() {
    let Expr::List { elts, .. } = parse_expr_only("[1, a, 2 + 3]") else {
        panic!("expected List");
    };
    assert_eq!(elts.len(), 3);
    assert!(matches!(&elts[1], Expr::Var(_)));
}

// ============ Precedence ============

#[test]
fn multiplication_binds_tighter_than_addition() {
    let Expr::Binary { op, rhs, .. } = parse_expr_only("1 + 2 * 3") else {
        panic!("expected Binary");
    };
    assert_eq!(op, BinOp::Add);
    assert!(matches!(
        *rhs,
        Expr::Binary {
            op: BinOp::Mul,
            ..
        }
    ));
}

#[test]
fn parens_regroup() {
    let Expr::Binary { op, lhs, .. } = parse_expr_only("(1 + 2) * 3") else {
        panic!("expected Binary");
    };
    assert_eq!(op, BinOp::Mul);
    assert!(matches!(
        *lhs,
        Expr::Binary {
            op: BinOp::Add,
            ..
        }
    ));
}

#[test]
fn floor_division_token() {
    let Expr::Binary { op, .. } = parse_expr_only("7 // 2") else {
        panic!("expected Binary");
    };
    assert_eq!(op, BinOp::FloorDiv);
}

#[test]
fn comparison_binds_looser_than_arithmetic() {
    let Expr::Compare { op, lhs, .. } = parse_expr_only("a + 1 == 5") else {
        panic!("expected Compare");
    };
    assert_eq!(op, CmpOp::Eq);
    assert!(matches!(*lhs, Expr::Binary { .. }));
}

#[test]
fn and_binds_tighter_than_or() {
    let Expr::Bool { op, lhs, .. } = parse_expr_only("a == 1 and b == 2 or c == 3") else {
        panic!("expected Bool");
    };
    assert_eq!(op, BoolOp::Or);
    assert!(matches!(
        *lhs,
        Expr::Bool {
            op: BoolOp::And,
            ..
        }
    ));
}

#[test]
fn all_comparison_operators() {
    for (src, expect) in [
        ("a == b", CmpOp::Eq),
        ("a != b", CmpOp::Ne),
        ("a < b", CmpOp::Lt),
        ("a <= b", CmpOp::Le),
        ("a > b", CmpOp::Gt),
        ("a >= b", CmpOp::Ge),
    ] {
        let Expr::Compare { op, .. } = parse_expr_only(src) else {
            panic!("expected Compare for {src}");
        };
        assert_eq!(op, expect, "for {src}");
    }
}

// ============ Calls ============

#[test]
fn call_with_arguments() {
    let Expr::Call { callee, args, .. } = parse_expr_only("range(0, 10, 2)") else {
        panic!("expected Call");
    };
    assert_eq!(callee.text, "range");
    assert_eq!(args.len(), 3);
}

#[test]
fn unary_minus_needs_a_number() {
    assert!(parse_str("<mem>", "x = -a\n").is_err());
}
