use vistrace_ast::ast::{Expr, Lit, Stmt};
use vistrace_parse::parse_str;

fn parse_program(src: &str) -> Vec<Stmt> {
    parse_str("<mem>", src).expect("parse ok").body
}

// ============ Assignment ============

#[test]
fn assignment_statement() {
    let body = parse_program("a = 1\n");
    assert_eq!(body.len(), 1);
    let Stmt::Assign { target, value, line, .. } = &body[0] else {
        panic!("expected Assign");
    };
    assert_eq!(target.text, "a");
    assert!(matches!(value, Expr::Lit(Lit::Int(1), _)));
    assert_eq!(*line, 1);
}

#[test]
fn assignment_target_must_be_a_variable() {
    assert!(parse_str("<mem>", "1 = 2\n").is_err());
}

#[test]
fn reassignment_parses_as_two_statements() {
    let body = parse_program("a = 1\na = a + 1\n");
    assert_eq!(body.len(), 2);
    assert!(matches!(&body[1], Stmt::Assign { .. }));
}

// ============ Expression statements ============

#[test]
fn print_call_statement() {
    let body = parse_program("print(1 + 2)\n");
    let Stmt::Expr { expr, .. } = &body[0] else {
        panic!("expected Expr statement");
    };
    let Expr::Call { callee, args, .. } = expr else {
        panic!("expected Call");
    };
    assert_eq!(callee.text, "print");
    assert_eq!(args.len(), 1);
}

#[test]
fn print_with_multiple_arguments() {
    let body = parse_program("print(a, b)\n");
    let Stmt::Expr {
        expr: Expr::Call { args, .. },
        ..
    } = &body[0]
    else {
        panic!("expected Call statement");
    };
    assert_eq!(args.len(), 2);
}

// ============ If / elif / else ============

#[test]
fn if_chain_is_flattened() {
    let src = "if a > 1:\n    pass\nelif a > 2:\n    pass\nelse:\n    pass\n";
    let body = parse_program(src);
    let Stmt::If {
        branches, orelse, ..
    } = &body[0]
    else {
        panic!("expected If");
    };
    assert_eq!(branches.len(), 2);
    assert_eq!(branches[0].line, 1);
    assert_eq!(branches[1].line, 3);
    let orelse = orelse.as_ref().expect("expected else");
    assert_eq!(orelse.line, 5);
    assert_eq!(orelse.body.len(), 1);
}

#[test]
fn if_without_else() {
    let body = parse_program("if a == 1:\n    pass\n");
    let Stmt::If {
        branches, orelse, ..
    } = &body[0]
    else {
        panic!("expected If");
    };
    assert_eq!(branches.len(), 1);
    assert!(orelse.is_none());
    assert!(matches!(branches[0].test, Expr::Compare { .. }));
}

// ============ Loops ============

#[test]
fn for_loop_over_range() {
    let body = parse_program("for i in range(3):\n    pass\n");
    let Stmt::For {
        target, iter, body, ..
    } = &body[0]
    else {
        panic!("expected For");
    };
    assert_eq!(target.text, "i");
    let Expr::Call { callee, args, .. } = iter else {
        panic!("expected range call");
    };
    assert_eq!(callee.text, "range");
    assert_eq!(args.len(), 1);
    assert_eq!(body.len(), 1);
}

#[test]
fn while_loop() {
    let body = parse_program("while n > 0:\n    n = n - 1\n");
    let Stmt::While { cond, body, .. } = &body[0] else {
        panic!("expected While");
    };
    assert!(matches!(cond, Expr::Compare { .. }));
    assert_eq!(body.len(), 1);
}

#[test]
fn break_and_pass() {
    let body = parse_program("while True:\n    break\npass\n");
    let Stmt::While { body: loop_body, .. } = &body[0] else {
        panic!("expected While");
    };
    assert!(matches!(&loop_body[0], Stmt::Break { line: 2, .. }));
    assert!(matches!(&body[1], Stmt::Pass { line: 3, .. }));
}

// ============ Lines ============

#[test]
fn statement_lines_are_one_based() {
    let body = parse_program("a = 1\nb = 2\n\nc = 3\n");
    let lines: Vec<u32> = body.iter().map(Stmt::line).collect();
    assert_eq!(lines, vec![1, 2, 4]);
}

#[test]
fn nested_statement_lines() {
    let src = "for i in range(2):\n    if i == 1:\n        break\n";
    let body = parse_program(src);
    let Stmt::For { body: loop_body, .. } = &body[0] else {
        panic!("expected For");
    };
    let Stmt::If { branches, .. } = &loop_body[0] else {
        panic!("expected If");
    };
    assert_eq!(branches[0].line, 2);
    assert!(matches!(&branches[0].body[0], Stmt::Break { line: 3, .. }));
}
