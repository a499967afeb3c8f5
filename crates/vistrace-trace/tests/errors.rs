//! Every abort path: the error reported and the prefix kept.

use vistrace_parse::parse_str;
use vistrace_trace::{synthesize, StepKind, TraceAbort, TraceError};

fn trace_err(src: &str) -> TraceAbort {
    let program = parse_str("<mem>", src).expect("parse ok");
    synthesize(&program).expect_err("synthesis should fail")
}

// ============ Undefined names ============

#[test]
fn undefined_variable_in_an_expression() {
    let abort = trace_err("a = b + 1\n");
    assert_eq!(abort.error, TraceError::UndefinedVariable("b".into()));
    assert!(abort.steps.is_empty());
}

#[test]
fn undefined_variable_in_a_guard() {
    let abort = trace_err("if flag:\n    pass\n");
    assert_eq!(abort.error, TraceError::UndefinedVariable("flag".into()));
}

#[test]
fn branch_bindings_stay_visible_but_order_still_matters() {
    // `b` is only assigned on the branch that never runs
    let src = "\
if 1 > 2:
    b = 1
print(b)
";
    let abort = trace_err(src);
    assert_eq!(abort.error, TraceError::UndefinedVariable("b".into()));
    // the guard frames made it into the prefix
    assert_eq!(abort.steps.len(), 2);
}

// ============ Unsupported statements ============

#[test]
fn calling_anything_but_print_as_a_statement() {
    let abort = trace_err("foo(1)\n");
    let TraceError::UnsupportedStatement(what) = abort.error else {
        panic!("expected UnsupportedStatement, got {:?}", abort.error);
    };
    assert!(what.contains("foo"));
}

#[test]
fn bare_expression_statement() {
    let abort = trace_err("a = 1\na + 2\n");
    assert!(matches!(abort.error, TraceError::UnsupportedStatement(_)));
    assert_eq!(abort.steps.len(), 1);
}

#[test]
fn top_level_break() {
    let abort = trace_err("a = 1\nbreak\n");
    let TraceError::UnsupportedStatement(what) = abort.error else {
        panic!("expected UnsupportedStatement, got {:?}", abort.error);
    };
    assert!(what.contains("break"));
    // the break marker itself was already recorded
    assert_eq!(
        abort.steps.steps().last().map(|s| &s.kind),
        Some(&StepKind::Break)
    );
}

// ============ Unsupported expressions ============

#[test]
fn comparison_on_the_right_of_an_assignment() {
    let abort = trace_err("a = 1 < 2\n");
    assert!(matches!(abort.error, TraceError::UnsupportedExpression(_)));
}

#[test]
fn call_in_value_position() {
    let abort = trace_err("a = range(3)\n");
    let TraceError::UnsupportedExpression(what) = abort.error else {
        panic!("expected UnsupportedExpression, got {:?}", abort.error);
    };
    assert!(what.contains("range"));
}

// ============ Malformed loops ============

#[test]
fn for_loop_needs_a_range_call() {
    let abort = trace_err("a = 1\nfor i in a:\n    pass\n");
    assert!(matches!(abort.error, TraceError::InvalidLoopArguments(_)));
}

#[test]
fn for_loop_over_a_list_display() {
    let abort = trace_err("for i in [1, 2]:\n    pass\n");
    assert!(matches!(abort.error, TraceError::InvalidLoopArguments(_)));
}

#[test]
fn range_rejects_a_zero_step() {
    let abort = trace_err("for i in range(0, 5, 0):\n    pass\n");
    let TraceError::InvalidLoopArguments(what) = abort.error else {
        panic!("expected InvalidLoopArguments, got {:?}", abort.error);
    };
    assert!(what.contains("step"));
}

#[test]
fn range_rejects_an_unbound_argument() {
    let abort = trace_err("for i in range(n):\n    pass\n");
    let TraceError::InvalidLoopArguments(what) = abort.error else {
        panic!("expected InvalidLoopArguments, got {:?}", abort.error);
    };
    assert!(what.contains('n'));
}

#[test]
fn range_rejects_a_non_integer_argument() {
    let abort = trace_err("n = 2.5\nfor i in range(n):\n    pass\n");
    assert!(matches!(abort.error, TraceError::InvalidLoopArguments(_)));
    assert_eq!(abort.steps.len(), 1);
}

#[test]
fn range_rejects_an_expression_argument() {
    let abort = trace_err("for i in range(1 + 2):\n    pass\n");
    assert!(matches!(abort.error, TraceError::InvalidLoopArguments(_)));
}

#[test]
fn range_rejects_four_arguments() {
    let abort = trace_err("for i in range(0, 1, 2, 3):\n    pass\n");
    assert!(matches!(abort.error, TraceError::InvalidLoopArguments(_)));
}

// ============ Arithmetic ============

#[test]
fn division_by_zero() {
    let abort = trace_err("a = 1\nb = a / 0\n");
    assert_eq!(abort.error, TraceError::DivisionByZero);
    assert_eq!(abort.steps.len(), 1);
}

#[test]
fn floor_division_by_zero() {
    let abort = trace_err("a = 7 // 0\n");
    assert_eq!(abort.error, TraceError::DivisionByZero);
}

#[test]
fn mismatched_operand_types() {
    let abort = trace_err("a = 'x' - 1\n");
    assert!(matches!(abort.error, TraceError::UnsupportedOperator(_)));
}

#[test]
fn ordering_comparison_across_types() {
    let abort = trace_err("if 'x' < 1:\n    pass\n");
    assert!(matches!(abort.error, TraceError::UnsupportedOperator(_)));
}

// ============ Failures inside loops keep the prefix ============

#[test]
fn failure_mid_loop_keeps_earlier_iterations() {
    let src = "\
for i in range(3):
    a = 10 / i
";
    // first iteration divides by zero immediately
    let abort = trace_err(src);
    assert_eq!(abort.error, TraceError::DivisionByZero);
    assert_eq!(abort.steps.len(), 1);
    assert!(matches!(
        abort.steps.steps()[0].kind,
        StepKind::ForFrame { .. }
    ));
}

#[test]
fn error_display_names_the_failure() {
    let abort = trace_err("a = b\n");
    let msg = abort.to_string();
    assert!(msg.contains("trace aborted after 0 steps"));
    assert!(msg.contains("undefined variable 'b'"));
}
