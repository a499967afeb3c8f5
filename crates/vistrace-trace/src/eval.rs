//! Expression and condition evaluators.
//!
//! Evaluation is bottom-up and returns both the computed value and the
//! substitution history: the expression's source text, one fully
//! substituted stage when it references variables, and the result text.

use vistrace_ast::ast::{BinOp, CmpOp, Expr};

use crate::env::Env;
use crate::error::TraceError;
use crate::history::{
    contains_var, needs_parens, precedence, render_lit, render_substituted, transpose_last_fill,
    wrap, History,
};
use crate::value::Value;

/// Evaluate a value expression (constant, variable, arithmetic, list).
///
/// History contract: two stages for a constant-only expression or a bare
/// variable, three for a composite expression referencing variables.
pub fn evaluate(env: &Env, expr: &Expr) -> Result<(Value, History), TraceError> {
    let (value, mut stages) = value_stages(env, expr)?;
    if matches!(expr, Expr::Var(_)) {
        // substituted and result stages coincide for a bare name
        stages.push(value.to_string());
    } else {
        if contains_var(expr) {
            stages.push(render_substituted(expr, env)?);
        }
        stages.push(value.to_string());
    }
    Ok((value, stages))
}

/// Evaluate a boolean guard. The final stage is literally `True` or
/// `False`. Both operands of `and`/`or` are always evaluated: the trace
/// must show every sub-evaluation, so no short-circuiting.
pub fn evaluate_condition(env: &Env, expr: &Expr) -> Result<(bool, History), TraceError> {
    let (value, mut stages) = cond_stages(env, expr)?;
    let result = value.truthy();
    if contains_var(expr) {
        stages.push(render_substituted(expr, env)?);
    }
    stages.push(if result { "True" } else { "False" }.to_string());
    Ok((result, stages))
}

/// Recursive core for value expressions: (value, per-node stage list).
/// Stage lists carry no substituted/result stages yet; those are
/// finalized once for the whole expression.
fn value_stages(env: &Env, expr: &Expr) -> Result<(Value, Vec<String>), TraceError> {
    match expr {
        Expr::Lit(lit, _) => {
            let value = match lit {
                vistrace_ast::ast::Lit::Int(v) => Value::Int(*v),
                vistrace_ast::ast::Lit::Float(v) => Value::Float(*v),
                vistrace_ast::ast::Lit::Str(s) => Value::Str(s.clone()),
                vistrace_ast::ast::Lit::Bool(b) => Value::Bool(*b),
            };
            Ok((value, vec![render_lit(lit)]))
        }
        Expr::Var(id) => Ok((env.get(&id.text)?.clone(), vec![id.text.clone()])),
        Expr::Binary { lhs, op, rhs, .. } => {
            let (lv, ls) = value_stages(env, lhs)?;
            let (rv, rs) = value_stages(env, rhs)?;
            let value = bin_value(*op, &lv, &rv)?;
            let stages = join_stages(expr, lhs, ls, op.symbol(), rhs, rs);
            Ok((value, stages))
        }
        Expr::List { elts, .. } => {
            let mut values = Vec::with_capacity(elts.len());
            let mut stage_lists = Vec::with_capacity(elts.len());
            for elt in elts {
                let (v, s) = value_stages(env, elt)?;
                values.push(v);
                stage_lists.push(s);
            }
            let stages = transpose_last_fill(&stage_lists)
                .into_iter()
                .map(|row| format!("[{}]", row.join(", ")))
                .collect();
            Ok((Value::List(values), stages))
        }
        Expr::Compare { .. } | Expr::Bool { .. } => Err(TraceError::UnsupportedExpression(
            "comparison outside a condition guard".to_string(),
        )),
        Expr::Call { callee, .. } => Err(TraceError::UnsupportedExpression(format!(
            "call to '{}' in value position",
            callee.text
        ))),
    }
}

/// Recursive core for guards: comparisons and `and`/`or` on top of the
/// value-expression forms.
fn cond_stages(env: &Env, expr: &Expr) -> Result<(Value, Vec<String>), TraceError> {
    match expr {
        Expr::Compare { lhs, op, rhs, .. } => {
            let (lv, ls) = value_stages(env, lhs)?;
            let (rv, rs) = value_stages(env, rhs)?;
            let result = cmp_value(*op, &lv, &rv)?;
            let stages = join_stages(expr, lhs, ls, op.symbol(), rhs, rs);
            Ok((Value::Bool(result), stages))
        }
        Expr::Bool { lhs, op, rhs, .. } => {
            // both sides evaluated unconditionally
            let (lv, ls) = cond_stages(env, lhs)?;
            let (rv, rs) = cond_stages(env, rhs)?;
            let result = match op {
                vistrace_ast::ast::BoolOp::And => lv.truthy() && rv.truthy(),
                vistrace_ast::ast::BoolOp::Or => lv.truthy() || rv.truthy(),
            };
            let stages = join_stages(expr, lhs, ls, op.symbol(), rhs, rs);
            Ok((Value::Bool(result), stages))
        }
        _ => value_stages(env, expr),
    }
}

/// Pairwise last-fill combination of two operand stage lists, joined with
/// the literal operator symbol. Operand stages are parenthesized exactly
/// where the source rendering would be.
fn join_stages(
    parent: &Expr,
    lhs: &Expr,
    ls: Vec<String>,
    sym: &str,
    rhs: &Expr,
    rs: Vec<String>,
) -> Vec<String> {
    let prec = precedence(parent);
    let ls: Vec<String> = ls
        .into_iter()
        .map(|s| wrap(s, needs_parens(lhs, prec, false)))
        .collect();
    let rs: Vec<String> = rs
        .into_iter()
        .map(|s| wrap(s, needs_parens(rhs, prec, true)))
        .collect();
    transpose_last_fill(&[ls, rs])
        .into_iter()
        .map(|row| row.join(&format!(" {sym} ")))
        .collect()
}

fn as_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Int(n) => Some(*n as f64),
        Value::Float(f) => Some(*f),
        _ => None,
    }
}

/// Floor division on integers, rounding toward negative infinity.
fn floor_div_i64(a: i64, b: i64) -> i64 {
    let q = a / b;
    let r = a % b;
    if r != 0 && (r < 0) != (b < 0) {
        q - 1
    } else {
        q
    }
}

fn bin_value(op: BinOp, l: &Value, r: &Value) -> Result<Value, TraceError> {
    let unsupported = || {
        TraceError::UnsupportedOperator(format!(
            "'{}' between '{}' and '{}'",
            op.symbol(),
            l.type_name(),
            r.type_name()
        ))
    };

    match op {
        BinOp::Add => match (l, r) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a + b)),
            (Value::Str(a), Value::Str(b)) => Ok(Value::Str(format!("{a}{b}"))),
            (Value::List(a), Value::List(b)) => {
                let mut out = a.clone();
                out.extend(b.iter().cloned());
                Ok(Value::List(out))
            }
            _ => match (as_f64(l), as_f64(r)) {
                (Some(a), Some(b)) => Ok(Value::Float(a + b)),
                _ => Err(unsupported()),
            },
        },
        BinOp::Sub => match (l, r) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a - b)),
            _ => match (as_f64(l), as_f64(r)) {
                (Some(a), Some(b)) => Ok(Value::Float(a - b)),
                _ => Err(unsupported()),
            },
        },
        BinOp::Mul => match (l, r) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a * b)),
            _ => match (as_f64(l), as_f64(r)) {
                (Some(a), Some(b)) => Ok(Value::Float(a * b)),
                _ => Err(unsupported()),
            },
        },
        // '/' always yields the floating quotient
        BinOp::Div => match (as_f64(l), as_f64(r)) {
            (Some(_), Some(b)) if b == 0.0 => Err(TraceError::DivisionByZero),
            (Some(a), Some(b)) => Ok(Value::Float(a / b)),
            _ => Err(unsupported()),
        },
        // '//' always yields the integer floor quotient
        BinOp::FloorDiv => match (l, r) {
            (Value::Int(_), Value::Int(0)) => Err(TraceError::DivisionByZero),
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(floor_div_i64(*a, *b))),
            _ => match (as_f64(l), as_f64(r)) {
                (Some(_), Some(b)) if b == 0.0 => Err(TraceError::DivisionByZero),
                (Some(a), Some(b)) => Ok(Value::Int((a / b).floor() as i64)),
                _ => Err(unsupported()),
            },
        },
    }
}

fn cmp_value(op: CmpOp, l: &Value, r: &Value) -> Result<bool, TraceError> {
    let unsupported = || {
        TraceError::UnsupportedOperator(format!(
            "'{}' between '{}' and '{}'",
            op.symbol(),
            l.type_name(),
            r.type_name()
        ))
    };

    // numeric comparison coerces int/float
    if let (Some(a), Some(b)) = (as_f64(l), as_f64(r)) {
        return Ok(match op {
            CmpOp::Eq => a == b,
            CmpOp::Ne => a != b,
            CmpOp::Lt => a < b,
            CmpOp::Le => a <= b,
            CmpOp::Gt => a > b,
            CmpOp::Ge => a >= b,
        });
    }

    match (l, r) {
        (Value::Str(a), Value::Str(b)) => Ok(match op {
            CmpOp::Eq => a == b,
            CmpOp::Ne => a != b,
            CmpOp::Lt => a < b,
            CmpOp::Le => a <= b,
            CmpOp::Gt => a > b,
            CmpOp::Ge => a >= b,
        }),
        (Value::Bool(a), Value::Bool(b)) => match op {
            CmpOp::Eq => Ok(a == b),
            CmpOp::Ne => Ok(a != b),
            _ => Err(unsupported()),
        },
        (Value::List(a), Value::List(b)) => match op {
            CmpOp::Eq => Ok(a == b),
            CmpOp::Ne => Ok(a != b),
            _ => Err(unsupported()),
        },
        // mismatched types: equality is false, ordering is an error
        _ => match op {
            CmpOp::Eq => Ok(false),
            CmpOp::Ne => Ok(true),
            _ => Err(unsupported()),
        },
    }
}
