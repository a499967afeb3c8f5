//! Statement interpreter and loop controller.
//!
//! Executes the program concretely, in strict program order, appending
//! one step per observable state change. A break flows out of nested
//! branches up to the innermost loop, which stops immediately, so the
//! recorded steps end exactly at the break marker.

use vistrace_ast::ast::{Expr, IfBranch, Lit, Program, Stmt};

use crate::env::Env;
use crate::error::{TraceAbort, TraceError};
use crate::eval::{evaluate, evaluate_condition};
use crate::history::render_source;
use crate::step::{RangeCondition, Step, StepKind, StepLog};
use crate::value::Value;

/// Guard against non-terminating while guards.
pub const WHILE_ITERATION_LIMIT: u32 = 10_000;

/// Synthesize the full execution trace of a program.
///
/// Constructs a fresh environment and log per call; on failure the
/// completed step prefix travels inside the [`TraceAbort`].
pub fn synthesize(program: &Program) -> Result<StepLog, TraceAbort> {
    let mut interp = Interpreter::new();
    match interp.run(program) {
        Ok(()) => Ok(StepLog::from_steps(interp.steps)),
        Err(error) => Err(TraceAbort {
            steps: StepLog::from_steps(interp.steps),
            error,
        }),
    }
}

/// Signal that a break is unwinding toward the enclosing loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Normal,
    Break,
}

struct Interpreter {
    env: Env,
    steps: Vec<Step>,
}

impl Interpreter {
    fn new() -> Self {
        Self {
            env: Env::new(),
            steps: Vec::new(),
        }
    }

    fn run(&mut self, program: &Program) -> Result<(), TraceError> {
        self.env.enter_scope();
        let flow = self.exec_body(&program.body)?;
        self.env.exit_scope();
        if flow == Flow::Break {
            return Err(TraceError::UnsupportedStatement(
                "break outside a loop".to_string(),
            ));
        }
        Ok(())
    }

    fn exec_body(&mut self, stmts: &[Stmt]) -> Result<Flow, TraceError> {
        for stmt in stmts {
            if self.exec_stmt(stmt)? == Flow::Break {
                return Ok(Flow::Break);
            }
        }
        Ok(Flow::Normal)
    }

    fn exec_stmt(&mut self, stmt: &Stmt) -> Result<Flow, TraceError> {
        match stmt {
            Stmt::Assign {
                target,
                value,
                line,
                ..
            } => {
                self.exec_assign(&target.text, value, *line)?;
                Ok(Flow::Normal)
            }
            Stmt::Expr { expr, line, .. } => {
                self.exec_expr_stmt(expr, *line)?;
                Ok(Flow::Normal)
            }
            Stmt::If {
                branches, orelse, ..
            } => self.exec_if(branches, orelse.as_ref()),
            Stmt::For {
                target,
                iter,
                body,
                line,
                ..
            } => self.exec_for(&target.text, iter, body, *line),
            Stmt::While {
                cond, body, line, ..
            } => self.exec_while(cond, body, *line),
            Stmt::Break { line, .. } => {
                self.emit(*line, StepKind::Break);
                Ok(Flow::Break)
            }
            Stmt::Pass { .. } => Ok(Flow::Normal),
        }
    }

    // ======= assignment / print =======

    fn exec_assign(&mut self, name: &str, value: &Expr, line: u32) -> Result<(), TraceError> {
        let (value, history) = evaluate(&self.env, value)?;
        // the new binding is committed before its steps are emitted
        self.env.set(name, value);
        self.emit_stages(line, history, |stage| StepKind::Assign {
            name: name.to_string(),
            stage,
        });
        Ok(())
    }

    fn exec_expr_stmt(&mut self, expr: &Expr, line: u32) -> Result<(), TraceError> {
        match expr {
            Expr::Call { callee, args, .. } if callee.text == "print" => {
                for arg in args {
                    let (_, history) = evaluate(&self.env, arg)?;
                    self.emit_stages(line, history, |stage| StepKind::Print { stage });
                }
                Ok(())
            }
            Expr::Call { callee, .. } => Err(TraceError::UnsupportedStatement(format!(
                "call to '{}'",
                callee.text
            ))),
            _ => Err(TraceError::UnsupportedStatement(format!(
                "bare expression '{}'",
                render_source(expr)
            ))),
        }
    }

    // ======= branches =======

    fn exec_if(
        &mut self,
        branches: &[IfBranch],
        orelse: Option<&vistrace_ast::ast::ElseBranch>,
    ) -> Result<Flow, TraceError> {
        // guards in source order, first true one wins
        for branch in branches {
            let (result, history) = evaluate_condition(&self.env, &branch.test)?;
            self.emit_stages(branch.line, history, |stage| StepKind::IfFrame {
                guard: Some(stage),
            });
            if result {
                return self.exec_block(&branch.body);
            }
        }
        if let Some(orelse) = orelse {
            // a taken else carries no guard history
            self.emit(orelse.line, StepKind::IfFrame { guard: None });
            return self.exec_block(&orelse.body);
        }
        Ok(Flow::Normal)
    }

    fn exec_block(&mut self, body: &[Stmt]) -> Result<Flow, TraceError> {
        self.env.enter_scope();
        let flow = self.exec_body(body);
        self.env.exit_scope();
        flow
    }

    // ======= loops =======

    fn exec_for(
        &mut self,
        target: &str,
        iter: &Expr,
        body: &[Stmt],
        line: u32,
    ) -> Result<Flow, TraceError> {
        // the iteration plan is fixed at loop entry
        let plan = self.range_plan(target, iter)?;

        let mut prev: Option<RangeCondition> = None;
        let mut current = plan.start;
        while (plan.step > 0 && current < plan.end) || (plan.step < 0 && current > plan.end) {
            self.env.set(target, Value::Int(current));

            let frame = plan.with_current(current);
            let changed = frame.changed_since(prev.as_ref());
            self.emit(
                line,
                StepKind::ForFrame {
                    condition: frame.clone(),
                    changed,
                },
            );
            prev = Some(frame);

            if self.exec_block(body)? == Flow::Break {
                // loop ends here; no frames for the remaining iterations
                break;
            }
            current += plan.step;
        }
        Ok(Flow::Normal)
    }

    /// Derive the (start, end, step) plan from a `range(...)` header.
    fn range_plan(&self, target: &str, iter: &Expr) -> Result<RangeCondition, TraceError> {
        let Expr::Call { callee, args, .. } = iter else {
            return Err(TraceError::InvalidLoopArguments(
                "for-loop iterable must be a range(...) call".to_string(),
            ));
        };
        if callee.text != "range" {
            return Err(TraceError::InvalidLoopArguments(format!(
                "for-loop iterable must be range(...), found '{}'",
                callee.text
            )));
        }
        if args.is_empty() || args.len() > 3 {
            return Err(TraceError::InvalidLoopArguments(format!(
                "range takes 1 to 3 arguments, found {}",
                args.len()
            )));
        }

        let mut bounds = Vec::with_capacity(args.len());
        for arg in args {
            bounds.push(self.range_bound(arg)?);
        }

        let (start, end, step) = match bounds.as_slice() {
            [end] => (0, *end, 1),
            [start, end] => (*start, *end, 1),
            [start, end, step] => (*start, *end, *step),
            _ => unreachable!("argument count checked above"),
        };
        if step == 0 {
            return Err(TraceError::InvalidLoopArguments(
                "range step must not be zero".to_string(),
            ));
        }

        Ok(RangeCondition {
            target: target.to_string(),
            start,
            end,
            step,
            current: start,
        })
    }

    /// A range argument is an integer constant or a previously bound
    /// variable holding an integer; anything else is malformed.
    fn range_bound(&self, arg: &Expr) -> Result<i64, TraceError> {
        match arg {
            Expr::Lit(Lit::Int(v), _) => Ok(*v),
            Expr::Var(id) => {
                if !self.env.is_bound(&id.text) {
                    return Err(TraceError::InvalidLoopArguments(format!(
                        "range argument '{}' is not bound",
                        id.text
                    )));
                }
                match self.env.get(&id.text)? {
                    Value::Int(v) => Ok(*v),
                    other => Err(TraceError::InvalidLoopArguments(format!(
                        "range argument '{}' must be an integer, found {}",
                        id.text,
                        other.type_name()
                    ))),
                }
            }
            _ => Err(TraceError::InvalidLoopArguments(
                "range arguments must be constants or bound variables".to_string(),
            )),
        }
    }

    fn exec_while(&mut self, cond: &Expr, body: &[Stmt], line: u32) -> Result<Flow, TraceError> {
        let mut iterations: u32 = 0;
        loop {
            if iterations >= WHILE_ITERATION_LIMIT {
                return Err(TraceError::LoopLimitExceeded {
                    line,
                    limit: WHILE_ITERATION_LIMIT,
                });
            }
            iterations += 1;

            let (result, history) = evaluate_condition(&self.env, cond)?;
            self.emit_stages(line, history, |stage| StepKind::WhileFrame { stage });
            if !result {
                break;
            }
            if self.exec_block(body)? == Flow::Break {
                break;
            }
        }
        Ok(Flow::Normal)
    }

    // ======= emission =======

    fn emit(&mut self, id: u32, kind: StepKind) {
        self.steps.push(Step {
            id,
            depth: self.env.depth(),
            kind,
        });
    }

    /// One step per history stage, skipping a stage identical to its
    /// predecessor (a constant's original and result texts coincide, and
    /// the visualizer would show a no-op change).
    fn emit_stages(&mut self, id: u32, history: Vec<String>, make: impl Fn(String) -> StepKind) {
        let mut prev: Option<&str> = None;
        let mut kept = Vec::new();
        for stage in &history {
            if prev != Some(stage.as_str()) {
                kept.push(stage.clone());
            }
            prev = Some(stage.as_str());
        }
        for stage in kept {
            self.emit(id, make(stage));
        }
    }
}
