//! Execution trace synthesizer for the restricted imperative subset.
//!
//! Feed it a parsed [`Program`](vistrace_ast::ast::Program) and it
//! concretely executes assignments, print calls, branches, and loops,
//! emitting one depth-tagged [`Step`] per observable state change. The
//! resulting [`StepLog`] is complete, ordered, and immutable; a failing
//! run still hands back the completed prefix inside [`TraceAbort`].

#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(clippy::dbg_macro, clippy::todo, clippy::unimplemented)]

mod env;
mod error;
mod eval;
mod history;
mod interp;
mod step;
mod value;

pub use env::Env;
pub use error::{TraceAbort, TraceError};
pub use eval::{evaluate, evaluate_condition};
pub use history::History;
pub use interp::{synthesize, WHILE_ITERATION_LIMIT};
pub use step::{RangeCondition, RangeField, Step, StepKind, StepLog};
pub use value::Value;
