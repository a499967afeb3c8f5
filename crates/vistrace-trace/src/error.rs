//! Error model of the trace synthesizer.
//!
//! Every error aborts the run; there is no silent recovery. `TraceAbort`
//! pairs the failure with the step prefix completed before it, so a caller
//! can still show a partial trace.

use crate::step::StepLog;

#[derive(Debug, Clone, PartialEq)]
pub enum TraceError {
    /// Reference to a name with no binding
    UndefinedVariable(String),
    /// Expression node kind outside the supported subset
    UnsupportedExpression(String),
    /// Operator outside the supported set, or applied to incompatible operands
    UnsupportedOperator(String),
    /// Statement form outside the supported subset
    UnsupportedStatement(String),
    /// Malformed range header on a for-loop
    InvalidLoopArguments(String),
    /// `/` or `//` with a zero right-hand side
    DivisionByZero,
    /// While-loop guard stayed true past the iteration cap
    LoopLimitExceeded { line: u32, limit: u32 },
}

impl std::fmt::Display for TraceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TraceError::UndefinedVariable(name) => {
                write!(f, "undefined variable '{}'", name)
            }
            TraceError::UnsupportedExpression(what) => {
                write!(f, "unsupported expression: {}", what)
            }
            TraceError::UnsupportedOperator(what) => {
                write!(f, "unsupported operator: {}", what)
            }
            TraceError::UnsupportedStatement(what) => {
                write!(f, "unsupported statement: {}", what)
            }
            TraceError::InvalidLoopArguments(what) => {
                write!(f, "invalid loop arguments: {}", what)
            }
            TraceError::DivisionByZero => write!(f, "division by zero"),
            TraceError::LoopLimitExceeded { line, limit } => {
                write!(
                    f,
                    "while loop at line {} exceeded {} iterations",
                    line, limit
                )
            }
        }
    }
}

impl std::error::Error for TraceError {}

/// A failed synthesis: the reason plus the completed step prefix.
#[derive(Debug)]
pub struct TraceAbort {
    pub steps: StepLog,
    pub error: TraceError,
}

impl std::fmt::Display for TraceAbort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "trace aborted after {} steps: {}",
            self.steps.len(),
            self.error
        )
    }
}

impl std::error::Error for TraceAbort {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}
