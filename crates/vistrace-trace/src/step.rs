//! Step records: the externally visible product of a synthesis run.

use serde::Serialize;

/// One observable state change.
///
/// `id` is the 1-based source line of the originating statement; every
/// step emitted for one statement shares it. `depth` is the nesting level
/// at emission time, used by the renderer for indentation only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Step {
    pub id: u32,
    pub depth: u32,
    #[serde(flatten)]
    pub kind: StepKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepKind {
    /// One substitution stage of an assignment's right-hand side.
    Assign { name: String, stage: String },
    /// One substitution stage of a print argument.
    Print { stage: String },
    /// One for-loop iteration, with the fields that moved since the
    /// previous frame.
    ForFrame {
        condition: RangeCondition,
        changed: Vec<RangeField>,
    },
    /// One stage of a branch guard; `None` marks a taken `else`.
    IfFrame { guard: Option<String> },
    /// One stage of a while guard, ending in `True`/`False`.
    WhileFrame { stage: String },
    /// A break statement executed.
    Break,
}

/// The iteration plan of a for-loop: fixed bounds plus the moving cursor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeCondition {
    pub target: String,
    pub start: i64,
    pub end: i64,
    pub step: i64,
    pub current: i64,
}

impl RangeCondition {
    pub fn with_current(&self, current: i64) -> Self {
        Self {
            current,
            ..self.clone()
        }
    }

    /// Which fields differ from `prev`; all of them for the first frame.
    pub fn changed_since(&self, prev: Option<&RangeCondition>) -> Vec<RangeField> {
        let Some(prev) = prev else {
            return vec![
                RangeField::Start,
                RangeField::End,
                RangeField::Step,
                RangeField::Current,
            ];
        };
        let mut changed = Vec::new();
        if self.start != prev.start {
            changed.push(RangeField::Start);
        }
        if self.end != prev.end {
            changed.push(RangeField::End);
        }
        if self.step != prev.step {
            changed.push(RangeField::Step);
        }
        if self.current != prev.current {
            changed.push(RangeField::Current);
        }
        changed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeField {
    Start,
    End,
    Step,
    Current,
}

/// Append-only ordered step sequence; read-only once a run returns it.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StepLog {
    steps: Vec<Step>,
}

impl StepLog {
    pub(crate) fn from_steps(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Step> {
        self.steps.iter()
    }
}

impl<'a> IntoIterator for &'a StepLog {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}
