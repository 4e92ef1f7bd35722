use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, EnumIter, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Identify,
    Simplify,
    Analyze,
    Discriminant,
    Isolate,
    Divide,
    Formula,
    Domain,
    Backend,
    Numeric,
    Verify,
    Fallback,
    /// Final statement of every returned solution.
    Conclude,
}

/// One record of a derivation. Steps are created once and never changed
/// after they are recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionStep {
    pub id: usize,
    pub description: String,
    pub operation_kind: OperationKind,
    pub before: String,
    pub after: String,
    pub explanation: String,
}

impl SolutionStep {
    pub fn new(operation_kind: OperationKind, description: impl Into<String>) -> Self {
        Self {
            id: 0,
            description: description.into(),
            operation_kind,
            before: String::new(),
            after: String::new(),
            explanation: String::new(),
        }
    }

    pub fn before(mut self, before: impl Into<String>) -> Self {
        self.before = before.into();
        self
    }

    pub fn after(mut self, after: impl Into<String>) -> Self {
        self.after = after.into();
        self
    }

    pub fn explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }
}

/// Append-only step list; ids are assigned sequentially from 1.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepTrace {
    steps: Vec<SolutionStep>,
}

impl StepTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, mut step: SolutionStep) {
        step.id = self.steps.len() + 1;
        tracing::debug!(id = step.id, kind = %step.operation_kind, "{}", step.description);
        self.steps.push(step);
    }

    /// Moves every step of `other` to the end of this trace, renumbering them.
    pub fn append(&mut self, other: StepTrace) {
        for step in other.steps {
            self.record(step);
        }
    }

    pub fn steps(&self) -> &[SolutionStep] {
        &self.steps
    }

    pub fn last(&self) -> Option<&SolutionStep> {
        self.steps.last()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn into_steps(self) -> Vec<SolutionStep> {
        self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_sequential_across_appends() {
        let mut trace = StepTrace::new();
        trace.record(SolutionStep::new(OperationKind::Identify, "identify"));

        let mut attempt = StepTrace::new();
        attempt.record(SolutionStep::new(OperationKind::Isolate, "isolate"));
        attempt.record(SolutionStep::new(OperationKind::Divide, "divide").after("x = 3"));
        trace.append(attempt);

        let ids: Vec<usize> = trace.steps().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(trace.last().map(|s| s.after.as_str()), Some("x = 3"));
    }

    #[test]
    fn test_operation_kind_names() {
        assert_eq!(OperationKind::Fallback.to_string(), "fallback");
        assert_eq!(OperationKind::Conclude.as_ref(), "conclude");
        assert_eq!(
            serde_json::to_string(&OperationKind::Discriminant).unwrap(),
            "\"discriminant\""
        );
    }
}
