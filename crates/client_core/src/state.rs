use serde::{Deserialize, Serialize};
use shared::domain::ValidationError;

use crate::transport::JobOutput;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed,
}

impl Phase {
    pub fn is_pending(self) -> bool {
        self == Phase::Pending
    }
}

/// Everything a view needs to render one submission widget.
///
/// `result_text` and `output_label` are only populated in [`Phase::Succeeded`];
/// `error_message` only in [`Phase::Failed`] or after a rejected submit in [`Phase::Idle`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionState {
    pub topic: String,
    pub phase: Phase,
    pub result_text: Option<String>,
    pub output_label: Option<String>,
    pub error_message: Option<String>,
}

impl SubmissionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        self.phase.is_pending()
    }

    pub(crate) fn clear_outputs(&mut self) {
        self.result_text = None;
        self.output_label = None;
        self.error_message = None;
    }

    pub(crate) fn reject(&mut self, err: ValidationError) {
        self.clear_outputs();
        self.phase = Phase::Idle;
        self.error_message = Some(err.to_string());
    }

    pub(crate) fn begin(&mut self) {
        self.clear_outputs();
        self.phase = Phase::Pending;
    }

    pub(crate) fn succeed(&mut self, output: JobOutput) {
        self.clear_outputs();
        self.phase = Phase::Succeeded;
        self.result_text = Some(output.result_text);
        self.output_label = output.output_label;
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.clear_outputs();
        self.phase = Phase::Failed;
        self.error_message = Some(message);
    }
}

#[cfg(test)]
mod tests {
    use shared::domain::EMPTY_TOPIC_PROMPT;

    use super::*;

    fn succeeded() -> SubmissionState {
        let mut state = SubmissionState::new();
        state.begin();
        state.succeed(JobOutput {
            result_text: "# Hello".into(),
            output_label: Some("a.md".into()),
        });
        state
    }

    #[test]
    fn starts_idle_and_empty() {
        let state = SubmissionState::new();
        assert_eq!(state.phase, Phase::Idle);
        assert!(state.topic.is_empty());
        assert!(state.result_text.is_none());
        assert!(state.output_label.is_none());
        assert!(state.error_message.is_none());
    }

    #[test]
    fn begin_clears_previous_outputs() {
        let mut state = succeeded();
        state.begin();
        assert_eq!(state.phase, Phase::Pending);
        assert!(state.result_text.is_none());
        assert!(state.output_label.is_none());
    }

    #[test]
    fn failure_never_keeps_a_result() {
        let mut state = succeeded();
        state.fail("boom".into());
        assert_eq!(state.phase, Phase::Failed);
        assert_eq!(state.error_message.as_deref(), Some("boom"));
        assert!(state.result_text.is_none());
        assert!(state.output_label.is_none());
    }

    #[test]
    fn reject_returns_to_idle_with_prompt() {
        let mut state = succeeded();
        state.reject(ValidationError::EmptyTopic);
        assert_eq!(state.phase, Phase::Idle);
        assert_eq!(state.error_message.as_deref(), Some(EMPTY_TOPIC_PROMPT));
        assert!(state.result_text.is_none());
    }
}
