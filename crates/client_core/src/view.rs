//! Presentation-neutral view model derived from [`SubmissionState`].
//!
//! Nothing here renders markdown; `article_markdown` is handed to whatever renderer the
//! front end uses.

use crate::state::SubmissionState;

pub const GENERATE_LABEL: &str = "Generate Article";
pub const GENERATING_LABEL: &str = "Generating...";
pub const PENDING_STATUS: &str = "Agents are researching and writing, please wait...";
pub const EMPTY_STATUS: &str = "No article yet. Enter a topic and click \"Generate Article\".";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionView {
    pub button_label: &'static str,
    pub button_enabled: bool,
    pub status_line: Option<&'static str>,
    pub article_markdown: Option<String>,
    pub output_note: Option<String>,
    pub error: Option<String>,
}

impl From<&SubmissionState> for SubmissionView {
    fn from(state: &SubmissionState) -> Self {
        let pending = state.is_pending();
        let article = state
            .result_text
            .as_deref()
            .filter(|text| !pending && !text.is_empty());

        let status_line = if pending {
            Some(PENDING_STATUS)
        } else if article.is_none() {
            Some(EMPTY_STATUS)
        } else {
            None
        };

        Self {
            button_label: if pending { GENERATING_LABEL } else { GENERATE_LABEL },
            button_enabled: !pending,
            status_line,
            article_markdown: article.map(str::to_string),
            output_note: state
                .output_label
                .as_deref()
                .filter(|_| !pending)
                .map(|label| format!("Output also saved on server as: {label}")),
            error: state.error_message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Phase;

    #[test]
    fn idle_view_invites_a_submission() {
        let view = SubmissionView::from(&SubmissionState::new());
        assert_eq!(view.button_label, GENERATE_LABEL);
        assert!(view.button_enabled);
        assert_eq!(view.status_line, Some(EMPTY_STATUS));
        assert!(view.article_markdown.is_none());
        assert!(view.output_note.is_none());
        assert!(view.error.is_none());
    }

    #[test]
    fn pending_view_disables_the_button() {
        let state = SubmissionState {
            phase: Phase::Pending,
            ..SubmissionState::new()
        };
        let view = SubmissionView::from(&state);
        assert_eq!(view.button_label, GENERATING_LABEL);
        assert!(!view.button_enabled);
        assert_eq!(view.status_line, Some(PENDING_STATUS));
    }

    #[test]
    fn succeeded_view_shows_article_and_label() {
        let state = SubmissionState {
            phase: Phase::Succeeded,
            result_text: Some("# Hello".into()),
            output_label: Some("a.md".into()),
            ..SubmissionState::new()
        };
        let view = SubmissionView::from(&state);
        assert_eq!(view.article_markdown.as_deref(), Some("# Hello"));
        assert_eq!(
            view.output_note.as_deref(),
            Some("Output also saved on server as: a.md")
        );
        assert_eq!(view.status_line, None);
    }

    #[test]
    fn empty_result_falls_back_to_placeholder() {
        let state = SubmissionState {
            phase: Phase::Succeeded,
            result_text: Some(String::new()),
            ..SubmissionState::new()
        };
        let view = SubmissionView::from(&state);
        assert!(view.article_markdown.is_none());
        assert_eq!(view.status_line, Some(EMPTY_STATUS));
    }

    #[test]
    fn failed_view_carries_the_message() {
        let state = SubmissionState {
            phase: Phase::Failed,
            error_message: Some("rate limited".into()),
            ..SubmissionState::new()
        };
        assert_eq!(
            SubmissionView::from(&state).error.as_deref(),
            Some("rate limited")
        );
    }
}
