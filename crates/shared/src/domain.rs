use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(AttemptId);

impl AttemptId {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

pub const EMPTY_TOPIC_PROMPT: &str = "Please enter a topic.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a topic.")]
    EmptyTopic,
}

/// A topic that has passed [`validate`]: trimmed and never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Topic(String);

impl Topic {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Topic {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Input gate for submissions. Pure; never touches the network.
pub fn validate(raw_topic: &str) -> Result<Topic, ValidationError> {
    let trimmed = raw_topic.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyTopic);
    }
    Ok(Topic(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_surrounding_whitespace() {
        let topic = validate("  AI pricing  ").expect("valid topic");
        assert_eq!(topic.as_str(), "AI pricing");
    }

    #[test]
    fn keeps_interior_whitespace_and_newlines() {
        let topic = validate("\n LLM   pricing\nin 2025 \t").expect("valid topic");
        assert_eq!(topic.as_str(), "LLM   pricing\nin 2025");
    }

    #[test]
    fn rejects_empty_and_whitespace_only_input() {
        for raw in ["", " ", "\t\n", "\u{2003}\u{00a0} "] {
            assert_eq!(validate(raw), Err(ValidationError::EmptyTopic), "input {raw:?}");
        }
    }

    #[test]
    fn empty_topic_error_reads_as_prompt() {
        assert_eq!(ValidationError::EmptyTopic.to_string(), EMPTY_TOPIC_PROMPT);
    }

    #[test]
    fn topic_serializes_as_plain_string() {
        let topic = validate("rust").expect("valid topic");
        assert_eq!(serde_json::to_string(&topic).expect("json"), "\"rust\"");
    }

    #[test]
    fn attempt_ids_advance() {
        assert_eq!(AttemptId(0).next(), AttemptId(1));
        assert_eq!(AttemptId(u64::MAX).next(), AttemptId(0));
    }
}
