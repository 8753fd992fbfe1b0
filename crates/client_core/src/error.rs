//! Failure taxonomy for generation jobs and the single-message resolution used by the view.

use thiserror::Error;

pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong while running the news crew.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobError {
    /// Unreachable service, timeout, or a body that could not be decoded.
    #[error("transport failure: {0}")]
    Transport(String),
    /// The service answered with a non-success status.
    #[error("service responded with status {status}")]
    Service { status: u16, detail: Option<String> },
    #[error("unknown failure")]
    Unknown,
}

impl JobError {
    pub fn transport(description: impl Into<String>) -> Self {
        Self::Transport(description.into())
    }

    pub fn service(status: u16, detail: Option<String>) -> Self {
        Self::Service { status, detail }
    }

    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Service { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    pub fn transport_description(&self) -> Option<String> {
        match self {
            Self::Transport(description) => Some(description.clone()),
            Self::Service { status, .. } => Some(format!("Request failed with status code {status}")),
            Self::Unknown => None,
        }
    }

    /// The one message shown to the user for this failure.
    pub fn user_message(&self) -> String {
        resolve_failure_message(self.detail(), self.transport_description().as_deref())
    }
}

impl From<reqwest::Error> for JobError {
    fn from(value: reqwest::Error) -> Self {
        if let Some(status) = value.status() {
            return Self::service(status.as_u16(), None);
        }
        Self::Transport(describe_transport_error(&value))
    }
}

/// Full cause chain of a reqwest failure, so timeouts and refused connections read differently.
fn describe_transport_error(err: &reqwest::Error) -> String {
    let mut description = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        let text = cause.to_string();
        if !description.contains(&text) {
            description.push_str(": ");
            description.push_str(&text);
        }
        source = std::error::Error::source(cause);
    }

    let lower = description.to_ascii_lowercase();
    if err.is_timeout() && !lower.contains("timed out") {
        description = format!("request timed out: {description}");
    } else if err.is_connect() && !lower.contains("connect") {
        description = format!("connection failed: {description}");
    }
    description
}

/// Structured service detail, then transport description, then the generic fallback.
/// Blank candidates are skipped.
pub fn resolve_failure_message(detail: Option<&str>, transport: Option<&str>) -> String {
    [detail, transport]
        .into_iter()
        .flatten()
        .find(|candidate| !candidate.trim().is_empty())
        .unwrap_or(GENERIC_FAILURE_MESSAGE)
        .to_string()
}
