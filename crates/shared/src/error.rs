use serde::{Deserialize, Serialize};

/// Failure envelope returned by the generation service on non-success statuses.
///
/// `detail` is usually a string, but framework-level validation failures put a
/// list of objects there instead, so it is kept as raw JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<serde_json::Value>,
}

impl ErrorDetail {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            detail: Some(serde_json::Value::String(message.into())),
        }
    }

    /// The structured message, when the service sent a non-blank string.
    pub fn message(&self) -> Option<&str> {
        match &self.detail {
            Some(serde_json::Value::String(message)) if !message.trim().is_empty() => {
                Some(message.as_str())
            }
            _ => None,
        }
    }

    /// Best-effort decode of a failure body; anything unparseable yields no detail.
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_string_detail() {
        let detail = ErrorDetail::from_body(br#"{"detail":"rate limited"}"#);
        assert_eq!(detail.message(), Some("rate limited"));
    }

    #[test]
    fn ignores_non_string_detail() {
        let detail =
            ErrorDetail::from_body(br#"{"detail":[{"loc":["body","topic"],"msg":"field required"}]}"#);
        assert!(detail.detail.is_some());
        assert_eq!(detail.message(), None);
    }

    #[test]
    fn ignores_blank_and_missing_detail() {
        assert_eq!(ErrorDetail::from_body(br#"{"detail":"  "}"#).message(), None);
        assert_eq!(ErrorDetail::from_body(br#"{}"#).message(), None);
        assert_eq!(ErrorDetail::from_body(b"<html>502</html>").message(), None);
        assert_eq!(ErrorDetail::from_body(b"").message(), None);
    }

    #[test]
    fn new_round_trips_through_json() {
        let body = serde_json::to_vec(&ErrorDetail::new("Topic must not be empty.")).expect("json");
        assert_eq!(
            ErrorDetail::from_body(&body).message(),
            Some("Topic must not be empty.")
        );
    }
}
