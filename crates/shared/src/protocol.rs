use serde::{Deserialize, Serialize};

use crate::domain::Topic;

pub const RUN_NEWS_PATH: &str = "/run-news";
pub const REFRESH_NEWS_PATH: &str = "/refresh-news";
pub const HEALTH_PATH: &str = "/health";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunNewsRequest {
    pub topic: String,
}

impl From<&Topic> for RunNewsRequest {
    fn from(topic: &Topic) -> Self {
        Self {
            topic: topic.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunNewsResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_file: Option<String>,
}

impl RunNewsResponse {
    /// Article text; an omitted `result` is an empty article, not an error.
    pub fn result_text(&self) -> String {
        self.result.clone().unwrap_or_default()
    }

    /// Output label, absent when the service omitted it or sent an empty string.
    pub fn output_label(&self) -> Option<String> {
        self.output_file
            .as_deref()
            .filter(|label| !label.is_empty())
            .map(str::to_string)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshNewsResponse {
    pub fetched: u64,
    pub indexed: u64,
}
