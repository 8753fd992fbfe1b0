//! The network seam between the controller and the generation service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::Topic,
    error::ErrorDetail,
    protocol::{
        HealthResponse, RefreshNewsResponse, RunNewsRequest, RunNewsResponse, HEALTH_PATH,
        REFRESH_NEWS_PATH, RUN_NEWS_PATH,
    },
};
use tracing::debug;

use crate::error::JobError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobOutput {
    pub result_text: String,
    pub output_label: Option<String>,
}

impl From<RunNewsResponse> for JobOutput {
    fn from(value: RunNewsResponse) -> Self {
        Self {
            result_text: value.result_text(),
            output_label: value.output_label(),
        }
    }
}

#[async_trait]
pub trait JobTransport: Send + Sync {
    async fn run_job(&self, topic: &Topic) -> Result<JobOutput, JobError>;
}

pub struct HttpJobTransport {
    http: Client,
    server_url: String,
}

impl HttpJobTransport {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), server_url)
    }

    pub fn with_client(http: Client, server_url: impl Into<String>) -> Self {
        let server_url = server_url.into();
        Self {
            http,
            server_url: server_url.trim_end_matches('/').to_string(),
        }
    }

    /// Builds a client with an explicit request timeout; `None` keeps reqwest's default.
    pub fn with_timeout(
        server_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self::with_client(builder.build()?, server_url))
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.server_url)
    }

    pub async fn health(&self) -> Result<HealthResponse, JobError> {
        let response = self.http.get(self.endpoint(HEALTH_PATH)).send().await?;
        decode_response(response).await
    }

    pub async fn refresh_news(&self) -> Result<RefreshNewsResponse, JobError> {
        let response = self
            .http
            .post(self.endpoint(REFRESH_NEWS_PATH))
            .send()
            .await?;
        decode_response(response).await
    }
}

#[async_trait]
impl JobTransport for HttpJobTransport {
    async fn run_job(&self, topic: &Topic) -> Result<JobOutput, JobError> {
        let response = self
            .http
            .post(self.endpoint(RUN_NEWS_PATH))
            .json(&RunNewsRequest::from(topic))
            .send()
            .await?;
        let body: RunNewsResponse = decode_response(response).await?;
        Ok(body.into())
    }
}

async fn decode_response<T: DeserializeOwned>(response: Response) -> Result<T, JobError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.bytes().await.unwrap_or_default();
        let detail = ErrorDetail::from_body(&body).message().map(str::to_string);
        debug!(status = status.as_u16(), ?detail, "service returned failure status");
        return Err(JobError::service(status.as_u16(), detail));
    }
    Ok(response.json().await?)
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
