//! Transcript submission to the scoring/analysis backend.
//!
//! When a call finishes with a non-empty transcript, the agent makes exactly
//! one submission attempt. Failures are logged and swallowed by the caller;
//! there is no retry.

use crate::error::{CallError, CallResult};
use crate::transcript::SavedMessage;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

/// Payload posted for a finished call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    /// Session type tag (e.g. "interview").
    #[serde(rename = "type")]
    pub session_type: String,
    /// Candidate identifier the scoring service keys on.
    pub user_id: String,
    /// Full ordered transcript of the call.
    pub transcript: Vec<SavedMessage>,
    /// When the call finished and the submission was made.
    pub submitted_at: DateTime<Utc>,
}

/// Backend that scores or archives a finished transcript. Implement for the
/// real analysis service; `NullFeedbackSink` is the no-backend stand-in.
#[async_trait]
pub trait FeedbackSink: Send + Sync {
    async fn submit(&self, request: &FeedbackRequest) -> CallResult<()>;
}

/// Placeholder sink: logs and succeeds. Wired when no endpoint is configured,
/// so the finish path is exercised end to end without a backend.
#[derive(Debug, Default)]
pub struct NullFeedbackSink;

#[async_trait]
impl FeedbackSink for NullFeedbackSink {
    async fn submit(&self, request: &FeedbackRequest) -> CallResult<()> {
        info!(
            "No feedback endpoint configured; dropping transcript of {} messages",
            request.transcript.len()
        );
        Ok(())
    }
}

/// Production sink: JSON POST to a configured endpoint.
#[derive(Debug, Clone)]
pub struct HttpFeedbackSink {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpFeedbackSink {
    pub fn new(endpoint: impl Into<String>) -> CallResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| CallError::Feedback(e.to_string()))?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }
}

#[async_trait]
impl FeedbackSink for HttpFeedbackSink {
    async fn submit(&self, request: &FeedbackRequest) -> CallResult<()> {
        let res = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| CallError::Feedback(e.to_string()))?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(CallError::Feedback(format!(
                "feedback API error {}: {}",
                status, body
            )));
        }
        Ok(())
    }
}
