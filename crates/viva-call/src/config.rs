//! Environment-driven call configuration.
//!
//! | Env | Default | Description |
//! |-----|---------|-------------|
//! | VIVA_WORKFLOW_ID | (required) | Workflow id handed to the session at call start. |
//! | VIVA_SESSION_TYPE | interview | Session type tag submitted with the transcript. |
//! | VIVA_FEEDBACK_URL | (unset) | Scoring endpoint; when unset the null sink is wired. |

use crate::error::{CallError, CallResult};

/// Configuration for one interview call.
#[derive(Debug, Clone)]
pub struct CallConfig {
    /// Workflow id passed to `VoiceSession::start`.
    pub workflow_id: String,
    /// Session type tag (e.g. "interview") in the feedback payload.
    pub session_type: String,
    /// Transcript scoring endpoint, if any.
    pub feedback_url: Option<String>,
}

impl CallConfig {
    /// Explicit construction with defaults for everything but the workflow id.
    pub fn new(workflow_id: impl Into<String>) -> Self {
        Self {
            workflow_id: workflow_id.into(),
            session_type: "interview".to_string(),
            feedback_url: None,
        }
    }

    /// Build from environment. The workflow id is required configuration;
    /// everything else falls back to defaults.
    pub fn from_env() -> CallResult<Self> {
        let workflow_id = std::env::var("VIVA_WORKFLOW_ID")
            .map_err(|_| CallError::Config("VIVA_WORKFLOW_ID not set".to_string()))?;
        let workflow_id = workflow_id.trim().to_string();
        if workflow_id.is_empty() {
            return Err(CallError::Config("VIVA_WORKFLOW_ID is empty".to_string()));
        }
        let session_type =
            std::env::var("VIVA_SESSION_TYPE").unwrap_or_else(|_| "interview".to_string());
        let feedback_url = std::env::var("VIVA_FEEDBACK_URL")
            .ok()
            .filter(|s| !s.trim().is_empty());
        Ok(Self {
            workflow_id,
            session_type,
            feedback_url,
        })
    }
}
