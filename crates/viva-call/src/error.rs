//! Error types for the interview call engine

use thiserror::Error;

/// Result type alias for call operations
pub type CallResult<T> = Result<T, CallError>;

/// Errors that can occur while driving an interview call
#[derive(Error, Debug)]
pub enum CallError {
    #[error("Session start failed: {0}")]
    SessionStart(String),

    #[error("Session stop failed: {0}")]
    SessionStop(String),

    #[error("Subscription error: {0}")]
    Subscription(String),

    #[error("Message decode error: {0}")]
    Decode(String),

    #[error("Feedback submission error: {0}")]
    Feedback(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Channel send error: {0}")]
    ChannelSend(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
