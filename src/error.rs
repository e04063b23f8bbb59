// src/error.rs
use thiserror::Error;

pub const ANALYZE_FALLBACK_MESSAGE: &str = "Failed to analyze file. Please check your backend server.";

/// Failures talking to the analysis service
#[derive(Error, Debug)]
pub enum ClientError {
    /// The service answered with an error status
    #[error("{}", .message.as_deref().unwrap_or("server responded with an error"))]
    Service {
        status: u16,
        /// The body's `error` field, when it had one
        message: Option<String>,
    },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("file error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Banner text for a failed analysis. Only a message the service wrote
    /// itself is shown; everything else collapses to the fixed fallback.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Service { message: Some(message), .. } => message.clone(),
            _ => ANALYZE_FALLBACK_MESSAGE.to_string(),
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
