// ABOUTME: Error types for the non-streaming churn service endpoints

use thiserror::Error;

/// Message shown when the service rejects an upload without saying why
pub const UPLOAD_FALLBACK_MESSAGE: &str = "An error occurred during upload.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Unsupported file type: {0} (expected .csv, .xlsx or .xls)")]
    UnsupportedFile(String),

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("{detail}")]
    Server { status: u16, detail: String },

    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// Text suitable for an error notification
    pub fn user_message(&self) -> String {
        match self {
            Self::Server { detail, .. } => detail.clone(),
            Self::Request(e) if e.is_timeout() => "The server took too long to respond.".to_string(),
            Self::Request(_) => UPLOAD_FALLBACK_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}
