// ABOUTME: Error types for streaming text sessions
// Separates failures before a session exists from failures while reading one

use super::decoder::DecodeError;
use thiserror::Error;

/// The request could not be sent, or the response has nothing to stream.
/// No session exists when this is returned.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request could not be dispatched: {0}")]
    Dispatch(#[from] reqwest::Error),

    #[error("request payload could not be serialized: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(String),

    #[error("server responded with {status}: {body}")]
    Status { status: u16, body: String },

    #[error("response has no readable body")]
    NoBody,
}

/// Failure while an in-flight stream was being read
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamReadError {
    #[error("connection failed mid-stream: {0}")]
    Connection(String),

    #[error("could not decode stream: {0}")]
    Decode(#[from] DecodeError),
}

/// Anything an observer can be told about a failed session
#[derive(Debug, Error)]
pub enum StreamError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Read(#[from] StreamReadError),
}

impl StreamError {
    /// True when the failure happened before any text could arrive
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
