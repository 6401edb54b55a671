// ABOUTME: StreamSession state machine for one streaming request/response exchange
// Accumulated text only ever grows; terminal states are sticky

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque handle identifying one streaming exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StreamId(Uuid);

impl StreamId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for StreamId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreamState {
    Pending,
    Streaming,
    Completed,
    Failed,
    Cancelled,
}

impl StreamState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }

    pub fn indicator(self) -> &'static str {
        match self {
            Self::Pending => "…",
            Self::Streaming => "●",
            Self::Completed => "✓",
            Self::Failed => "✗",
            Self::Cancelled => "⏹",
        }
    }
}

#[derive(Debug, Clone)]
pub struct StreamSession {
    id: StreamId,
    accumulated_text: String,
    state: StreamState,
    failure: Option<String>,
    created_at: DateTime<Utc>,
}

impl StreamSession {
    pub fn new() -> Self {
        Self::with_id(StreamId::new())
    }

    pub fn with_id(id: StreamId) -> Self {
        Self {
            id,
            accumulated_text: String::new(),
            state: StreamState::Pending,
            failure: None,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> StreamId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.accumulated_text
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Pending -> Streaming. Returns false if the session cannot start.
    pub(crate) fn begin(&mut self) -> bool {
        match self.state {
            StreamState::Pending => {
                self.state = StreamState::Streaming;
                true
            }
            StreamState::Streaming => true,
            _ => false,
        }
    }

    /// Append decoded text. Ignored once the session is terminal.
    pub(crate) fn append(&mut self, text: &str) -> bool {
        if self.state.is_terminal() || text.is_empty() {
            return false;
        }
        self.state = StreamState::Streaming;
        self.accumulated_text.push_str(text);
        true
    }

    pub(crate) fn complete(&mut self) -> bool {
        self.finish(StreamState::Completed)
    }

    pub(crate) fn fail(&mut self, reason: impl Into<String>) -> bool {
        if self.finish(StreamState::Failed) {
            self.failure = Some(reason.into());
            true
        } else {
            false
        }
    }

    /// Transition to Cancelled. No-op on an already terminal session.
    pub fn cancel(&mut self) -> bool {
        self.finish(StreamState::Cancelled)
    }

    fn finish(&mut self, terminal: StreamState) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        self.state = terminal;
        true
    }
}

impl Default for StreamSession {
    fn default() -> Self {
        Self::new()
    }
}
