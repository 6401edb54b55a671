// ABOUTME: Chat transcript model - ordered user/assistant exchanges
// Only the single open assistant reply may change, and only while its stream runs

use crate::streaming::StreamId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub role: Role,
    pub text: String,
    pub created_at: DateTime<Utc>,
    /// Set while this assistant reply is still receiving text
    stream: Option<StreamId>,
}

impl Exchange {
    pub fn user(text: impl Into<String>) -> Self {
        Self::closed(Role::User, text.into())
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::closed(Role::Assistant, text.into())
    }

    fn closed(role: Role, text: String) -> Self {
        Self {
            role,
            text,
            created_at: Utc::now(),
            stream: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranscriptError {
    #[error("an assistant reply is still streaming")]
    ReplyInProgress,
}

#[derive(Debug, Clone, Default)]
pub struct ConversationTranscript {
    exchanges: Vec<Exchange>,
}

impl ConversationTranscript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        Self {
            exchanges: vec![Exchange::assistant(greeting)],
        }
    }

    pub fn exchanges(&self) -> &[Exchange] {
        &self.exchanges
    }

    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }

    pub fn last(&self) -> Option<&Exchange> {
        self.exchanges.last()
    }

    /// Stream feeding the open reply, if any
    pub fn open_reply(&self) -> Option<StreamId> {
        self.exchanges.last().and_then(|e| e.stream)
    }

    pub fn push_user(&mut self, text: impl Into<String>) -> Result<(), TranscriptError> {
        self.ensure_closed()?;
        self.exchanges.push(Exchange::user(text));
        Ok(())
    }

    /// Append a finished assistant message, e.g. a transport failure notice
    pub fn push_assistant(&mut self, text: impl Into<String>) -> Result<(), TranscriptError> {
        self.ensure_closed()?;
        self.exchanges.push(Exchange::assistant(text));
        Ok(())
    }

    /// Open an empty assistant reply bound to `stream`
    pub fn begin_reply(&mut self, stream: StreamId) -> Result<(), TranscriptError> {
        self.ensure_closed()?;
        let mut reply = Exchange::assistant(String::new());
        reply.stream = Some(stream);
        self.exchanges.push(reply);
        Ok(())
    }

    /// Replace the open reply's text with the stream's accumulated text.
    /// Returns false when `stream` does not own the open reply.
    pub fn update_reply(&mut self, stream: StreamId, accumulated: &str) -> bool {
        match self.open_reply_mut(stream) {
            Some(reply) => {
                reply.text.clear();
                reply.text.push_str(accumulated);
                true
            }
            None => false,
        }
    }

    pub fn close_reply(&mut self, stream: StreamId) -> bool {
        match self.open_reply_mut(stream) {
            Some(reply) => {
                reply.stream = None;
                true
            }
            None => false,
        }
    }

    /// Close the open reply after a failure, keeping any partial text and
    /// appending `notice`
    pub fn fail_reply(&mut self, stream: StreamId, notice: &str) -> bool {
        match self.open_reply_mut(stream) {
            Some(reply) => {
                if reply.text.is_empty() {
                    reply.text.push_str(notice);
                } else {
                    reply.text.push_str("\n\n");
                    reply.text.push_str(notice);
                }
                reply.stream = None;
                true
            }
            None => false,
        }
    }

    fn open_reply_mut(&mut self, stream: StreamId) -> Option<&mut Exchange> {
        self.exchanges
            .last_mut()
            .filter(|e| e.stream == Some(stream))
    }

    fn ensure_closed(&self) -> Result<(), TranscriptError> {
        if self.open_reply().is_some() {
            Err(TranscriptError::ReplyInProgress)
        } else {
            Ok(())
        }
    }
}
