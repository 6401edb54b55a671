// ABOUTME: Observer seam between the stream consumer and the features rendering its output
// ChannelObserver turns callbacks into StreamEvent messages for the UI tick loop

use super::error::StreamError;
use super::session::StreamId;
use tokio::sync::mpsc;
use tracing::debug;

/// Receives the progress of one stream session, in read order, on the
/// consuming task.
pub trait StreamObserver {
    /// Called after every non-empty append with the full accumulated text
    fn on_update(&mut self, id: StreamId, accumulated: &str);

    /// Called exactly once when the session fails
    fn on_error(&mut self, id: StreamId, error: &StreamError);

    fn on_complete(&mut self, _id: StreamId, _accumulated: &str) {}

    fn on_cancel(&mut self, _id: StreamId) {}
}

/// Message form of observer callbacks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    Update { id: StreamId, text: String },
    Completed { id: StreamId, text: String },
    Failed { id: StreamId, reason: String, transport: bool },
    Cancelled { id: StreamId },
}

impl StreamEvent {
    pub fn id(&self) -> StreamId {
        match self {
            Self::Update { id, .. }
            | Self::Completed { id, .. }
            | Self::Failed { id, .. }
            | Self::Cancelled { id } => *id,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Update { .. })
    }
}

/// Forwards observer callbacks over an unbounded channel.
///
/// Generic over the message type so the app can carry stream events inside
/// its own message enum.
#[derive(Debug)]
pub struct ChannelObserver<T> {
    sender: mpsc::UnboundedSender<T>,
}

impl<T> ChannelObserver<T> {
    pub fn new(sender: mpsc::UnboundedSender<T>) -> Self {
        Self { sender }
    }
}

impl<T> Clone for ChannelObserver<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: From<StreamEvent>> ChannelObserver<T> {
    fn forward(&self, event: StreamEvent) {
        if self.sender.send(T::from(event)).is_err() {
            debug!("Stream event dropped: receiver closed");
        }
    }
}

impl<T: From<StreamEvent>> StreamObserver for ChannelObserver<T> {
    fn on_update(&mut self, id: StreamId, accumulated: &str) {
        self.forward(StreamEvent::Update {
            id,
            text: accumulated.to_string(),
        });
    }

    fn on_error(&mut self, id: StreamId, error: &StreamError) {
        self.forward(StreamEvent::Failed {
            id,
            reason: error.to_string(),
            transport: error.is_transport(),
        });
    }

    fn on_complete(&mut self, id: StreamId, accumulated: &str) {
        self.forward(StreamEvent::Completed {
            id,
            text: accumulated.to_string(),
        });
    }

    fn on_cancel(&mut self, id: StreamId) {
        self.forward(StreamEvent::Cancelled { id });
    }
}
