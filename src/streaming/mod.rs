// ABOUTME: Incremental text-stream consumption shared by the chat advisor and report features

pub mod consumer;
pub mod decoder;
pub mod error;
pub mod observer;
pub mod session;

pub use consumer::{
    ActiveStream, BodyStream, CancelHandle, OpeningStream, PendingStream, StreamHandle, StreamRequest,
    StreamingTextConsumer,
};
pub use decoder::{DecodeError, Utf8StreamDecoder};
pub use error::{StreamError, StreamReadError, TransportError};
pub use observer::{ChannelObserver, StreamEvent, StreamObserver};
pub use session::{StreamId, StreamSession, StreamState};
