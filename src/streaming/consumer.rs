// ABOUTME: StreamingTextConsumer - opens streaming HTTP requests and accumulates their text
// Reads chunks in order, decodes them statefully, and notifies an observer after each append

use super::decoder::{DecodeError, Utf8StreamDecoder};
use super::error::{StreamError, StreamReadError, TransportError};
use super::observer::StreamObserver;
use super::session::{StreamId, StreamSession, StreamState};
use chrono::Utc;
use futures_util::stream::BoxStream;
use futures_util::{Stream, StreamExt};
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

/// Response body as delivered by the transport
pub type BodyStream = BoxStream<'static, Result<Vec<u8>, reqwest::Error>>;

/// Target endpoint plus JSON payload for one streaming request
#[derive(Debug, Clone, PartialEq)]
pub struct StreamRequest {
    endpoint: String,
    payload: Value,
}

impl StreamRequest {
    pub fn json<T: Serialize + ?Sized>(
        endpoint: impl Into<String>,
        payload: &T,
    ) -> Result<Self, TransportError> {
        Ok(Self {
            endpoint: endpoint.into(),
            payload: serde_json::to_value(payload)?,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }
}

/// A dispatched request whose body has not been read yet
pub struct PendingStream {
    session: StreamSession,
    body: BodyStream,
}

impl PendingStream {
    pub fn new(session: StreamSession, body: BodyStream) -> Self {
        Self { session, body }
    }

    pub fn id(&self) -> StreamId {
        self.session.id()
    }

    pub fn into_parts(self) -> (StreamSession, BodyStream) {
        (self.session, self.body)
    }
}

impl fmt::Debug for PendingStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingStream")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

/// Cooperative cancellation flag shared between a consuming task and its owner
#[derive(Debug, Clone)]
pub struct CancelHandle {
    sender: Arc<watch::Sender<bool>>,
    receiver: watch::Receiver<bool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        let (sender, receiver) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
            receiver,
        }
    }

    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Resolves once `cancel` has been called
    pub async fn cancelled(&self) {
        let mut receiver = self.receiver.clone();
        if receiver.wait_for(|cancelled| *cancelled).await.is_err() {
            // Sender is owned by self, so this only happens during teardown
            std::future::pending::<()>().await;
        }
    }
}

impl Default for CancelHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// A session being consumed on its own tokio task
#[derive(Debug)]
pub struct ActiveStream {
    id: StreamId,
    cancel: CancelHandle,
    handle: JoinHandle<StreamSession>,
}

impl ActiveStream {
    pub fn id(&self) -> StreamId {
        self.id
    }

    /// Stop reading and release the response. Safe to call repeatedly.
    pub fn cancel(&self) {
        debug!("Cancelling stream session {}", self.id);
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the consuming task and hand back the finished session
    pub async fn join(self) -> Option<StreamSession> {
        match self.handle.await {
            Ok(session) => Some(session),
            Err(e) => {
                error!("Stream task for session {} did not finish: {}", self.id, e);
                None
            }
        }
    }
}

/// A request still waiting for its response headers
#[derive(Debug)]
pub struct OpeningStream {
    id: StreamId,
    task: JoinHandle<()>,
}

impl OpeningStream {
    pub fn new(id: StreamId, task: JoinHandle<()>) -> Self {
        Self { id, task }
    }

    pub fn id(&self) -> StreamId {
        self.id
    }

    /// Drop the in-flight request. Nothing is reported for an aborted open.
    pub fn abort(&self) {
        debug!("Aborting stream request {}", self.id);
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// The stream a feature currently owns, from request to end of body
#[derive(Debug)]
pub enum StreamHandle {
    Opening(OpeningStream),
    Active(ActiveStream),
}

impl StreamHandle {
    pub fn id(&self) -> StreamId {
        match self {
            Self::Opening(opening) => opening.id(),
            Self::Active(active) => active.id(),
        }
    }

    pub fn is_opening(&self) -> bool {
        matches!(self, Self::Opening(_))
    }

    pub fn cancel(&self) {
        match self {
            Self::Opening(opening) => opening.abort(),
            Self::Active(active) => active.cancel(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StreamingTextConsumer {
    client: reqwest::Client,
}

impl StreamingTextConsumer {
    pub fn new(connect_timeout: Duration) -> Result<Self, TransportError> {
        // No overall timeout: streamed answers can legitimately take minutes
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Issue the request. On success a Pending session exists and its body
    /// is ready to be consumed; on failure nothing was created.
    pub async fn open(&self, request: &StreamRequest) -> Result<PendingStream, TransportError> {
        self.open_as(StreamId::new(), request).await
    }

    /// Open the request on its own task so the caller never waits for headers.
    ///
    /// `on_open` receives the pending stream once headers arrive. A transport
    /// failure is reported to `observer` as an error on `id`.
    pub fn open_detached<O, F>(
        &self,
        id: StreamId,
        request: StreamRequest,
        mut observer: O,
        on_open: F,
    ) -> OpeningStream
    where
        O: StreamObserver + Send + 'static,
        F: FnOnce(PendingStream) + Send + 'static,
    {
        let consumer = self.clone();
        let task = tokio::spawn(async move {
            match consumer.open_as(id, &request).await {
                Ok(pending) => on_open(pending),
                Err(e) => observer.on_error(id, &StreamError::Transport(e)),
            }
        });
        OpeningStream::new(id, task)
    }

    /// Same as `open`, with the session id chosen by the caller
    pub async fn open_as(
        &self,
        id: StreamId,
        request: &StreamRequest,
    ) -> Result<PendingStream, TransportError> {
        let url = reqwest::Url::parse(request.endpoint())
            .map_err(|e| TransportError::InvalidUrl(format!("{}: {}", request.endpoint(), e)))?;

        info!("Opening stream to {}", url);
        let response = self
            .client
            .post(url)
            .json(request.payload())
            .send()
            .await
            .map_err(|e| {
                warn!("Stream request failed to dispatch: {}", e);
                TransportError::Dispatch(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Stream endpoint answered {}: {}", status, body);
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }
        if status == StatusCode::NO_CONTENT {
            warn!("Stream endpoint returned no body");
            return Err(TransportError::NoBody);
        }

        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()))
            .boxed();
        let session = StreamSession::with_id(id);
        debug!("Stream session {} pending", session.id());

        Ok(PendingStream::new(session, body))
    }

    /// Read `body` to the end, appending decoded text to `session`.
    ///
    /// Observer calls happen on the calling task, in read order. Once
    /// `cancel` fires, no further update or error is delivered.
    pub async fn consume<S, B, E, O>(
        session: &mut StreamSession,
        mut body: S,
        cancel: &CancelHandle,
        observer: &mut O,
    ) -> StreamState
    where
        S: Stream<Item = Result<B, E>> + Unpin,
        B: AsRef<[u8]>,
        E: fmt::Display,
        O: StreamObserver + ?Sized,
    {
        let id = session.id();
        if cancel.is_cancelled() {
            return Self::finish_cancelled(session, observer);
        }
        if !session.begin() {
            debug!("Session {} already {:?}, nothing to consume", id, session.state());
            return session.state();
        }

        let mut decoder = Utf8StreamDecoder::new();
        let mut chunks = 0usize;

        loop {
            let next = tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    return Self::finish_cancelled(session, observer);
                }
                next = body.next() => next,
            };

            match next {
                Some(Ok(chunk)) => {
                    chunks += 1;
                    let bytes = chunk.as_ref();
                    trace!(
                        "Session {} chunk #{} ({} bytes, {} held)",
                        id,
                        chunks,
                        bytes.len(),
                        decoder.pending_len()
                    );

                    match decoder.decode(bytes) {
                        Ok(text) => Self::deliver(session, &text, cancel, observer),
                        Err(err) => {
                            if let DecodeError::InvalidSequence { valid_prefix, .. } = &err {
                                Self::deliver(session, valid_prefix, cancel, observer);
                            }
                            return Self::finish_failed(
                                session,
                                StreamReadError::Decode(err),
                                cancel,
                                observer,
                            );
                        }
                    }
                }
                Some(Err(e)) => {
                    return Self::finish_failed(
                        session,
                        StreamReadError::Connection(e.to_string()),
                        cancel,
                        observer,
                    );
                }
                None => {
                    if let Err(err) = decoder.finish() {
                        return Self::finish_failed(
                            session,
                            StreamReadError::Decode(err),
                            cancel,
                            observer,
                        );
                    }
                    if cancel.is_cancelled() {
                        return Self::finish_cancelled(session, observer);
                    }
                    session.complete();
                    info!(
                        "Stream session {} completed: {} chunks, {} chars in {} ms",
                        id,
                        chunks,
                        session.text().chars().count(),
                        (Utc::now() - session.created_at()).num_milliseconds()
                    );
                    observer.on_complete(id, session.text());
                    return StreamState::Completed;
                }
            }
        }
    }

    /// Consume `pending` on a new tokio task
    pub fn spawn<O>(pending: PendingStream, mut observer: O) -> ActiveStream
    where
        O: StreamObserver + Send + 'static,
    {
        let (mut session, body) = pending.into_parts();
        let id = session.id();
        let cancel = CancelHandle::new();
        let task_cancel = cancel.clone();

        let handle = tokio::spawn(async move {
            Self::consume(&mut session, body, &task_cancel, &mut observer).await;
            session
        });

        ActiveStream { id, cancel, handle }
    }

    fn deliver<O: StreamObserver + ?Sized>(
        session: &mut StreamSession,
        text: &str,
        cancel: &CancelHandle,
        observer: &mut O,
    ) {
        if cancel.is_cancelled() {
            return;
        }
        if session.append(text) {
            observer.on_update(session.id(), session.text());
        }
    }

    fn finish_failed<O: StreamObserver + ?Sized>(
        session: &mut StreamSession,
        err: StreamReadError,
        cancel: &CancelHandle,
        observer: &mut O,
    ) -> StreamState {
        if cancel.is_cancelled() {
            return Self::finish_cancelled(session, observer);
        }
        error!("Stream session {} failed: {}", session.id(), err);
        if session.fail(err.to_string()) {
            observer.on_error(session.id(), &StreamError::Read(err));
        }
        session.state()
    }

    fn finish_cancelled<O: StreamObserver + ?Sized>(
        session: &mut StreamSession,
        observer: &mut O,
    ) -> StreamState {
        if session.cancel() {
            info!(
                "Stream session {} cancelled after {} chars",
                session.id(),
                session.text().chars().count()
            );
            observer.on_cancel(session.id());
        }
        session.state()
    }
}
