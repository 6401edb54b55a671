// ABOUTME: StreamingTextConsumer driven by scripted bodies with timing, splits and cancellation

use async_stream::stream;
use churn_desk::streaming::{
    CancelHandle, ChannelObserver, StreamError, StreamEvent, StreamId, StreamObserver,
    StreamSession, StreamState, StreamingTextConsumer,
};
use pretty_assertions::assert_eq;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

#[derive(Default)]
struct Transcript {
    updates: Vec<String>,
    errors: Vec<String>,
    completed: Vec<String>,
    cancelled: usize,
}

impl StreamObserver for Transcript {
    fn on_update(&mut self, _id: StreamId, accumulated: &str) {
        self.updates.push(accumulated.to_string());
    }

    fn on_error(&mut self, _id: StreamId, error: &StreamError) {
        self.errors.push(error.to_string());
    }

    fn on_complete(&mut self, _id: StreamId, accumulated: &str) {
        self.completed.push(accumulated.to_string());
    }

    fn on_cancel(&mut self, _id: StreamId) {
        self.cancelled += 1;
    }
}

#[tokio::test]
async fn test_slow_body_with_split_emoji() {
    // 📉 is F0 9F 93 89, delivered one byte per chunk
    let body = Box::pin(stream! {
        yield Ok::<_, String>(b"Churn ".to_vec());
        for byte in [0xF0u8, 0x9F, 0x93, 0x89] {
            tokio::time::sleep(Duration::from_millis(5)).await;
            yield Ok(vec![byte]);
        }
        yield Ok(b" down 4%".to_vec());
    });

    let mut session = StreamSession::new();
    let mut observer = Transcript::default();
    let state =
        StreamingTextConsumer::consume(&mut session, body, &CancelHandle::new(), &mut observer).await;

    assert_eq!(state, StreamState::Completed);
    assert_eq!(session.text(), "Churn 📉 down 4%");
    // Partial bytes produce no update of their own
    assert_eq!(observer.updates, vec!["Churn ", "Churn 📉", "Churn 📉 down 4%"]);
    assert_eq!(observer.completed, vec!["Churn 📉 down 4%"]);
    assert!(observer.errors.is_empty());
}

#[tokio::test]
async fn test_invalid_bytes_deliver_valid_prefix_then_fail() {
    let body = Box::pin(stream! {
        yield Ok::<_, String>(b"Risk: ".to_vec());
        yield Ok(b"high \xFF\xFE".to_vec());
        yield Ok(b"never read".to_vec());
    });

    let mut session = StreamSession::new();
    let mut observer = Transcript::default();
    let state =
        StreamingTextConsumer::consume(&mut session, body, &CancelHandle::new(), &mut observer).await;

    assert_eq!(state, StreamState::Failed);
    assert_eq!(session.text(), "Risk: high ");
    assert_eq!(observer.updates, vec!["Risk: ", "Risk: high "]);
    assert_eq!(observer.errors.len(), 1);
    assert!(observer.completed.is_empty());
}

#[tokio::test]
async fn test_read_error_after_partial_text() {
    let body = Box::pin(stream! {
        yield Ok::<Vec<u8>, String>(b"## Key Drivers\n".to_vec());
        yield Err("connection reset by peer".to_string());
    });

    let mut session = StreamSession::new();
    let mut observer = Transcript::default();
    let state =
        StreamingTextConsumer::consume(&mut session, body, &CancelHandle::new(), &mut observer).await;

    assert_eq!(state, StreamState::Failed);
    assert_eq!(session.text(), "## Key Drivers\n");
    assert_eq!(observer.errors.len(), 1);
    assert!(observer.errors[0].contains("connection reset by peer"));
    assert!(session.failure().is_some());
}

#[tokio::test]
async fn test_cancel_before_reading_delivers_nothing() {
    let body = Box::pin(stream! {
        yield Ok::<_, String>(b"ignored".to_vec());
    });
    let cancel = CancelHandle::new();
    cancel.cancel();

    let mut session = StreamSession::new();
    let mut observer = Transcript::default();
    let state = StreamingTextConsumer::consume(&mut session, body, &cancel, &mut observer).await;

    assert_eq!(state, StreamState::Cancelled);
    assert_eq!(session.text(), "");
    assert!(observer.updates.is_empty());
    assert_eq!(observer.cancelled, 1);
}

#[tokio::test]
async fn test_channel_fed_body_cancelled_between_chunks() {
    let (chunk_tx, chunk_rx) = mpsc::unbounded_channel::<Result<Vec<u8>, String>>();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<StreamEvent>();
    let cancel = CancelHandle::new();

    let task_cancel = cancel.clone();
    let task = tokio::spawn(async move {
        let mut session = StreamSession::new();
        let mut observer = ChannelObserver::new(event_tx);
        let body = UnboundedReceiverStream::new(chunk_rx);
        let state = StreamingTextConsumer::consume(&mut session, body, &task_cancel, &mut observer).await;
        (state, session)
    });

    chunk_tx.send(Ok(b"Offer a ".to_vec())).unwrap();
    let first = event_rx.recv().await.unwrap();
    assert!(matches!(first, StreamEvent::Update { ref text, .. } if text == "Offer a "));

    chunk_tx.send(Ok(b"loyalty discount".to_vec())).unwrap();
    let second = event_rx.recv().await.unwrap();
    assert!(matches!(second, StreamEvent::Update { ref text, .. } if text == "Offer a loyalty discount"));

    cancel.cancel();
    let last = event_rx.recv().await.unwrap();
    assert!(matches!(last, StreamEvent::Cancelled { .. }));

    // Chunks sent after cancellation are never appended
    let _ = chunk_tx.send(Ok(b" to everyone".to_vec()));
    let (state, session) = task.await.unwrap();
    assert_eq!(state, StreamState::Cancelled);
    assert_eq!(session.text(), "Offer a loyalty discount");
    assert_eq!(event_rx.recv().await, None);
}

#[tokio::test]
async fn test_closed_channel_completes_session() {
    let (chunk_tx, chunk_rx) = mpsc::unbounded_channel::<Result<Vec<u8>, String>>();
    chunk_tx.send(Ok("Retention looks ".as_bytes().to_vec())).unwrap();
    chunk_tx.send(Ok("stable.".as_bytes().to_vec())).unwrap();
    drop(chunk_tx);

    let mut session = StreamSession::new();
    let mut observer = Transcript::default();
    let state = StreamingTextConsumer::consume(
        &mut session,
        UnboundedReceiverStream::new(chunk_rx),
        &CancelHandle::new(),
        &mut observer,
    )
    .await;

    assert_eq!(state, StreamState::Completed);
    assert_eq!(observer.completed, vec!["Retention looks stable."]);
    assert_eq!(observer.updates.len(), 2);
}
