// ABOUTME: Chat advisor feature - streams assistant replies into the conversation transcript
// One reply at a time; events from any other stream session are dropped

use crate::export::rank;
use crate::models::{
    ConversationTranscript, PredictionResponse, TabularRecord, TranscriptError, PROBABILITY_FIELD,
};
use crate::streaming::{
    OpeningStream, PendingStream, StreamEvent, StreamHandle, StreamId, StreamObserver,
    StreamingTextConsumer, TransportError,
};
use tracing::{debug, info, warn};

pub const GREETING: &str = "Hello! I am Persona, your AI Data Scientist. I can analyze your churn results and suggest retention strategies. Ask me anything!";
pub const FALLBACK_REPLY: &str = "I'm having trouble thinking right now. Please try again.";
pub const STOPPED_NOTICE: &str = "_Reply stopped._";

#[derive(Debug)]
pub struct ChatAdvisor {
    context_limit: usize,
    stream: Option<StreamHandle>,
}

impl ChatAdvisor {
    pub fn new(context_limit: usize) -> Self {
        Self {
            context_limit,
            stream: None,
        }
    }

    pub fn transcript() -> ConversationTranscript {
        ConversationTranscript::with_greeting(GREETING)
    }

    pub fn active_id(&self) -> Option<StreamId> {
        self.stream.as_ref().map(StreamHandle::id)
    }

    /// True from the moment a question is sent until its reply ends
    pub fn is_streaming(&self) -> bool {
        self.stream.is_some()
    }

    pub fn owns(&self, id: StreamId) -> bool {
        self.active_id() == Some(id)
    }

    /// Highest-risk records sent along with each question
    pub fn context<'a>(&self, prediction: Option<&'a PredictionResponse>) -> Vec<&'a TabularRecord> {
        prediction
            .map(|p| {
                rank(&p.results, PROBABILITY_FIELD)
                    .top(Some(self.context_limit))
                    .to_vec()
            })
            .unwrap_or_default()
    }

    /// Record the user's question. Refused while a reply is still open.
    pub fn ask(
        &self,
        transcript: &mut ConversationTranscript,
        message: &str,
    ) -> Result<(), TranscriptError> {
        transcript.push_user(message)?;
        debug!("Chat question queued ({} chars)", message.len());
        Ok(())
    }

    /// Open the assistant reply for a request that is still waiting for headers
    pub fn begin(
        &mut self,
        transcript: &mut ConversationTranscript,
        opening: OpeningStream,
    ) -> Result<StreamId, TranscriptError> {
        let id = opening.id();
        if let Err(e) = transcript.begin_reply(id) {
            opening.abort();
            return Err(e);
        }
        self.stream = Some(StreamHandle::Opening(opening));
        debug!("Chat reply {} waiting for the service", id);
        Ok(id)
    }

    /// Start consuming the reply body. Returns false when `pending` is not
    /// the request this advisor is waiting on.
    pub fn attach<O>(&mut self, pending: PendingStream, observer: O) -> bool
    where
        O: StreamObserver + Send + 'static,
    {
        let id = pending.id();
        if !matches!(&self.stream, Some(handle) if handle.is_opening() && handle.id() == id) {
            return false;
        }
        self.stream = Some(StreamHandle::Active(StreamingTextConsumer::spawn(pending, observer)));
        info!("Chat reply streaming on session {}", id);
        true
    }

    /// The request could not even be built
    pub fn transport_failed(&mut self, transcript: &mut ConversationTranscript, error: &TransportError) {
        warn!("Chat request failed: {}", error);
        if let Err(e) = transcript.push_assistant(FALLBACK_REPLY) {
            warn!("Could not record chat fallback: {}", e);
        }
    }

    /// Apply a stream event to the transcript. Returns false for events that
    /// belong to no open reply.
    pub fn handle(&mut self, transcript: &mut ConversationTranscript, event: &StreamEvent) -> bool {
        let applied = match event {
            StreamEvent::Update { id, text } => transcript.update_reply(*id, text),
            StreamEvent::Completed { id, text } => {
                transcript.update_reply(*id, text) && transcript.close_reply(*id)
            }
            StreamEvent::Failed {
                id,
                reason,
                transport,
            } => {
                if *transport {
                    warn!("Chat request {} failed: {}", id, reason);
                } else {
                    warn!("Chat reply {} failed: {}", id, reason);
                }
                transcript.fail_reply(*id, FALLBACK_REPLY)
            }
            StreamEvent::Cancelled { id } => transcript.fail_reply(*id, STOPPED_NOTICE),
        };

        if event.is_terminal() && self.owns(event.id()) {
            self.stream = None;
        }
        applied
    }

    /// Stop the reply in flight, keeping what has arrived so far. Works
    /// before the service has answered too.
    pub fn cancel(&mut self, transcript: &mut ConversationTranscript) -> bool {
        let Some(stream) = self.stream.take() else {
            return false;
        };
        stream.cancel();
        transcript.fail_reply(stream.id(), STOPPED_NOTICE);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PredictionSummary, Role};
    use crate::streaming::{BodyStream, ChannelObserver, StreamSession};
    use futures_util::{stream, StreamExt};
    use pretty_assertions::assert_eq;
    use tokio::sync::mpsc;

    fn opening(id: StreamId) -> OpeningStream {
        OpeningStream::new(id, tokio::spawn(async {}))
    }

    fn body(parts: &[&[u8]]) -> BodyStream {
        let chunks: Vec<Result<Vec<u8>, reqwest::Error>> =
            parts.iter().map(|p| Ok(p.to_vec())).collect();
        stream::iter(chunks).boxed()
    }

    fn start(
        advisor: &mut ChatAdvisor,
        transcript: &mut ConversationTranscript,
        body: BodyStream,
        tx: mpsc::UnboundedSender<StreamEvent>,
    ) -> StreamId {
        let id = StreamId::new();
        advisor.begin(transcript, opening(id)).unwrap();
        assert!(advisor.attach(
            PendingStream::new(StreamSession::with_id(id), body),
            ChannelObserver::new(tx)
        ));
        id
    }

    async fn drain(
        advisor: &mut ChatAdvisor,
        transcript: &mut ConversationTranscript,
        rx: &mut mpsc::UnboundedReceiver<StreamEvent>,
    ) {
        while let Some(event) = rx.recv().await {
            let done = event.is_terminal();
            advisor.handle(transcript, &event);
            if done {
                break;
            }
        }
    }

    #[tokio::test]
    async fn test_reply_streams_into_transcript() {
        let (tx, mut rx) = mpsc::unbounded_channel::<StreamEvent>();
        let mut advisor = ChatAdvisor::new(5);
        let mut transcript = ChatAdvisor::transcript();

        advisor.ask(&mut transcript, "Who churns?").unwrap();
        start(&mut advisor, &mut transcript, body(&[b"Month-to-month ", b"customers."]), tx);
        assert!(advisor.is_streaming());
        assert!(advisor.ask(&mut transcript, "again").is_err());

        drain(&mut advisor, &mut transcript, &mut rx).await;

        let last = transcript.last().unwrap();
        assert_eq!(last.role, Role::Assistant);
        assert_eq!(last.text, "Month-to-month customers.");
        assert!(!last.is_open());
        assert!(!advisor.is_streaming());
        assert_eq!(transcript.len(), 3);
    }

    #[tokio::test]
    async fn test_mid_stream_failure_keeps_partial() {
        let (tx, mut rx) = mpsc::unbounded_channel::<StreamEvent>();
        let mut advisor = ChatAdvisor::new(5);
        let mut transcript = ChatAdvisor::transcript();

        advisor.ask(&mut transcript, "Why?").unwrap();
        start(&mut advisor, &mut transcript, body(&[b"Because ", b"\xFF"]), tx);
        drain(&mut advisor, &mut transcript, &mut rx).await;

        assert_eq!(
            transcript.last().unwrap().text,
            format!("Because \n\n{}", FALLBACK_REPLY)
        );
        assert!(transcript.open_reply().is_none());
    }

    #[tokio::test]
    async fn test_cancel_keeps_delivered_text() {
        let (tx, mut rx) = mpsc::unbounded_channel::<StreamEvent>();
        let mut advisor = ChatAdvisor::new(5);
        let mut transcript = ChatAdvisor::transcript();

        let hanging = stream::iter(vec![Ok::<_, reqwest::Error>(b"Partial".to_vec())])
            .chain(stream::pending())
            .boxed();
        advisor.ask(&mut transcript, "Long answer please").unwrap();
        let id = start(&mut advisor, &mut transcript, hanging, tx);

        let first = rx.recv().await.unwrap();
        assert!(advisor.handle(&mut transcript, &first));
        assert!(advisor.cancel(&mut transcript));
        assert!(!advisor.cancel(&mut transcript));

        assert_eq!(rx.recv().await, Some(StreamEvent::Cancelled { id }));
        assert_eq!(
            transcript.last().unwrap().text,
            format!("Partial\n\n{}", STOPPED_NOTICE)
        );
        assert!(transcript.push_user("next").is_ok());
    }

    #[tokio::test]
    async fn test_cancel_before_service_answers() {
        let (tx, _rx) = mpsc::unbounded_channel::<StreamEvent>();
        let mut advisor = ChatAdvisor::new(5);
        let mut transcript = ChatAdvisor::transcript();
        let id = StreamId::new();

        advisor.ask(&mut transcript, "Anyone there?").unwrap();
        advisor
            .begin(&mut transcript, OpeningStream::new(id, tokio::spawn(std::future::pending())))
            .unwrap();
        assert!(transcript.open_reply().is_some());

        assert!(advisor.cancel(&mut transcript));
        assert!(!advisor.is_streaming());
        assert_eq!(transcript.last().unwrap().text, STOPPED_NOTICE);

        // Headers arriving after the cancel are not attached
        let late = PendingStream::new(StreamSession::with_id(id), body(&[b"too late"]));
        assert!(!advisor.attach(late, ChannelObserver::new(tx)));
    }

    #[tokio::test]
    async fn test_transport_failure_event_adds_fallback() {
        let mut advisor = ChatAdvisor::new(5);
        let mut transcript = ChatAdvisor::transcript();
        let id = StreamId::new();

        advisor.ask(&mut transcript, "Hi").unwrap();
        advisor.begin(&mut transcript, opening(id)).unwrap();
        let failed = StreamEvent::Failed {
            id,
            reason: "connection refused".into(),
            transport: true,
        };
        assert!(advisor.handle(&mut transcript, &failed));

        assert_eq!(transcript.last().unwrap().text, FALLBACK_REPLY);
        assert!(transcript.open_reply().is_none());
        assert!(!advisor.is_streaming());
    }

    #[tokio::test]
    async fn test_attach_rejects_unknown_session() {
        let (tx, _rx) = mpsc::unbounded_channel::<StreamEvent>();
        let mut advisor = ChatAdvisor::new(5);
        let mut transcript = ChatAdvisor::transcript();

        advisor.ask(&mut transcript, "Hi").unwrap();
        advisor.begin(&mut transcript, opening(StreamId::new())).unwrap();

        let other = PendingStream::new(StreamSession::new(), body(&[b"x"]));
        assert!(!advisor.attach(other, ChannelObserver::new(tx)));
    }

    #[test]
    fn test_unbuildable_request_adds_fallback() {
        let mut advisor = ChatAdvisor::new(5);
        let mut transcript = ChatAdvisor::transcript();

        advisor.ask(&mut transcript, "Hi").unwrap();
        advisor.transport_failed(&mut transcript, &TransportError::NoBody);

        assert_eq!(transcript.last().unwrap().text, FALLBACK_REPLY);
        assert!(!advisor.is_streaming());
    }

    #[test]
    fn test_stale_events_are_dropped() {
        let mut advisor = ChatAdvisor::new(5);
        let mut transcript = ChatAdvisor::transcript();
        let before = transcript.exchanges().to_vec();

        let stale = StreamEvent::Update {
            id: StreamId::new(),
            text: "late".into(),
        };
        assert!(!advisor.handle(&mut transcript, &stale));
        assert_eq!(transcript.exchanges(), before.as_slice());
    }

    #[test]
    fn test_context_is_top_risks() {
        let advisor = ChatAdvisor::new(2);
        let prediction = PredictionResponse {
            summary: PredictionSummary {
                total_customers: 3,
                churn_rate: 0.33,
                high_risk_count: 1,
            },
            results: vec![
                TabularRecord::new().with("id", "a").with(PROBABILITY_FIELD, 0.1),
                TabularRecord::new().with("id", "b").with(PROBABILITY_FIELD, 0.8),
                TabularRecord::new().with("id", "c").with(PROBABILITY_FIELD, 0.4),
            ],
        };

        let ids: Vec<String> = advisor
            .context(Some(&prediction))
            .iter()
            .filter_map(|r| r.text("id"))
            .collect();
        assert_eq!(ids, vec!["b", "c"]);
        assert!(advisor.context(None).is_empty());
    }
}
