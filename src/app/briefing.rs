// ABOUTME: Executive report feature - streams the generated report into the report draft
// Regenerating cancels the session in flight; its late events no longer match the draft

use crate::export::rank;
use crate::models::{PredictionResponse, ReportDraft, TabularRecord, PROBABILITY_FIELD};
use crate::streaming::{
    OpeningStream, PendingStream, StreamEvent, StreamHandle, StreamId, StreamObserver,
    StreamingTextConsumer, TransportError,
};
use tracing::{debug, info, warn};

pub const REPORT_UNAVAILABLE: &str = "## Error\nFailed to generate report. Please try again.";
pub const REPORT_INTERRUPTED: &str = "_Report generation was interrupted. Please try again._";
pub const REPORT_STOPPED: &str = "_Report generation stopped._";

#[derive(Debug)]
pub struct ReportBriefing {
    context_limit: usize,
    stream: Option<StreamHandle>,
}

impl ReportBriefing {
    pub fn new(context_limit: usize) -> Self {
        Self {
            context_limit,
            stream: None,
        }
    }

    pub fn active_id(&self) -> Option<StreamId> {
        self.stream.as_ref().map(StreamHandle::id)
    }

    pub fn is_streaming(&self) -> bool {
        self.stream.is_some()
    }

    pub fn owns(&self, id: StreamId) -> bool {
        self.active_id() == Some(id)
    }

    /// Top-risk records and the dataset's column names
    pub fn context<'a>(&self, prediction: &'a PredictionResponse) -> (Vec<&'a TabularRecord>, Vec<String>) {
        let top = rank(&prediction.results, PROBABILITY_FIELD)
            .top(Some(self.context_limit))
            .to_vec();
        (top, prediction.columns())
    }

    /// Drop the current report and any session still writing to it
    pub fn restart(&mut self, draft: &mut ReportDraft) {
        if let Some(stream) = self.stream.take() {
            info!("Replacing report session {}", stream.id());
            stream.cancel();
        }
        draft.clear();
    }

    /// Bind the draft to a request that is still waiting for headers
    pub fn begin(&mut self, draft: &mut ReportDraft, opening: OpeningStream) -> StreamId {
        if let Some(previous) = self.stream.take() {
            previous.cancel();
        }
        let id = opening.id();
        draft.bind(id);
        self.stream = Some(StreamHandle::Opening(opening));
        debug!("Report {} waiting for the service", id);
        id
    }

    /// Start consuming the report body. Returns false when `pending` is not
    /// the request the draft is bound to.
    pub fn attach<O>(&mut self, pending: PendingStream, observer: O) -> bool
    where
        O: StreamObserver + Send + 'static,
    {
        let id = pending.id();
        if !matches!(&self.stream, Some(handle) if handle.is_opening() && handle.id() == id) {
            return false;
        }
        self.stream = Some(StreamHandle::Active(StreamingTextConsumer::spawn(pending, observer)));
        info!("Report streaming on session {}", id);
        true
    }

    /// The request could not even be built
    pub fn transport_failed(&mut self, draft: &mut ReportDraft, error: &TransportError) {
        warn!("Report request failed: {}", error);
        draft.set_unavailable(REPORT_UNAVAILABLE);
    }

    pub fn handle(&mut self, draft: &mut ReportDraft, event: &StreamEvent) -> bool {
        let applied = match event {
            StreamEvent::Update { id, text } => draft.sync(*id, text),
            StreamEvent::Completed { id, text } => draft.sync(*id, text) && draft.finish(*id),
            StreamEvent::Failed {
                id,
                reason,
                transport: true,
            } => {
                warn!("Report request {} failed: {}", id, reason);
                if draft.session() == Some(*id) {
                    draft.set_unavailable(REPORT_UNAVAILABLE);
                    true
                } else {
                    false
                }
            }
            StreamEvent::Failed { id, reason, .. } => {
                warn!("Report session {} failed: {}", id, reason);
                draft.fail(*id, REPORT_INTERRUPTED)
            }
            StreamEvent::Cancelled { id } => draft.fail(*id, REPORT_STOPPED),
        };

        if event.is_terminal() && self.owns(event.id()) {
            self.stream = None;
        }
        applied
    }

    /// Stop the report in flight, including one still waiting for the service
    pub fn cancel(&mut self, draft: &mut ReportDraft) -> bool {
        let Some(stream) = self.stream.take() else {
            return false;
        };
        stream.cancel();
        draft.fail(stream.id(), REPORT_STOPPED);
        true
    }
}
