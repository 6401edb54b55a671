// ABOUTME: Core data models for prediction results, chat transcripts, and report drafts

pub mod conversation;
pub mod prediction;
pub mod record;
pub mod report;

pub use conversation::{ConversationTranscript, Exchange, Role, TranscriptError};
pub use prediction::{PredictionResponse, PredictionSummary, RecordView, PREDICTION_FIELD, PROBABILITY_FIELD};
pub use record::{scalar_to_string, TabularRecord};
pub use report::ReportDraft;
