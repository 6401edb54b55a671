// ABOUTME: JSON request and response bodies exchanged with the churn service

use crate::models::{PredictionSummary, TabularRecord};
use serde::{Deserialize, Serialize};

/// Body of `POST /chat`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest<'a> {
    pub user_message: &'a str,
    pub churn_metrics: Option<&'a PredictionSummary>,
    /// `null` until a dataset has been analyzed
    pub top_risks: Option<Vec<&'a TabularRecord>>,
}

/// Body of `POST /generate_report`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRequest<'a> {
    pub churn_metrics: &'a PredictionSummary,
    pub top_risks: Vec<&'a TabularRecord>,
    pub csv_columns: Vec<String>,
}

/// Body of `POST /send_report`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailRequest<'a> {
    pub email: &'a str,
    pub report_markdown: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SendReportResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// FastAPI-style error body
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// `detail` as display text; validation errors arrive as arrays
    pub fn detail_text(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
            serde_json::Value::Null => None,
            serde_json::Value::String(_) => None,
            other => Some(other.to_string()),
        }
    }
}
