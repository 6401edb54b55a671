// ABOUTME: Prediction service response model and display helpers for result rows

use super::record::TabularRecord;
use serde::{Deserialize, Serialize};

/// Field the prediction service adds with the churn probability
pub const PROBABILITY_FIELD: &str = "churn_probability";
/// Field the prediction service adds with the 0/1 churn label
pub const PREDICTION_FIELD: &str = "churn_prediction";

/// Churn rate above which the dashboard flags a critical alert
pub const CRITICAL_CHURN_RATE: f64 = 0.3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionSummary {
    pub total_customers: u64,
    pub churn_rate: f64,
    pub high_risk_count: u64,
}

impl PredictionSummary {
    pub fn churn_rate_percent(&self) -> String {
        format!("{:.1}%", self.churn_rate * 100.0)
    }

    pub fn is_critical(&self) -> bool {
        self.churn_rate > CRITICAL_CHURN_RATE
    }

    pub fn health_label(&self) -> &'static str {
        if self.is_critical() {
            "Critical Alert"
        } else {
            "Healthy Range"
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub summary: PredictionSummary,
    pub results: Vec<TabularRecord>,
}

impl PredictionResponse {
    /// Column names of the dataset, taken from the first record
    pub fn columns(&self) -> Vec<String> {
        self.results
            .first()
            .map(|record| record.fields().map(str::to_string).collect())
            .unwrap_or_default()
    }
}

/// Read-only view of a result row with the dashboard's column fallbacks
#[derive(Debug, Clone, Copy)]
pub struct RecordView<'a> {
    record: &'a TabularRecord,
    position: usize,
}

impl<'a> RecordView<'a> {
    /// `position` is the zero-based rank of the row in the table
    pub fn new(record: &'a TabularRecord, position: usize) -> Self {
        Self { record, position }
    }

    pub fn customer_id(&self) -> String {
        self.first_text(&["customerID", "customer_id"])
            .unwrap_or_else(|| format!("#{}", self.position + 1))
    }

    pub fn contract(&self) -> String {
        self.first_text(&["contract", "contract_type"])
            .unwrap_or_else(|| "-".to_string())
    }

    pub fn tenure(&self) -> String {
        match self.first_text(&["tenure", "tenure_months"]) {
            Some(months) => format!("{} months", months),
            None => "-".to_string(),
        }
    }

    pub fn probability(&self) -> Option<f64> {
        self.record.numeric(PROBABILITY_FIELD)
    }

    pub fn probability_percent(&self) -> String {
        self.probability()
            .map_or_else(|| "-".to_string(), |p| format!("{:.0}%", p * 100.0))
    }

    pub fn is_at_risk(&self) -> bool {
        self.record.numeric(PREDICTION_FIELD) == Some(1.0)
    }

    pub fn status_label(&self) -> &'static str {
        if self.is_at_risk() {
            "RISK"
        } else {
            "SAFE"
        }
    }

    // First field that holds a non-empty, non-zero value
    fn first_text(&self, fields: &[&str]) -> Option<String> {
        fields.iter().find_map(|field| {
            self.record
                .text(field)
                .filter(|text| !text.is_empty() && text != "0")
        })
    }
}
