// ABOUTME: ChurnApiClient - HTTP client for dataset upload, report email and stream requests
// Streaming endpoints are only described here; StreamingTextConsumer dispatches them

use super::error::{ApiError, UPLOAD_FALLBACK_MESSAGE};
use super::payload::{
    ChatRequest, EmailRequest, ErrorBody, HealthResponse, ReportRequest, SendReportResponse,
};
use crate::config::ApiConfig;
use crate::models::{PredictionResponse, PredictionSummary, TabularRecord};
use crate::streaming::{StreamRequest, TransportError};
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::{debug, info, warn};

lazy_static! {
    static ref EMAIL_PATTERN: Regex =
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid");
}

/// Dataset extensions the prediction service can read
pub const DATASET_EXTENSIONS: &[&str] = &["csv", "xlsx", "xls"];

pub const CHAT_PATH: &str = "/chat";
pub const REPORT_PATH: &str = "/generate_report";
pub const PREDICT_PATH: &str = "/predict";
pub const SEND_REPORT_PATH: &str = "/send_report";
pub const HEALTH_PATH: &str = "/health";

#[derive(Debug, Clone)]
pub struct ChurnApiClient {
    client: reqwest::Client,
    config: ApiConfig,
}

impl ChurnApiClient {
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .build()?;
        Ok(Self { client, config })
    }

    /// Share an existing client, e.g. with the stream consumer
    pub fn with_client(client: reqwest::Client, config: ApiConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn endpoint(&self, path: &str) -> String {
        self.config.endpoint(path)
    }

    /// File name of `path` if the service accepts its extension
    pub fn check_dataset(path: &Path) -> Result<String, ApiError> {
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| ApiError::UnsupportedFile(path.display().to_string()))?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        if DATASET_EXTENSIONS.contains(&extension.as_str()) {
            Ok(name.to_string())
        } else {
            Err(ApiError::UnsupportedFile(name.to_string()))
        }
    }

    pub fn validate_email(email: &str) -> Result<(), ApiError> {
        if EMAIL_PATTERN.is_match(email.trim()) {
            Ok(())
        } else {
            Err(ApiError::InvalidEmail(email.to_string()))
        }
    }

    /// Upload a dataset for scoring
    pub async fn predict(&self, path: &Path) -> Result<PredictionResponse, ApiError> {
        let file_name = Self::check_dataset(path)?;
        let contents = tokio::fs::read(path).await?;
        info!("Uploading {} ({} bytes) for prediction", file_name, contents.len());

        let mime = if file_name.to_ascii_lowercase().ends_with(".csv") {
            "text/csv"
        } else {
            "application/octet-stream"
        };
        let part = Part::bytes(contents).file_name(file_name).mime_str(mime)?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(self.endpoint(PREDICT_PATH))
            .multipart(form)
            .timeout(self.config.upload_timeout())
            .send()
            .await?;

        let prediction: PredictionResponse = Self::decode(response).await?;
        info!(
            "Prediction received: {} customers, churn rate {}",
            prediction.summary.total_customers,
            prediction.summary.churn_rate_percent()
        );
        Ok(prediction)
    }

    /// Ask the service to email the report as a PDF
    pub async fn send_report(
        &self,
        email: &str,
        report_markdown: &str,
    ) -> Result<SendReportResponse, ApiError> {
        Self::validate_email(email)?;
        let email = email.trim();
        info!("Sending report ({} chars) to {}", report_markdown.len(), email);

        let response = self
            .client
            .post(self.endpoint(SEND_REPORT_PATH))
            .json(&EmailRequest {
                email,
                report_markdown,
            })
            .timeout(self.config.upload_timeout())
            .send()
            .await?;

        Self::decode(response).await
    }

    pub async fn health(&self) -> Result<HealthResponse, ApiError> {
        let response = self
            .client
            .get(self.endpoint(HEALTH_PATH))
            .timeout(self.config.upload_timeout())
            .send()
            .await?;
        Self::decode(response).await
    }

    pub fn chat_request(
        &self,
        user_message: &str,
        churn_metrics: Option<&PredictionSummary>,
        top_risks: Option<&[&TabularRecord]>,
    ) -> Result<StreamRequest, TransportError> {
        StreamRequest::json(
            self.endpoint(CHAT_PATH),
            &ChatRequest {
                user_message,
                churn_metrics,
                top_risks: top_risks.map(<[_]>::to_vec),
            },
        )
    }

    pub fn report_request(
        &self,
        churn_metrics: &PredictionSummary,
        top_risks: &[&TabularRecord],
        csv_columns: Vec<String>,
    ) -> Result<StreamRequest, TransportError> {
        StreamRequest::json(
            self.endpoint(REPORT_PATH),
            &ReportRequest {
                churn_metrics,
                top_risks: top_risks.to_vec(),
                csv_columns,
            },
        )
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|error| error.detail_text())
            .unwrap_or_else(|| UPLOAD_FALLBACK_MESSAGE.to_string());

        warn!("Service answered {}: {}", status, detail);
        debug!("Error body: {}", body);
        Err(ApiError::Server {
            status: status.as_u16(),
            detail,
        })
    }
}
