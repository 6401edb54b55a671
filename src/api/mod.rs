// ABOUTME: Churn prediction service API - upload, email and streaming request descriptors

pub mod client;
pub mod error;
pub mod payload;

pub use client::{ChurnApiClient, DATASET_EXTENSIONS};
pub use error::{ApiError, UPLOAD_FALLBACK_MESSAGE};
pub use payload::{ChatRequest, EmailRequest, HealthResponse, ReportRequest, SendReportResponse};
