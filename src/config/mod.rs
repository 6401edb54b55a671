// ABOUTME: Application configuration loaded from ~/.churn-desk/config.toml
// Every field has a default so a missing or partial file still yields a usable config

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_EXPORT_FILENAME: &str = "churn_predictions_full_sorted.csv";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub limits: LimitsConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the prediction/report service
    pub base_url: String,
    /// Overall timeout for uploads, emails and health checks; streams have none
    pub upload_timeout_secs: u64,
    /// Connect timeout for every request, streaming ones included
    pub connect_timeout_secs: u64,
}

/// How many ranked records each feature looks at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub chat_context_records: usize,
    pub table_rows: usize,
    pub report_context_records: usize,
    /// None exports every record
    pub export_limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Falls back to the platform Downloads directory
    pub directory: Option<PathBuf>,
    pub filename: String,
    pub delimiter: char,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            limits: LimitsConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            upload_timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            chat_context_records: 5,
            table_rows: 10,
            report_context_records: 20,
            export_limit: None,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: None,
            filename: DEFAULT_EXPORT_FILENAME.to_string(),
            delimiter: ',',
        }
    }
}

impl ApiConfig {
    /// Absolute URL for an endpoint path such as `/chat`
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn upload_timeout(&self) -> Duration {
        Duration::from_secs(self.upload_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl AppConfig {
    /// `~/.churn-desk`, home of the config file and logs
    pub fn app_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".churn-desk"))
    }

    pub fn default_path() -> Option<PathBuf> {
        Self::app_dir().map(|dir| dir.join("config.toml"))
    }

    /// Load from the default location, or defaults if there is no file
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;

        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        reqwest::Url::parse(&self.api.base_url)
            .map_err(|e| ConfigError::Invalid(format!("api.base_url {:?}: {}", self.api.base_url, e)))?;

        if self.limits.table_rows == 0 {
            return Err(ConfigError::Invalid("limits.table_rows must be at least 1".into()));
        }
        if self.export.filename.trim().is_empty() {
            return Err(ConfigError::Invalid("export.filename must not be empty".into()));
        }
        if self.export.delimiter == '"' || self.export.delimiter == '\n' {
            return Err(ConfigError::Invalid(format!(
                "export.delimiter {:?} is not usable",
                self.export.delimiter
            )));
        }
        Ok(())
    }

    /// Command-line and environment overrides win over the file
    pub fn with_overrides(mut self, api_url: Option<String>, export_dir: Option<PathBuf>) -> Self {
        if let Some(url) = api_url {
            self.api.base_url = url;
        }
        if let Some(dir) = export_dir {
            self.export.directory = Some(dir);
        }
        self
    }
}
