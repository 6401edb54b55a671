// ABOUTME: Host save-file primitive used to hand exported text to the user
// Default implementation writes into an export directory (the user's Downloads)

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum HostSaveError {
    #[error("no export directory available")]
    NoExportDir,

    #[error("invalid file name: {0}")]
    InvalidFileName(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where exported files end up
#[cfg_attr(test, mockall::automock)]
pub trait FileSaver: Send + Sync {
    /// Persist `contents` under `filename`, returning the written path
    fn save(&self, filename: &str, contents: &[u8]) -> Result<PathBuf, HostSaveError>;
}

#[derive(Debug, Clone)]
pub struct DirectorySaver {
    dir: Option<PathBuf>,
}

impl DirectorySaver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    /// Save into the platform Downloads directory, if there is one
    pub fn downloads() -> Self {
        Self {
            dir: dirs::download_dir(),
        }
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }
}

impl FileSaver for DirectorySaver {
    fn save(&self, filename: &str, contents: &[u8]) -> Result<PathBuf, HostSaveError> {
        let dir = self.dir.as_ref().ok_or(HostSaveError::NoExportDir)?;

        // Never let a filename escape the export directory
        let name = Path::new(filename)
            .file_name()
            .filter(|name| Path::new(name) == Path::new(filename))
            .ok_or_else(|| HostSaveError::InvalidFileName(filename.to_string()))?;

        fs::create_dir_all(dir)?;
        let path = dir.join(name);
        fs::write(&path, contents)?;

        info!("Saved {} bytes to {}", contents.len(), path.display());
        Ok(path)
    }
}
