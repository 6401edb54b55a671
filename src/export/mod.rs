// ABOUTME: TabularExporter - ranks prediction records and saves them as a CSV download

pub mod delimited;
pub mod download;
pub mod ranking;

pub use delimited::{serialize, CsvFormat};
pub use download::{DirectorySaver, FileSaver, HostSaveError};
pub use ranking::{rank, RankedExport};

use crate::models::TabularRecord;
use tracing::{info, warn};

/// Counts reported back to the UI after an export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub rows: usize,
    pub filename: String,
}

pub struct TabularExporter<S = DirectorySaver> {
    format: CsvFormat,
    saver: S,
}

impl<S: FileSaver> TabularExporter<S> {
    pub fn new(format: CsvFormat, saver: S) -> Self {
        Self { format, saver }
    }

    pub fn format(&self) -> &CsvFormat {
        &self.format
    }

    pub fn rank<'a>(&self, records: &'a [TabularRecord], key: &str) -> RankedExport<'a> {
        rank(records, key)
    }

    pub fn serialize(&self, ranked: &RankedExport<'_>) -> String {
        serialize(ranked, &self.format)
    }

    /// Hand `text` to the host save primitive. Best effort: a failure is
    /// logged and otherwise invisible to the caller.
    pub fn download(&self, text: &str, filename: &str) {
        match self.saver.save(filename, text.as_bytes()) {
            Ok(path) => info!("Export {} written to {}", filename, path.display()),
            Err(e) => warn!("Export {} could not be saved: {}", filename, e),
        }
    }

    /// Rank, serialize and download `records` in one step. `limit` caps the
    /// number of rows; None exports everything.
    pub fn export(
        &self,
        records: &[TabularRecord],
        key: &str,
        limit: Option<usize>,
        filename: &str,
    ) -> ExportSummary {
        let ranked = self.rank(records, key);
        let rows = ranked.top(limit).len();
        let text = if rows == ranked.len() {
            self.serialize(&ranked)
        } else {
            let capped = ranked.to_records(limit);
            self.serialize(&rank(&capped, key))
        };

        info!("Exporting {} of {} records ranked by {}", rows, records.len(), key);
        self.download(&text, filename);

        ExportSummary {
            rows,
            filename: filename.to_string(),
        }
    }
}

impl TabularExporter<DirectorySaver> {
    /// CSV into the user's Downloads directory
    pub fn to_downloads() -> Self {
        Self::new(CsvFormat::default(), DirectorySaver::downloads())
    }
}

#[cfg(test)]
mod tests {
    use super::download::MockFileSaver;
    use super::*;
    use mockall::predicate::eq;
    use std::path::PathBuf;

    fn records() -> Vec<TabularRecord> {
        vec![
            TabularRecord::new().with("id", "A").with("p", 0.2),
            TabularRecord::new().with("id", "B").with("p", 0.7),
            TabularRecord::new().with("id", "C").with("p", 0.5),
        ]
    }

    #[test]
    fn test_export_saves_ranked_csv() {
        let mut saver = MockFileSaver::new();
        saver
            .expect_save()
            .with(eq("out.csv"), eq(b"id,p\nB,0.7\nC,0.5\nA,0.2".as_slice()))
            .times(1)
            .returning(|name, _| Ok(PathBuf::from("/tmp").join(name)));

        let exporter = TabularExporter::new(CsvFormat::default(), saver);
        let summary = exporter.export(&records(), "p", None, "out.csv");

        assert_eq!(summary.rows, 3);
        assert_eq!(summary.filename, "out.csv");
    }

    #[test]
    fn test_export_respects_limit() {
        let mut saver = MockFileSaver::new();
        saver
            .expect_save()
            .with(eq("top.csv"), eq(b"id,p\nB,0.7".as_slice()))
            .times(1)
            .returning(|name, _| Ok(PathBuf::from(name)));

        let exporter = TabularExporter::new(CsvFormat::default(), saver);
        assert_eq!(exporter.export(&records(), "p", Some(1), "top.csv").rows, 1);
    }

    #[test]
    fn test_download_failure_is_swallowed() {
        let mut saver = MockFileSaver::new();
        saver
            .expect_save()
            .times(1)
            .returning(|_, _| Err(HostSaveError::NoExportDir));

        let exporter = TabularExporter::new(CsvFormat::default(), saver);
        exporter.download("id\nA", "out.csv");
    }
}
