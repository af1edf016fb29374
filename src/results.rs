use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What happened to a single link that made it to the downloader
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DownloadOutcome {
    /// The document was fetched and written to `path`
    Downloaded { path: PathBuf, bytes: u64 },
    /// A file already existed at `path`; no request was made
    Skipped { path: PathBuf },
}

/// Totals for one harvest run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Unique links extracted from the page
    pub links_found: usize,
    /// Links that passed validation and filtering
    pub links_accepted: usize,
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Bytes written across all downloads
    pub bytes_written: u64,
}

impl RunSummary {
    /// Fold a single download result into the totals
    pub fn record<E>(&mut self, result: &Result<DownloadOutcome, E>) {
        match result {
            Ok(DownloadOutcome::Downloaded { bytes, .. }) => {
                self.downloaded += 1;
                self.bytes_written += bytes;
            }
            Ok(DownloadOutcome::Skipped { .. }) => self.skipped += 1,
            Err(_) => self.failed += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record() {
        let mut summary = RunSummary::default();
        summary.record::<()>(&Ok(DownloadOutcome::Downloaded {
            path: PathBuf::from("a.pdf"),
            bytes: 10,
        }));
        summary.record::<()>(&Ok(DownloadOutcome::Skipped {
            path: PathBuf::from("b.pdf"),
        }));
        summary.record(&Err::<DownloadOutcome, _>("boom"));

        assert_eq!(summary.downloaded, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.bytes_written, 10);
    }

    #[test]
    fn test_outcome_json() {
        let outcome = DownloadOutcome::Skipped {
            path: PathBuf::from("PDFs/a.pdf"),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "skipped");
        assert_eq!(json["path"], "PDFs/a.pdf");
    }
}
