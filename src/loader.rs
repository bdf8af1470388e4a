use chrono::Local;
use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::Error;
use crate::model::ReconciliationReport;
use crate::sample;

/// Source of reconciliation reports.
///
/// `load` may block; the dashboard always calls it from a worker thread.
pub trait ReportLoader: Send + Sync {
    fn load(&self) -> Result<ReconciliationReport, Error>;

    /// Short label used in log lines and the dashboard header.
    fn describe(&self) -> String {
        "report loader".to_string()
    }
}

/// Reads the JSON artifact written by the reconciliation checker.
pub struct FileReportLoader {
    path: PathBuf,
}

impl FileReportLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ReportLoader for FileReportLoader {
    fn load(&self) -> Result<ReconciliationReport, Error> {
        debug!("Reading report from {}", self.path.display());
        let json = fs::read_to_string(&self.path).map_err(|e| {
            Error::LoadFailure(format!("cannot read {}: {}", self.path.display(), e))
        })?;
        let report = ReconciliationReport::from_json(&json)?;
        info!(
            "Loaded {} checks from {}",
            report.total_files(),
            self.path.display()
        );
        Ok(report)
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

/// Serves the built-in sample set after a fixed delay.
pub struct SampleReportLoader {
    delay: Duration,
}

impl SampleReportLoader {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SampleReportLoader {
    fn default() -> Self {
        Self::new(Duration::from_millis(1000))
    }
}

impl ReportLoader for SampleReportLoader {
    fn load(&self) -> Result<ReconciliationReport, Error> {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        Ok(sample::sample_report(Local::now()))
    }

    fn describe(&self) -> String {
        "sample data".to_string()
    }
}
