pub mod aggregate;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod loader;
pub mod model;
pub mod render;
pub mod sample;

pub use config::AppConfig;
pub use dashboard::{Dashboard, Phase};
pub use error::Error;
pub use loader::{FileReportLoader, ReportLoader, SampleReportLoader};
pub use model::{Category, Criticality, FileCheckResult, ReconciliationReport};
