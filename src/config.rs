use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::error::Error;
use crate::loader::{FileReportLoader, ReportLoader, SampleReportLoader};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// JSON artifact written by the reconciliation checker
    File,
    /// Built-in sample data
    Sample,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub source: SourceKind,
    pub report_path: String,
    pub html_output: String,
    pub sample_delay_ms: u64,
}

impl AppConfig {
    pub fn loader(&self) -> Arc<dyn ReportLoader> {
        match self.source {
            SourceKind::File => Arc::new(FileReportLoader::new(&self.report_path)),
            SourceKind::Sample => Arc::new(SampleReportLoader::new(Duration::from_millis(
                self.sample_delay_ms,
            ))),
        }
    }
}

fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
    Config::builder()
        .set_default("source", "sample")?
        .set_default("report_path", "resultado_conciliacao.json")?
        .set_default("html_output", "dashboard.html")?
        .set_default("sample_delay_ms", 1000)
}

/// `Config.toml` (optional) overlaid with `RECON_*` environment variables.
pub fn load_configuration() -> Result<AppConfig, Error> {
    let config = builder()?
        .add_source(ConfigFile::with_name("Config").required(false))
        .add_source(Environment::with_prefix("RECON"))
        .build()?
        .try_deserialize::<AppConfig>()?;
    Ok(config)
}

/// Load from an explicit TOML file, without environment overrides.
pub fn load_configuration_from(path: &str) -> Result<AppConfig, Error> {
    let config = builder()?
        .add_source(ConfigFile::with_name(path))
        .build()?
        .try_deserialize::<AppConfig>()?;
    Ok(config)
}
