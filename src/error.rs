use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to load report: {0}")]
    LoadFailure(String),

    #[error("Malformed report: {0}")]
    MalformedReport(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
