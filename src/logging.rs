//! Log setup for the CLI.
//!
//! Everything goes to a non-blocking file writer; the console copy goes to
//! stderr so rendered dashboards and JSON summaries keep stdout to themselves.

use std::env;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_LOG_FILE: &str = "./logs/recon-dashboard.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    /// stderr and the log file
    ConsoleAndFile,
    /// Log file only, used while the interactive view owns the terminal
    FileOnly,
}

impl LogOutput {
    pub fn for_command(interactive: bool) -> Self {
        if interactive {
            LogOutput::FileOnly
        } else {
            LogOutput::ConsoleAndFile
        }
    }
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_env("TRACING_LEVEL").unwrap_or_else(|_| EnvFilter::new("info"))
}

/// The returned guard flushes the file writer on drop; hold it for the life of `main`.
pub fn init_logger(output: LogOutput) -> WorkerGuard {
    let log_file = env::var("LOG_FILE_PATH").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never("./", &log_file));

    let console_layer = (output == LogOutput::ConsoleAndFile).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .pretty()
            .with_file(false)
            .without_time()
    });

    tracing_subscriber::registry()
        .with(console_layer)
        .with(fmt::layer().with_writer(file_writer).with_ansi(false))
        .with(filter())
        .init();

    info!(?output, log_file = %log_file, "Logging initialised");
    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interactive_mode_logs_to_file_only() {
        assert_eq!(LogOutput::for_command(true), LogOutput::FileOnly);
        assert_eq!(LogOutput::for_command(false), LogOutput::ConsoleAndFile);
    }
}
