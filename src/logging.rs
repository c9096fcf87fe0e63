//! Logging setup
//!
//! Installs the global `tracing` subscriber from [`LoggingConfig`].
//! `RUST_LOG` always wins over the configured level.

use crate::config::LoggingConfig;
use std::fs::File;
use std::sync::Mutex;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to open log file {path}: {error}")]
    File { path: String, error: std::io::Error },

    #[error("Failed to install subscriber: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Build the filter directive for the configured level
pub fn filter_directive(config: &LoggingConfig) -> String {
    format!("medconnect={},tower_http={}", config.level, config.level)
}

/// Install the global subscriber. Output goes to stderr unless a file is configured.
pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(config)));

    let writer = match &config.file {
        Some(path) => {
            let file = File::options()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|error| LoggingError::File {
                    path: path.clone(),
                    error,
                })?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(std::io::stderr),
    };

    let registry = tracing_subscriber::registry().with(filter);

    match config.format.as_str() {
        "json" => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
            .try_init()?,
        _ => registry
            .with(tracing_subscriber::fmt::layer().with_writer(writer))
            .try_init()?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive() {
        let config = LoggingConfig {
            level: "debug".to_string(),
            ..Default::default()
        };
        assert_eq!(filter_directive(&config), "medconnect=debug,tower_http=debug");
    }

    #[test]
    fn test_unwritable_log_file() {
        let config = LoggingConfig {
            file: Some("/nonexistent-dir/medconnect.log".to_string()),
            ..Default::default()
        };
        assert!(matches!(init_logging(&config), Err(LoggingError::File { .. })));
    }
}
