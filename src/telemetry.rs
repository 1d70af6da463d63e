//! Logging setup
//!
//! Every run logs to the console and to `{log_dir}/test_YYYYmmdd_HHMMSS.log`.
//! `RUST_LOG` takes precedence over the configured level.

use chrono::Local;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::{Error, Result};

/// Name of the log file for a run started now
pub fn log_file_name() -> String {
    format!("test_{}.log", Local::now().format("%Y%m%d_%H%M%S"))
}

/// Filter from `RUST_LOG`, falling back to `level`
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Install the global subscriber; returns the log file path
pub fn init_tracing(config: &Config) -> Result<PathBuf> {
    std::fs::create_dir_all(&config.log_dir)?;
    let path = config.log_dir.join(log_file_name());
    let file = std::fs::File::create(&path)?;

    tracing_subscriber::registry()
        .with(env_filter(&config.log_level))
        .with(fmt::layer().with_target(false))
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .try_init()
        .map_err(|e| Error::internal(format!("setting default subscriber failed: {}", e)))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_name() {
        let name = log_file_name();
        assert!(name.starts_with("test_"));
        assert!(name.ends_with(".log"));
        assert_eq!(name.len(), "test_".len() + 15 + ".log".len());
    }
}
