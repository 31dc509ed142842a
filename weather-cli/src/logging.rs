//! File logging for the CLI and reading the log back.
//!
//! Events are written as JSON lines so `weather log --read` can tabulate them.

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing_subscriber::EnvFilter;

pub fn log_file_path() -> Result<PathBuf> {
    Ok(weather_core::config::data_dir()?.join("weather.log"))
}

/// Install the global subscriber writing to `path`.
///
/// `RUST_LOG` takes precedence; otherwise `info`, or `debug` when `verbose` is set.
pub fn init(path: &Path, verbose: bool) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    let default_level = if verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {e}"))
}

/// One line of the JSON log.
#[derive(Debug, Clone, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: String,
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl LogEntry {
    /// The event message followed by its other fields as `key=value`.
    pub fn message(&self) -> String {
        let mut parts = Vec::new();
        if let Some(message) = self.fields.get("message") {
            parts.push(plain(message));
        }
        for (key, value) in self.fields.iter().filter(|(k, _)| k.as_str() != "message") {
            parts.push(format!("{key}={}", plain(value)));
        }
        parts.join(" ")
    }

    /// Timestamp trimmed to seconds.
    pub fn short_timestamp(&self) -> &str {
        self.timestamp.get(..19).unwrap_or(&self.timestamp)
    }
}

fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Parse the log at `path`, skipping lines that are not JSON events.
pub fn read_entries(path: &Path) -> Result<Vec<LogEntry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read log file: {}", path.display()))?;

    Ok(contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect())
}
