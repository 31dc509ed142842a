use anyhow::{Context, Result};
use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};
use tracing::warn;

use crate::{config::data_dir, model::ReportRecord};

use super::{ensure_parent, reset_file};

type History = BTreeMap<String, Vec<ReportRecord>>;

/// Saved reports grouped by location, stored as one JSON document.
///
/// Every write reads the whole file, merges the new record in and rewrites it.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn open_default() -> Result<Self> {
        Ok(Self::new(data_dir()?.join("history.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole history. A missing or blank file is empty; anything unreadable is an error.
    fn load(&self) -> Result<History> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(History::new()),
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("Failed to read history file: {}", self.path.display())
                });
            }
        };
        if contents.trim().is_empty() {
            return Ok(History::new());
        }

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse history file: {}", self.path.display()))
    }

    fn load_or_empty(&self) -> History {
        self.load().unwrap_or_else(|err| {
            warn!(error = %format!("{err:#}"), "ignoring unreadable history file");
            History::new()
        })
    }

    /// Append `record` under its location. Fails without touching the file if the existing
    /// history cannot be read.
    pub fn record(&self, record: &ReportRecord) -> Result<()> {
        let mut history = self.load()?;
        history.entry(record.location.clone()).or_default().push(record.clone());

        ensure_parent(&self.path)?;
        let json = serde_json::to_string_pretty(&history).context("Failed to serialize history")?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write history file: {}", self.path.display()))
    }

    pub fn for_location(&self, location: &str) -> Vec<ReportRecord> {
        self.load_or_empty().remove(location).unwrap_or_default()
    }

    /// Locations with at least one saved report, sorted.
    pub fn locations(&self) -> Vec<String> {
        self.load_or_empty().into_keys().collect()
    }

    pub fn reset(&self) -> Result<()> {
        reset_file(&self.path)
    }
}
