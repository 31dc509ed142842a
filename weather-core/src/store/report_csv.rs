use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::{config::data_dir, model::ReportRecord};

use super::{ensure_parent, reset_file};

/// Tabular export of saved reports, one CSV row per report.
#[derive(Debug, Clone)]
pub struct ReportStore {
    path: PathBuf,
}

impl ReportStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location in the platform data directory.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(data_dir()?.join("reports.csv")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one row, writing the header first if the file is new or empty.
    pub fn append(&self, record: &ReportRecord) -> Result<()> {
        ensure_parent(&self.path)?;
        let needs_header = fs::metadata(&self.path).map(|m| m.len() == 0).unwrap_or(true);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open report file: {}", self.path.display()))?;

        let mut writer = csv::WriterBuilder::new().has_headers(needs_header).from_writer(file);
        writer.serialize(record).context("Failed to write report row")?;
        writer.flush().context("Failed to flush report file")?;

        debug!(path = %self.path.display(), location = %record.location, "appended report row");
        Ok(())
    }

    /// All saved rows; an absent or empty file yields no rows.
    pub fn read_all(&self) -> Result<Vec<ReportRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&self.path)
            .with_context(|| format!("Failed to open report file: {}", self.path.display()))?;

        reader
            .deserialize()
            .collect::<Result<Vec<ReportRecord>, _>>()
            .with_context(|| format!("Failed to parse report file: {}", self.path.display()))
    }

    pub fn reset(&self) -> Result<()> {
        reset_file(&self.path)
    }
}
