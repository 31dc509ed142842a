//! Local persistence of raw report records.

use anyhow::{Context, Result};
use std::{fs, path::Path};

pub mod history;
pub mod report_csv;

pub use history::HistoryStore;
pub use report_csv::ReportStore;

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create data directory: {}", parent.display()))?;
    }
    Ok(())
}

/// Truncate the file at `path`, creating it if needed.
pub fn reset_file(path: &Path) -> Result<()> {
    ensure_parent(path)?;
    fs::write(path, "").with_context(|| format!("Failed to reset file: {}", path.display()))
}
