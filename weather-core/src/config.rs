use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fmt, fs,
    path::{Path, PathBuf},
};
use tracing::warn;

use crate::units::UnitSystem;

/// Keys recognized in the configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    Token,
    Location,
    UnitSystem,
}

impl ConfigKey {
    /// Matching command-line flag, without the leading dashes.
    pub fn flag(&self) -> &'static str {
        match self {
            ConfigKey::Token => "token",
            ConfigKey::Location => "location",
            ConfigKey::UnitSystem => "unit-system",
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConfigKey::Token => "token",
            ConfigKey::Location => "location",
            ConfigKey::UnitSystem => "unit system",
        })
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// Token = "0123456789abcdef0123456789abcdef"
/// Location = "Berlin"
/// UnitSystem = "METRIC"
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(rename = "Token", default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(rename = "Location", default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(rename = "UnitSystem", default, skip_serializing_if = "Option::is_none")]
    pub unit_system: Option<UnitSystem>,
}

impl Config {
    /// Load config from the platform config directory.
    pub fn load() -> Result<Self> {
        Ok(Self::load_from(&Self::config_file_path()?))
    }

    /// Load config from `path`. A missing or unreadable file yields an empty config.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            // First run: no config file, return empty.
            return Self::default();
        }

        let parsed = fs::read_to_string(path)
            .map_err(anyhow::Error::from)
            .and_then(|contents| toml::from_str::<Config>(&contents).map_err(Into::into));

        match parsed {
            Ok(cfg) => cfg,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "ignoring corrupt config file");
                Self::default()
            }
        }
    }

    /// Save config to the platform config directory.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Read the file at `path`, overlay the keys set in `changes`, and write the result back.
    pub fn update(path: &Path, changes: &Config) -> Result<Config> {
        let mut cfg = Self::load_from(path);
        cfg.merge(changes);
        cfg.save_to(path)?;
        Ok(cfg)
    }

    /// Overwrite the keys that `other` sets; keep the rest.
    pub fn merge(&mut self, other: &Config) {
        if let Some(token) = &other.token {
            self.token = Some(token.clone());
        }
        if let Some(location) = &other.location {
            self.location = Some(location.clone());
        }
        if let Some(unit_system) = other.unit_system {
            self.unit_system = Some(unit_system);
        }
    }

    /// Replace the file at `path` with an empty config.
    pub fn reset(path: &Path) -> Result<()> {
        Self::default().save_to(path)
    }

    pub fn is_empty(&self) -> bool {
        self.token.is_none() && self.location.is_none() && self.unit_system.is_none()
    }

    /// Key / value pairs of the keys that are set, for listing.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        let mut entries = Vec::new();
        if let Some(token) = &self.token {
            entries.push(("Token", token.clone()));
        }
        if let Some(location) = &self.location {
            entries.push(("Location", location.clone()));
        }
        if let Some(unit_system) = self.unit_system {
            entries.push(("UnitSystem", unit_system.to_string()));
        }
        entries
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }
}

/// Directory holding the report history, CSV export and log file.
pub fn data_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.data_dir().to_path_buf())
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "weather-task", "weather-cli")
        .ok_or_else(|| anyhow!("Could not determine platform config directory"))
}
