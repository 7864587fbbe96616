use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::tui::app::DEFAULT_TICK_RATE;
use crate::tui::tasks::DEFAULT_MIN_VISIBLE;
use crate::tui::theme::DEFAULT_ACCENT;

/// Settings read from `<config dir>/ehrplus/config.json`.
///
/// Every field is optional in the file; missing ones take the defaults below.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Minimum time a running action stays on screen.
    pub min_visible_ms: u64,
    /// Spinner cadence.
    pub tick_ms: u64,
    pub log_file: PathBuf,
    pub log_level: String,
    /// Abort an in-flight action when quitting instead of leaving it running.
    pub cancel_on_quit: bool,
    pub accent_color: String,
    /// Where the database demo keeps its records.
    pub store_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_visible_ms: DEFAULT_MIN_VISIBLE.as_millis() as u64,
            tick_ms: DEFAULT_TICK_RATE.as_millis() as u64,
            log_file: PathBuf::from("ehrplus.log"),
            log_level: "info".to_string(),
            cancel_on_quit: false,
            accent_color: DEFAULT_ACCENT.to_string(),
            store_file: PathBuf::from("demo.json"),
        }
    }
}

impl Config {
    pub fn get_path() -> Result<PathBuf> {
        let mut path = dirs::config_dir().context("Could not determine config directory")?;
        path.push("ehrplus");
        path.push("config.json");
        Ok(path)
    }

    /// Load the config file, or defaults when there is none.
    pub fn load() -> Result<Self> {
        let path = Self::get_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse config file")
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::get_path()?;
        if let Some(dir) = path.parent() {
            // Ensure directory exists
            if !dir.exists() {
                fs::create_dir_all(dir).context("Failed to create config directory")?;
            }
        }
        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&path, content).context("Failed to write config file")?;
        Ok(path)
    }
}
