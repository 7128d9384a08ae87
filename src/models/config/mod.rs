// Configuration module
// Application configuration persisted as TOML

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::filter::{FilterSpec, TagMatch};

const CONFIG_FILE_NAME: &str = "config.toml";
const DATABASE_FILE_NAME: &str = "events.db";
const MEMORY_DATABASE: &str = ":memory:";

fn default_window_width() -> f32 {
    800.0
}

fn default_window_height() -> f32 {
    550.0
}

fn default_grid_height() -> f32 {
    490.0
}

fn default_page_size() -> usize {
    25
}

/// Layout and grid options of the day events window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventsWindowConfig {
    #[serde(default = "default_window_width")]
    pub width: f32,
    #[serde(default = "default_window_height")]
    pub height: f32,
    #[serde(default = "default_grid_height")]
    pub grid_height: f32,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default)]
    pub export_mode: bool,
    /// Filter installed on the grid before the first day is opened
    #[serde(default)]
    pub initial_filter: Option<FilterSpec>,
}

impl Default for EventsWindowConfig {
    fn default() -> Self {
        Self {
            width: default_window_width(),
            height: default_window_height(),
            grid_height: default_grid_height(),
            page_size: default_page_size(),
            export_mode: false,
            initial_filter: None,
        }
    }
}

/// Tag scope and time zone of the calendar
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CalendarConfig {
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub tag_match: TagMatch,
    /// IANA zone name; the system zone is used when unset
    #[serde(default)]
    pub timezone: Option<String>,
    /// 0 = Sunday, 1 = Monday, ...
    #[serde(default)]
    pub first_day_of_week: u8,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database_path: Option<PathBuf>,
    /// JSON array of events logged once at startup
    #[serde(default)]
    pub import_on_startup: Option<PathBuf>,
    #[serde(default)]
    pub events_window: EventsWindowConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
}

impl AppConfig {
    /// Directory layout used for the config file and the default database
    pub fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("com", "EventCalendar", "EventCalendar")
    }

    pub fn default_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Read a config file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;

        Ok(config)
    }

    /// Load from the default location, falling back to defaults on any error.
    pub fn load_or_default() -> Self {
        let Some(path) = Self::default_path() else {
            log::warn!("Could not determine config directory, using defaults");
            return Self::default();
        };

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Failed to load config: {:#}, using defaults", err);
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create dir {}", parent.display()))?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.events_window.page_size == 0 {
            anyhow::bail!("events_window.page_size must be at least 1");
        }

        if self
            .database_path
            .as_deref()
            .is_some_and(|path| path.as_os_str() == MEMORY_DATABASE)
        {
            anyhow::bail!("database_path cannot be {}: loads open their own connection", MEMORY_DATABASE);
        }

        if self.calendar.first_day_of_week > 6 {
            anyhow::bail!("calendar.first_day_of_week must be between 0 and 6");
        }

        if let Some(name) = &self.calendar.timezone {
            name.parse::<chrono_tz::Tz>()
                .map_err(|err| anyhow::anyhow!("Unknown calendar.timezone '{}': {}", name, err))?;
        }

        Ok(())
    }

    /// Configured database path, or `events.db` in the platform data directory.
    pub fn resolve_database_path(&self) -> PathBuf {
        if let Some(path) = &self.database_path {
            return path.clone();
        }

        match Self::project_dirs() {
            Some(dirs) => dirs.data_dir().join(DATABASE_FILE_NAME),
            None => PathBuf::from(DATABASE_FILE_NAME),
        }
    }
}
