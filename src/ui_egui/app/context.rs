use std::path::PathBuf;

use crate::models::config::AppConfig;
use crate::services::database::Database;
use crate::services::event::EventService;

/// Shared access point for the database and the loaded configuration.
pub struct AppContext {
    database: Database,
    config: AppConfig,
    /// Where configuration changes are written; `None` when no config dir exists
    config_path: Option<PathBuf>,
}

impl AppContext {
    pub fn new(database: Database, config: AppConfig, config_path: Option<PathBuf>) -> Self {
        Self {
            database,
            config,
            config_path,
        }
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn config_mut(&mut self) -> &mut AppConfig {
        &mut self.config
    }

    pub fn event_service(&self) -> EventService<'_> {
        EventService::new(self.database.connection())
    }

    /// Write the current configuration back to disk, if it has a home.
    pub fn save_config(&self) -> anyhow::Result<()> {
        match &self.config_path {
            Some(path) => self.config.save_to(path),
            None => Ok(()),
        }
    }
}
