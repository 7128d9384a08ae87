use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use super::EventService;
use crate::models::event::LoggedEvent;

impl<'a> EventService<'a> {
    /// Log every event of a JSON array file in one transaction.
    pub fn import_json(&self, path: &Path) -> Result<usize> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read events from {}", path.display()))?;
        let events: Vec<LoggedEvent> = serde_json::from_str(&data)
            .with_context(|| format!("failed to deserialize events from {}", path.display()))?;

        let count = self.log_events(events)?;
        log::info!("Imported {} events from {}", count, path.display());
        Ok(count)
    }
}
