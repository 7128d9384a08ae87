//! Data-source seam between the grid store and the event log.

use anyhow::Result;

use super::EventService;
use crate::models::event::LoggedEvent;
use crate::models::filter::FilterSpec;
use crate::models::query::{Page, PageRequest};
use crate::services::database::Database;

/// Owned description of one store load, sent to a worker thread
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EventQuery {
    pub filter: Option<FilterSpec>,
    pub page: PageRequest,
}

/// Backend able to answer paged event queries from any thread.
#[cfg_attr(test, mockall::automock)]
pub trait EventSource: Send + Sync {
    fn fetch(&self, query: &EventQuery) -> Result<Page<LoggedEvent>>;
}

/// Reads events from a SQLite file, opening a fresh connection per fetch.
#[derive(Debug, Clone)]
pub struct SqliteEventSource {
    db_path: String,
}

impl SqliteEventSource {
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    pub fn from_database(database: &Database) -> Self {
        Self::new(database.path())
    }
}

impl EventSource for SqliteEventSource {
    fn fetch(&self, query: &EventQuery) -> Result<Page<LoggedEvent>> {
        let db = Database::new(&self.db_path)?;
        EventService::new(db.connection()).query(query.filter.as_ref(), &query.page)
    }
}
