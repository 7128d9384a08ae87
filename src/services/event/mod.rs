//! Event log service entry point.
//! Provides database-backed logging, lookup and paged queries
//! organized across focused submodules.

use rusqlite::Connection;

pub mod crud;
pub mod import;
pub mod queries;
mod shared;
pub mod source;

pub use queries::{filter_sql, FilterSql};
pub use source::{EventQuery, EventSource, SqliteEventSource};

/// Service for logging and querying monitoring events stored in SQLite.
pub struct EventService<'a> {
    pub(crate) conn: &'a Connection,
}

impl<'a> EventService<'a> {
    /// Create a new EventService with a database connection
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}
