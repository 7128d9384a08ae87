use anyhow::{Context, Result};
use rusqlite::Connection;

use super::migrations;

pub fn initialize_schema(conn: &Connection) -> Result<()> {
    create_events_table(conn)?;
    run_events_migrations(conn)?;
    create_event_tags_table(conn)?;
    Ok(())
}

fn create_events_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS events (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            timestamp INTEGER NOT NULL,
            connector TEXT NOT NULL DEFAULT '',
            component TEXT NOT NULL,
            resource TEXT,
            state INTEGER NOT NULL DEFAULT 0,
            event_type TEXT NOT NULL DEFAULT 'check',
            output TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )
    .context("Failed to create events table")?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_events_timestamp ON events(timestamp)",
        [],
    )
    .context("Failed to create events timestamp index")?;

    Ok(())
}

fn run_events_migrations(conn: &Connection) -> Result<()> {
    migrations::ensure_column(
        conn,
        "events",
        "long_output",
        "ALTER TABLE events ADD COLUMN long_output TEXT",
    )?;

    Ok(())
}

fn create_event_tags_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS event_tags (
            event_id INTEGER NOT NULL REFERENCES events(id) ON DELETE CASCADE,
            tag TEXT NOT NULL,
            UNIQUE(event_id, tag)
        )",
        [],
    )
    .context("Failed to create event_tags table")?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_event_tags_tag ON event_tags(tag)",
        [],
    )
    .context("Failed to create event_tags index")?;

    Ok(())
}
