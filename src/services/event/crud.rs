use super::shared::{map_event_row, EVENT_COLUMNS};
use super::EventService;
use crate::models::event::LoggedEvent;
use crate::models::filter::normalize_tags;
use anyhow::{anyhow, Context, Result};
use rusqlite::{self, params, Connection};

impl<'a> EventService<'a> {
    /// Validate and store one event; returns it with its id and sorted tags.
    pub fn log_event(&self, event: LoggedEvent) -> Result<LoggedEvent> {
        insert_event(self.conn, event)
    }

    /// Store a batch of events in a single transaction.
    ///
    /// Nothing is written if any event fails validation.
    pub fn log_events(&self, events: Vec<LoggedEvent>) -> Result<usize> {
        let tx = self
            .conn
            .unchecked_transaction()
            .context("Failed to start bulk insert")?;

        let mut inserted = 0;
        for event in events {
            insert_event(&tx, event)?;
            inserted += 1;
        }

        tx.commit().context("Failed to commit bulk insert")?;
        log::debug!("Bulk logged {} events", inserted);
        Ok(inserted)
    }

    /// Retrieve an event by ID.
    pub fn get(&self, id: i64) -> Result<Option<LoggedEvent>> {
        let sql = format!("SELECT {} FROM events e WHERE e.id = ?", EVENT_COLUMNS);
        let result = self.conn.query_row(&sql, [id], map_event_row);

        match result {
            Ok(event) => Ok(Some(event)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete an event and its tags.
    pub fn delete(&self, id: i64) -> Result<()> {
        let rows = self
            .conn
            .execute("DELETE FROM events WHERE id = ?", [id])
            .context("Failed to delete event")?;

        if rows == 0 {
            return Err(anyhow!("Event with id {} not found", id));
        }

        Ok(())
    }

    /// Number of stored events.
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))
            .context("Failed to count events")?;
        Ok(count as usize)
    }
}

fn insert_event(conn: &Connection, mut event: LoggedEvent) -> Result<LoggedEvent> {
    event.validate().map_err(|e| anyhow!(e))?;

    let mut tags = normalize_tags(event.tags);
    tags.sort();
    event.tags = tags;

    conn.execute(
        "INSERT INTO events (
            timestamp, connector, component, resource, state, event_type, output, long_output
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            event.timestamp,
            event.connector,
            event.component,
            event.resource,
            event.state.as_code(),
            event.event_type,
            event.output,
            event.long_output,
        ],
    )
    .context("Failed to insert event")?;

    let id = conn.last_insert_rowid();

    for tag in &event.tags {
        conn.execute(
            "INSERT OR IGNORE INTO event_tags (event_id, tag) VALUES (?, ?)",
            params![id, tag],
        )
        .with_context(|| format!("Failed to tag event {} with '{}'", id, tag))?;
    }

    event.id = Some(id);
    Ok(event)
}
