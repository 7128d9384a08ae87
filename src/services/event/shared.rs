use rusqlite::{self, Result, Row};

use crate::models::event::{EventState, LoggedEvent};

/// Columns read by [`map_event_row`], in order. `e` aliases `events`.
pub(crate) const EVENT_COLUMNS: &str =
    "e.id, e.timestamp, e.connector, e.component, e.resource, e.state, e.event_type,
     e.output, e.long_output,
     (SELECT json_group_array(t.tag) FROM event_tags t WHERE t.event_id = e.id)";

pub(crate) fn map_event_row(row: &Row<'_>) -> Result<LoggedEvent> {
    Ok(LoggedEvent {
        id: Some(row.get(0)?),
        timestamp: row.get(1)?,
        connector: row.get(2)?,
        component: row.get(3)?,
        resource: row.get(4)?,
        state: EventState::from_code(row.get(5)?),
        event_type: row.get(6)?,
        output: row.get(7)?,
        long_output: row.get(8)?,
        tags: deserialize_tags(row.get(9)?)?,
    })
}

/// Parse the JSON tag array produced by `json_group_array`, sorted.
pub(crate) fn deserialize_tags(json: Option<String>) -> Result<Vec<String>> {
    let Some(json) = json else {
        return Ok(Vec::new());
    };

    let mut tags: Vec<String> = serde_json::from_str(&json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(9, rusqlite::types::Type::Text, Box::new(e)))?;
    tags.sort();
    Ok(tags)
}
