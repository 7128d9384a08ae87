use super::shared::{map_event_row, EVENT_COLUMNS};
use super::EventService;
use crate::models::event::LoggedEvent;
use crate::models::filter::{normalize_tags, FilterSpec, TagMatch};
use crate::models::query::{Page, PageRequest};
use anyhow::{Context, Result};
use rusqlite::{self, params_from_iter, types::Value};

/// WHERE clause and bound values rendered from a [`FilterSpec`]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterSql {
    pub clause: String,
    pub params: Vec<Value>,
}

/// Render a filter against the `events e` alias. `None` matches everything.
pub fn filter_sql(filter: Option<&FilterSpec>) -> FilterSql {
    let Some(filter) = filter else {
        return FilterSql::default();
    };

    let mut clause = String::from("WHERE e.timestamp >= ? AND e.timestamp < ?");
    let mut params = vec![Value::Integer(filter.start), Value::Integer(filter.end)];

    // Duplicates would inflate the All-match count.
    let tags = normalize_tags(filter.tags.iter().cloned());
    if !tags.is_empty() {
        let placeholders = vec!["?"; tags.len()].join(", ");
        match filter.tag_match {
            TagMatch::All => {
                clause.push_str(&format!(
                    " AND (SELECT COUNT(DISTINCT t.tag) FROM event_tags t
                           WHERE t.event_id = e.id AND t.tag IN ({})) = ?",
                    placeholders
                ));
            }
            TagMatch::Any => {
                clause.push_str(&format!(
                    " AND EXISTS (SELECT 1 FROM event_tags t
                                  WHERE t.event_id = e.id AND t.tag IN ({}))",
                    placeholders
                ));
            }
        }

        let tag_count = tags.len() as i64;
        params.extend(tags.into_iter().map(Value::Text));
        if filter.tag_match == TagMatch::All {
            params.push(Value::Integer(tag_count));
        }
    }

    FilterSql { clause, params }
}

impl<'a> EventService<'a> {
    /// Fetch one page of events matching `filter`, plus the overall match count.
    pub fn query(
        &self,
        filter: Option<&FilterSpec>,
        request: &PageRequest,
    ) -> Result<Page<LoggedEvent>> {
        let FilterSql { clause, params } = filter_sql(filter);

        let total: i64 = self
            .conn
            .query_row(
                &format!("SELECT COUNT(*) FROM events e {}", clause),
                params_from_iter(params.iter()),
                |row| row.get(0),
            )
            .context("Failed to count matching events")?;

        let direction = request.sort.direction.sql_keyword();
        let sql = format!(
            "SELECT {columns} FROM events e {clause}
             ORDER BY {sort} {direction}, e.id {direction}
             LIMIT ? OFFSET ?",
            columns = EVENT_COLUMNS,
            clause = clause,
            sort = request.sort.column.sql_column(),
            direction = direction,
        );

        let mut page_params = params;
        // SQLite treats a negative LIMIT as "no limit".
        page_params.push(Value::Integer(request.limit.map_or(-1, |limit| limit as i64)));
        page_params.push(Value::Integer(request.offset as i64));

        let mut stmt = self.conn.prepare(&sql).context("Failed to prepare event query")?;
        let records = stmt
            .query_map(params_from_iter(page_params.iter()), map_event_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Page {
            records,
            total: total as usize,
        })
    }
}
