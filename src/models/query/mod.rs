// Query module
// Sorting and paging requests shared by the store and the event service

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::models::event::LoggedEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortColumn {
    Timestamp,
    Component,
    Resource,
    State,
    Output,
}

impl SortColumn {
    pub const ALL: [SortColumn; 5] = [
        SortColumn::Timestamp,
        SortColumn::Component,
        SortColumn::Resource,
        SortColumn::State,
        SortColumn::Output,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SortColumn::Timestamp => "Time",
            SortColumn::Component => "Component",
            SortColumn::Resource => "Resource",
            SortColumn::State => "State",
            SortColumn::Output => "Output",
        }
    }

    /// Column name in the `events` table. Never user input.
    pub fn sql_column(self) -> &'static str {
        match self {
            SortColumn::Timestamp => "e.timestamp",
            SortColumn::Component => "e.component",
            SortColumn::Resource => "COALESCE(e.resource, '')",
            SortColumn::State => "e.state",
            SortColumn::Output => "e.output",
        }
    }

    fn compare(self, a: &LoggedEvent, b: &LoggedEvent) -> Ordering {
        match self {
            SortColumn::Timestamp => a.timestamp.cmp(&b.timestamp),
            SortColumn::Component => a.component.cmp(&b.component),
            SortColumn::Resource => a
                .resource
                .as_deref()
                .unwrap_or_default()
                .cmp(b.resource.as_deref().unwrap_or_default()),
            SortColumn::State => a.state.as_code().cmp(&b.state.as_code()),
            SortColumn::Output => a.output.cmp(&b.output),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn sql_keyword(self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "⏶",
            SortDirection::Descending => "⏷",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    /// Newest events first
    fn default() -> Self {
        Self {
            column: SortColumn::Timestamp,
            direction: SortDirection::Descending,
        }
    }
}

impl SortSpec {
    /// Sort records in place; ties keep id order so pages stay stable.
    pub fn apply(&self, records: &mut [LoggedEvent]) {
        records.sort_by(|a, b| {
            let ordering = self.column.compare(a, b).then_with(|| a.id.cmp(&b.id));
            match self.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
    }
}

/// Slice of the result set to fetch. `limit: None` fetches everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageRequest {
    pub offset: usize,
    pub limit: Option<usize>,
    pub sort: SortSpec,
}

impl PageRequest {
    pub fn page(page: usize, page_size: usize, sort: SortSpec) -> Self {
        Self {
            offset: page * page_size,
            limit: Some(page_size),
            sort,
        }
    }

    pub fn unpaged(sort: SortSpec) -> Self {
        Self {
            offset: 0,
            limit: None,
            sort,
        }
    }
}

/// One page of results and the number of records matching overall
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub records: Vec<T>,
    pub total: usize,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            total: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::EventState;

    fn event(id: i64, component: &str, timestamp: i64, state: EventState) -> LoggedEvent {
        let mut event = LoggedEvent::new(component, timestamp, state).unwrap();
        event.id = Some(id);
        event
    }

    #[test]
    fn test_default_page_is_empty() {
        let page: Page<LoggedEvent> = Page::default();
        assert!(page.records.is_empty());
        assert_eq!(page.total, 0);
    }

    #[test]
    fn test_default_sort_is_newest_first() {
        let mut records = vec![
            event(1, "a", 10, EventState::Ok),
            event(2, "b", 30, EventState::Ok),
            event(3, "c", 20, EventState::Ok),
        ];
        SortSpec::default().apply(&mut records);
        let ids: Vec<_> = records.iter().map(|e| e.id.unwrap()).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_sort_by_state_ascending() {
        let mut records = vec![
            event(1, "a", 10, EventState::Critical),
            event(2, "b", 10, EventState::Ok),
            event(3, "c", 10, EventState::Warning),
        ];
        let sort = SortSpec {
            column: SortColumn::State,
            direction: SortDirection::Ascending,
        };
        sort.apply(&mut records);
        let states: Vec<_> = records.iter().map(|e| e.state).collect();
        assert_eq!(
            states,
            vec![EventState::Ok, EventState::Warning, EventState::Critical]
        );
    }

    #[test]
    fn test_page_request_offsets() {
        let request = PageRequest::page(3, 25, SortSpec::default());
        assert_eq!(request.offset, 75);
        assert_eq!(request.limit, Some(25));
        assert_eq!(PageRequest::unpaged(SortSpec::default()).limit, None);
    }

    #[test]
    fn test_direction_toggle() {
        assert_eq!(SortDirection::Ascending.toggled(), SortDirection::Descending);
        assert_eq!(SortDirection::Descending.toggled(), SortDirection::Ascending);
    }
}
