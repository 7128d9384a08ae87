// Test fixtures - reusable test data
// Provides consistent events across integration tests

use event_calendar::models::event::{EventState, LoggedEvent};

/// 2024-01-01T00:00:00Z
pub const JAN_1_2024: i64 = 1_704_067_200;

pub const DAY: i64 = 86_400;

/// Events around 2024-01-01 (UTC): three inside the day, two just outside.
pub fn new_year_events() -> Vec<LoggedEvent> {
    vec![
        event("web-01", JAN_1_2024 - 1, EventState::Warning, &["prod"]),
        event("web-01", JAN_1_2024, EventState::Critical, &["prod", "web"]),
        event("db-01", JAN_1_2024 + 3_600, EventState::Ok, &["prod", "db"]),
        event("db-02", JAN_1_2024 + DAY - 1, EventState::Unknown, &["staging", "db"]),
        event("web-02", JAN_1_2024 + DAY, EventState::Ok, &["prod"]),
    ]
}

pub fn event(component: &str, timestamp: i64, state: EventState, tags: &[&str]) -> LoggedEvent {
    let mut builder = LoggedEvent::builder()
        .component(component)
        .timestamp(timestamp)
        .state(state)
        .output(format!("{} is {}", component, state.label()));
    for tag in tags {
        builder = builder.tag(*tag);
    }
    builder.build().expect("fixture event is valid")
}
