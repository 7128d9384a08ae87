// Event module
// Monitoring event as stored in the event log

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Check state reported by a monitoring event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventState {
    #[default]
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl EventState {
    pub fn as_code(self) -> i64 {
        match self {
            EventState::Ok => 0,
            EventState::Warning => 1,
            EventState::Critical => 2,
            EventState::Unknown => 3,
        }
    }

    /// Map a stored state code; anything outside 0..=2 is reported as unknown.
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => EventState::Ok,
            1 => EventState::Warning,
            2 => EventState::Critical,
            _ => EventState::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EventState::Ok => "Ok",
            EventState::Warning => "Warning",
            EventState::Critical => "Critical",
            EventState::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for EventState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A logged monitoring event (check result, log line, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedEvent {
    #[serde(default)]
    pub id: Option<i64>,
    /// Epoch seconds
    pub timestamp: i64,
    #[serde(default)]
    pub connector: String,
    pub component: String,
    #[serde(default)]
    pub resource: Option<String>,
    #[serde(default)]
    pub state: EventState,
    #[serde(default = "default_event_type")]
    pub event_type: String,
    #[serde(default)]
    pub output: String,
    #[serde(default)]
    pub long_output: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_event_type() -> String {
    "check".to_string()
}

impl LoggedEvent {
    /// Create a new event with required fields
    ///
    /// # Examples
    /// ```
    /// use event_calendar::models::event::{EventState, LoggedEvent};
    ///
    /// let event = LoggedEvent::new("web-01", 1_704_067_200, EventState::Critical).unwrap();
    /// assert_eq!(event.event_type, "check");
    /// ```
    pub fn new(component: impl Into<String>, timestamp: i64, state: EventState) -> Result<Self, String> {
        let event = Self {
            id: None,
            timestamp,
            connector: String::new(),
            component: component.into(),
            resource: None,
            state,
            event_type: default_event_type(),
            output: String::new(),
            long_output: None,
            tags: Vec::new(),
        };
        event.validate()?;
        Ok(event)
    }

    pub fn builder() -> LoggedEventBuilder {
        LoggedEventBuilder::default()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.component.trim().is_empty() {
            return Err("Event component cannot be empty".to_string());
        }

        if self.timestamp < 0 {
            return Err("Event timestamp cannot be before the epoch".to_string());
        }

        if self.tags.iter().any(|tag| tag.trim().is_empty()) {
            return Err("Event tags cannot be blank".to_string());
        }

        Ok(())
    }

    /// Source label shown in the grid: `component` or `component/resource`.
    pub fn source(&self) -> String {
        match self.resource.as_deref() {
            Some(resource) if !resource.is_empty() => format!("{}/{}", self.component, resource),
            _ => self.component.clone(),
        }
    }

    /// Timestamp rendered in the given zone; `None` if out of chrono's range.
    pub fn time_in<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Tz>> {
        tz.timestamp_opt(self.timestamp, 0).single()
    }

    pub fn local_time(&self) -> Option<DateTime<Local>> {
        self.time_in(&Local)
    }
}

/// Builder for events with optional fields
#[derive(Default)]
pub struct LoggedEventBuilder {
    timestamp: Option<i64>,
    connector: Option<String>,
    component: Option<String>,
    resource: Option<String>,
    state: EventState,
    event_type: Option<String>,
    output: Option<String>,
    long_output: Option<String>,
    tags: Vec<String>,
}

impl LoggedEventBuilder {
    pub fn timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn connector(mut self, connector: impl Into<String>) -> Self {
        self.connector = Some(connector.into());
        self
    }

    pub fn component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    pub fn resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    pub fn state(mut self, state: EventState) -> Self {
        self.state = state;
        self
    }

    pub fn event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = Some(event_type.into());
        self
    }

    pub fn output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn long_output(mut self, long_output: impl Into<String>) -> Self {
        self.long_output = Some(long_output.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn build(self) -> Result<LoggedEvent, String> {
        let event = LoggedEvent {
            id: None,
            timestamp: self.timestamp.ok_or("Event timestamp is required")?,
            connector: self.connector.unwrap_or_default(),
            component: self.component.ok_or("Event component is required")?,
            resource: self.resource,
            state: self.state,
            event_type: self.event_type.unwrap_or_else(default_event_type),
            output: self.output.unwrap_or_default(),
            long_output: self.long_output,
            tags: self.tags,
        };
        event.validate()?;
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use test_case::test_case;

    #[test]
    fn test_new_event_defaults() {
        let event = LoggedEvent::new("db-01", 1_000, EventState::Warning).unwrap();
        assert_eq!(event.id, None);
        assert_eq!(event.event_type, "check");
        assert!(event.tags.is_empty());
    }

    #[test]
    fn test_new_event_rejects_empty_component() {
        let result = LoggedEvent::new("   ", 1_000, EventState::Ok);
        assert!(result.is_err());
    }

    #[test]
    fn test_new_event_rejects_negative_timestamp() {
        let result = LoggedEvent::new("db-01", -1, EventState::Ok);
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_requires_timestamp() {
        let result = LoggedEvent::builder().component("db-01").build();
        assert_eq!(result.unwrap_err(), "Event timestamp is required");
    }

    #[test]
    fn test_builder_rejects_blank_tag() {
        let result = LoggedEvent::builder()
            .component("db-01")
            .timestamp(10)
            .tag(" ")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_sets_optional_fields() {
        let event = LoggedEvent::builder()
            .timestamp(42)
            .connector("nagios")
            .component("web-01")
            .resource("http")
            .state(EventState::Critical)
            .event_type("log")
            .output("HTTP 500")
            .tag("prod")
            .tag("frontend")
            .build()
            .unwrap();

        assert_eq!(event.source(), "web-01/http");
        assert_eq!(event.state, EventState::Critical);
        assert_eq!(event.event_type, "log");
        assert_eq!(event.tags, vec!["prod".to_string(), "frontend".to_string()]);
    }

    #[test_case(0, EventState::Ok)]
    #[test_case(1, EventState::Warning)]
    #[test_case(2, EventState::Critical)]
    #[test_case(3, EventState::Unknown)]
    #[test_case(42, EventState::Unknown ; "out of range code")]
    fn test_state_from_code(code: i64, expected: EventState) {
        assert_eq!(EventState::from_code(code), expected);
    }

    #[test]
    fn test_time_in_utc() {
        let event = LoggedEvent::new("db-01", 1_704_067_200, EventState::Ok).unwrap();
        let time = event.time_in(&Utc).unwrap();
        assert_eq!(time.to_rfc3339(), "2024-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let event: LoggedEvent =
            serde_json::from_str(r#"{"timestamp": 5, "component": "app", "state": "critical"}"#)
                .unwrap();
        assert_eq!(event.state, EventState::Critical);
        assert_eq!(event.event_type, "check");
        assert_eq!(event.resource, None);
    }
}
