// Filter module
// Criteria that scope which events a grid displays

use serde::{Deserialize, Serialize};

use crate::models::event::LoggedEvent;

/// How the tag list of a filter is combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagMatch {
    /// Every tag must be present on the event
    #[default]
    All,
    /// At least one tag must be present
    Any,
}

/// Time range plus tag constraint applied to the event log.
///
/// The range is half-open: `start <= timestamp < end`. An empty tag list
/// places no constraint on tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub start: i64,
    pub end: i64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub tag_match: TagMatch,
}

impl FilterSpec {
    pub fn new(start: i64, end: i64) -> Self {
        Self {
            start,
            end,
            tags: Vec::new(),
            tag_match: TagMatch::All,
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I, tag_match: TagMatch) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = normalize_tags(tags);
        self.tag_match = tag_match;
        self
    }

    /// Evaluate the filter against an in-memory event.
    pub fn matches(&self, event: &LoggedEvent) -> bool {
        if event.timestamp < self.start || event.timestamp >= self.end {
            return false;
        }

        let tags = normalize_tags(self.tags.iter().cloned());
        if tags.is_empty() {
            return true;
        }

        let has = |tag: &String| event.tags.iter().any(|t| t == tag);
        match self.tag_match {
            TagMatch::All => tags.iter().all(has),
            TagMatch::Any => tags.iter().any(has),
        }
    }
}

/// Trim, drop blanks and duplicates while keeping first-seen order.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut normalized: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.into().trim().to_string();
        if !tag.is_empty() && !normalized.contains(&tag) {
            normalized.push(tag);
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::EventState;
    use pretty_assertions::assert_eq;

    fn tagged(timestamp: i64, tags: &[&str]) -> LoggedEvent {
        let mut builder = LoggedEvent::builder()
            .component("web-01")
            .timestamp(timestamp)
            .state(EventState::Warning);
        for tag in tags {
            builder = builder.tag(*tag);
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_range_is_half_open() {
        let filter = FilterSpec::new(100, 200);
        assert!(filter.matches(&tagged(100, &[])));
        assert!(filter.matches(&tagged(199, &[])));
        assert!(!filter.matches(&tagged(200, &[])));
        assert!(!filter.matches(&tagged(99, &[])));
    }

    #[test]
    fn test_all_tags_required() {
        let filter = FilterSpec::new(0, 1_000).with_tags(["prod", "db"], TagMatch::All);
        assert!(filter.matches(&tagged(10, &["db", "prod", "eu"])));
        assert!(!filter.matches(&tagged(10, &["prod"])));
    }

    #[test]
    fn test_any_tag_suffices() {
        let filter = FilterSpec::new(0, 1_000).with_tags(["prod", "db"], TagMatch::Any);
        assert!(filter.matches(&tagged(10, &["db"])));
        assert!(!filter.matches(&tagged(10, &["staging"])));
    }

    #[test]
    fn test_normalize_tags() {
        let tags = normalize_tags([" prod", "db", "", "prod", "db "]);
        assert_eq!(tags, vec!["prod".to_string(), "db".to_string()]);
    }

    #[test]
    fn test_json_shape() {
        let filter = FilterSpec::new(1, 2).with_tags(["prod"], TagMatch::Any);
        let json = serde_json::to_string(&filter).unwrap();
        assert_eq!(json, r#"{"start":1,"end":2,"tags":["prod"],"tag_match":"any"}"#);

        let parsed: FilterSpec = serde_json::from_str(r#"{"start":1,"end":2}"#).unwrap();
        assert_eq!(parsed, FilterSpec::new(1, 2));
    }
}
