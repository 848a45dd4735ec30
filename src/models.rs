// Data models for the to-do list

use serde::{Deserialize, Serialize};

/// Tag applied when a task is created without one
pub const DEFAULT_TAG: &str = "General";

/// A single to-do item
///
/// `due_date` is milliseconds since the Unix epoch (UTC), with `0` meaning
/// "no due date". `priority` keeps whatever integer was stored; use
/// [`Task::priority_level`] to read it as a [`Priority`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub text: String,
    #[serde(rename = "dueDate")]
    pub due_date: i64,
    pub priority: i64,
    pub tag: String,
}

impl Task {
    pub fn new(text: impl Into<String>, due_date: i64, priority: i64) -> Self {
        Self::with_tag(text, due_date, priority, DEFAULT_TAG)
    }

    pub fn with_tag(text: impl Into<String>, due_date: i64, priority: i64, tag: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            due_date,
            priority,
            tag: tag.into(),
        }
    }

    pub fn has_due_date(&self) -> bool {
        self.due_date > 0
    }

    pub fn priority_level(&self) -> Priority {
        Priority::from_raw(self.priority)
    }
}

/// Priority levels as rendered to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    None = 0,
    Low = 1,
    Medium = 2,
    High = 3,
}

impl Priority {
    /// Anything outside 0..=3 is treated as `None`
    pub fn from_raw(raw: i64) -> Self {
        match raw {
            1 => Priority::Low,
            2 => Priority::Medium,
            3 => Priority::High,
            _ => Priority::None,
        }
    }

    pub fn as_raw(self) -> i64 {
        self as i64
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::None => "none",
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Helper function to get current timestamp in milliseconds
pub fn now_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_ms() {
        let ts = now_ms();
        // Should be reasonable timestamp (after year 2020)
        assert!(ts > 1_600_000_000_000);
    }

    #[test]
    fn test_new_task_uses_default_tag() {
        let task = Task::new("Buy milk", 0, 1);
        assert_eq!(task.tag, "General");
        assert!(!task.has_due_date());
        assert_eq!(task.priority_level(), Priority::Low);
    }

    #[test]
    fn test_priority_from_raw_tolerates_out_of_range() {
        assert_eq!(Priority::from_raw(0), Priority::None);
        assert_eq!(Priority::from_raw(3), Priority::High);
        assert_eq!(Priority::from_raw(7), Priority::None);
        assert_eq!(Priority::from_raw(-1), Priority::None);
        assert_eq!(Priority::Medium.as_raw(), 2);
    }

    #[test]
    fn test_task_serialization_uses_wire_names() {
        let task = Task::with_tag("Report", 1_700_000_000_000, 3, "Work");
        let json = serde_json::to_string(&task).unwrap();
        assert_eq!(
            json,
            r#"{"text":"Report","dueDate":1700000000000,"priority":3,"tag":"Work"}"#
        );
    }
}
