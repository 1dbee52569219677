//! Task domain model
//!
//! Pure domain logic for tasks and their reminder state, with no I/O.

use chrono::{DateTime, Duration, Local};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Placeholder stored when a task is created without a description
pub const NO_DESCRIPTION: &str = "No description";

/// Fixed set of task categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    #[default]
    Work,
    Study,
    Life,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Work, Category::Study, Category::Life];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Work => "Work",
            Category::Study => "Study",
            Category::Life => "Life",
        }
    }

    /// Parse a category name (case-insensitive)
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                CoreError::validation(
                    "category",
                    format!("unknown category '{}' (expected work, study or life)", s),
                )
            })
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed set of task priorities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    /// Sort rank: High sorts first
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }

    /// Parse a priority name (case-insensitive)
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("med") {
            return Ok(Priority::Medium);
        }
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                CoreError::validation(
                    "priority",
                    format!("unknown priority '{}' (expected low, medium or high)", s),
                )
            })
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How long before the due date a reminder fires
///
/// Persisted as plain minutes; `0` disables the reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum ReminderOffset {
    #[default]
    Off,
    FiveMinutes,
    FifteenMinutes,
    ThirtyMinutes,
    OneHour,
    OneDay,
}

impl ReminderOffset {
    pub const ALL: [ReminderOffset; 6] = [
        ReminderOffset::Off,
        ReminderOffset::FiveMinutes,
        ReminderOffset::FifteenMinutes,
        ReminderOffset::ThirtyMinutes,
        ReminderOffset::OneHour,
        ReminderOffset::OneDay,
    ];

    pub fn minutes(&self) -> u32 {
        match self {
            ReminderOffset::Off => 0,
            ReminderOffset::FiveMinutes => 5,
            ReminderOffset::FifteenMinutes => 15,
            ReminderOffset::ThirtyMinutes => 30,
            ReminderOffset::OneHour => 60,
            ReminderOffset::OneDay => 1440,
        }
    }

    pub fn from_minutes(minutes: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.minutes() == minutes)
    }

    pub fn is_enabled(&self) -> bool {
        *self != ReminderOffset::Off
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReminderOffset::Off => "No reminder",
            ReminderOffset::FiveMinutes => "5 minutes before",
            ReminderOffset::FifteenMinutes => "15 minutes before",
            ReminderOffset::ThirtyMinutes => "30 minutes before",
            ReminderOffset::OneHour => "1 hour before",
            ReminderOffset::OneDay => "1 day before",
        }
    }

    /// Parse a minute count or "none"
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("none") {
            return Ok(ReminderOffset::Off);
        }
        let minutes: u32 = s.parse().map_err(|_| {
            CoreError::validation("reminder", format!("'{}' is not a number of minutes", s))
        })?;
        Self::try_from(minutes)
    }
}

impl TryFrom<u32> for ReminderOffset {
    type Error = CoreError;

    fn try_from(minutes: u32) -> Result<Self> {
        Self::from_minutes(minutes).ok_or_else(|| {
            CoreError::validation(
                "reminder",
                format!("{} is not a supported offset (0, 5, 15, 30, 60, 1440)", minutes),
            )
        })
    }
}

impl From<ReminderOffset> for u32 {
    fn from(offset: ReminderOffset) -> Self {
        offset.minutes()
    }
}

/// A single task
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
    #[serde(default, deserialize_with = "crate::date::deserialize_due_date")]
    pub due_date: Option<DateTime<Local>>,
    #[serde(default)]
    pub reminder: ReminderOffset,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub notified: bool,
}

impl Task {
    /// Create a new task with the given title and defaults elsewhere
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: 0,
            title: title.into(),
            description: NO_DESCRIPTION.to_string(),
            category: Category::default(),
            priority: Priority::default(),
            due_date: None,
            reminder: ReminderOffset::Off,
            completed: false,
            notified: false,
        }
    }

    /// Builder method to set task ID
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }

    /// Builder method to set description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builder method to set category
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Builder method to set priority
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Builder method to set due date
    pub fn with_due_date(mut self, due_date: Option<DateTime<Local>>) -> Self {
        self.due_date = due_date;
        self
    }

    /// Builder method to set reminder offset
    pub fn with_reminder(mut self, reminder: ReminderOffset) -> Self {
        self.reminder = reminder;
        self
    }

    /// Builder method to set completion status
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    /// Toggle completion status
    ///
    /// Completing a task also marks it notified. Reopening leaves the flag alone.
    pub fn toggle_complete(&mut self) {
        self.completed = !self.completed;
        if self.completed {
            self.notified = true;
        }
    }

    /// Change the reminder offset, re-arming the notification
    pub fn set_reminder(&mut self, reminder: ReminderOffset) {
        self.reminder = reminder;
        self.notified = false;
    }

    /// The instant the reminder should fire, if the task has one
    pub fn reminder_time(&self) -> Option<DateTime<Local>> {
        if !self.reminder.is_enabled() {
            return None;
        }
        let due = self.due_date?;
        due.checked_sub_signed(Duration::minutes(i64::from(self.reminder.minutes())))
    }

    /// Whether a scan at `now` should notify for this task
    ///
    /// Fires when the reminder time is within `window` of `now`, in either direction.
    pub fn is_reminder_due(&self, now: DateTime<Local>, window: Duration) -> bool {
        if self.completed || self.notified {
            return false;
        }
        match self.reminder_time() {
            Some(at) => (now - at).abs() <= window,
            None => false,
        }
    }

    /// Check if task is past its due date
    pub fn is_overdue(&self, now: DateTime<Local>) -> bool {
        match self.due_date {
            Some(due) => due < now && !self.completed,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn noon() -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2026, 3, 10, 12, 0, 0)
            .single()
            .unwrap()
    }

    #[test]
    fn test_task_creation() {
        let task = Task::new("Test task").with_id(1);

        assert_eq!(task.id, 1);
        assert_eq!(task.title, "Test task");
        assert_eq!(task.description, NO_DESCRIPTION);
        assert!(!task.completed);
        assert!(!task.notified);
        assert!(task.due_date.is_none());
    }

    #[test]
    fn test_toggle_ratchets_notified() {
        let mut task = Task::new("Test");

        task.toggle_complete();
        assert!(task.completed);
        assert!(task.notified);

        task.toggle_complete();
        assert!(!task.completed);
        assert!(task.notified);
    }

    #[test]
    fn test_set_reminder_rearms() {
        let mut task = Task::new("Test").with_completed(true);
        task.notified = true;

        task.set_reminder(ReminderOffset::ThirtyMinutes);
        assert_eq!(task.reminder, ReminderOffset::ThirtyMinutes);
        assert!(!task.notified);
    }

    #[test]
    fn test_reminder_time() {
        let due = noon();
        let task = Task::new("Test")
            .with_due_date(Some(due))
            .with_reminder(ReminderOffset::FifteenMinutes);

        assert_eq!(task.reminder_time(), Some(due - Duration::minutes(15)));
        assert_eq!(Task::new("No due").with_reminder(ReminderOffset::OneHour).reminder_time(), None);
        assert_eq!(Task::new("No offset").with_due_date(Some(due)).reminder_time(), None);
    }

    #[test]
    fn test_reminder_due_window() {
        let due = noon();
        let task = Task::new("Test")
            .with_due_date(Some(due))
            .with_reminder(ReminderOffset::FiveMinutes);
        let window = Duration::seconds(60);
        let at = due - Duration::minutes(5);

        assert!(task.is_reminder_due(at, window));
        assert!(task.is_reminder_due(at + Duration::seconds(60), window));
        assert!(task.is_reminder_due(at - Duration::seconds(60), window));
        assert!(!task.is_reminder_due(at + Duration::seconds(61), window));
        assert!(!task.is_reminder_due(at - Duration::minutes(5), window));
    }

    #[test]
    fn test_completed_task_never_due() {
        let due = noon();
        let mut task = Task::new("Done")
            .with_due_date(Some(due))
            .with_reminder(ReminderOffset::ThirtyMinutes)
            .with_completed(true);
        task.notified = false;

        assert!(!task.is_reminder_due(due - Duration::minutes(30), Duration::seconds(60)));
    }

    #[test]
    fn test_reminder_offset_minutes() {
        assert_eq!(ReminderOffset::from_minutes(1440), Some(ReminderOffset::OneDay));
        assert_eq!(ReminderOffset::from_minutes(7), None);
        assert!(ReminderOffset::parse("none").is_ok());
        assert!(ReminderOffset::parse("7").is_err());
    }

    #[test]
    fn test_parse_category_and_priority() {
        assert_eq!(Category::parse(" STUDY ").unwrap(), Category::Study);
        assert_eq!(Priority::parse("high").unwrap(), Priority::High);
        assert_eq!(Priority::parse("Med").unwrap(), Priority::Medium);
        assert!(Category::parse("garden").is_err());
        assert!(Priority::parse("urgent").is_err());
    }

    #[test]
    fn test_serialized_field_names() {
        let task = Task::new("Read")
            .with_id(42)
            .with_reminder(ReminderOffset::OneHour)
            .with_due_date(Some(noon()));
        let json = serde_json::to_value(&task).unwrap();

        assert_eq!(json["id"], 42);
        assert_eq!(json["reminder"], 60);
        assert_eq!(json["category"], "Work");
        assert!(json["dueDate"].is_string());
        assert_eq!(json["notified"], false);
    }

    #[test]
    fn test_deserialize_empty_due_date() {
        let json = r#"{"id":1,"title":"Learn Rust","description":"x","category":"Study",
            "priority":"High","dueDate":"","completed":false,"reminder":0,"notified":false}"#;
        let task: Task = serde_json::from_str(json).unwrap();

        assert!(task.due_date.is_none());
        assert_eq!(task.priority, Priority::High);
    }

    #[test]
    fn test_deserialize_rejects_unknown_offset() {
        let json = r#"{"id":1,"title":"t","description":"d","category":"Work",
            "priority":"Low","dueDate":null,"completed":false,"reminder":7,"notified":false}"#;
        assert!(serde_json::from_str::<Task>(json).is_err());
    }
}
