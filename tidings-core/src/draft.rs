//! New-task draft form
//!
//! Stages the fields of a task before it is committed to the store.

use chrono::{DateTime, Local};

use crate::date::parse_due_date;
use crate::error::Result;
use crate::task::{Category, Priority, ReminderOffset};

/// Staging record for a not-yet-created task
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Draft {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
    pub due_date: Option<DateTime<Local>>,
    pub reminder: ReminderOffset,
}

impl Draft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field by name from its text form
    ///
    /// Returns `Ok(false)` when `field` is not a draft attribute; the draft is
    /// left untouched in that case. `now` anchors relative due dates.
    pub fn set_field_value(&mut self, field: &str, value: &str, now: DateTime<Local>) -> Result<bool> {
        match field {
            "title" => self.title = value.to_string(),
            "description" => self.description = value.to_string(),
            "category" => self.category = Category::parse(value)?,
            "priority" => self.priority = Priority::parse(value)?,
            "dueDate" | "due_date" => self.due_date = parse_due_date(value, now)?,
            "reminder" => self.reminder = ReminderOffset::parse(value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    /// Clear the per-task fields, keeping category and priority for the next entry
    pub fn reset(&mut self) {
        self.title.clear();
        self.description.clear();
        self.due_date = None;
        self.reminder = ReminderOffset::Off;
    }
}
