//! Task display formatting module
//!
//! Handles colored output and different view modes for tasks

use chrono::{DateTime, Local};
use colored::*;

use tidings_core::date::{format_due_date, format_due_human};
use tidings_core::{CategoryFilter, Priority, SortMode, Task};

/// Display mode for task list
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DisplayMode {
    /// Minimal one-line format
    Compact,
    /// Every field, one per line
    Detailed,
    /// Balanced view with clear status indicators (default)
    Default,
}

/// Check if terminal supports colors
pub fn supports_color() -> bool {
    atty::is(atty::Stream::Stdout)
}

fn priority_badge(priority: Priority, use_color: bool) -> String {
    let badge = format!("!{}", priority.as_str());
    if !use_color {
        return badge;
    }
    match priority {
        Priority::High => badge.red().bold().to_string(),
        Priority::Medium => badge.yellow().to_string(),
        Priority::Low => badge.blue().to_string(),
    }
}

/// Format a task for display
pub fn format_task(task: &Task, mode: DisplayMode, use_color: bool, now: DateTime<Local>) -> String {
    let checkbox = if task.completed { "[✓]" } else { "[ ]" };

    let due_info = match &task.due_date {
        Some(dt) => {
            let due_str = format!("({})", format_due_human(dt, now));
            if !use_color {
                due_str
            } else if task.completed {
                due_str.green().to_string()
            } else if task.is_overdue(now) {
                due_str.red().bold().to_string()
            } else if *dt - now <= chrono::Duration::days(1) {
                due_str.yellow().to_string()
            } else {
                due_str.normal().to_string()
            }
        }
        None => String::new(),
    };

    let title = if use_color && task.completed {
        task.title.green().to_string()
    } else {
        task.title.clone()
    };

    let category = if use_color {
        format!("#{}", task.category).magenta().to_string()
    } else {
        format!("#{}", task.category)
    };

    match mode {
        DisplayMode::Compact => {
            format!("{} [{}] {}", checkbox, task.id, title)
        }
        DisplayMode::Detailed => {
            let mut parts = vec![
                format!("{} [ID: {}]", checkbox, task.id),
                format!("Title: {}", title),
                format!("Description: {}", task.description),
                format!("Category: {}", task.category),
                format!("Priority: {}", priority_badge(task.priority, use_color)),
            ];

            match &task.due_date {
                Some(dt) => parts.push(format!("Due: {} {}", format_due_date(dt), due_info)),
                None => parts.push("Due: (none)".to_string()),
            }

            let bell = if task.notified { " (sent)" } else { "" };
            parts.push(format!("Reminder: {}{}", task.reminder.label(), bell));
            parts.push(format!(
                "Status: {}",
                if task.completed {
                    "Complete"
                } else {
                    "Incomplete"
                }
            ));
            parts.join("\n  ")
        }
        DisplayMode::Default => {
            let id_str = if use_color {
                format!("[{}]", task.id).cyan().to_string()
            } else {
                format!("[{}]", task.id)
            };

            let mut line = format!(
                "{} {} {} {} {}",
                checkbox,
                id_str,
                title,
                category,
                priority_badge(task.priority, use_color)
            );
            if !due_info.is_empty() {
                line.push(' ');
                line.push_str(&due_info);
            }
            if task.reminder.is_enabled() && !task.completed {
                line.push_str(" 🔔");
            }
            line
        }
    }
}

/// Header line naming the active category filter and sort order
pub fn format_view_header(category: CategoryFilter, sort: SortMode, use_color: bool) -> String {
    let header = format!("Category: {} | Sort: {}", category.as_str(), sort.as_str());
    if use_color {
        header.dimmed().to_string()
    } else {
        header
    }
}

/// Format a summary line for task list
pub fn format_summary(total: usize, remaining: usize, overdue: usize, use_color: bool) -> String {
    let parts = vec![
        format!("{} total", total),
        if use_color {
            format!("{} remaining", remaining).yellow().to_string()
        } else {
            format!("{} remaining", remaining)
        },
        if overdue > 0 {
            if use_color {
                format!("{} overdue", overdue).red().to_string()
            } else {
                format!("{} overdue", overdue)
            }
        } else {
            String::new()
        },
    ];

    let summary: Vec<&str> = parts.iter().filter(|s| !s.is_empty()).map(|s| s.as_str()).collect();

    format!("[{}]", summary.join(" | "))
}
