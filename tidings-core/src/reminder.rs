//! Reminder scanning
//!
//! The poller compares each task's reminder time against the store's clock,
//! shows a notification for the ones that have arrived and marks them
//! notified so they do not fire again. Scheduling the scans is left to the
//! caller.

use chrono::Duration;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::date::format_due_date;
use crate::error::Result;
use crate::storage::Storage;
use crate::store::TaskStore;

/// Title of every reminder notification
pub const REMINDER_TITLE: &str = "Task Reminder";

/// How far a reminder time may be from "now" and still fire (seconds)
pub const MATCH_WINDOW_SECS: i64 = 60;

/// Error raised by a notification sink
pub type NotifyError = Box<dyn std::error::Error + Send + Sync>;

/// Host permission to display notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Permission {
    /// Not yet decided
    #[default]
    Default,
    Granted,
    Denied,
}

/// Everything a notification carries besides its title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationOptions {
    pub body: String,
    pub icon: Option<String>,
    /// Dedup key; one per task
    pub tag: String,
}

/// A place reminders can be shown
pub trait Notifier {
    /// Ask the host for permission to show notifications
    fn request_permission(&self) -> Permission;

    /// Display one notification
    fn show(&self, title: &str, options: &NotificationOptions) -> std::result::Result<(), NotifyError>;
}

/// Scans a task store for due reminders
pub struct ReminderPoller<N: Notifier> {
    notifier: N,
    permission: Permission,
    icon: Option<String>,
    window: Duration,
}

impl<N: Notifier> ReminderPoller<N> {
    pub fn new(notifier: N) -> Self {
        Self {
            notifier,
            permission: Permission::Default,
            icon: None,
            window: Duration::seconds(MATCH_WINDOW_SECS),
        }
    }

    /// Builder method to set the notification icon
    pub fn with_icon(mut self, icon: Option<String>) -> Self {
        self.icon = icon;
        self
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn permission(&self) -> Permission {
        self.permission
    }

    /// Request permission from the notifier and record the answer
    pub fn request_permission(&mut self) -> Permission {
        self.permission = self.notifier.request_permission();
        info!(permission = ?self.permission, "notification permission");
        self.permission
    }

    /// Show a notification if permitted
    ///
    /// Display failures are logged and swallowed. Returns whether the
    /// notification was handed to the notifier successfully.
    pub fn send_notification(&self, title: &str, options: &NotificationOptions) -> bool {
        if self.permission != Permission::Granted {
            debug!(tag = %options.tag, permission = ?self.permission, "notification suppressed");
            return false;
        }

        match self.notifier.show(title, options) {
            Ok(()) => true,
            Err(e) => {
                warn!(tag = %options.tag, "failed to show notification: {e}");
                false
            }
        }
    }

    /// Notify for every task whose reminder time has arrived
    ///
    /// Matching tasks are marked notified whether or not the notification
    /// could be shown. Returns the number of tasks that matched.
    pub fn check_reminders<S: Storage, C: Clock>(&self, store: &mut TaskStore<S, C>) -> Result<usize> {
        let now = store.now();

        let due: Vec<u64> = store
            .tasks()
            .iter()
            .filter(|t| t.is_reminder_due(now, self.window))
            .map(|task| {
                let due_str = task.due_date.as_ref().map(format_due_date).unwrap_or_default();
                let options = NotificationOptions {
                    body: format!("{}\nDue: {}", task.title, due_str),
                    icon: self.icon.clone(),
                    tag: format!("task-reminder-{}", task.id),
                };
                self.send_notification(REMINDER_TITLE, &options);
                task.id
            })
            .collect();

        if !due.is_empty() {
            info!(count = due.len(), "reminders fired");
            store.mark_notified(&due)?;
        }

        Ok(due.len())
    }
}
