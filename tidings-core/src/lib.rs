//! Tidings Core - Pure domain logic for task tracking and reminders
//!
//! This crate contains no I/O operations. Persistence and notification
//! display are reached through the [`Storage`] and [`Notifier`] traits,
//! implemented by adapters in consuming crates.

pub mod clock;
pub mod date;
pub mod draft;
pub mod error;
pub mod reminder;
pub mod storage;
pub mod store;
pub mod task;
pub mod view;

pub use clock::{Clock, FixedClock, SystemClock};
pub use draft::Draft;
pub use error::{CoreError, Result};
pub use reminder::{NotificationOptions, Notifier, Permission, ReminderPoller};
pub use storage::{MemoryStorage, Storage};
pub use store::TaskStore;
pub use task::{Category, Priority, ReminderOffset, Task};
pub use view::{CategoryFilter, SortMode};
