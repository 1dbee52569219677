use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::Mutex;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use tidings_core::date::format_due_date;
use tidings_core::{CategoryFilter, ReminderOffset, ReminderPoller, SystemClock, TaskStore};

use crate::cli::{Cli, Commands};
use crate::display::{DisplayMode, format_summary, format_task, format_view_header, supports_color};
use crate::error::{CliError, Result};
use crate::notifier::DesktopNotifier;
use crate::scheduler::ReminderScheduler;
use crate::storage::FileStorage;

mod cli;
mod config;
mod display;
mod error;
mod notifier;
mod scheduler;
mod storage;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tidings=warn")),
        )
        .init();

    let cli = Cli::parse();

    let cfg: config::Config = confy::load("tidings", None)?;
    let storage = FileStorage::new(&cfg.data_directory);
    debug!(dir = %storage.dir().display(), key = %cfg.storage_key, "opening task store");
    let mut store = TaskStore::load_with(storage, SystemClock, cfg.storage_key.as_str())?;

    match cli.command {
        Commands::Add {
            title,
            description,
            category,
            priority,
            due,
            remind,
        } => {
            store.set_field_value("title", &title.join(" "))?;
            let fields = [
                ("description", description),
                ("category", category),
                ("priority", priority),
                ("dueDate", due),
                ("reminder", remind),
            ];
            for (field, value) in fields {
                if let Some(value) = value {
                    store.set_field_value(field, &value)?;
                }
            }

            let reminder = store.draft().reminder;
            let has_due = store.draft().due_date.is_some();
            let id = store
                .add_todo()?
                .ok_or_else(|| CliError::validation("title", "Task title cannot be empty"))?;

            let task = store.get(id).ok_or(CliError::TaskNotFound(id))?;
            match &task.due_date {
                Some(dt) => println!(
                    "Task added: {} (#{}, due: {})",
                    task.title,
                    id,
                    format_due_date(dt)
                ),
                None => println!("Task added: {} (#{})", task.title, id),
            }
            if reminder.is_enabled() && !has_due {
                println!("Note: the reminder will not fire until the task has a due date.");
            }
        }

        Commands::List {
            category,
            sort,
            compact,
            detailed,
            no_color,
        } => {
            store.set_selected_category(CategoryFilter::parse(&category)?);
            store.set_sort_by(sort.into());

            let now = store.now();
            let tasks = store.filtered_and_sorted_todos();

            if tasks.is_empty() {
                println!("No tasks found.");
            } else {
                // Determine display mode
                let mode = if compact {
                    DisplayMode::Compact
                } else if detailed {
                    DisplayMode::Detailed
                } else {
                    DisplayMode::Default
                };

                let use_color = !no_color && supports_color();

                println!(
                    "{}",
                    format_view_header(store.selected_category(), store.sort_by(), use_color)
                );
                for task in &tasks {
                    println!("{}", format_task(task, mode, use_color, now));
                }

                // Show summary
                println!();
                let summary = format_summary(
                    store.tasks().len(),
                    store.remaining_count(),
                    store.tasks().iter().filter(|t| t.is_overdue(now)).count(),
                    use_color,
                );
                println!("{}", summary);
            }
        }

        Commands::Show { id } => {
            store.show_todo_details(id);
            let now = store.now();
            let task = store.selected_todo().ok_or(CliError::TaskNotFound(id))?;
            println!(
                "{}",
                format_task(task, DisplayMode::Detailed, supports_color(), now)
            );
            store.close_details();
        }

        Commands::Check { id } => {
            let completed = store.toggle_todo(id)?.ok_or(CliError::TaskNotFound(id))?;
            let status = if completed { "done" } else { "open" };
            let title = store.get(id).map(|t| t.title.as_str()).unwrap_or_default();
            println!("Marked task #{} as {}: {}", id, status, title);
        }

        Commands::Remind { id, minutes } => {
            let reminder = ReminderOffset::parse(&minutes)?;
            if !store.update_todo_reminder(id, reminder)? {
                return Err(CliError::TaskNotFound(id));
            }
            println!("Reminder for task #{}: {}", id, reminder.label());
            if reminder.is_enabled() && store.get(id).is_some_and(|t| t.due_date.is_none()) {
                println!("Note: the reminder will not fire until the task has a due date.");
            }
        }

        Commands::Remove { id } => {
            let removed_task = store.delete_todo(id)?.ok_or(CliError::TaskNotFound(id))?;
            println!("Removed: {}", removed_task.title);
        }

        Commands::Clear { force } => {
            let count = store.tasks().len() - store.remaining_count();

            if count == 0 {
                println!("No completed tasks to remove.");
                return Ok(());
            }

            if !force && !confirm(&format!("Remove {} completed task(s)?", count))? {
                println!("Cancelled.");
                return Ok(());
            }

            let removed = store.clear_completed()?;
            println!("Removed {} completed task(s).", removed);
        }

        Commands::Watch { once } => {
            let mut poller = ReminderPoller::new(DesktopNotifier::new(cfg.notifications_enabled))
                .with_icon(cfg.icon());

            if once {
                poller.request_permission();
                let fired = poller.check_reminders(&mut store)?;
                println!("{} reminder(s) due.", fired);
                return Ok(());
            }

            let period = Duration::from_secs(cfg.poll_interval_secs.max(1));
            let mut scheduler = ReminderScheduler::new(period);
            scheduler.start(Arc::new(Mutex::new(store)), poller);

            println!(
                "Watching for reminders every {}s. Press Ctrl-C to stop.",
                period.as_secs()
            );
            let signal = tokio::signal::ctrl_c().await;
            scheduler.stop().await;
            signal.map_err(|e| CliError::io("Failed to listen for Ctrl-C", e))?;
        }
    }

    Ok(())
}

/// Ask user for confirmation
fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim().to_lowercase() == "y")
}
