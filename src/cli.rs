use clap::{Parser, Subcommand, ValueEnum};
use tidings_core::SortMode;

#[derive(Parser)]
#[command(name = "tidings")]
#[command(about = concat!(
    ">>===============================<<\n",
    "||  _   _    _ _                 ||\n",
    "|| | |_(_)__| (_)_ _  __ _ ___   ||\n",
    "|| |  _| / _` | | ' \\/ _` (_-<   ||\n",
    "||  \\__|_\\__,_|_|_||_\\__, /__/   ||\n",
    "||                   |___/       ||\n",
    ">>===============================<<\n",
    "~Tasks that remember to remind you~"
))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_version = concat!(
    "v",
    env!("CARGO_PKG_VERSION"),
    "\nCodeName: ",
    env!("CODENAME")
))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SortBy {
    Default,
    Priority,
    DueDate,
    Title,
}

impl From<SortBy> for SortMode {
    fn from(sort: SortBy) -> Self {
        match sort {
            SortBy::Default => SortMode::Default,
            SortBy::Priority => SortMode::Priority,
            SortBy::DueDate => SortMode::DueDate,
            SortBy::Title => SortMode::Title,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Adds a task
    Add {
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
        /// Longer description of the task
        #[arg(long, short = 'D', value_name = "TEXT")]
        description: Option<String>,
        /// Category (work, study or life)
        #[arg(long, short = 'C', value_name = "CATEGORY")]
        category: Option<String>,
        /// Priority (low, medium or high)
        #[arg(long, short = 'p', value_name = "PRIORITY")]
        priority: Option<String>,
        /// Due date, e.g. "tomorrow 9:00", "in 2h" or "2026-03-10T14:30"
        #[arg(long, short = 'd', value_name = "DATE")]
        due: Option<String>,
        /// Minutes before the due date to remind (0, 5, 15, 30, 60, 1440)
        #[arg(long, short = 'r', value_name = "MINUTES")]
        remind: Option<String>,
    },

    /// Lists tasks with filtering and sorting
    List {
        /// Filter by category ('all' for every category)
        #[arg(long, short = 'C', value_name = "CATEGORY", default_value = "all")]
        category: String,
        /// Sort tasks by field
        #[arg(long, value_enum, default_value = "default")]
        sort: SortBy,
        /// Use compact one-line format
        #[arg(long, short = 'c')]
        compact: bool,
        /// Use detailed format with full info
        #[arg(long)]
        detailed: bool,
        /// Disable colors
        #[arg(long)]
        no_color: bool,
    },

    /// Shows every field of a task
    Show {
        #[arg(value_parser = clap::value_parser!(u64))]
        id: u64,
    },

    /// Toggles task completion status
    Check {
        #[arg(value_parser = clap::value_parser!(u64))]
        id: u64,
    },

    /// Changes a task's reminder offset
    Remind {
        #[arg(value_parser = clap::value_parser!(u64))]
        id: u64,
        /// Minutes before the due date (0 or 'none' to disable)
        minutes: String,
    },

    /// Removes a task
    Remove {
        #[arg(value_parser = clap::value_parser!(u64))]
        id: u64,
    },

    /// Clear completed tasks
    Clear {
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Watches for due reminders and shows desktop notifications
    Watch {
        /// Scan once and exit
        #[arg(long)]
        once: bool,
    },
}
