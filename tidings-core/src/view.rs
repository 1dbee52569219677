//! Derived task view: category filtering and sorting
//!
//! The view is never stored. It is recomputed from the task list and the
//! selection state on every read.

use std::cmp::Ordering;

use feruca::Collator;

use crate::error::{CoreError, Result};
use crate::task::{Category, Task};

/// Category selection for the derived view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Parse "all" or a category name
    pub fn parse(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            Category::parse(s).map(Self::Only).map_err(|_| {
                CoreError::validation(
                    "category",
                    format!("unknown category '{}' (expected all, work, study or life)", s.trim()),
                )
            })
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(category) => category.as_str(),
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Only(category) => task.category == *category,
        }
    }
}

/// Sort order for the derived view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Newest first
    #[default]
    Default,
    Priority,
    DueDate,
    Title,
}

impl SortMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Default => "default",
            SortMode::Priority => "priority",
            SortMode::DueDate => "dueDate",
            SortMode::Title => "title",
        }
    }
}

/// Filter `tasks` by category and order them by `sort`
///
/// The input slice is never reordered; the result borrows from it.
pub fn filtered_and_sorted(tasks: &[Task], category: CategoryFilter, sort: SortMode) -> Vec<&Task> {
    let mut result: Vec<&Task> = tasks.iter().filter(|t| category.matches(t)).collect();

    match sort {
        SortMode::Priority => result.sort_by_key(|t| t.priority.rank()),
        SortMode::DueDate => result.sort_by(|a, b| match (&a.due_date, &b.due_date) {
            (Some(a_dt), Some(b_dt)) => a_dt.cmp(b_dt),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }),
        SortMode::Title => {
            let mut collator = Collator::default();
            result.sort_by(|a, b| collator.collate(a.title.as_str(), b.title.as_str()));
        }
        SortMode::Default => result.sort_by(|a, b| b.id.cmp(&a.id)),
    }

    result
}
