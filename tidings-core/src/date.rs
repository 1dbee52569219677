//! Due date parsing and formatting
//!
//! Supports various input formats:
//! - ISO date-times: "2026-01-25 14:30", "2026-01-25T14:30", RFC 3339
//! - ISO dates: "2026-01-25" (midnight)
//! - Relative: "today", "tomorrow 9:00"
//! - Offset: "in 30 minutes", "in 2 hours", "in 3 days"

use chrono::{DateTime, Days, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use regex::Regex;
use serde::{Deserialize, Deserializer};
use std::sync::LazyLock;

use crate::error::{CoreError, Result};

// Regex pattern is validated at compile time - invalid patterns are programming errors
static OFFSET_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^in\s+(\d+)\s*(m|min|mins|minute|minutes|h|hr|hrs|hour|hours|d|day|days|w|week|weeks)$")
        .expect("Invalid offset regex pattern")
});

/// Naive layouts accepted both from user input and from stored data.
/// The `T` forms are what a browser datetime input produces.
const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse user input into an optional due date
///
/// An empty string or "none" clears the due date.
pub fn parse_due_date(input: &str, now: DateTime<Local>) -> Result<Option<DateTime<Local>>> {
    let raw = input.trim();
    let input = raw.to_lowercase();

    if input.is_empty() || input == "none" {
        return Ok(None);
    }

    if let Some(dt) = try_parse_relative(&input, now)? {
        return Ok(Some(dt));
    }

    if let Some(dt) = try_parse_offset(&input, now) {
        return Ok(Some(dt));
    }

    if let Ok(dt) = parse_stored_due_date(raw) {
        return Ok(Some(dt));
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return to_local(date.and_time(NaiveTime::MIN)).map(Some);
    }

    Err(CoreError::parse(format!(
        "Could not parse due date '{}'. Try formats like: '2026-01-25 14:30', 'tomorrow 9:00', 'in 30 minutes', 'none'",
        raw
    )))
}

/// Parse a due date as it appears in persisted task data
pub fn parse_stored_due_date(input: &str) -> Result<DateTime<Local>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Local));
    }

    for format in &NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return to_local(naive);
        }
    }

    Err(CoreError::parse(format!("Invalid due date '{}'", input)))
}

/// Serde helper: empty strings and nulls mean "no due date"
pub fn deserialize_due_date<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<DateTime<Local>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_stored_due_date(s)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

fn to_local(naive: NaiveDateTime) -> Result<DateTime<Local>> {
    Local
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| CoreError::parse(format!("Ambiguous or skipped local time: {}", naive)))
}

fn try_parse_relative(input: &str, now: DateTime<Local>) -> Result<Option<DateTime<Local>>> {
    let today = now.date_naive();

    let (day_word, time_part) = match input.split_once(char::is_whitespace) {
        Some((day, time)) => (day, Some(time.trim())),
        None => (input, None),
    };

    let date = match day_word {
        "today" => Some(today),
        "tomorrow" => today.checked_add_days(Days::new(1)),
        _ => return Ok(None),
    };
    let date = date.ok_or_else(|| CoreError::parse("Date out of range"))?;

    let time = match time_part {
        Some(t) => NaiveTime::parse_from_str(t, "%H:%M")
            .map_err(|e| CoreError::parse_with_source(format!("Invalid time '{}'", t), e))?,
        // Bare "today" is due at 23:59
        None if day_word == "today" => NaiveTime::from_hms_opt(23, 59, 0).unwrap_or(NaiveTime::MIN),
        None => NaiveTime::MIN,
    };

    to_local(date.and_time(time)).map(Some)
}

fn try_parse_offset(input: &str, now: DateTime<Local>) -> Option<DateTime<Local>> {
    let caps = OFFSET_REGEX.captures(input)?;
    let amount: i64 = caps.get(1)?.as_str().parse().ok()?;

    let offset = match caps.get(2)?.as_str() {
        "m" | "min" | "mins" | "minute" | "minutes" => Duration::try_minutes(amount)?,
        "h" | "hr" | "hrs" | "hour" | "hours" => Duration::try_hours(amount)?,
        "d" | "day" | "days" => Duration::try_days(amount)?,
        _ => Duration::try_weeks(amount)?,
    };

    now.checked_add_signed(offset)
}

/// Format a due date the way reminders show it
pub fn format_due_date(dt: &DateTime<Local>) -> String {
    dt.format("%Y-%m-%d %H:%M").to_string()
}

/// Format a due date relative to `now` for list display
///
/// Returns strings like: "Today 14:30", "Tomorrow 09:00", "Mon Jan 27 10:00", "Overdue (3 days ago)"
pub fn format_due_human(dt: &DateTime<Local>, now: DateTime<Local>) -> String {
    let diff = dt
        .date_naive()
        .signed_duration_since(now.date_naive())
        .num_days();
    let time = dt.format("%H:%M");

    match diff {
        0 => format!("Today {}", time),
        1 => format!("Tomorrow {}", time),
        -1 => format!("Yesterday {}", time),
        2..=6 => dt.format("%a %b %d %H:%M").to_string(),
        _ if diff < 0 => format!("Overdue ({} days ago)", -diff),
        _ => format_due_date(dt),
    }
}
