use chrono::{Days, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

/// `DD.MM.YYYY`, tried first. Digits are ASCII only.
static DAY_MONTH_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]{2})\.([0-9]{2})\.([0-9]{4})").expect("valid date pattern"));

/// `YYYY-MM-DD`, tried second.
static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]{4})-([0-9]{2})-([0-9]{2})").expect("valid date pattern"));

pub const REGISTRATION_SEPARATOR: &str = " - ";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateParseError {
    #[error("no recognizable date in {0:?}")]
    Unrecognized(String),

    #[error("{day:02}.{month:02}.{year} is not a calendar date")]
    InvalidCalendarDate { year: i32, month: u32, day: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeParseError {
    #[error("registration range {0:?} has no end date")]
    MissingEnd(String),

    #[error("invalid range start: {0}")]
    Start(DateParseError),

    #[error("invalid range end: {0}")]
    End(DateParseError),
}

/// Finds the first date in `input`. The day-first pattern wins whenever it
/// matches anywhere in the string, even if the ISO pattern would also match.
pub fn parse_date(input: &str) -> Result<NaiveDate, DateParseError> {
    let (year, month, day) = if let Some(caps) = DAY_MONTH_YEAR.captures(input) {
        numeric_parts(&caps[3], &caps[2], &caps[1])
    } else if let Some(caps) = ISO_DATE.captures(input) {
        numeric_parts(&caps[1], &caps[2], &caps[3])
    } else {
        return Err(DateParseError::Unrecognized(input.to_string()));
    };

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or(DateParseError::InvalidCalendarDate { year, month, day })
}

// Captures are fixed-width ASCII digit runs, so none of these parses can fail.
fn numeric_parts(year: &str, month: &str, day: &str) -> (i32, u32, u32) {
    (
        year.parse().unwrap_or_default(),
        month.parse().unwrap_or_default(),
        day.parse().unwrap_or_default(),
    )
}

/// The part of `value` before the first space, dropping a trailing time or
/// range tail.
pub fn date_portion(value: &str) -> &str {
    value.split(' ').next().unwrap_or(value)
}

/// Re-renders a recognized date as `DD.MM.YYYY`; anything else is returned
/// unchanged.
pub fn display_date(value: &str) -> String {
    if let Some(caps) = DAY_MONTH_YEAR.captures(value) {
        format!("{}.{}.{}", &caps[1], &caps[2], &caps[3])
    } else if let Some(caps) = ISO_DATE.captures(value) {
        format!("{}.{}.{}", &caps[3], &caps[2], &caps[1])
    } else {
        value.to_string()
    }
}

/// Inclusive calendar window `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// `[today, today + days]`, clamped at the end of the calendar.
    pub fn starting_at(today: NaiveDate, days: u64) -> Self {
        Self {
            start: today,
            end: today.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX),
        }
    }

    /// Parses a `"<start> - <end>"` registration range.
    pub fn parse_range(value: &str) -> Result<Self, RangeParseError> {
        let mut halves = value.split(REGISTRATION_SEPARATOR);
        let start = halves.next().unwrap_or_default().trim();
        let end = halves
            .next()
            .ok_or_else(|| RangeParseError::MissingEnd(value.to_string()))?
            .trim();

        Ok(Self {
            start: parse_date(start).map_err(RangeParseError::Start)?,
            end: parse_date(end).map_err(RangeParseError::End)?,
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}
