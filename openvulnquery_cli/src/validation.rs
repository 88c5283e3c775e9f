//! Argument parsers for the query flags. Each returns a message clap prints
//! alongside the offending flag.

use chrono::{Datelike, NaiveDate, Utc};
use clap::ValueEnum;

/// Oldest year the advisory archive covers.
pub const MIN_YEAR: i32 = 1995;
/// Largest `--latest` count the API serves.
pub const MAX_LATEST: u32 = 100;

/// Security Impact Rating accepted by `--severity`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

/// Inclusive publication date range from `START:END`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn start_str(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    pub fn end_str(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }
}

pub fn validate_date(input: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{}', expected YYYY-MM-DD", input))
}

pub fn parse_date_range(input: &str) -> Result<DateRange, String> {
    let (start, end) = input
        .split_once(':')
        .ok_or_else(|| format!("invalid range '{}', expected YYYY-MM-DD:YYYY-MM-DD", input))?;
    let range = DateRange {
        start: validate_date(start)?,
        end: validate_date(end)?,
    };
    if range.start > range.end {
        return Err(format!(
            "start date {} is after end date {}",
            range.start, range.end
        ));
    }
    Ok(range)
}

pub fn parse_year(input: &str) -> Result<i32, String> {
    let year: i32 = input
        .trim()
        .parse()
        .map_err(|_| format!("invalid year '{}'", input))?;
    let current = Utc::now().year();
    if !(MIN_YEAR..=current).contains(&year) {
        return Err(format!(
            "year must be between {} and {}",
            MIN_YEAR, current
        ));
    }
    Ok(year)
}

pub fn parse_latest(input: &str) -> Result<u32, String> {
    let count: u32 = input
        .trim()
        .parse()
        .map_err(|_| format!("invalid count '{}'", input))?;
    if count == 0 || count > MAX_LATEST {
        return Err(format!("count must be between 1 and {}", MAX_LATEST));
    }
    Ok(count)
}
