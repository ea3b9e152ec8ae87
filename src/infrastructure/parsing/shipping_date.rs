//! Delivery date expressions found after shipping phrases
//!
//! Understands the shapes listing pages use: relative days ("tomorrow"), ISO
//! dates, "Saturday 21st Jan 2023" style dates with or without a year, and bare
//! weekday names. Relative forms resolve against the supplied run date.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateParseError {
    #[error("Unrecognised date expression: '{0}'")]
    Unrecognised(String),

    #[error("Date out of range: '{0}'")]
    OutOfRange(String),
}

static ISO_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})$").expect("iso date pattern is valid"));

static DAY_MONTH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:([a-z]+),?\s+)?(\d{1,2})(?:st|nd|rd|th)?\s+([a-z]+)\.?,?(?:\s+(\d{4}))?$")
        .expect("day month pattern is valid")
});

static MONTH_DAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:([a-z]+),?\s+)?([a-z]+)\.?\s+(\d{1,2})(?:st|nd|rd|th)?,?(?:\s+(\d{4}))?$")
        .expect("month day pattern is valid")
});

static WEEKDAY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([a-z]+)$").expect("weekday pattern is valid"));

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

const WEEKDAYS: [(&str, Weekday); 7] = [
    ("monday", Weekday::Mon),
    ("tuesday", Weekday::Tue),
    ("wednesday", Weekday::Wed),
    ("thursday", Weekday::Thu),
    ("friday", Weekday::Fri),
    ("saturday", Weekday::Sat),
    ("sunday", Weekday::Sun),
];

/// Parse a delivery date expression relative to `today`.
pub fn parse_delivery_date(expression: &str, today: NaiveDate) -> Result<NaiveDate, DateParseError> {
    let normalized = expression
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end_matches(['.', ','])
        .to_lowercase();

    let unrecognised = || DateParseError::Unrecognised(expression.to_string());
    let out_of_range = || DateParseError::OutOfRange(expression.to_string());

    match normalized.as_str() {
        "today" => return Ok(today),
        "tomorrow" => return today.checked_add_days(Days::new(1)).ok_or_else(out_of_range),
        "yesterday" => return today.checked_sub_days(Days::new(1)).ok_or_else(out_of_range),
        _ => {}
    }

    if let Some(captures) = ISO_DATE.captures(&normalized) {
        let year = captures[1].parse().map_err(|_| out_of_range())?;
        let month = captures[2].parse().map_err(|_| out_of_range())?;
        let day = captures[3].parse().map_err(|_| out_of_range())?;
        return NaiveDate::from_ymd_opt(year, month, day).ok_or_else(out_of_range);
    }

    if let Some(captures) = DAY_MONTH.captures(&normalized) {
        if let Some(date) = calendar_date(
            captures.get(1).map(|m| m.as_str()),
            &captures[3],
            &captures[2],
            captures.get(4).map(|m| m.as_str()),
            today,
        ) {
            return date.ok_or_else(out_of_range);
        }
    }

    if let Some(captures) = MONTH_DAY.captures(&normalized) {
        if let Some(date) = calendar_date(
            captures.get(1).map(|m| m.as_str()),
            &captures[2],
            &captures[3],
            captures.get(4).map(|m| m.as_str()),
            today,
        ) {
            return date.ok_or_else(out_of_range);
        }
    }

    if let Some(captures) = WEEKDAY.captures(&normalized) {
        if let Some(weekday) = weekday_from_name(&captures[1]) {
            return next_weekday(today, weekday).ok_or_else(out_of_range);
        }
    }

    Err(unrecognised())
}

/// `None` when the words are not a weekday/month, `Some(None)` when they are
/// but the date does not exist.
fn calendar_date(
    weekday: Option<&str>,
    month: &str,
    day: &str,
    year: Option<&str>,
    today: NaiveDate,
) -> Option<Option<NaiveDate>> {
    if weekday.is_some_and(|name| weekday_from_name(name).is_none()) {
        return None;
    }
    let month = month_from_name(month)?;
    let Ok(day) = day.parse::<u32>() else {
        return Some(None);
    };

    let date = match year.map(str::parse::<i32>) {
        Some(Ok(year)) => NaiveDate::from_ymd_opt(year, month, day),
        Some(Err(_)) => None,
        None => (0..=4).find_map(|offset| {
            NaiveDate::from_ymd_opt(today.year() + offset, month, day).filter(|date| *date >= today)
        }),
    };
    Some(date)
}

/// Accepts full names and abbreviations of at least three letters ("jan", "sept")
fn month_from_name(name: &str) -> Option<u32> {
    if name.len() < 3 {
        return None;
    }
    MONTHS
        .iter()
        .position(|month| month.starts_with(name))
        .and_then(|index| u32::try_from(index + 1).ok())
}

fn weekday_from_name(name: &str) -> Option<Weekday> {
    if name.len() < 3 {
        return None;
    }
    WEEKDAYS
        .iter()
        .find(|(full, _)| full.starts_with(name))
        .map(|(_, weekday)| *weekday)
}

/// First `weekday` on or after `today`
fn next_weekday(today: NaiveDate, weekday: Weekday) -> Option<NaiveDate> {
    let days_ahead =
        (7 + weekday.num_days_from_monday() - today.weekday().num_days_from_monday()) % 7;
    today.checked_add_days(Days::new(u64::from(days_ahead)))
}
