//! Text helpers used when rendering provider and patient records. All of them
//! are pure: no I/O, no locale or timezone lookups. They fail soft by returning
//! `None` instead of an error so callers can fall back to the raw value.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Optional leading country code followed by a 10-digit North American number.
const PHONE_PATTERN: &str = r"^(1)?([0-9]{3})([0-9]{3})([0-9]{4})$";

/// Uppercases the first character and lowercases the rest.
///
/// Returns `None` for missing or empty input, e.g. `"mcDONALD"` becomes `"Mcdonald"`.
#[must_use]
pub fn capitalize_word(word: Option<&str>) -> Option<String> {
    let mut chars = word?.chars();
    let first = chars.next()?;

    let mut capitalized: String = first.to_uppercase().collect();
    capitalized.push_str(&chars.as_str().to_lowercase());
    Some(capitalized)
}

/// Renders an ISO-like date as `Mon D, YYYY` using UTC calendar fields.
///
/// Accepts `YYYY`, `YYYY-MM`, `YYYY-MM-DD` and date-times with an optional `Z`
/// or numeric offset. Date-times without an offset are read as UTC so the
/// rendered day never depends on the host timezone.
#[must_use]
pub fn format_date(date: &str) -> Option<String> {
    let date = parse_utc_date(date.trim())?;
    let month = MONTHS.get(date.month0() as usize)?;
    Some(format!("{month} {}, {}", date.day(), date.year()))
}

fn parse_utc_date(value: &str) -> Option<NaiveDate> {
    if value.is_empty() {
        return None;
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Some(datetime.with_timezone(&Utc).date_naive());
    }

    if let Ok(datetime) = DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M%:z") {
        return Some(datetime.with_timezone(&Utc).date_naive());
    }

    let naive = value.strip_suffix('Z').unwrap_or(value);
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(naive, format) {
            return Some(datetime.date());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }

    match value.len() {
        // YYYY-MM
        7 => NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d").ok(),
        // YYYY
        4 if value.chars().all(|c| c.is_ascii_digit()) => {
            NaiveDate::from_ymd_opt(value.parse().ok()?, 1, 1)
        }
        _ => None,
    }
}

/// Formats a North American phone number.
///
/// Every non-digit is dropped first. Ten digits render as `(AAA) BBB-CCCC`,
/// eleven digits starting with `1` as `+1 (AAA) BBB-CCCC`; anything else is `None`.
#[must_use]
pub fn format_phone_number(phone_number: &str) -> Option<String> {
    let cleaned: String = phone_number
        .chars()
        .filter(char::is_ascii_digit)
        .collect();

    let regex = Regex::new(PHONE_PATTERN).ok()?;
    let captures = regex.captures(&cleaned)?;

    let intl_code = if captures.get(1).is_some() { "+1 " } else { "" };
    Some(format!(
        "{intl_code}({}) {}-{}",
        &captures[2], &captures[3], &captures[4]
    ))
}
