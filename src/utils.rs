//! Tolerant value parsing shared by the test entries and the entry factory
//!
//! Every parser here returns `Option`: a value that cannot be read is simply
//! "not a match" for the caller, never an error.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;

use crate::entry::StringMatchMode;

lazy_static! {
    static ref CLOCK_DURATION: Regex =
        Regex::new(r"^(\d+):(\d{1,2})(?::(\d{1,2})(?:[.,](\d+))?)?$").expect("valid clock regex");
    static ref SUFFIX_DURATION: Regex =
        Regex::new(r"(?i)^(\d+(?:[.,]\d+)?)\s*(ms|sec|s|min|hr|h|d|w)$")
            .expect("valid duration regex");
}

/// Millisecond bound used when converting floating day/second counts
const MAX_MILLISECONDS: f64 = 1e15;

/// Strict number parsing: the whole string must be a number
///
/// Accepts `,` as decimal separator and surrounding whitespace.
pub fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty()
        || !trimmed
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-' | '+' | 'e' | 'E'))
    {
        return None;
    }

    let normalized = trimmed.replace(',', ".");
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Strict integer parsing, used to pick integer rather than float comparison
pub fn parse_integer(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    let digits = trimmed.strip_prefix(['-', '+']).unwrap_or(trimmed);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    trimmed.parse::<i64>().ok()
}

/// Flexible number parsing: reads the first number found in the string
///
/// `"10 hp"` gives `10`, `"~1,5l"` gives `1.5`, `"n/a"` gives nothing.
pub fn parse_flexible_number(value: &str) -> Option<f64> {
    let chars: Vec<char> = value.chars().collect();
    let first_digit = chars.iter().position(|c| c.is_ascii_digit())?;

    let mut start = first_digit;
    let mut number = String::new();

    if start > 0 && matches!(chars[start - 1], '.' | ',') {
        start -= 1;
        number.push('0');
    }

    if start > 0 && chars[start - 1] == '-' && (start == 1 || !chars[start - 2].is_alphanumeric())
    {
        number.insert(0, '-');
    }

    let mut seen_separator = false;
    let mut i = start;
    while i < chars.len() {
        let ch = chars[i];
        if ch.is_ascii_digit() {
            number.push(ch);
        } else if matches!(ch, '.' | ',')
            && !seen_separator
            && i + 1 < chars.len()
            && chars[i + 1].is_ascii_digit()
        {
            number.push('.');
            seen_separator = true;
        } else {
            break;
        }
        i += 1;
    }

    number.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Boolean literals understood in queries and string comparisons
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "y" | "on" | "+" | "1" => Some(true),
        "false" | "no" | "not" | "n" | "off" | "-" | "0" => Some(false),
        _ => None,
    }
}

/// Lowercased unit word following the last digit of a value
///
/// `"1.5 km"` gives `"km"`, `"200"` gives `""`.
pub fn trailing_unit(value: &str) -> String {
    let trimmed = value.trim();
    let after_digits = match trimmed.rfind(|c: char| c.is_ascii_digit()) {
        Some(pos) => &trimmed[pos + 1..],
        None => trimmed,
    };
    after_digits
        .trim()
        .chars()
        .take_while(|c| c.is_alphabetic())
        .collect::<String>()
        .to_lowercase()
}

/// Parses `h:mm`, `h:mm:ss[.fff]` or a suffixed amount (`90s`, `5min`, `2h`, `3d`, `1w`)
pub fn parse_duration(value: &str) -> Option<Duration> {
    let trimmed = value.trim();

    if let Some(caps) = CLOCK_DURATION.captures(trimmed) {
        let first: f64 = caps.get(1)?.as_str().parse().ok()?;
        let second: f64 = caps.get(2)?.as_str().parse().ok()?;
        let seconds = match caps.get(3) {
            Some(third) => {
                let third: f64 = third.as_str().parse().ok()?;
                let fraction = caps
                    .get(4)
                    .and_then(|f| format!("0.{}", f.as_str()).parse::<f64>().ok())
                    .unwrap_or(0.0);
                first * 3600.0 + second * 60.0 + third + fraction
            }
            None => first * 3600.0 + second * 60.0,
        };
        return duration_from_seconds(seconds);
    }

    let caps = SUFFIX_DURATION.captures(trimmed)?;
    let amount = parse_number(caps.get(1)?.as_str())?;
    let multiplier = match caps.get(2)?.as_str().to_lowercase().as_str() {
        "ms" => 0.001,
        "s" | "sec" => 1.0,
        "min" => 60.0,
        "h" | "hr" => 3600.0,
        "d" => 86_400.0,
        "w" => 604_800.0,
        _ => return None,
    };
    duration_from_seconds(amount * multiplier)
}

/// True for `1:30`-like values, which read as a duration rather than text
pub fn looks_like_clock(value: &str) -> bool {
    CLOCK_DURATION.is_match(value.trim())
}

pub fn duration_from_seconds(seconds: f64) -> Option<Duration> {
    let milliseconds = seconds * 1000.0;
    if !milliseconds.is_finite() || milliseconds.abs() > MAX_MILLISECONDS {
        return None;
    }
    Some(Duration::milliseconds(milliseconds.round() as i64))
}

pub fn duration_to_seconds(duration: Duration) -> f64 {
    duration.num_milliseconds() as f64 / 1000.0
}

/// Parses a date, returning the instant and whether a time component was given
///
/// Dates without a time of day are taken as UTC midnight.
pub fn parse_date(value: &str) -> Option<(DateTime<Utc>, bool)> {
    let trimmed = value.trim();
    if trimmed.len() < 6 || !trimmed.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some((dt.with_timezone(&Utc), true));
    }

    const DATE_TIME_FORMATS: [&str; 6] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
        "%d.%m.%Y %H:%M",
        "%Y/%m/%d %H:%M",
    ];
    for format in DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some((naive.and_utc(), true));
        }
    }

    const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d.%m.%Y", "%Y/%m/%d"];
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some((date.and_time(NaiveTime::MIN).and_utc(), false));
        }
    }

    // Year and month only
    let with_day = format!("{}-01", trimmed.replace('/', "-"));
    NaiveDate::parse_from_str(&with_day, "%Y-%m-%d")
        .ok()
        .map(|date| (date.and_time(NaiveTime::MIN).and_utc(), false))
}

/// The instant `days` days before now
pub fn days_ago(days: f64) -> Option<DateTime<Utc>> {
    let offset = duration_from_seconds(days * 86_400.0)?;
    Utc::now().checked_sub_signed(offset)
}

/// Fractional days between an instant and now, positive for the past
pub fn days_since(instant: DateTime<Utc>) -> f64 {
    Utc::now().signed_duration_since(instant).num_milliseconds() as f64 / 86_400_000.0
}

/// Culture-invariant number text: `1.0` prints as `1`, `0.5` as `0.5`
pub fn format_number(value: f64) -> String {
    format!("{}", value)
}

pub fn format_instant(instant: DateTime<Utc>) -> String {
    instant.format("%Y-%m-%d %H:%M").to_string()
}

/// `h:mm:ss`, with a leading `-` for negative spans
pub fn format_duration(duration: Duration) -> String {
    let total = duration.num_seconds();
    let sign = if total < 0 { "-" } else { "" };
    let total = total.abs();
    format!("{}{}:{:02}:{:02}", sign, total / 3600, (total / 60) % 60, total % 60)
}

pub fn has_wildcards(value: &str) -> bool {
    value.contains(['*', '?'])
}

/// Converts a `*`/`?` wildcard pattern into a regex anchored per match mode
pub fn wildcard_to_regex(pattern: &str, mode: StringMatchMode) -> String {
    let mut body = String::new();
    for ch in pattern.chars() {
        match ch {
            '*' => body.push_str(".*"),
            '?' => body.push('.'),
            _ => body.push_str(&regex::escape(&ch.to_string())),
        }
    }

    match mode {
        StringMatchMode::CompleteMatch => format!("^{}$", body),
        StringMatchMode::StartsWith => format!("^{}", body),
        StringMatchMode::IncludedWithin => format!(r"(?:^|\b){}", body),
    }
}
