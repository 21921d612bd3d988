//! The date-arithmetic mini-language.
//!
//! Templates and scripts call the `date`, `time` and `datetime` helpers
//! with a small expression: an absolute base followed by zero or more
//! `+`/`-` adjustments.
//!
//! ```text
//! expression ::= base (op amount)*
//! base       ::= "startOfMonth"
//!              | "YYYY-MM-DDTHH:MM:SSZ"
//!              | "YYYY-MM-DD"          (midnight UTC)
//!              | "HH:MM:SS"            (today, UTC)
//!              | <empty>               (current instant)
//! op         ::= "+" | "-"             (optional on the first term when
//!                                       the base is the current instant)
//! amount     ::= integer unit "s"?     unit ::= year|month|day|hour|minute|second
//!              | "HH:MM:SS"            (simultaneous hour/minute/second)
//! ```
//!
//! Whitespace between tokens is insignificant. Everything is UTC.

use chrono::{DateTime, Datelike, Days, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use thiserror::Error;

/// A specialized Result type for date arithmetic.
pub type DateResult<T> = std::result::Result<T, DateError>;

/// Errors from parsing a date-arithmetic expression.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DateError {
    /// An adjustment term was not prefixed with `+` or `-`.
    #[error("operator expected, got '{rest}'")]
    OperatorExpected { rest: String },

    /// The text after an operator is not a valid amount/unit.
    #[error("date adjustment expected, got '{rest}'")]
    AdjustmentExpected { rest: String },

    /// The arithmetic left the representable date range.
    #[error("date arithmetic out of range")]
    OutOfRange,
}

/// Resolves an expression to a `YYYY-MM-DD` date string.
pub fn date(input: &str) -> DateResult<String> {
    Ok(parse(input)?.format("%Y-%m-%d").to_string())
}

/// Resolves an expression to an `HH:MM:SS` time string.
pub fn time(input: &str) -> DateResult<String> {
    Ok(parse(input)?.format("%H:%M:%S").to_string())
}

/// Resolves an expression to a full ISO-8601 UTC timestamp.
pub fn datetime(input: &str) -> DateResult<String> {
    Ok(parse(input)?.format("%Y-%m-%dT%H:%M:%SZ").to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

/// Parses and evaluates a full expression down to a UTC timestamp.
fn parse(input: &str) -> DateResult<DateTime<Utc>> {
    let now = Utc::now();
    let mut rest = input.trim_start();

    // The base. `startOfMonth` is only valid as the entire expression.
    let mut value: DateTime<Utc>;
    let mut implicit_plus = false;

    if rest == "startOfMonth" {
        let first = NaiveDate::from_ymd_opt(now.year(), now.month(), 1)
            .ok_or(DateError::OutOfRange)?;
        value = first.and_time(NaiveTime::MIN).and_utc();
        rest = "";
    } else if let Some((dt, r)) = take_datetime(rest) {
        value = dt.and_utc();
        rest = r;
    } else if let Some((d, r)) = take_date(rest) {
        value = d.and_time(NaiveTime::MIN).and_utc();
        rest = r;
    } else if let Some((t, r)) = take_time(rest) {
        value = now.date_naive().and_time(t).and_utc();
        rest = r;
    } else {
        value = now;
        // relative to "now", the first term may omit its operator
        implicit_plus = true;
    }

    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }

        let negative;
        if let Some(r) = rest.strip_prefix('+') {
            negative = false;
            rest = r;
        } else if let Some(r) = rest.strip_prefix('-') {
            negative = true;
            rest = r;
        } else if implicit_plus {
            negative = false;
        } else {
            return Err(DateError::OperatorExpected {
                rest: rest.to_string(),
            });
        }
        implicit_plus = false;

        rest = apply_adjustment(&mut value, rest.trim_start(), negative)?;
    }

    Ok(value)
}

/// Consumes one amount term and applies it to `value`.
fn apply_adjustment<'a>(
    value: &mut DateTime<Utc>,
    rest: &'a str,
    negative: bool,
) -> DateResult<&'a str> {
    let digits_len = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());

    if digits_len == 0 {
        return Err(DateError::AdjustmentExpected {
            rest: rest.to_string(),
        });
    }

    // An HH:MM:SS triple adjusts hours, minutes and seconds at once.
    if digits_len == 2 && rest[2..].starts_with(':') {
        if let Some((t, after)) = take_time(rest) {
            use chrono::Timelike;
            *value = apply(*value, t.hour() as i64, Unit::Hour, negative)?;
            *value = apply(*value, t.minute() as i64, Unit::Minute, negative)?;
            *value = apply(*value, t.second() as i64, Unit::Second, negative)?;
            return Ok(after);
        }
    }

    let amount: i64 = rest[..digits_len]
        .parse()
        .map_err(|_| DateError::OutOfRange)?;

    let after_amount = rest[digits_len..].trim_start();
    let word_len = after_amount
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(after_amount.len());
    let word = &after_amount[..word_len];

    let unit = match word.strip_suffix('s').unwrap_or(word) {
        "year" => Unit::Year,
        "month" => Unit::Month,
        "day" => Unit::Day,
        "hour" => Unit::Hour,
        "minute" => Unit::Minute,
        "second" => Unit::Second,
        _ => {
            return Err(DateError::AdjustmentExpected {
                rest: rest.to_string(),
            })
        }
    };

    *value = apply(*value, amount, unit, negative)?;
    Ok(&after_amount[word_len..])
}

/// Applies a single signed adjustment.
fn apply(value: DateTime<Utc>, amount: i64, unit: Unit, negative: bool) -> DateResult<DateTime<Utc>> {
    let out = match unit {
        Unit::Year | Unit::Month => {
            let factor = if unit == Unit::Year { 12 } else { 1 };
            let months = amount
                .checked_mul(factor)
                .and_then(|m| u32::try_from(m).ok())
                .map(Months::new)
                .ok_or(DateError::OutOfRange)?;
            if negative {
                value.checked_sub_months(months)
            } else {
                value.checked_add_months(months)
            }
        }
        Unit::Day => {
            let days = u64::try_from(amount)
                .map(Days::new)
                .map_err(|_| DateError::OutOfRange)?;
            if negative {
                value.checked_sub_days(days)
            } else {
                value.checked_add_days(days)
            }
        }
        Unit::Hour | Unit::Minute | Unit::Second => {
            let span = match unit {
                Unit::Hour => Duration::try_hours(amount),
                Unit::Minute => Duration::try_minutes(amount),
                _ => Duration::try_seconds(amount),
            }
            .ok_or(DateError::OutOfRange)?;
            if negative {
                value.checked_sub_signed(span)
            } else {
                value.checked_add_signed(span)
            }
        }
    };

    out.ok_or(DateError::OutOfRange)
}

/// Matches a leading `YYYY-MM-DDTHH:MM:SSZ` and returns it plus the rest.
fn take_datetime(s: &str) -> Option<(NaiveDateTime, &str)> {
    if !matches_pattern(s, b"0000-00-00T00:00:00Z") {
        return None;
    }
    let dt = NaiveDateTime::parse_from_str(&s[..19], "%Y-%m-%dT%H:%M:%S").ok()?;
    Some((dt, &s[20..]))
}

/// Matches a leading `YYYY-MM-DD` and returns it plus the rest.
fn take_date(s: &str) -> Option<(NaiveDate, &str)> {
    if !matches_pattern(s, b"0000-00-00") {
        return None;
    }
    let d = NaiveDate::parse_from_str(&s[..10], "%Y-%m-%d").ok()?;
    Some((d, &s[10..]))
}

/// Matches a leading `HH:MM:SS` and returns it plus the rest.
fn take_time(s: &str) -> Option<(NaiveTime, &str)> {
    if !matches_pattern(s, b"00:00:00") {
        return None;
    }
    let t = NaiveTime::parse_from_str(&s[..8], "%H:%M:%S").ok()?;
    Some((t, &s[8..]))
}

/// Byte-level shape check: `0` in the pattern means any ASCII digit,
/// anything else must match literally.
fn matches_pattern(s: &str, pattern: &[u8]) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() < pattern.len() {
        return false;
    }
    pattern.iter().zip(bytes).all(|(&p, &b)| match p {
        b'0' => b.is_ascii_digit(),
        lit => b == lit,
    })
}
