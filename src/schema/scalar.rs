//! Coercion rules for scalar descriptors.
//!
//! Each function receives a present, non-null value and either returns its
//! canonical form or fails with a single [`ErrorKind`]. Absence and null are
//! handled by the caller before these run.

use super::rules::Rules;
use crate::error::{ErrorKind, ValidationResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde_json::{Number, Value};

/// Date-time layouts accepted without an explicit offset, read as UTC.
const NAIVE_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Date-only layouts, read as midnight UTC.
const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

pub(crate) fn coerce_integer(value: &Value, rules: &Rules) -> ValidationResult<Value> {
    if let Value::Number(number) = value {
        if number.is_i64() {
            rules.check_range(as_f64(number)?)?;
            return Ok(value.clone());
        }
    }

    let parsed = parse_numeric(value)?;
    rules.check_range(parsed)?;
    let truncated = parsed.trunc();
    // i64::MAX is not representable as f64; the cast below saturates
    if truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
        return Err(ErrorKind::OutOfRange.into());
    }
    Ok(Value::from(truncated as i64))
}

pub(crate) fn coerce_number(value: &Value, rules: &Rules) -> ValidationResult<Value> {
    let parsed = parse_numeric(value)?;
    rules.check_range(parsed)?;
    match value {
        Value::Number(_) => Ok(value.clone()),
        _ => Number::from_f64(parsed)
            .map(Value::Number)
            .ok_or_else(|| ErrorKind::InvalidType.into()),
    }
}

pub(crate) fn coerce_boolean(value: &Value) -> ValidationResult<Value> {
    match value {
        Value::Bool(_) => Ok(value.clone()),
        Value::String(text) => match text.as_str() {
            "Y" | "y" | "1" => Ok(Value::Bool(true)),
            "N" | "n" | "0" => Ok(Value::Bool(false)),
            _ => Err(ErrorKind::InvalidType.into()),
        },
        _ => Err(ErrorKind::InvalidType.into()),
    }
}

pub(crate) fn coerce_string(value: &Value, rules: &Rules) -> ValidationResult<Value> {
    let Value::String(text) = value else {
        return Err(ErrorKind::InvalidType.into());
    };

    if let Some(values) = rules.values() {
        if !values.iter().any(|allowed| allowed == text) {
            return Err(ErrorKind::OutOfRange.into());
        }
    }

    let mut text = if rules.auto_trim_spaces() {
        text.trim().to_string()
    } else {
        text.clone()
    };

    if let Some(max_length) = rules.length_limit() {
        if text.chars().count() > max_length {
            if !rules.auto_truncate() {
                return Err(ErrorKind::StringTooLong.into());
            }
            text = text.chars().take(max_length).collect();
            // Trimmed output stays trimmed after the cut
            if rules.auto_trim_spaces() {
                text.truncate(text.trim_end().len());
            }
        }
    }

    Ok(Value::String(text))
}

pub(crate) fn coerce_date(value: &Value) -> ValidationResult<Value> {
    let Value::String(text) = value else {
        return Err(ErrorKind::InvalidType.into());
    };

    let parsed = parse_date(text).ok_or(ErrorKind::InvalidDateFormat)?;
    Ok(Value::String(
        parsed.to_rfc3339_opts(SecondsFormat::Millis, true),
    ))
}

/// Parse a date string in any of the accepted layouts.
///
/// Layouts carrying an offset keep it; the rest are interpreted as UTC.
pub fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_rfc2822(text) {
        return Some(parsed.with_timezone(&Utc));
    }

    NAIVE_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NAIVE_DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

/// Read a JSON number or a numeric string as a finite `f64`.
fn parse_numeric(value: &Value) -> ValidationResult<f64> {
    let parsed = match value {
        Value::Number(number) => as_f64(number)?,
        Value::String(text) => {
            let text = text.trim();
            if text.is_empty() {
                return Err(ErrorKind::InvalidType.into());
            }
            text.parse::<f64>()
                .map_err(|_| ErrorKind::InvalidType)?
        }
        _ => return Err(ErrorKind::InvalidType.into()),
    };

    if !parsed.is_finite() {
        return Err(ErrorKind::InvalidType.into());
    }
    Ok(parsed)
}

fn as_f64(number: &Number) -> ValidationResult<f64> {
    number.as_f64().ok_or_else(|| ErrorKind::InvalidType.into())
}
