//! Value coercion by semantic type

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::Value;

use super::errors::{FilterError, FilterResult};
use crate::planner::BoundValue;
use crate::schema::SemanticType;

/// Tolerant boolean: native bools, or `"true"`, `"yes"`, `"1"` in any case.
/// Anything else is false.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.to_string() == "1",
        Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "yes" | "1"),
        _ => false,
    }
}

/// Parses ISO-8601 date-times, with or without `Z`/offset, and bare dates.
/// Zoned values are converted to UTC and the zone dropped.
pub fn parse_timestamp(input: &str) -> Option<NaiveDateTime> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M:%S%.f%#z", "%Y-%m-%d %H:%M:%S%.f%#z"] {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.naive_utc());
        }
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Time of day from `HH:MM`, `HH:MM:SS`, or the time part of a date-time
pub fn parse_time_of_day(input: &str) -> Option<NaiveTime> {
    let s = input.trim();
    NaiveTime::parse_from_str(s, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()
        .or_else(|| parse_timestamp(s).map(|ts| ts.time()))
}

/// Coerces a scalar filter value. Text is upper-cased; the column fold
/// decides whether the column side is folded too.
pub fn normalize(field: &str, value: &Value, semantic_type: SemanticType) -> FilterResult<BoundValue> {
    if matches!(value, Value::Array(_) | Value::Object(_)) {
        return Err(FilterError::invalid_value(field, "expected a scalar value"));
    }

    match semantic_type {
        SemanticType::Text => Ok(BoundValue::Text(scalar_string(value).to_uppercase())),
        SemanticType::Boolean => Ok(BoundValue::Bool(truthy(value))),
        SemanticType::Integer => integer(value)
            .map(BoundValue::Int)
            .ok_or_else(|| FilterError::invalid_value(field, format!("expected a number, got {}", value))),
        SemanticType::Numeric => numeric(value)
            .map(BoundValue::Float)
            .ok_or_else(|| FilterError::invalid_value(field, format!("expected a number, got {}", value))),
        SemanticType::Timestamp => value
            .as_str()
            .and_then(parse_timestamp)
            .map(BoundValue::Timestamp)
            .ok_or_else(|| FilterError::invalid_value(field, format!("expected an ISO-8601 timestamp, got {}", value))),
    }
}

/// Text without JSON quoting
pub fn scalar_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Numbers and numeric strings, fractions truncated toward zero (`2.5` → 2).
pub fn integer(value: &Value) -> Option<i64> {
    let truncate = |f: f64| f.is_finite().then(|| f.trunc() as i64);
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(truncate)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(truncate))
        }
        _ => None,
    }
}

pub fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok().filter(|f: &f64| f.is_finite()),
        _ => None,
    }
}
