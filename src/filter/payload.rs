//! Typed filter payload
//!
//! Reserved directives are lifted out of the raw JSON object first; every
//! remaining key stays in `fields`, in the payload's own order.

use chrono::NaiveTime;
use serde_json::{Map, Value};

use super::errors::{FilterError, FilterResult};
use super::normalize::{integer, parse_time_of_day, scalar_string};
use super::rules::{ResourceRules, TimeBoundRule};

/// One present time-of-day bound
#[derive(Debug, Clone, PartialEq)]
pub struct TimeBound {
    pub rule: TimeBoundRule,
    pub at: NaiveTime,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterPayload {
    /// Explicit limit; `None` falls back to the profile default
    pub limit: Option<i64>,
    /// Upper-cased exclusion values, in list order
    pub exclusions: Vec<String>,
    /// Present bounds, in rule order
    pub time_bounds: Vec<TimeBound>,
    /// Non-reserved keys in payload order, nulls included
    pub fields: Vec<(String, Value)>,
}

impl FilterPayload {
    pub fn parse(raw: &Value, rules: &ResourceRules) -> FilterResult<Self> {
        let map = match raw {
            Value::Object(map) => map,
            Value::Null if rules.requires_filters => return Err(FilterError::empty()),
            Value::Null => return Ok(Self::default()),
            other => return Err(FilterError::not_object(json_kind(other))),
        };

        if rules.requires_filters && map.is_empty() {
            return Err(FilterError::empty());
        }

        let limit = match map.get("limit") {
            Some(value) => parse_limit(value)?,
            None => None,
        };

        let exclusions = match rules.exclusion {
            Some(rule) => match map.get(rule.key) {
                Some(value) => parse_exclusions(rule.key, value)?,
                None => Vec::new(),
            },
            None => Vec::new(),
        };

        let time_bounds = parse_time_bounds(map, rules.time_bounds)?;

        let fields = map
            .iter()
            .filter(|(key, _)| !rules.is_reserved(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Ok(Self {
            limit,
            exclusions,
            time_bounds,
            fields,
        })
    }
}

/// Same truncation as integer fields. Zero and null mean "no limit given".
fn parse_limit(value: &Value) -> FilterResult<Option<i64>> {
    if value.is_null() {
        return Ok(None);
    }

    match integer(value) {
        Some(0) => Ok(None),
        Some(n) if n < 0 => Err(FilterError::invalid_limit(format!("{} is negative", n))),
        Some(n) => Ok(Some(n)),
        None => Err(FilterError::invalid_limit(format!("{} is not an integer", value))),
    }
}

/// A bare string is a one-element list
fn parse_exclusions(key: &str, value: &Value) -> FilterResult<Vec<String>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::String(s) => Ok(vec![s.to_uppercase()]),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(_) | Value::Number(_) | Value::Bool(_) => {
                    Ok(scalar_string(item).to_uppercase())
                }
                other => Err(FilterError::invalid_value(
                    key,
                    format!("list elements must be scalars, got {}", json_kind(other)),
                )),
            })
            .collect(),
        other => Err(FilterError::invalid_value(
            key,
            format!("expected a list of values, got {}", json_kind(other)),
        )),
    }
}

fn parse_time_bounds(map: &Map<String, Value>, rules: &[TimeBoundRule]) -> FilterResult<Vec<TimeBound>> {
    let mut bounds = Vec::new();
    for rule in rules {
        let at = match map.get(rule.key) {
            None | Some(Value::Null) => continue,
            Some(Value::String(s)) if s.trim().is_empty() => continue,
            Some(Value::String(s)) => parse_time_of_day(s).ok_or_else(|| {
                FilterError::invalid_value(rule.key, format!("'{}' is not a time of day", s))
            })?,
            Some(other) => {
                return Err(FilterError::invalid_value(
                    rule.key,
                    format!("expected a time string, got {}", json_kind(other)),
                ))
            }
        };
        bounds.push(TimeBound { rule: *rule, at });
    }
    Ok(bounds)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
