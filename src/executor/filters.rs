//! Predicate evaluation over in-memory rows
//!
//! Mirrors SQL three-valued logic closely enough for fixture data: a NULL
//! or missing column never matches, not even a `!=` comparison.

use std::cmp::Ordering;

use serde_json::Value;

use super::surface::Row;
use crate::filter::parse_timestamp;
use crate::planner::{BoundValue, ColumnFold, CompareOp, Condition, Predicate};

/// Evaluates predicates against rows
pub struct PredicateFilter;

impl PredicateFilter {
    /// AND over all predicates
    pub fn matches(row: &Row, predicates: &[Predicate]) -> bool {
        predicates.iter().all(|p| Self::matches_predicate(row, p))
    }

    fn matches_predicate(row: &Row, predicate: &Predicate) -> bool {
        let values = predicate.bound_values();
        match predicate.condition() {
            Condition::Compare {
                column,
                op,
                fold,
                time_of_day,
            } => match (present(row, column), values.first()) {
                (Some(actual), Some(bound)) => {
                    compare_match(actual, *op, *fold, *time_of_day, bound)
                }
                _ => false,
            },
            Condition::AnyOf { columns, fold } => {
                columns.iter().zip(values).any(|(column, bound)| {
                    present(row, column)
                        .is_some_and(|actual| compare_match(actual, CompareOp::Eq, *fold, false, bound))
                })
            }
            Condition::InList { column } => match present(row, column) {
                Some(actual) => values.iter().any(|bound| {
                    compare_match(actual, CompareOp::Eq, ColumnFold::None, false, bound)
                }),
                None => false,
            },
        }
    }
}

fn present<'a>(row: &'a Row, column: &str) -> Option<&'a Value> {
    row.get(column).filter(|v| !v.is_null())
}

fn compare_match(
    actual: &Value,
    op: CompareOp,
    fold: ColumnFold,
    time_of_day: bool,
    bound: &BoundValue,
) -> bool {
    if op == CompareOp::Like {
        return match (scalar_text(actual), bound) {
            (Some(text), BoundValue::Text(pattern)) => like_match(&fold.apply(&text), pattern),
            _ => false,
        };
    }

    let ordering = match bound {
        BoundValue::Text(expected) => {
            scalar_text(actual).map(|text| fold.apply(&text).as_str().cmp(expected.as_str()))
        }
        BoundValue::Bool(expected) => actual.as_bool().map(|b| b.cmp(expected)),
        BoundValue::Int(expected) => numeric(actual).and_then(|n| n.partial_cmp(&(*expected as f64))),
        BoundValue::Float(expected) => numeric(actual).and_then(|n| n.partial_cmp(expected)),
        BoundValue::Timestamp(expected) => actual
            .as_str()
            .and_then(parse_timestamp)
            .map(|ts| ts.cmp(expected)),
        BoundValue::Time(expected) if time_of_day => actual
            .as_str()
            .and_then(parse_timestamp)
            .map(|ts| ts.time().cmp(expected)),
        BoundValue::Time(_) => None,
    };

    match ordering {
        Some(ordering) => op_holds(op, ordering),
        None => false,
    }
}

fn op_holds(op: CompareOp, ordering: Ordering) -> bool {
    match op {
        CompareOp::Eq => ordering == Ordering::Equal,
        CompareOp::NotEq => ordering != Ordering::Equal,
        CompareOp::Gt => ordering == Ordering::Greater,
        CompareOp::Gte => ordering != Ordering::Less,
        CompareOp::Lt => ordering == Ordering::Less,
        CompareOp::Lte => ordering != Ordering::Greater,
        CompareOp::Like => false,
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum LikeToken {
    AnySequence,
    AnyChar,
    Literal(char),
}

fn like_tokens(pattern: &str) -> Vec<LikeToken> {
    let mut tokens = Vec::new();
    let mut chars = pattern.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => tokens.push(LikeToken::Literal(chars.next().unwrap_or('\\'))),
            '%' => tokens.push(LikeToken::AnySequence),
            '_' => tokens.push(LikeToken::AnyChar),
            other => tokens.push(LikeToken::Literal(other)),
        }
    }
    tokens
}

/// SQL LIKE with `%`, `_` and `\` escapes
pub(crate) fn like_match(value: &str, pattern: &str) -> bool {
    let tokens = like_tokens(pattern);
    let chars: Vec<char> = value.chars().collect();

    // reachable[j]: the first i tokens can consume exactly j chars
    let mut reachable = vec![false; chars.len() + 1];
    reachable[0] = true;
    for token in &tokens {
        let mut next = vec![false; chars.len() + 1];
        for j in 0..=chars.len() {
            if !reachable[j] {
                continue;
            }
            match token {
                LikeToken::AnySequence => {
                    for slot in next.iter_mut().skip(j) {
                        *slot = true;
                    }
                    break;
                }
                LikeToken::AnyChar => {
                    if j < chars.len() {
                        next[j + 1] = true;
                    }
                }
                LikeToken::Literal(c) => {
                    if chars.get(j) == Some(c) {
                        next[j + 1] = true;
                    }
                }
            }
        }
        reachable = next;
    }
    reachable[chars.len()]
}
