//! Result ordering for the in-memory surface
//!
//! Sorts rows by the plan's ORDER BY keys, stably. NULLs sort as larger
//! than every value, which puts them last ascending and first descending.

use std::cmp::Ordering;

use serde_json::Value;

use super::surface::Row;
use crate::filter::parse_timestamp;
use crate::planner::{SortDirection, SortKey};

/// Sorts result rows
pub struct ResultSorter;

impl ResultSorter {
    pub fn sort(rows: &mut [Row], keys: &[SortKey]) {
        rows.sort_by(|a, b| {
            for key in keys {
                let ordering = Self::compare_values(a.get(key.column), b.get(key.column));
                let ordering = match key.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });
    }

    /// Ordering rules:
    /// - null (or missing) > everything else
    /// - bool < number < string
    /// - strings that both parse as timestamps compare chronologically
    fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
        let a = a.filter(|v| !v.is_null());
        let b = b.filter(|v| !v.is_null());

        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a_val), Some(b_val)) => {
                let type_order = |v: &Value| -> u8 {
                    match v {
                        Value::Null => 0,
                        Value::Bool(_) => 1,
                        Value::Number(_) => 2,
                        Value::String(_) => 3,
                        Value::Array(_) => 4,
                        Value::Object(_) => 5,
                    }
                };

                let (a_type, b_type) = (type_order(a_val), type_order(b_val));
                if a_type != b_type {
                    return a_type.cmp(&b_type);
                }

                match (a_val, b_val) {
                    (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
                    (Value::Number(x), Value::Number(y)) => {
                        let x = x.as_f64().unwrap_or(0.0);
                        let y = y.as_f64().unwrap_or(0.0);
                        x.partial_cmp(&y).unwrap_or(Ordering::Equal)
                    }
                    (Value::String(x), Value::String(y)) => {
                        match (parse_timestamp(x), parse_timestamp(y)) {
                            (Some(tx), Some(ty)) => tx.cmp(&ty),
                            _ => x.cmp(y),
                        }
                    }
                    _ => Ordering::Equal,
                }
            }
        }
    }
}
