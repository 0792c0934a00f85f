//! Predicate and statement structures
//!
//! A `Predicate` carries two views of the same comparison: the SQL template
//! (with `?` markers the assembler numbers) and a structured `Condition`
//! that in-process surfaces evaluate directly.

use chrono::{NaiveDateTime, NaiveTime};
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::schema::Resource;

/// A normalized value bound to one placeholder
#[derive(Debug, Clone, PartialEq)]
pub enum BoundValue {
    Text(String),
    Bool(bool),
    Int(i64),
    Float(f64),
    Timestamp(NaiveDateTime),
    Time(NaiveTime),
}

impl BoundValue {
    pub fn text(s: impl Into<String>) -> Self {
        BoundValue::Text(s.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            BoundValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// JSON rendering used in plan output and logs
    pub fn to_json(&self) -> Value {
        match self {
            BoundValue::Text(s) => Value::String(s.clone()),
            BoundValue::Bool(b) => Value::Bool(*b),
            BoundValue::Int(i) => Value::from(*i),
            BoundValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            BoundValue::Timestamp(ts) => Value::String(ts.format("%Y-%m-%dT%H:%M:%S").to_string()),
            BoundValue::Time(t) => Value::String(t.format("%H:%M:%S").to_string()),
        }
    }
}

impl Serialize for BoundValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Gt,
    Gte,
    Lt,
    Lte,
    /// SQL LIKE with `\` as escape character
    Like,
}

impl CompareOp {
    pub fn sql(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::NotEq => "!=",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
            CompareOp::Like => "LIKE",
        }
    }
}

/// Case folding applied to the column side of a comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnFold {
    None,
    Upper,
    Lower,
}

impl ColumnFold {
    fn wrap(&self, column: &str) -> String {
        match self {
            ColumnFold::None => column.to_string(),
            ColumnFold::Upper => format!("UPPER({})", column),
            ColumnFold::Lower => format!("LOWER({})", column),
        }
    }

    /// Applies the same fold to an in-memory value
    pub fn apply(&self, s: &str) -> String {
        match self {
            ColumnFold::None => s.to_string(),
            ColumnFold::Upper => s.to_uppercase(),
            ColumnFold::Lower => s.to_lowercase(),
        }
    }
}

/// Structured form of a predicate
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `<fold(column)> <op> ?`, or `CAST(column AS TIME) <op> ?`
    Compare {
        column: String,
        op: CompareOp,
        fold: ColumnFold,
        time_of_day: bool,
    },
    /// `(<fold(c1)> = ? OR <fold(c2)> = ? ...)`, one bound copy per column
    AnyOf { columns: Vec<String>, fold: ColumnFold },
    /// `column IN (?, ?, ...)`
    InList { column: String },
}

/// One bound comparison clause of the WHERE condition
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    template: String,
    bound_values: Vec<BoundValue>,
    condition: Condition,
}

impl Predicate {
    /// `<fold(column)> <op> ?`
    pub fn compare(column: &str, op: CompareOp, fold: ColumnFold, value: BoundValue) -> Self {
        Self {
            template: format!("{} {} ?", fold.wrap(column), op.sql()),
            bound_values: vec![value],
            condition: Condition::Compare {
                column: column.to_string(),
                op,
                fold,
                time_of_day: false,
            },
        }
    }

    /// Equality without folding
    pub fn eq(column: &str, value: BoundValue) -> Self {
        Self::compare(column, CompareOp::Eq, ColumnFold::None, value)
    }

    /// Compares the time-of-day part of a timestamp column
    pub fn time_of_day(column: &str, op: CompareOp, value: NaiveTime) -> Self {
        Self {
            template: format!("CAST({} AS TIME) {} ?", column, op.sql()),
            bound_values: vec![BoundValue::Time(value)],
            condition: Condition::Compare {
                column: column.to_string(),
                op,
                fold: ColumnFold::None,
                time_of_day: true,
            },
        }
    }

    /// Equality against any of `columns`, binding `value` once per column
    pub fn any_of(columns: &[&str], fold: ColumnFold, value: BoundValue) -> Self {
        let template = columns
            .iter()
            .map(|c| format!("{} = ?", fold.wrap(c)))
            .collect::<Vec<_>>()
            .join(" OR ");
        Self {
            template: format!("({})", template),
            bound_values: columns.iter().map(|_| value.clone()).collect(),
            condition: Condition::AnyOf {
                columns: columns.iter().map(|c| c.to_string()).collect(),
                fold,
            },
        }
    }

    /// `column IN (?, ...)`
    pub fn in_list(column: &str, values: Vec<BoundValue>) -> Self {
        let markers = values.iter().map(|_| "?").collect::<Vec<_>>().join(", ");
        Self {
            template: format!("{} IN ({})", column, markers),
            bound_values: values,
            condition: Condition::InList {
                column: column.to_string(),
            },
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn bound_values(&self) -> &[BoundValue] {
        &self.bound_values
    }

    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    /// The single operator of a `Compare` predicate
    pub fn op(&self) -> Option<CompareOp> {
        match &self.condition {
            Condition::Compare { op, .. } => Some(*op),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// One ORDER BY key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub column: &'static str,
    pub direction: SortDirection,
}

impl SortKey {
    pub const fn asc(column: &'static str) -> Self {
        Self {
            column,
            direction: SortDirection::Asc,
        }
    }

    pub const fn desc(column: &'static str) -> Self {
        Self {
            column,
            direction: SortDirection::Desc,
        }
    }
}

/// Read plan against a single resource
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    pub resource: Resource,
    pub predicates: Vec<Predicate>,
    pub order_by: Vec<SortKey>,
    pub limit: Option<i64>,
}

impl QueryPlan {
    /// Flattened parameter list: predicate values in order, then the limit
    pub fn parameters(&self) -> Vec<BoundValue> {
        let mut params: Vec<BoundValue> = self
            .predicates
            .iter()
            .flat_map(|p| p.bound_values().iter().cloned())
            .collect();
        if let Some(limit) = self.limit {
            params.push(BoundValue::Int(limit));
        }
        params
    }
}

/// What a statement asks for, in a form in-process surfaces can evaluate
#[derive(Debug, Clone, PartialEq)]
pub enum StatementShape {
    /// `SELECT * ... WHERE ... ORDER BY ... LIMIT`
    Select(QueryPlan),
    /// `SELECT COUNT(*) AS count`
    Count { resource: Resource },
    /// Column catalog of a table (`column_name`, `data_type`)
    Columns { table: String },
    /// Crew members holding an assignment on a flight
    CrewOnFlight { flight_no: String },
    /// Distinct origin/destination pairs with flight counts
    Routes,
}

/// Fully assembled, parametrized statement
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub text: String,
    pub params: Vec<BoundValue>,
    pub shape: StatementShape,
}

impl Statement {
    /// Number of `$n` placeholders in the text
    pub fn placeholder_count(&self) -> usize {
        let bytes = self.text.as_bytes();
        bytes
            .iter()
            .enumerate()
            .filter(|(i, b)| **b == b'$' && bytes.get(i + 1).is_some_and(|n| n.is_ascii_digit()))
            .count()
    }
}
