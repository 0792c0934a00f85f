//! Query assembly subsystem
//!
//! Turns translated predicates into a single parametrized statement.
//!
//! # Design Principles
//!
//! - Deterministic: same predicates → same SQL text and parameter list
//! - Every literal value is a bound parameter (`$1..$n`)
//! - Only the fixed table mapping and catalogued column identifiers are
//!   ever interpolated into statement text
//! - Parameter order equals placeholder order

mod assembler;
mod ast;

pub use assembler::{ordering_for, QueryAssembler};
pub use ast::{
    BoundValue, ColumnFold, CompareOp, Condition, Predicate, QueryPlan, SortDirection, SortKey,
    Statement, StatementShape,
};
