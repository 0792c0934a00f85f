//! Result categorization
//!
//! Pure, in-memory grouping of query results. Nothing here issues a query
//! or fails: unparsable values fall back to a safe default.

mod crew;
mod flights;
mod passengers;
mod roster;

pub use crew::{
    categorize_availability, categorize_crew, AvailabilityBuckets, CrewCategories, RoleBuckets,
    StatusBuckets,
};
pub use flights::{format_flight, present_flight, status_groups, FlightPresentation};
pub use passengers::{categorize_passengers, FamilyGroup, PassengerCategories, TierBuckets};
pub use roster::{build_roster, CertificationStatus, CrewRoster};

use chrono::NaiveDateTime;
use serde_json::Value;

use crate::filter::parse_timestamp;

/// Timestamp from a row value; anything unparsable is `None`
pub(crate) fn row_timestamp(value: Option<&Value>) -> Option<NaiveDateTime> {
    value.and_then(Value::as_str).and_then(parse_timestamp)
}

/// Number from a row value, accepting numeric strings
pub(crate) fn row_number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn row_str<'a>(value: Option<&'a Value>) -> Option<&'a str> {
    value.and_then(Value::as_str)
}
