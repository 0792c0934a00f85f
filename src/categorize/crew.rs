//! Crew buckets
//!
//! `now` is passed in so callers (and tests) control the clock.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::{row_number, row_str, row_timestamp};
use crate::executor::Row;

const LOW_DUTY_HOURS: f64 = 30.0;
const HIGH_DUTY_HOURS: f64 = 45.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RoleBuckets {
    #[serde(rename = "Pilot")]
    pub pilot: Vec<Row>,
    #[serde(rename = "Co-Pilot")]
    pub co_pilot: Vec<Row>,
    #[serde(rename = "Cabin Crew")]
    pub cabin_crew: Vec<Row>,
}

impl RoleBuckets {
    /// Rows with a role outside the taxonomy are dropped
    pub fn push(&mut self, role: Option<&str>, row: Row) {
        match role {
            Some("Pilot") => self.pilot.push(row),
            Some("Co-Pilot") => self.co_pilot.push(row),
            Some("Cabin Crew") => self.cabin_crew.push(row),
            _ => {}
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct StatusBuckets {
    pub available: Vec<Row>,
    pub standby_airport: Vec<Row>,
    pub standby_home: Vec<Row>,
    pub resting: Vec<Row>,
    pub unavailable: Vec<Row>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CrewCategories {
    pub by_role: RoleBuckets,
    pub by_status: StatusBuckets,
    /// Under 30 hours in the last 7 days
    pub low_duty_hours: Vec<Row>,
    /// Over 45 hours in the last 7 days
    pub high_duty_hours: Vec<Row>,
    pub available_now: Vec<Row>,
}

pub fn categorize_crew(crew: &[Row], now: NaiveDateTime) -> CrewCategories {
    let mut out = CrewCategories::default();

    for member in crew {
        out.by_role.push(row_str(member.get("role")), member.clone());

        let status = row_str(member.get("current_status")).unwrap_or("UNAVAILABLE");
        match status {
            "AVAILABLE" => out.by_status.available.push(member.clone()),
            "STANDBY_AIRPORT" => out.by_status.standby_airport.push(member.clone()),
            "STANDBY_HOME" => out.by_status.standby_home.push(member.clone()),
            "RESTING" => out.by_status.resting.push(member.clone()),
            "UNAVAILABLE" => out.by_status.unavailable.push(member.clone()),
            _ => {}
        }

        let duty = row_number(member.get("duty_hours_last_7d")).unwrap_or(0.0);
        if duty < LOW_DUTY_HOURS {
            out.low_duty_hours.push(member.clone());
        } else if duty > HIGH_DUTY_HOURS {
            out.high_duty_hours.push(member.clone());
        }

        if available_by(member, now) {
            out.available_now.push(member.clone());
        }
    }

    out
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AvailabilityBuckets {
    /// AVAILABLE, or legal availability already reached
    pub immediate: Vec<Row>,
    pub standby_airport: Vec<Row>,
    pub standby_home: Vec<Row>,
    pub soon: Vec<Row>,
}

pub fn categorize_availability(crew: &[Row], now: NaiveDateTime) -> AvailabilityBuckets {
    let mut out = AvailabilityBuckets::default();

    for member in crew {
        let status = row_str(member.get("current_status")).unwrap_or_default();
        if status == "AVAILABLE" || available_by(member, now) {
            out.immediate.push(member.clone());
        } else if status == "STANDBY_AIRPORT" {
            out.standby_airport.push(member.clone());
        } else if status == "STANDBY_HOME" {
            out.standby_home.push(member.clone());
        } else {
            out.soon.push(member.clone());
        }
    }

    out
}

fn available_by(member: &Row, now: NaiveDateTime) -> bool {
    row_timestamp(member.get("next_legal_availability")).is_some_and(|at| at <= now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn row(value: Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    fn now() -> NaiveDateTime {
        crate::filter::parse_timestamp("2025-03-01T12:00:00").unwrap()
    }

    #[test]
    fn test_role_and_status_buckets() {
        let crew = vec![
            row(json!({"crew_id": "C1", "role": "Pilot", "current_status": "AVAILABLE"})),
            row(json!({"crew_id": "C2", "role": "Co-Pilot", "current_status": "RESTING"})),
            row(json!({"crew_id": "C3", "role": "Engineer"})),
        ];
        let c = categorize_crew(&crew, now());
        assert_eq!(c.by_role.pilot.len(), 1);
        assert_eq!(c.by_role.co_pilot.len(), 1);
        assert_eq!(c.by_status.available.len(), 1);
        assert_eq!(c.by_status.resting.len(), 1);
        // missing status counts as UNAVAILABLE
        assert_eq!(c.by_status.unavailable.len(), 1);

        let json = serde_json::to_value(&c).unwrap();
        assert!(json["by_role"]["Cabin Crew"].is_array());
        assert!(json["by_status"]["STANDBY_AIRPORT"].is_array());
    }

    #[test]
    fn test_duty_hour_bands() {
        let crew = vec![
            row(json!({"crew_id": "A", "duty_hours_last_7d": 29.9})),
            row(json!({"crew_id": "B", "duty_hours_last_7d": 30})),
            row(json!({"crew_id": "C", "duty_hours_last_7d": 45})),
            row(json!({"crew_id": "D", "duty_hours_last_7d": "45.5"})),
            row(json!({"crew_id": "E"})),
        ];
        let c = categorize_crew(&crew, now());
        let ids = |rows: &[Row]| rows.iter().map(|r| r["crew_id"].clone()).collect::<Vec<_>>();
        assert_eq!(ids(&c.low_duty_hours), vec![json!("A"), json!("E")]);
        assert_eq!(ids(&c.high_duty_hours), vec![json!("D")]);
    }

    #[test]
    fn test_available_now_parsing() {
        let crew = vec![
            row(json!({"crew_id": "A", "next_legal_availability": "2025-03-01T11:00:00Z"})),
            row(json!({"crew_id": "B", "next_legal_availability": "2025-03-01T13:00:00"})),
            row(json!({"crew_id": "C", "next_legal_availability": "soon"})),
        ];
        let c = categorize_crew(&crew, now());
        assert_eq!(c.available_now.len(), 1);
        assert_eq!(c.available_now[0]["crew_id"], "A");
    }

    #[test]
    fn test_availability_buckets() {
        let crew = vec![
            row(json!({"crew_id": "A", "current_status": "AVAILABLE", "next_legal_availability": "2025-03-02T00:00:00"})),
            row(json!({"crew_id": "B", "current_status": "STANDBY_HOME", "next_legal_availability": "2025-03-01T08:00:00"})),
            row(json!({"crew_id": "C", "current_status": "STANDBY_AIRPORT", "next_legal_availability": "2025-03-01T18:00:00"})),
            row(json!({"crew_id": "D", "current_status": "STANDBY_HOME", "next_legal_availability": "2025-03-01T18:00:00"})),
            row(json!({"crew_id": "E", "current_status": "RESTING", "next_legal_availability": "bad"})),
        ];
        let c = categorize_availability(&crew, now());
        assert_eq!(c.immediate.len(), 2);
        assert_eq!(c.standby_airport.len(), 1);
        assert_eq!(c.standby_home.len(), 1);
        assert_eq!(c.soon.len(), 1);
    }
}
