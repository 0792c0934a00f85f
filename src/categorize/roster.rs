//! Flight crew roster
//!
//! Joins the assignment rows of one flight with the crew master rows on
//! `crew_id`, in memory. Assignment `role`/`status` become
//! `assignment_role`/`assignment_status`; the crew `role` becomes
//! `crew_role`. Assignments without a crew row are dropped (inner join).

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use super::crew::RoleBuckets;
use super::row_str;
use crate::executor::{ResultSorter, Row};
use crate::planner::SortKey;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CertificationStatus {
    pub crew_id: Value,
    pub name: Value,
    pub role: Value,
    pub has_required_certification: bool,
    /// The flight's aircraft type
    pub required: String,
    /// The crew member's certification string as stored
    pub has: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CrewRoster {
    pub crew: Vec<Row>,
    pub by_role: RoleBuckets,
    pub certification_status: Vec<CertificationStatus>,
}

pub fn build_roster(flight: Option<&Row>, assignments: &[Row], crew: &[Row]) -> CrewRoster {
    let by_id: HashMap<String, &Row> = crew
        .iter()
        .filter_map(|c| c.get("crew_id").map(|id| (join_key(id), c)))
        .collect();

    let mut joined: Vec<Row> = assignments
        .iter()
        .filter_map(|assignment| {
            let member = by_id.get(&join_key(assignment.get("crew_id")?))?;
            Some(join(assignment, member))
        })
        .collect();

    ResultSorter::sort(
        &mut joined,
        &[SortKey::asc("assignment_role"), SortKey::asc("name")],
    );

    let mut roster = CrewRoster::default();

    for row in &joined {
        let role = row_str(row.get("assignment_role")).or_else(|| row_str(row.get("crew_role")));
        roster.by_role.push(role, row.clone());
    }

    let required = flight
        .and_then(|f| row_str(f.get("aircraft_type")))
        .filter(|t| !t.is_empty());
    if let Some(required) = required {
        let needle = required.to_uppercase();
        roster.certification_status = joined
            .iter()
            .map(|row| {
                let has = row.get("certifications").cloned().unwrap_or(Value::Null);
                CertificationStatus {
                    crew_id: field(row, "crew_id"),
                    name: field(row, "name"),
                    role: field(row, "assignment_role"),
                    has_required_certification: has
                        .as_str()
                        .is_some_and(|c| c.to_uppercase().contains(&needle)),
                    required: required.to_string(),
                    has,
                }
            })
            .collect();
    }

    roster.crew = joined;
    roster
}

fn join(assignment: &Row, member: &Row) -> Row {
    let mut out = Row::new();
    for (key, value) in assignment {
        let key = match key.as_str() {
            "role" => "assignment_role",
            "status" => "assignment_status",
            other => other,
        };
        out.insert(key.to_string(), value.clone());
    }
    for (key, value) in member {
        let key = match key.as_str() {
            "role" => "crew_role",
            other => other,
        };
        if !out.contains_key(key) {
            out.insert(key.to_string(), value.clone());
        }
    }
    out
}

fn join_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn field(row: &Row, name: &str) -> Value {
    row.get(name).cloned().unwrap_or(Value::Null)
}
