//! Response bodies
//!
//! Field order here is the field order on the wire.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::categorize::{
    AvailabilityBuckets, CertificationStatus, CrewCategories, PassengerCategories, RoleBuckets,
};
use crate::executor::Row;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightCategories {
    pub by_status: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightSearch {
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub search_results: Vec<Row>,
    pub categorized: FlightCategories,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteList {
    pub count: usize,
    pub routes: Vec<Row>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrewSearch {
    pub search_criteria: Value,
    pub count: usize,
    pub crew: Vec<Row>,
    pub categorized: CrewCategories,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvailableCrew {
    pub search_criteria: Value,
    pub count: usize,
    pub available_crew: Vec<Row>,
    pub categorized: AvailabilityBuckets,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrewDetail {
    pub crew: Row,
    pub assignments: Vec<Row>,
    pub assignment_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightCrew {
    pub flight_no: String,
    pub flight_details: Option<Row>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub crew: Vec<Row>,
    pub count: usize,
    pub by_role: RoleBuckets,
    pub certification_status: Vec<CertificationStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentSearch {
    pub search_criteria: Value,
    pub count: usize,
    pub assignments: Vec<Row>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PassengerSearch {
    pub search_criteria: Value,
    pub count: usize,
    pub passengers: Vec<Row>,
    pub categorized: PassengerCategories,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightPassengers {
    pub flight_no: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub passengers: Vec<Row>,
    pub categorized: PassengerCategories,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PnrGroup {
    pub pnr: String,
    pub passenger_count: usize,
    pub passengers: Vec<Row>,
    pub is_group_booking: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub database: &'static str,
    pub total_flights: Option<i64>,
    pub total_crew: Option<i64>,
    pub total_assignments: Option<i64>,
    pub total_passengers: Option<i64>,
}

impl Health {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}
