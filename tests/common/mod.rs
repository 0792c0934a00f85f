//! Shared fixtures: a small airline dataset served by the in-memory surface.

#![allow(dead_code)]

use std::sync::Arc;

use flightdesk::executor::InMemorySurface;
use flightdesk::schema::{SchemaLoader, SchemaRegistry};
use flightdesk::service::SearchService;
use serde_json::{json, Value};

pub const FLIGHT_COLUMNS: &[(&str, &str)] = &[
    ("flight_no", "character varying"),
    ("airline", "character varying"),
    ("origin", "character varying"),
    ("destination", "character varying"),
    ("departure_time", "timestamp without time zone"),
    ("arrival_time", "timestamp without time zone"),
    ("status", "character varying"),
    ("aircraft_type", "character varying"),
    ("available_seats", "integer"),
    ("price", "numeric"),
    ("meal_service_available", "boolean"),
];

pub const CREW_COLUMNS: &[(&str, &str)] = &[
    ("crew_id", "character varying"),
    ("name", "character varying"),
    ("role", "character varying"),
    ("base_airport", "character varying"),
    ("current_location", "character varying"),
    ("current_status", "character varying"),
    ("certifications", "text"),
    ("duty_hours_last_7d", "numeric"),
    ("next_legal_availability", "timestamp without time zone"),
];

pub const ASSIGNMENT_COLUMNS: &[(&str, &str)] = &[
    ("assignment_id", "character varying"),
    ("crew_id", "character varying"),
    ("flight_no", "character varying"),
    ("flight_date", "date"),
    ("role", "character varying"),
    ("status", "character varying"),
];

pub const PASSENGER_COLUMNS: &[(&str, &str)] = &[
    ("passenger_id", "character varying"),
    ("name", "character varying"),
    ("pnr", "character varying"),
    ("flight_no", "character varying"),
    ("age", "integer"),
    ("loyalty_tier", "character varying"),
    ("special_needs", "text"),
    ("wheelchair_or_medical_time_required", "boolean"),
    ("passenger_priority_score", "numeric"),
    ("email", "character varying"),
];

pub fn flights() -> Vec<Value> {
    vec![
        json!({
            "flight_no": "AI101", "airline": "Air India", "origin": "DEL", "destination": "BOM",
            "departure_time": "2025-03-01T06:00:00", "arrival_time": "2025-03-01T08:10:00",
            "status": "ON_TIME", "aircraft_type": "A320", "available_seats": 3,
            "price": 5400.0, "meal_service_available": true
        }),
        json!({
            "flight_no": "6E202", "airline": "IndiGo", "origin": "DEL", "destination": "BLR",
            "departure_time": "2025-03-01T09:30:00", "arrival_time": "2025-03-01T12:15:00",
            "status": "DELAYED", "aircraft_type": "A321", "available_seats": 0,
            "price": 6100.0, "meal_service_available": false
        }),
        json!({
            "flight_no": "UK303", "airline": "Vistara", "origin": "BOM", "destination": "DEL",
            "departure_time": "2025-03-01T19:45:00", "arrival_time": "2025-03-01T21:55:00",
            "status": "CANCELLED", "aircraft_type": "B787", "available_seats": 12,
            "price": 7200.0, "meal_service_available": true
        }),
    ]
}

pub fn crew() -> Vec<Value> {
    vec![
        json!({
            "crew_id": "C001", "name": "Asha Rao", "role": "Pilot", "base_airport": "DEL",
            "current_location": "DEL", "current_status": "AVAILABLE", "certifications": "A320,A321",
            "duty_hours_last_7d": 39.9, "next_legal_availability": "2025-02-28T20:00:00"
        }),
        json!({
            "crew_id": "C002", "name": "Vikram Sen", "role": "Co-Pilot", "base_airport": "DEL",
            "current_location": "BOM", "current_status": "STANDBY_AIRPORT", "certifications": "B787",
            "duty_hours_last_7d": 40.0, "next_legal_availability": "2025-03-01T04:00:00"
        }),
        json!({
            "crew_id": "C003", "name": "Meera Iyer", "role": "Cabin Crew", "base_airport": "BOM",
            "current_location": "BOM", "current_status": "RESTING", "certifications": "A320",
            "duty_hours_last_7d": 47.5, "next_legal_availability": "2025-03-02T10:00:00"
        }),
    ]
}

pub fn assignments() -> Vec<Value> {
    vec![
        json!({
            "assignment_id": "A1", "crew_id": "C001", "flight_no": "AI101",
            "flight_date": "2025-03-01", "role": "Captain", "status": "CONFIRMED"
        }),
        json!({
            "assignment_id": "A2", "crew_id": "C002", "flight_no": "AI101",
            "flight_date": "2025-03-01", "role": "First Officer", "status": "CONFIRMED"
        }),
        json!({
            "assignment_id": "A3", "crew_id": "C001", "flight_no": "6E202",
            "flight_date": "2025-02-27", "role": "Captain", "status": "COMPLETED"
        }),
    ]
}

pub fn passengers() -> Vec<Value> {
    vec![
        json!({
            "passenger_id": "P1", "name": "Kamala Devi", "pnr": "PNR1", "flight_no": "AI101",
            "age": 70, "loyalty_tier": "Platinum", "special_needs": null,
            "wheelchair_or_medical_time_required": true, "passenger_priority_score": 98,
            "email": "kamala@example.com"
        }),
        json!({
            "passenger_id": "P2", "name": "Ravi Devi", "pnr": "PNR1", "flight_no": "AI101",
            "age": 72, "loyalty_tier": "Gold", "special_needs": "[\"hearing aid\", \"extra legroom\"]",
            "wheelchair_or_medical_time_required": false, "passenger_priority_score": 80,
            "email": "ravi@example.com"
        }),
        json!({
            "passenger_id": "P3", "name": "Neha Kapoor", "pnr": "PNR2", "flight_no": "AI101",
            "age": 34, "loyalty_tier": "Silver", "special_needs": null,
            "wheelchair_or_medical_time_required": false, "passenger_priority_score": 40,
            "email": "Neha@Example.com"
        }),
        json!({
            "passenger_id": "P4", "name": "Arjun Mehta", "pnr": "PNR3", "flight_no": "UK303",
            "age": 28, "loyalty_tier": null, "special_needs": null,
            "wheelchair_or_medical_time_required": false, "passenger_priority_score": 10,
            "email": "arjun@example.com"
        }),
    ]
}

pub fn surface() -> InMemorySurface {
    InMemorySurface::new()
        .with_table("flights", FLIGHT_COLUMNS, flights())
        .with_table("crew", CREW_COLUMNS, crew())
        .with_table("crew_assignments", ASSIGNMENT_COLUMNS, assignments())
        .with_table("passengers", PASSENGER_COLUMNS, passengers())
}

/// Registry as the service builds it at startup
pub async fn registry(surface: &InMemorySurface) -> Arc<SchemaRegistry> {
    Arc::new(SchemaLoader::load(surface).await.unwrap())
}

pub async fn service() -> Arc<SearchService> {
    let surface = surface();
    let registry = registry(&surface).await;
    Arc::new(SearchService::new(registry, Arc::new(surface)))
}
