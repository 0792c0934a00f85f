//! Search HTTP Routes
//!
//! One handler per endpoint. Bodies are read as raw bytes so that an empty
//! body reaches the filter layer as `null` instead of failing extraction.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;

use super::errors::ApiError;
use crate::service::{
    AssignmentSearch, AvailableCrew, CrewDetail, CrewSearch, FlightCrew, FlightPassengers,
    FlightSearch, Lookup, PassengerSearch, PnrGroup, RouteList, SearchService,
};

// ==================
// Shared State
// ==================

/// State shared across handlers
pub struct ApiState {
    pub service: Arc<SearchService>,
}

impl ApiState {
    pub fn new(service: Arc<SearchService>) -> Self {
        Self { service }
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub status: &'static str,
    pub message: &'static str,
    pub version: &'static str,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Debug, Serialize)]
pub struct EndpointInfo {
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
}

const ENDPOINTS: &[(&str, &str, &str)] = &[
    ("GET", "/health", "Database connectivity and table counts"),
    ("POST", "/search", "Search flights with a structured filter"),
    ("GET", "/flight/:flight_no", "Get specific flight details"),
    ("GET", "/routes", "List distinct origin and destination pairs"),
    ("POST", "/crew/search", "Search crew members"),
    ("POST", "/crew/available", "Find crew available for assignment"),
    ("GET", "/crew/:crew_id", "Crew member with assignment history"),
    ("GET", "/crew/flight/:flight_no", "Crew roster for a flight"),
    ("POST", "/assignments/search", "Search crew assignments"),
    ("POST", "/passengers/search", "Search passengers"),
    ("GET", "/passengers/flight/:flight_no", "Passenger manifest for a flight"),
    ("GET", "/passengers/pnr/:pnr", "Passengers sharing a booking"),
];

// ==================
// Search Routes
// ==================

/// Create search routes
pub fn search_routes(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/", get(info_handler))
        .route("/health", get(health_handler))
        // Flights
        .route("/search", post(search_flights_handler))
        .route("/flight/:flight_no", get(flight_handler))
        .route("/routes", get(routes_handler))
        // Crew
        .route("/crew/search", post(search_crew_handler))
        .route("/crew/available", post(available_crew_handler))
        .route("/crew/flight/:flight_no", get(flight_crew_handler))
        .route("/crew/:crew_id", get(crew_detail_handler))
        .route("/assignments/search", post(search_assignments_handler))
        // Passengers
        .route("/passengers/search", post(search_passengers_handler))
        .route("/passengers/flight/:flight_no", get(flight_passengers_handler))
        .route("/passengers/pnr/:pnr", get(pnr_handler))
        .with_state(state)
}

// ==================
// Helper Functions
// ==================

/// Empty body is `null`; anything else must be valid JSON.
fn parse_body(body: &Bytes) -> Result<Value, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body).map_err(|e| ApiError::InvalidBody(e.to_string()))
}

fn found<T>(lookup: Lookup<T>, message: impl FnOnce() -> String) -> Result<T, ApiError> {
    lookup
        .into_option()
        .ok_or_else(|| ApiError::not_found(message()))
}

// ==================
// General Handlers
// ==================

async fn info_handler() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        status: "ok",
        message: "Flight operations search API is running",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: ENDPOINTS
            .iter()
            .map(|&(method, path, description)| EndpointInfo {
                method,
                path,
                description,
            })
            .collect(),
    })
}

async fn health_handler(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    let health = state.service.health().await;
    let status = if health.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(health))
}

// ==================
// Flight Handlers
// ==================

async fn search_flights_handler(
    State(state): State<Arc<ApiState>>,
    body: Bytes,
) -> ApiResult<FlightSearch> {
    let payload = parse_body(&body)?;
    Ok(Json(state.service.search_flights(&payload).await?))
}

async fn flight_handler(
    State(state): State<Arc<ApiState>>,
    Path(flight_no): Path<String>,
) -> ApiResult<Value> {
    let lookup = state.service.flight(&flight_no).await?;
    let row = found(lookup, || "Flight not found".to_string())?;
    Ok(Json(Value::Object(row)))
}

async fn routes_handler(State(state): State<Arc<ApiState>>) -> ApiResult<RouteList> {
    Ok(Json(state.service.routes().await?))
}

// ==================
// Crew Handlers
// ==================

async fn search_crew_handler(
    State(state): State<Arc<ApiState>>,
    body: Bytes,
) -> ApiResult<CrewSearch> {
    let payload = parse_body(&body)?;
    Ok(Json(state.service.search_crew(&payload).await?))
}

async fn available_crew_handler(
    State(state): State<Arc<ApiState>>,
    body: Bytes,
) -> ApiResult<AvailableCrew> {
    let payload = parse_body(&body)?;
    Ok(Json(state.service.available_crew(&payload).await?))
}

async fn crew_detail_handler(
    State(state): State<Arc<ApiState>>,
    Path(crew_id): Path<String>,
) -> ApiResult<CrewDetail> {
    let lookup = state.service.crew_detail(&crew_id).await?;
    let detail = found(lookup, || format!("Crew member {} not found", crew_id))?;
    Ok(Json(detail))
}

async fn flight_crew_handler(
    State(state): State<Arc<ApiState>>,
    Path(flight_no): Path<String>,
) -> ApiResult<FlightCrew> {
    Ok(Json(state.service.flight_crew(&flight_no).await?))
}

async fn search_assignments_handler(
    State(state): State<Arc<ApiState>>,
    body: Bytes,
) -> ApiResult<AssignmentSearch> {
    let payload = parse_body(&body)?;
    Ok(Json(state.service.search_assignments(&payload).await?))
}

// ==================
// Passenger Handlers
// ==================

async fn search_passengers_handler(
    State(state): State<Arc<ApiState>>,
    body: Bytes,
) -> ApiResult<PassengerSearch> {
    let payload = parse_body(&body)?;
    Ok(Json(state.service.search_passengers(&payload).await?))
}

async fn flight_passengers_handler(
    State(state): State<Arc<ApiState>>,
    Path(flight_no): Path<String>,
) -> ApiResult<FlightPassengers> {
    Ok(Json(state.service.flight_passengers(&flight_no).await?))
}

async fn pnr_handler(
    State(state): State<Arc<ApiState>>,
    Path(pnr): Path<String>,
) -> ApiResult<PnrGroup> {
    let lookup = state.service.pnr(&pnr).await?;
    let group = found(lookup, || format!("No passengers found for PNR {}", pnr))?;
    Ok(Json(group))
}
