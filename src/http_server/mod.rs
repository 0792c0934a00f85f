//! # Flightdesk HTTP Server
//!
//! Axum front end for the search services. Every handler is a thin
//! adapter: parse the body, call `SearchService`, map the outcome to a
//! status code.
//!
//! # Endpoints
//!
//! - `/` - Service info
//! - `/health` - Database connectivity and table counts
//! - `/search`, `/flight/:flight_no`, `/routes` - Flights
//! - `/crew/*` - Crew search, availability, roster
//! - `/assignments/search` - Crew assignments
//! - `/passengers/*` - Passenger search, manifests, PNR groups

pub mod config;
pub mod errors;
pub mod routes;
pub mod server;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ErrorResponse};
pub use routes::{search_routes, ApiState};
pub use server::HttpServer;
