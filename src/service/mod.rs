//! Search services
//!
//! One `SearchService` per process, shared by all HTTP handlers. It holds
//! the read-only schema registry and the query surface; every call is
//! independent.

mod errors;
mod lookup;
mod planner;
mod responses;
mod search;

pub use errors::{ServiceError, ServiceResult};
pub use lookup::Lookup;
pub use planner::SearchPlanner;
pub use responses::{
    AssignmentSearch, AvailableCrew, CrewDetail, CrewSearch, FlightCategories, FlightCrew,
    FlightPassengers, FlightSearch, Health, PassengerSearch, PnrGroup, RouteList,
};
pub use search::SearchService;
