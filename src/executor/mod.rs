//! Query surfaces
//!
//! A surface executes one assembled `Statement` and returns rows as JSON
//! objects. `PostgresSurface` talks to the database; `InMemorySurface`
//! evaluates the structured statement shape over fixture tables.

mod errors;
mod filters;
mod memory;
mod postgres;
mod sorter;
mod surface;

pub use errors::{redact_credentials, SurfaceError, SurfaceResult};
pub use filters::PredicateFilter;
pub use memory::InMemorySurface;
pub use postgres::PostgresSurface;
pub use sorter::ResultSorter;
pub use surface::{QuerySurface, Row};
