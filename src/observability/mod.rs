//! Observability subsystem
//!
//! Structured logging through `tracing`. Log lines carry an `event` field
//! naming one of the `Event` variants, plus typed fields.
//!
//! # Usage
//!
//! ```ignore
//! use flightdesk::observability::{init_logging, Event, LogFormat};
//!
//! init_logging("info", LogFormat::Json)?;
//! tracing::info!(event = %Event::SearchComplete, resource = "flights", count = 3);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{env_filter, init_logging, LogFormat};
