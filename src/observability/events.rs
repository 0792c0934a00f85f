//! Observable events
//!
//! Every log line emitted at info level or above carries one of these as
//! its `event` field.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Boot & Lifecycle
    /// Startup begins
    BootStart,
    /// Listener bound, ready to serve
    Serving,
    /// Shutdown complete
    ShutdownComplete,

    // Configuration
    ConfigLoaded,
    /// Column catalog of one resource loaded
    SchemaLoaded,
    /// Catalog column skipped (name is not a plain identifier)
    SchemaColumnRejected,

    // Request processing
    /// Filter payload rejected before reaching the database
    FilterRejected,
    /// Statement assembled
    QueryPlanned,
    /// Search finished
    SearchComplete,
    /// Point or group lookup finished
    LookupComplete,
    /// Lookup found no row
    LookupNotFound,
    /// Query surface failed
    QueryFailed,

    // Health
    HealthDegraded,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "FLIGHTDESK_STARTUP_BEGIN",
            Event::Serving => "FLIGHTDESK_SERVING",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",

            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SchemaLoaded => "SCHEMA_LOADED",
            Event::SchemaColumnRejected => "SCHEMA_COLUMN_REJECTED",

            Event::FilterRejected => "FILTER_REJECTED",
            Event::QueryPlanned => "QUERY_PLANNED",
            Event::SearchComplete => "SEARCH_COMPLETE",
            Event::LookupComplete => "LOOKUP_COMPLETE",
            Event::LookupNotFound => "LOOKUP_NOT_FOUND",
            Event::QueryFailed => "QUERY_FAILED",

            Event::HealthDegraded => "HEALTH_DEGRADED",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
