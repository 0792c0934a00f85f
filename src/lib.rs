//! flightdesk - schema-driven flight, crew and passenger search service
//!
//! Request pipeline: filter payload → `filter::FilterTranslator` →
//! `planner::QueryAssembler` → `executor::QuerySurface` → `categorize` →
//! `service` response bodies, served over HTTP by `http_server`.

pub mod categorize;
pub mod cli;
pub mod executor;
pub mod filter;
pub mod http_server;
pub mod observability;
pub mod planner;
pub mod schema;
pub mod service;
