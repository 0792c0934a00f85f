//! Schema registry subsystem
//!
//! Every searchable resource carries a read-only column catalog that maps a
//! column name to the semantic type its filter values are coerced to.
//!
//! # Design Principles
//!
//! - Built once at startup, never refreshed (restart to pick up changes)
//! - Lookups of unknown columns return `None`, never an error
//! - Only catalogued columns may appear as identifiers in generated SQL

mod errors;
mod loader;
mod registry;
mod types;

pub use errors::{SchemaError, SchemaErrorCode, SchemaResult};
pub use loader::{CatalogFile, SchemaLoader};
pub use registry::{SchemaRegistry, SchemaRegistryBuilder};
pub use types::{ColumnSchema, Resource, ResourceSchema, SemanticType};
