//! Schema error types
//!
//! Error codes:
//! - FLIGHTDESK_SCHEMA_EMPTY (FATAL)
//! - FLIGHTDESK_SCHEMA_LOAD_FAILED (FATAL)
//! - FLIGHTDESK_SCHEMA_MALFORMED (FATAL)

use std::fmt;

/// Severity levels for schema errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Service must not start
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Resource table has no catalogued columns
    SchemaEmpty,
    /// Catalog query failed
    SchemaLoadFailed,
    /// Catalog file unreadable or invalid
    SchemaMalformed,
}

impl SchemaErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::SchemaEmpty => "FLIGHTDESK_SCHEMA_EMPTY",
            SchemaErrorCode::SchemaLoadFailed => "FLIGHTDESK_SCHEMA_LOAD_FAILED",
            SchemaErrorCode::SchemaMalformed => "FLIGHTDESK_SCHEMA_MALFORMED",
        }
    }

    /// Every schema error happens before the service accepts traffic
    pub fn severity(&self) -> Severity {
        Severity::Fatal
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Schema error with context
#[derive(Debug)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    table: Option<String>,
}

impl SchemaError {
    /// Resource table has no columns (missing table or no privileges)
    pub fn empty(table: impl Into<String>) -> Self {
        let t = table.into();
        Self {
            code: SchemaErrorCode::SchemaEmpty,
            message: format!("Table '{}' has no columns in the catalog", t),
            table: Some(t),
        }
    }

    pub fn load_failed(table: impl Into<String>, reason: impl Into<String>) -> Self {
        let t = table.into();
        Self {
            code: SchemaErrorCode::SchemaLoadFailed,
            message: format!("Failed to load columns of '{}': {}", t, reason.into()),
            table: Some(t),
        }
    }

    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::SchemaMalformed,
            message: format!("Malformed catalog file '{}': {}", path.into(), reason.into()),
            table: None,
        }
    }

    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    pub fn is_fatal(&self) -> bool {
        self.code.severity() == Severity::Fatal
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code.severity(), self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
