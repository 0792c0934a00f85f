//! CLI-specific error types
//!
//! Every CLI error is fatal: printed to stderr, exit status 1.

use std::fmt;
use std::io;

use crate::executor::SurfaceError;
use crate::filter::FilterError;
use crate::schema::SchemaError;

/// CLI error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdin/stdout)
    IoError,
    /// Schema or database unavailable at startup
    BootFailed,
    /// Filter payload rejected by `plan`
    PlanRejected,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "FLIGHTDESK_CLI_CONFIG_ERROR",
            Self::IoError => "FLIGHTDESK_CLI_IO_ERROR",
            Self::BootFailed => "FLIGHTDESK_CLI_BOOT_FAILED",
            Self::PlanRejected => "FLIGHTDESK_CLI_PLAN_REJECTED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn boot_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::BootFailed, msg)
    }

    pub fn code(&self) -> CliErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<SchemaError> for CliError {
    fn from(e: SchemaError) -> Self {
        Self::boot_failed(e.to_string())
    }
}

impl From<SurfaceError> for CliError {
    fn from(e: SurfaceError) -> Self {
        Self::boot_failed(format!("{}: {}", e.code(), e))
    }
}

impl From<FilterError> for CliError {
    fn from(e: FilterError) -> Self {
        Self::new(CliErrorCode::PlanRejected, e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
