//! Filter translation errors
//!
//! Error codes:
//! - FLIGHTDESK_FILTER_NOT_OBJECT (REJECT)
//! - FLIGHTDESK_FILTER_EMPTY (REJECT)
//! - FLIGHTDESK_FILTER_INVALID_LIMIT (REJECT)
//! - FLIGHTDESK_FILTER_INVALID_VALUE (REJECT)
//!
//! A rejected payload never reaches the database.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Request refused, service healthy
    Reject,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterErrorCode {
    /// Payload is not a JSON object
    NotObject,
    /// Payload carries no filter at all where one is required
    Empty,
    /// `limit` is not a non-negative integer
    InvalidLimit,
    /// A typed field or reserved directive failed coercion
    InvalidValue,
}

impl FilterErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            FilterErrorCode::NotObject => "FLIGHTDESK_FILTER_NOT_OBJECT",
            FilterErrorCode::Empty => "FLIGHTDESK_FILTER_EMPTY",
            FilterErrorCode::InvalidLimit => "FLIGHTDESK_FILTER_INVALID_LIMIT",
            FilterErrorCode::InvalidValue => "FLIGHTDESK_FILTER_INVALID_VALUE",
        }
    }

    pub fn severity(&self) -> Severity {
        Severity::Reject
    }
}

impl fmt::Display for FilterErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug, Clone)]
pub struct FilterError {
    code: FilterErrorCode,
    message: String,
    field: Option<String>,
}

impl FilterError {
    pub fn not_object(found: &str) -> Self {
        Self {
            code: FilterErrorCode::NotObject,
            message: format!("Filter payload must be a JSON object, got {}", found),
            field: None,
        }
    }

    pub fn empty() -> Self {
        Self {
            code: FilterErrorCode::Empty,
            message: "Request body is required".to_string(),
            field: None,
        }
    }

    pub fn invalid_limit(reason: impl Into<String>) -> Self {
        Self {
            code: FilterErrorCode::InvalidLimit,
            message: format!("Invalid limit: {}", reason.into()),
            field: Some("limit".to_string()),
        }
    }

    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            code: FilterErrorCode::InvalidValue,
            message: format!("Invalid value for '{}': {}", field, reason.into()),
            field: Some(field),
        }
    }

    pub fn code(&self) -> FilterErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code.severity(), self.code.code(), self.message)
    }
}

impl std::error::Error for FilterError {}

pub type FilterResult<T> = Result<T, FilterError>;
