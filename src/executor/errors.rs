//! Query surface errors
//!
//! Error codes:
//! - FLIGHTDESK_SURFACE_CONNECTION
//! - FLIGHTDESK_SURFACE_QUERY
//! - FLIGHTDESK_SURFACE_BIND
//! - FLIGHTDESK_SURFACE_DECODE
//!
//! Messages never carry connection credentials.

use std::sync::OnceLock;

use regex::Regex;

#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("database connection failed: {0}")]
    Connection(String),

    #[error("query failed: {0}")]
    Query(String),

    #[error("cannot bind parameter ${index}: {reason}")]
    Bind { index: usize, reason: String },

    #[error("cannot decode column '{column}': {reason}")]
    Decode { column: String, reason: String },
}

impl SurfaceError {
    pub fn connection(reason: impl AsRef<str>) -> Self {
        SurfaceError::Connection(redact_credentials(reason.as_ref()))
    }

    pub fn query(reason: impl AsRef<str>) -> Self {
        SurfaceError::Query(redact_credentials(reason.as_ref()))
    }

    pub fn bind(index: usize, reason: impl Into<String>) -> Self {
        SurfaceError::Bind {
            index,
            reason: reason.into(),
        }
    }

    pub fn decode(column: impl Into<String>, reason: impl Into<String>) -> Self {
        SurfaceError::Decode {
            column: column.into(),
            reason: reason.into(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            SurfaceError::Connection(_) => "FLIGHTDESK_SURFACE_CONNECTION",
            SurfaceError::Query(_) => "FLIGHTDESK_SURFACE_QUERY",
            SurfaceError::Bind { .. } => "FLIGHTDESK_SURFACE_BIND",
            SurfaceError::Decode { .. } => "FLIGHTDESK_SURFACE_DECODE",
        }
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, SurfaceError::Connection(_))
    }
}

impl From<tokio_postgres::Error> for SurfaceError {
    fn from(err: tokio_postgres::Error) -> Self {
        if err.is_closed() {
            return SurfaceError::connection(err.to_string());
        }
        match err.as_db_error() {
            Some(db) => SurfaceError::query(format!("{} ({})", db.message(), db.code().code())),
            None => SurfaceError::query(err.to_string()),
        }
    }
}

pub type SurfaceResult<T> = Result<T, SurfaceError>;

fn url_credentials() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?P<scheme>postgres(?:ql)?://)(?P<user>[^:@/\s]+):[^@\s]*@")
            .expect("static url credential pattern")
    })
}

fn keyword_password() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(?P<key>password\s*=\s*)\S+").expect("static password pattern")
    })
}

/// Masks passwords in connection URLs and `password=` key/value pairs
pub fn redact_credentials(text: &str) -> String {
    let masked = url_credentials().replace_all(text, "${scheme}${user}:***@");
    keyword_password()
        .replace_all(&masked, "${key}***")
        .into_owned()
}
