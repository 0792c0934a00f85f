use crate::executor::SurfaceError;
use crate::filter::FilterError;

/// Request failure. Not-found is not an error; see `Lookup`.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Caller sent a payload that cannot be translated
    #[error("{0}")]
    Filter(#[from] FilterError),

    /// Database unreachable or query failed
    #[error("{0}")]
    Surface(#[from] SurfaceError),
}

impl ServiceError {
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::Filter(e) => e.code().code(),
            ServiceError::Surface(e) => e.code(),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
