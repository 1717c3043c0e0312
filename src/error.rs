use thiserror::Error;

/// Main error type for the masterfile crate.
/// Aggregates errors from the input-table readers and the fill pipeline.
#[derive(Error, Debug)]
pub enum MasterfileError {
    #[error("{0}")]
    WithContextError(String),

    // Table module errors
    #[error("{0}")]
    RawTableError(#[from] crate::table::raw::RawTableError),

    #[error("{0}")]
    MappingError(#[from] crate::table::mapping::MappingError),

    // Fill module errors
    #[error("{0}")]
    FillError(#[from] crate::fill::FillError),
}

pub trait ResultMessage {
    fn with_prefix(self, message: &str) -> Self;
}

impl<T> ResultMessage for Result<T, MasterfileError> {
    fn with_prefix(self, message: &str) -> Self {
        self.map_err(|e| MasterfileError::WithContextError(format!("{}: {}", message, e)))
    }
}
