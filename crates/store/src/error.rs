use thiserror::Error;

use trackline_core::Error;

/// Storage-layer failure.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The targeted row is missing or soft-deleted. Services translate this
    /// into the entity's domain `NotFound`.
    #[error("row not found")]
    RowNotFound,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        Error::Storage(err.to_string())
    }
}
