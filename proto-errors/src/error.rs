//! Error types for the runtime

use crate::template::MissingFieldsError;

/// Errors returned by runtime operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Template data lacks values for some placeholders
    #[error(transparent)]
    MissingFields(#[from] MissingFieldsError),

    /// A header name is not a valid ASCII metadata key
    #[error("invalid metadata header name: {key:?}")]
    InvalidHeaderKey {
        /// The rejected name
        key: String,
    },
}
