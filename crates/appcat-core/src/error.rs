//! Error types for the application catalog.

use thiserror::Error;

use crate::validate::Violations;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// A required call argument is missing, empty or of an unusable shape.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// The candidate record failed declarative schema checks. Carries the
    /// complete list of violated constraints, not just the first.
    #[error("validation failed: {0}")]
    Validation(Violations),

    #[error("there is no {entity} with id {id}")]
    NotFound { entity: String, id: String },

    /// The identifier value does not conform to the primary-key format.
    #[error("malformed identifier: {value}")]
    MalformedId { value: String },

    /// The update patch would not change any persisted value.
    #[error("update to {entity} {id} does not change any stored value")]
    NoOpUpdate { entity: String, id: String },

    /// The storage collaborator failed (connectivity, constraint violation
    /// such as a duplicate code).
    #[error("store error: {0}")]
    Store(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl CatalogError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        CatalogError::InvalidArgument {
            message: message.into(),
        }
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;
