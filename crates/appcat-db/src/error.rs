//! Database-specific error types and conversions.

use appcat_core::error::CatalogError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("migration failed: {0}")]
    Migration(String),

    #[error("row decode failed: {0}")]
    Decode(String),
}

impl From<DbError> for CatalogError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Surreal(e) => CatalogError::Store(e.to_string()),
            DbError::Migration(msg) => CatalogError::Internal(msg),
            DbError::Decode(msg) => CatalogError::Internal(msg),
        }
    }
}
