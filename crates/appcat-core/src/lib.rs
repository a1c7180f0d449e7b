//! APPCAT Core — domain models, declarative schemas, validation and
//! repository traits for the application catalog.
//!
//! This crate has no storage dependency; the SurrealDB implementations
//! live in `appcat-db` and the public facade in `appcat-service`.

pub mod docket;
pub mod error;
pub mod models;
pub mod repository;
pub mod schema;
pub mod validate;

pub use error::{CatalogError, CatalogResult};
pub use repository::{Filter, Lookup, UpdateOutcome};
pub use schema::{CodePreset, RecordSchema};
