//! APPCAT Database — SurrealDB connection management and repository
//! implementations for the application catalog.
//!
//! This crate provides:
//! - Connection management ([`DbConfig`], [`DbManager`])
//! - Descriptor-driven schema DDL and migrations ([`run_migrations`])
//! - Repository implementations for the `appcat-core` traits
//! - Error types ([`DbError`])

mod connection;
mod error;
pub mod repository;
mod schema;

pub use connection::{DbConfig, DbManager};
pub use error::DbError;
pub use schema::{default_schemas, run_migrations, run_migrations_with, table_ddl};
