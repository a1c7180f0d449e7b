//! SurrealDB repository implementations.

mod application;
mod application_entity;

pub use application::SurrealApplicationRepository;
pub use application_entity::SurrealApplicationEntityRepository;
