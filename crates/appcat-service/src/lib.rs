//! APPCAT Service — the public facade over the application catalog.
//!
//! Orchestrates validation, persistence and docket audit emission:
//! argument checks and schema validation happen before anything touches
//! storage, every delegated call is bracketed by audit events, and audit
//! failures are absorbed rather than surfaced.

pub mod docket;
pub mod entity_service;
pub mod service;

pub use docket::{LogDocketSink, MemoryDocketSink};
pub use entity_service::ApplicationEntityService;
pub use service::ApplicationService;
