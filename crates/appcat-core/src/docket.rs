//! Docket sink abstraction.
//!
//! The docket collaborator is external; the catalog only produces event
//! values and hands them to a sink. Dispatch is fire-and-forget: a sink
//! failure is the dispatcher's problem to log, never the caller's.

use thiserror::Error;

use crate::models::docket::DocketEvent;

#[derive(Debug, Error)]
#[error("docket post failed: {0}")]
pub struct DocketError(pub String);

pub trait DocketSink: Send + Sync {
    fn post(&self, event: DocketEvent) -> impl Future<Output = Result<(), DocketError>> + Send;
}
