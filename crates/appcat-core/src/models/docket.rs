//! Docket audit event model.
//!
//! Every significant catalog operation forwards one of these to the
//! external docket collaborator. The event is an immutable value built
//! fresh per call; nothing here is shared between concurrent operations.
//! Field names serialize in camelCase: that is the collaborator's wire
//! contract and is independent of the catalog's own document naming.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocketStatus {
    Success,
    Failure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocketLevel {
    Info,
    Error,
}

/// Caller identity and origin stamped onto every event from one service
/// instance.
#[derive(Debug, Clone)]
pub struct DocketContext {
    /// Platform application emitting the events, e.g. `"PLATFORM"`.
    pub application: String,
    /// Emitting module, e.g. `"application"`.
    pub source: String,
    /// Acting user recorded on the events.
    pub created_by: String,
    pub ip_address: String,
}

/// One audit event, as posted to the docket collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocketEvent {
    pub application: String,
    pub source: String,
    /// Operation name, e.g. `"save"` or `"update"`.
    pub name: String,
    pub created_by: String,
    pub ip_address: String,
    pub status: DocketStatus,
    pub event_date_time: DateTime<Utc>,
    /// JSON-serialized operation input.
    #[serde(rename = "keyDataAsJSON")]
    pub key_data_as_json: String,
    pub details: String,
    pub level: DocketLevel,
}

impl DocketEvent {
    /// Build a pre-operation event; status defaults to success.
    pub fn operation(ctx: &DocketContext, name: &str, key_data: impl Into<String>) -> Self {
        DocketEvent {
            application: ctx.application.clone(),
            source: ctx.source.clone(),
            name: name.to_string(),
            created_by: ctx.created_by.clone(),
            ip_address: ctx.ip_address.clone(),
            status: DocketStatus::Success,
            event_date_time: Utc::now(),
            key_data_as_json: key_data.into(),
            details: String::new(),
            level: DocketLevel::Info,
        }
    }

    /// Derive the post-failure event for the same operation, carrying the
    /// error message.
    pub fn failed(mut self, details: impl Into<String>) -> Self {
        self.status = DocketStatus::Failure;
        self.level = DocketLevel::Error;
        self.details = details.into();
        self.event_date_time = Utc::now();
        self
    }
}
