//! ApplicationEntity domain model.
//!
//! The parallel record family keyed by an integer `code` plus an
//! `application_id`, otherwise structurally identical to
//! [`Application`](crate::models::application::Application).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored ApplicationEntity record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationEntity {
    pub id: Uuid,
    pub tenant_id: String,
    /// Unique numeric business code.
    pub code: i64,
    /// The application this entity belongs to.
    pub application_id: i64,
    pub application_name: String,
    pub enabled: bool,
    pub description: Option<String>,
    pub logo: Option<String>,
    pub favicon: Option<String>,
    pub created_by: String,
    pub created_date: DateTime<Utc>,
    pub updated_by: Option<String>,
    pub updated_date: Option<DateTime<Utc>>,
}

/// Fields accepted when creating a new ApplicationEntity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewApplicationEntity {
    pub tenant_id: String,
    pub code: i64,
    pub application_id: i64,
    pub application_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
    pub created_by: String,
    pub created_date: DateTime<Utc>,
}

/// Partial update for an ApplicationEntity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicationEntityPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
}

impl ApplicationEntityPatch {
    pub fn is_empty(&self) -> bool {
        self.tenant_id.is_none()
            && self.code.is_none()
            && self.application_id.is_none()
            && self.application_name.is_none()
            && self.enabled.is_none()
            && self.description.is_none()
            && self.logo.is_none()
            && self.favicon.is_none()
            && self.updated_by.is_none()
    }
}
