//! Application domain model.
//!
//! An Application is a platform product registered for a tenant, looked up
//! by its unique business code (a short string such as `"CDA"`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored Application record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub id: Uuid,
    /// Owning tenant.
    pub tenant_id: String,
    /// Unique business code, e.g. `"CDA"`.
    pub application_code: String,
    pub application_name: String,
    pub enabled: bool,
    pub description: Option<String>,
    pub logo: Option<String>,
    pub favicon: Option<String>,
    /// Set exactly once, at creation.
    pub created_by: String,
    /// Set exactly once, at creation.
    pub created_date: DateTime<Utc>,
    pub updated_by: Option<String>,
    pub updated_date: Option<DateTime<Utc>>,
}

/// Fields accepted when creating a new Application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewApplication {
    pub tenant_id: String,
    pub application_code: String,
    pub application_name: String,
    /// Defaults to `true` when not given.
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

/// Partial update for an Application.
///
/// Only fields present here can change; identity and the `created_*` pair
/// deliberately have no counterpart, so they cannot be patched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicationPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_code: Option<String>,
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
    /// Recorded as the author of this update.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
}

impl ApplicationPatch {
    /// True when no field is set, i.e. the patch could not change anything.
    pub fn is_empty(&self) -> bool {
        self.tenant_id.is_none()
            && self.application_code.is_none()
            && self.application_name.is_none()
            && self.enabled.is_none()
            && self.description.is_none()
            && self.logo.is_none()
            && self.favicon.is_none()
            && self.updated_by.is_none()
    }
}
