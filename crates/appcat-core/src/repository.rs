//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Point lookups return
//! `Option<T>`, the one absent-record sentinel at this boundary; how
//! absence renders (e.g. as an empty document) is decided by the caller.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::CatalogResult;
use crate::models::application::{Application, ApplicationPatch, NewApplication};
use crate::models::application_entity::{
    ApplicationEntity, ApplicationEntityPatch, NewApplicationEntity,
};

/// Conjunction of field-equality clauses for attribute lookups.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    clauses: Vec<(String, Value)>,
}

impl Filter {
    pub fn new() -> Self {
        Filter::default()
    }

    /// Add a `field = value` clause.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push((field.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn clauses(&self) -> &[(String, Value)] {
        &self.clauses
    }
}

/// Outcome of an update, so callers can distinguish zero-modified from
/// applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOutcome {
    /// Records matched by the identifier.
    pub matched: u64,
    /// Records whose stored values actually changed.
    pub modified: u64,
}

/// Serializes as `{}`, the caller-facing rendering of "no such record".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyDocument {}

/// Result of a point lookup at the public boundary.
///
/// `Missing` serializes as an empty document rather than a null, so
/// callers can treat "found" and "not found" uniformly as object-shaped
/// values. One convention for every lookup path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Lookup<T> {
    Found(T),
    Missing(EmptyDocument),
}

impl<T> Lookup<T> {
    pub fn missing() -> Self {
        Lookup::Missing(EmptyDocument {})
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    pub fn found(&self) -> Option<&T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::Missing(_) => None,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::Missing(_) => None,
        }
    }
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Lookup::Found(v),
            None => Lookup::missing(),
        }
    }
}

pub trait ApplicationRepository: Send + Sync {
    /// Insert one record. The store enforces schema and code uniqueness.
    fn save(&self, input: NewApplication) -> impl Future<Output = CatalogResult<Application>> + Send;

    fn find_by_id(&self, id: Uuid)
    -> impl Future<Output = CatalogResult<Option<Application>>> + Send;

    fn find_by_code(
        &self,
        code: &str,
    ) -> impl Future<Output = CatalogResult<Option<Application>>> + Send;

    fn find_by_code_and_enabled(
        &self,
        code: &str,
        enabled: bool,
    ) -> impl Future<Output = CatalogResult<Option<Application>>> + Send;

    /// First record matching the field-equality filter, storage-native
    /// choice when several match.
    fn find_one(
        &self,
        filter: &Filter,
    ) -> impl Future<Output = CatalogResult<Option<Application>>> + Send;

    /// Up to `limit` records in storage-native order; `limit < 1` returns
    /// all records.
    fn find_all(&self, limit: i64)
    -> impl Future<Output = CatalogResult<Vec<Application>>> + Send;

    /// Partial field-level merge. Rejects `NotFound` for an unknown id,
    /// `Validation` for a patch violating field constraints and
    /// `NoOpUpdate` when no stored value would change.
    fn update(
        &self,
        id: Uuid,
        patch: ApplicationPatch,
    ) -> impl Future<Output = CatalogResult<UpdateOutcome>> + Send;

    /// Remove every record. Reserved for test/reset use.
    fn delete_all(&self) -> impl Future<Output = CatalogResult<u64>> + Send;
}

pub trait ApplicationEntityRepository: Send + Sync {
    fn save(
        &self,
        input: NewApplicationEntity,
    ) -> impl Future<Output = CatalogResult<ApplicationEntity>> + Send;

    fn find_by_id(
        &self,
        id: Uuid,
    ) -> impl Future<Output = CatalogResult<Option<ApplicationEntity>>> + Send;

    fn find_by_code(
        &self,
        code: i64,
    ) -> impl Future<Output = CatalogResult<Option<ApplicationEntity>>> + Send;

    fn find_by_code_and_enabled(
        &self,
        code: i64,
        enabled: bool,
    ) -> impl Future<Output = CatalogResult<Option<ApplicationEntity>>> + Send;

    fn find_one(
        &self,
        filter: &Filter,
    ) -> impl Future<Output = CatalogResult<Option<ApplicationEntity>>> + Send;

    fn find_all(
        &self,
        limit: i64,
    ) -> impl Future<Output = CatalogResult<Vec<ApplicationEntity>>> + Send;

    fn update(
        &self,
        id: Uuid,
        patch: ApplicationEntityPatch,
    ) -> impl Future<Output = CatalogResult<UpdateOutcome>> + Send;

    fn delete_all(&self) -> impl Future<Output = CatalogResult<u64>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_lookup_serializes_as_empty_document() {
        let lookup: Lookup<Application> = Lookup::missing();
        let json = serde_json::to_value(&lookup).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }

    #[test]
    fn lookup_from_option() {
        let missing: Lookup<u32> = Lookup::from(None);
        assert!(!missing.is_found());

        let found = Lookup::from(Some(7u32));
        assert_eq!(found.found(), Some(&7));
        assert_eq!(found.into_option(), Some(7));
    }
}
