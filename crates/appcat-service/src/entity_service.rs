//! ApplicationEntity facade.
//!
//! Same orchestration as [`ApplicationService`](crate::service::ApplicationService),
//! for the record family keyed by a numeric code.

use std::sync::Arc;

use appcat_core::docket::DocketSink;
use appcat_core::error::{CatalogError, CatalogResult};
use appcat_core::models::application_entity::{
    ApplicationEntity, ApplicationEntityPatch, NewApplicationEntity,
};
use appcat_core::models::docket::{DocketContext, DocketEvent};
use appcat_core::repository::{ApplicationEntityRepository, Filter, Lookup, UpdateOutcome};
use appcat_core::schema::RecordSchema;
use appcat_core::validate;
use serde_json::json;
use tracing::warn;

use crate::service::{filter_key_data, parse_id};

/// Public entry point for the ApplicationEntity record family.
pub struct ApplicationEntityService<R: ApplicationEntityRepository, D: DocketSink + 'static> {
    repo: R,
    docket: Arc<D>,
    ctx: DocketContext,
    schema: RecordSchema,
}

impl<R: ApplicationEntityRepository, D: DocketSink + 'static> ApplicationEntityService<R, D> {
    pub fn new(repo: R, docket: D, ctx: DocketContext) -> Self {
        Self {
            repo,
            docket: Arc::new(docket),
            ctx,
            schema: RecordSchema::application_entity(),
        }
    }

    /// Validate a candidate document against the declarative schema.
    pub fn validate(&self, candidate: &serde_json::Value) -> CatalogResult<()> {
        validate::validate(candidate, &self.schema)
    }

    /// Validate, audit and persist a new record.
    pub async fn save(&self, input: NewApplicationEntity) -> CatalogResult<ApplicationEntity> {
        let doc = serde_json::to_value(&input)
            .map_err(|e| CatalogError::Internal(format!("serialize candidate: {e}")))?;
        let key_data = doc.to_string();

        if let Err(e) = validate::validate(&doc, &self.schema) {
            self.dispatch(DocketEvent::operation(&self.ctx, "save", key_data).failed(e.to_string()));
            return Err(e);
        }

        self.audited("save", key_data, self.repo.save(input)).await
    }

    pub async fn get_all(&self, limit: i64) -> CatalogResult<Vec<ApplicationEntity>> {
        let key_data = json!({ "limit": limit }).to_string();
        self.audited("getAll", key_data, self.repo.find_all(limit))
            .await
    }

    pub async fn get_by_id(&self, id: &str) -> CatalogResult<Lookup<ApplicationEntity>> {
        let uuid = parse_id(id)?;
        let key_data = json!({ "id": id }).to_string();
        self.audited("getById", key_data, async {
            Ok(Lookup::from(self.repo.find_by_id(uuid).await?))
        })
        .await
    }

    pub async fn get_one(&self, filter: &Filter) -> CatalogResult<Lookup<ApplicationEntity>> {
        if filter.is_empty() {
            return Err(CatalogError::invalid_argument("query filter is empty"));
        }
        for (field, _) in filter.clauses() {
            if !self.schema.has_field(field) {
                return Err(CatalogError::invalid_argument(format!(
                    "unknown query field: {field}"
                )));
            }
        }
        let key_data = filter_key_data(filter);
        self.audited("getOne", key_data, async {
            Ok(Lookup::from(self.repo.find_one(filter).await?))
        })
        .await
    }

    pub async fn update(
        &self,
        id: &str,
        patch: ApplicationEntityPatch,
    ) -> CatalogResult<UpdateOutcome> {
        let uuid = parse_id(id)?;
        if patch.is_empty() {
            return Err(CatalogError::invalid_argument("update patch is empty"));
        }
        let patch_doc = serde_json::to_value(&patch)
            .map_err(|e| CatalogError::Internal(format!("serialize patch: {e}")))?;
        let key_data = json!({ "id": id, "patch": patch_doc }).to_string();

        self.audited("update", key_data, self.repo.update(uuid, patch))
            .await
    }

    /// Exact-match lookup on the unique numeric code.
    pub async fn find_by_code(&self, code: i64) -> CatalogResult<Lookup<ApplicationEntity>> {
        let key_data = json!({ "code": code }).to_string();
        self.audited("findByCode", key_data, async {
            Ok(Lookup::from(self.repo.find_by_code(code).await?))
        })
        .await
    }

    /// Exact-match lookup on code AND the enabled flag.
    pub async fn find_by_code_and_enabled(
        &self,
        code: i64,
        enabled: bool,
    ) -> CatalogResult<Lookup<ApplicationEntity>> {
        let key_data = json!({ "code": code, "enabled": enabled }).to_string();
        self.audited("findByCodeAndEnabled", key_data, async {
            Ok(Lookup::from(
                self.repo.find_by_code_and_enabled(code, enabled).await?,
            ))
        })
        .await
    }

    async fn audited<T>(
        &self,
        name: &str,
        key_data: String,
        op: impl Future<Output = CatalogResult<T>>,
    ) -> CatalogResult<T> {
        self.dispatch(DocketEvent::operation(&self.ctx, name, key_data.clone()));
        match op.await {
            Ok(value) => Ok(value),
            Err(e) => {
                self.dispatch(
                    DocketEvent::operation(&self.ctx, name, key_data).failed(e.to_string()),
                );
                Err(e)
            }
        }
    }

    fn dispatch(&self, event: DocketEvent) {
        let sink = Arc::clone(&self.docket);
        tokio::spawn(async move {
            if let Err(e) = sink.post(event).await {
                warn!(error = %e, "docket event dropped");
            }
        });
    }
}
