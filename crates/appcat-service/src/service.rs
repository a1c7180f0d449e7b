//! Application facade: validation, persistence and docket orchestration.

use std::sync::Arc;

use appcat_core::docket::DocketSink;
use appcat_core::error::{CatalogError, CatalogResult};
use appcat_core::models::application::{Application, ApplicationPatch, NewApplication};
use appcat_core::models::docket::{DocketContext, DocketEvent};
use appcat_core::repository::{ApplicationRepository, Filter, Lookup, UpdateOutcome};
use appcat_core::schema::{CodePreset, RecordSchema};
use appcat_core::validate;
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

/// Public entry point for the Application record family.
///
/// Generic over the repository and docket sink implementations so the
/// facade has no dependency on the database crate. Every mutating or
/// query call forwards an audit event to the docket collaborator before
/// delegating, and a failure event when the delegate errs; dispatch is
/// fire-and-forget and never gates the primary result.
pub struct ApplicationService<R: ApplicationRepository, D: DocketSink + 'static> {
    repo: R,
    docket: Arc<D>,
    ctx: DocketContext,
    schema: RecordSchema,
}

impl<R: ApplicationRepository, D: DocketSink + 'static> ApplicationService<R, D> {
    /// Facade with the `Standard` code preset (3–20 character codes).
    pub fn new(repo: R, docket: D, ctx: DocketContext) -> Self {
        Self::with_preset(repo, docket, ctx, CodePreset::Standard)
    }

    /// Facade with an explicitly chosen code preset. The preset must
    /// match the one the repository was built with.
    pub fn with_preset(repo: R, docket: D, ctx: DocketContext, preset: CodePreset) -> Self {
        Self {
            repo,
            docket: Arc::new(docket),
            ctx,
            schema: RecordSchema::application(preset),
        }
    }

    /// Validate a candidate document against the declarative schema.
    ///
    /// Pure check; emits no audit event and touches no storage.
    pub fn validate(&self, candidate: &serde_json::Value) -> CatalogResult<()> {
        validate::validate(candidate, &self.schema)
    }

    /// Validate, audit and persist a new record.
    ///
    /// An invalid candidate is rejected with the complete violation list
    /// and never reaches the persistence layer.
    pub async fn save(&self, input: NewApplication) -> CatalogResult<Application> {
        let doc = serde_json::to_value(&input)
            .map_err(|e| CatalogError::Internal(format!("serialize candidate: {e}")))?;
        let key_data = doc.to_string();

        if let Err(e) = validate::validate(&doc, &self.schema) {
            self.dispatch(DocketEvent::operation(&self.ctx, "save", key_data).failed(e.to_string()));
            return Err(e);
        }

        self.audited("save", key_data, self.repo.save(input)).await
    }

    /// All records, up to `limit`; a limit below one returns everything.
    /// Ordering is storage-native and not to be relied on.
    pub async fn get_all(&self, limit: i64) -> CatalogResult<Vec<Application>> {
        let key_data = json!({ "limit": limit }).to_string();
        self.audited("getAll", key_data, self.repo.find_all(limit))
            .await
    }

    /// Point lookup by primary key. An absent record is a successful
    /// [`Lookup::Missing`] (rendered as `{}`); a malformed id rejects
    /// with `MalformedId`.
    pub async fn get_by_id(&self, id: &str) -> CatalogResult<Lookup<Application>> {
        let uuid = parse_id(id)?;
        let key_data = json!({ "id": id }).to_string();
        self.audited("getById", key_data, async {
            Ok(Lookup::from(self.repo.find_by_id(uuid).await?))
        })
        .await
    }

    /// First record matching a field-equality filter.
    pub async fn get_one(&self, filter: &Filter) -> CatalogResult<Lookup<Application>> {
        self.check_filter(filter)?;
        let key_data = filter_key_data(filter);
        self.audited("getOne", key_data, async {
            Ok(Lookup::from(self.repo.find_one(filter).await?))
        })
        .await
    }

    /// Partial update by id. Surfaces the adapter's `NotFound`,
    /// `NoOpUpdate`, `Validation` and `MalformedId` rejections unchanged.
    pub async fn update(&self, id: &str, patch: ApplicationPatch) -> CatalogResult<UpdateOutcome> {
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

    /// Exact-match lookup on the unique application code.
    pub async fn find_by_code(&self, code: &str) -> CatalogResult<Lookup<Application>> {
        if code.trim().is_empty() {
            return Err(CatalogError::invalid_argument(
                "code value must be a non-empty string",
            ));
        }
        let key_data = json!({ "application_code": code }).to_string();
        self.audited("findByCode", key_data, async {
            Ok(Lookup::from(self.repo.find_by_code(code).await?))
        })
        .await
    }

    /// Exact-match lookup on code AND the enabled flag.
    pub async fn find_by_code_and_enabled(
        &self,
        code: &str,
        enabled: bool,
    ) -> CatalogResult<Lookup<Application>> {
        if code.trim().is_empty() {
            return Err(CatalogError::invalid_argument(
                "code value must be a non-empty string",
            ));
        }
        let key_data = json!({ "application_code": code, "enabled": enabled }).to_string();
        self.audited("findByCodeAndEnabled", key_data, async {
            Ok(Lookup::from(
                self.repo.find_by_code_and_enabled(code, enabled).await?,
            ))
        })
        .await
    }

    fn check_filter(&self, filter: &Filter) -> CatalogResult<()> {
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
        Ok(())
    }

    /// Emit the pre-operation event, run the delegate, and append a
    /// failure event when it errs. The original error always surfaces.
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

    /// Fire-and-forget dispatch. A sink failure is logged and absorbed;
    /// it never rejects the primary operation.
    fn dispatch(&self, event: DocketEvent) {
        let sink = Arc::clone(&self.docket);
        tokio::spawn(async move {
            if let Err(e) = sink.post(event).await {
                warn!(error = %e, "docket event dropped");
            }
        });
    }
}

/// Parse a caller-supplied id string.
pub(crate) fn parse_id(id: &str) -> CatalogResult<Uuid> {
    if id.trim().is_empty() {
        return Err(CatalogError::invalid_argument("id must not be empty"));
    }
    Uuid::parse_str(id).map_err(|_| CatalogError::MalformedId {
        value: id.to_string(),
    })
}

/// Render the filter clauses as the audit key-data payload.
pub(crate) fn filter_key_data(filter: &Filter) -> String {
    let mut map = serde_json::Map::new();
    for (field, value) in filter.clauses() {
        map.insert(field.clone(), value.clone());
    }
    serde_json::Value::Object(map).to_string()
}
