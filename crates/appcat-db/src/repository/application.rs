//! SurrealDB implementation of [`ApplicationRepository`].

use appcat_core::error::{CatalogError, CatalogResult};
use appcat_core::models::application::{Application, ApplicationPatch, NewApplication};
use appcat_core::repository::{ApplicationRepository, Filter, UpdateOutcome};
use appcat_core::schema::{CodePreset, RecordSchema};
use appcat_core::validate;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct ApplicationRow {
    tenant_id: String,
    application_code: String,
    application_name: String,
    enabled: bool,
    description: Option<String>,
    logo: Option<String>,
    favicon: Option<String>,
    created_by: String,
    created_date: DateTime<Utc>,
    updated_by: Option<String>,
    updated_date: Option<DateTime<Utc>>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct ApplicationRowWithId {
    record_id: String,
    tenant_id: String,
    application_code: String,
    application_name: String,
    enabled: bool,
    description: Option<String>,
    logo: Option<String>,
    favicon: Option<String>,
    created_by: String,
    created_date: DateTime<Utc>,
    updated_by: Option<String>,
    updated_date: Option<DateTime<Utc>>,
}

impl ApplicationRow {
    fn into_application(self, id: Uuid) -> Application {
        Application {
            id,
            tenant_id: self.tenant_id,
            application_code: self.application_code,
            application_name: self.application_name,
            enabled: self.enabled,
            description: self.description,
            logo: self.logo,
            favicon: self.favicon,
            created_by: self.created_by,
            created_date: self.created_date,
            updated_by: self.updated_by,
            updated_date: self.updated_date,
        }
    }
}

impl ApplicationRowWithId {
    fn try_into_application(self) -> Result<Application, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        Ok(Application {
            id,
            tenant_id: self.tenant_id,
            application_code: self.application_code,
            application_name: self.application_name,
            enabled: self.enabled,
            description: self.description,
            logo: self.logo,
            favicon: self.favicon,
            created_by: self.created_by,
            created_date: self.created_date,
            updated_by: self.updated_by,
            updated_date: self.updated_date,
        })
    }
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

const WITH_ID_PROJECTION: &str = "meta::id(id) AS record_id, *";

/// SurrealDB implementation of the Application repository.
#[derive(Clone)]
pub struct SurrealApplicationRepository<C: Connection> {
    db: Surreal<C>,
    schema: RecordSchema,
}

impl<C: Connection> SurrealApplicationRepository<C> {
    /// Repository with the `Standard` code preset (3–20 character codes).
    pub fn new(db: Surreal<C>) -> Self {
        Self::with_preset(db, CodePreset::Standard)
    }

    /// Repository with an explicitly chosen code preset.
    pub fn with_preset(db: Surreal<C>, preset: CodePreset) -> Self {
        Self {
            db,
            schema: RecordSchema::application(preset),
        }
    }

    async fn fetch_row(&self, id: Uuid) -> CatalogResult<Option<ApplicationRow>> {
        let mut result = self
            .db
            .query("SELECT * FROM type::record('application', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ApplicationRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.into_iter().next())
    }

    async fn find_first(
        &self,
        where_clause: &str,
        binds: Vec<(&'static str, serde_json::Value)>,
    ) -> CatalogResult<Option<Application>> {
        let query = format!("SELECT {WITH_ID_PROJECTION} FROM application WHERE {where_clause}");
        let mut builder = self.db.query(&query);
        for (name, value) in binds {
            builder = builder.bind((name, value));
        }
        let mut result = builder.await.map_err(DbError::from)?;

        let rows: Vec<ApplicationRowWithId> = result.take(0).map_err(DbError::from)?;
        rows.into_iter()
            .next()
            .map(|row| row.try_into_application().map_err(CatalogError::from))
            .transpose()
    }
}

impl<C: Connection> ApplicationRepository for SurrealApplicationRepository<C> {
    async fn save(&self, input: NewApplication) -> CatalogResult<Application> {
        // Schema-level validation again at the storage boundary; the
        // store's own SCHEMAFULL checks and the UNIQUE code index are the
        // final arbiter (concurrent duplicate saves lose there).
        let doc = serde_json::to_value(&input)
            .map_err(|e| CatalogError::Internal(format!("serialize candidate: {e}")))?;
        validate::validate(&doc, &self.schema)?;

        let id = Uuid::new_v4();
        let enabled = input.enabled.unwrap_or(true);

        let result = self
            .db
            .query(
                "CREATE type::record('application', $id) SET \
                 tenant_id = $tenant_id, \
                 application_code = $application_code, \
                 application_name = $application_name, \
                 enabled = $enabled, \
                 description = $description, \
                 logo = $logo, \
                 favicon = $favicon, \
                 created_by = $created_by, \
                 created_date = $created_date, \
                 updated_by = NONE, \
                 updated_date = NONE",
            )
            .bind(("id", id.to_string()))
            .bind(("tenant_id", input.tenant_id))
            .bind(("application_code", input.application_code))
            .bind(("application_name", input.application_name))
            .bind(("enabled", enabled))
            .bind(("description", input.description))
            .bind(("logo", input.logo))
            .bind(("favicon", input.favicon))
            .bind(("created_by", input.created_by))
            .bind(("created_date", input.created_date))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<ApplicationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| CatalogError::Store("create returned no record".into()))?;

        debug!(%id, code = %row.application_code, "application saved");
        Ok(row.into_application(id))
    }

    async fn find_by_id(&self, id: Uuid) -> CatalogResult<Option<Application>> {
        Ok(self
            .fetch_row(id)
            .await?
            .map(|row| row.into_application(id)))
    }

    async fn find_by_code(&self, code: &str) -> CatalogResult<Option<Application>> {
        self.find_first(
            "application_code = $code",
            vec![("code", serde_json::Value::from(code))],
        )
        .await
    }

    async fn find_by_code_and_enabled(
        &self,
        code: &str,
        enabled: bool,
    ) -> CatalogResult<Option<Application>> {
        self.find_first(
            "application_code = $code AND enabled = $enabled",
            vec![
                ("code", serde_json::Value::from(code)),
                ("enabled", serde_json::Value::from(enabled)),
            ],
        )
        .await
    }

    async fn find_one(&self, filter: &Filter) -> CatalogResult<Option<Application>> {
        let (clause, binds) = filter_clause(filter, &self.schema)?;
        let query =
            format!("SELECT {WITH_ID_PROJECTION} FROM application WHERE {clause} LIMIT 1");
        let mut builder = self.db.query(&query);
        for (name, value) in binds {
            builder = builder.bind((name, value));
        }
        let mut result = builder.await.map_err(DbError::from)?;

        let rows: Vec<ApplicationRowWithId> = result.take(0).map_err(DbError::from)?;
        rows.into_iter()
            .next()
            .map(|row| row.try_into_application().map_err(CatalogError::from))
            .transpose()
    }

    async fn find_all(&self, limit: i64) -> CatalogResult<Vec<Application>> {
        let mut result = if limit < 1 {
            self.db
                .query(format!("SELECT {WITH_ID_PROJECTION} FROM application"))
                .await
                .map_err(DbError::from)?
        } else {
            self.db
                .query(format!(
                    "SELECT {WITH_ID_PROJECTION} FROM application LIMIT $limit"
                ))
                .bind(("limit", limit))
                .await
                .map_err(DbError::from)?
        };

        let rows: Vec<ApplicationRowWithId> = result.take(0).map_err(DbError::from)?;
        rows.into_iter()
            .map(|row| row.try_into_application().map_err(CatalogError::from))
            .collect()
    }

    async fn update(&self, id: Uuid, patch: ApplicationPatch) -> CatalogResult<UpdateOutcome> {
        let current = self.fetch_row(id).await?.ok_or_else(|| CatalogError::NotFound {
            entity: self.schema.entity.to_string(),
            id: id.to_string(),
        })?;

        let doc = serde_json::to_value(&patch)
            .map_err(|e| CatalogError::Internal(format!("serialize patch: {e}")))?;
        validate::validate_patch(&doc, &self.schema)?;

        // Field-level merge: only fields present in the patch overwrite,
        // and only those whose stored value actually changes are written.
        let mut sets = Vec::new();
        if differs(&patch.tenant_id, &current.tenant_id) {
            sets.push("tenant_id = $tenant_id");
        }
        if differs(&patch.application_code, &current.application_code) {
            sets.push("application_code = $application_code");
        }
        if differs(&patch.application_name, &current.application_name) {
            sets.push("application_name = $application_name");
        }
        if patch.enabled.is_some_and(|e| e != current.enabled) {
            sets.push("enabled = $enabled");
        }
        if differs_opt(&patch.description, &current.description) {
            sets.push("description = $description");
        }
        if differs_opt(&patch.logo, &current.logo) {
            sets.push("logo = $logo");
        }
        if differs_opt(&patch.favicon, &current.favicon) {
            sets.push("favicon = $favicon");
        }

        if sets.is_empty() {
            return Err(CatalogError::NoOpUpdate {
                entity: self.schema.entity.to_string(),
                id: id.to_string(),
            });
        }

        sets.push("updated_by = $updated_by");
        sets.push("updated_date = time::now()");

        let query = format!(
            "UPDATE type::record('application', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id.to_string()));
        if let Some(tenant_id) = patch.tenant_id {
            builder = builder.bind(("tenant_id", tenant_id));
        }
        if let Some(code) = patch.application_code {
            builder = builder.bind(("application_code", code));
        }
        if let Some(name) = patch.application_name {
            builder = builder.bind(("application_name", name));
        }
        if let Some(enabled) = patch.enabled {
            builder = builder.bind(("enabled", enabled));
        }
        if let Some(description) = patch.description {
            builder = builder.bind(("description", description));
        }
        if let Some(logo) = patch.logo {
            builder = builder.bind(("logo", logo));
        }
        if let Some(favicon) = patch.favicon {
            builder = builder.bind(("favicon", favicon));
        }
        builder = builder.bind(("updated_by", patch.updated_by));

        let result = builder.await.map_err(DbError::from)?;
        result.check().map_err(DbError::from)?;

        debug!(%id, "application updated");
        Ok(UpdateOutcome {
            matched: 1,
            modified: 1,
        })
    }

    async fn delete_all(&self) -> CatalogResult<u64> {
        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM application GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        self.db
            .query("DELETE application")
            .await
            .map_err(DbError::from)?;

        Ok(total)
    }
}

fn differs(patched: &Option<String>, current: &str) -> bool {
    patched.as_deref().is_some_and(|p| p != current)
}

fn differs_opt(patched: &Option<String>, current: &Option<String>) -> bool {
    patched.as_ref().is_some_and(|p| Some(p) != current.as_ref())
}

/// Translate a field-equality filter into a WHERE clause with binds.
///
/// Field names are checked against the schema before they are spliced
/// into the query text; values always travel as bind parameters.
pub(crate) fn filter_clause(
    filter: &Filter,
    schema: &RecordSchema,
) -> CatalogResult<(String, Vec<(&'static str, serde_json::Value)>)> {
    if filter.is_empty() {
        return Err(CatalogError::invalid_argument("query filter is empty"));
    }

    // Bind parameter names are static for the handful of clause slots the
    // filter surface allows.
    const SLOTS: [&str; 8] = ["f0", "f1", "f2", "f3", "f4", "f5", "f6", "f7"];
    if filter.clauses().len() > SLOTS.len() {
        return Err(CatalogError::invalid_argument(format!(
            "query filter supports at most {} clauses",
            SLOTS.len()
        )));
    }

    let mut parts = Vec::new();
    let mut binds = Vec::new();
    for (slot, (field, value)) in SLOTS.iter().zip(filter.clauses()) {
        if !schema.has_field(field) {
            return Err(CatalogError::invalid_argument(format!(
                "unknown query field: {field}"
            )));
        }
        parts.push(format!("{field} = ${slot}"));
        binds.push((*slot, value.clone()));
    }

    Ok((parts.join(" AND "), binds))
}
