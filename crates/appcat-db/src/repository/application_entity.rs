//! SurrealDB implementation of [`ApplicationEntityRepository`].

use appcat_core::error::{CatalogError, CatalogResult};
use appcat_core::models::application_entity::{
    ApplicationEntity, ApplicationEntityPatch, NewApplicationEntity,
};
use appcat_core::repository::{ApplicationEntityRepository, Filter, UpdateOutcome};
use appcat_core::schema::RecordSchema;
use appcat_core::validate;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbError;
use crate::repository::application::filter_clause;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct EntityRow {
    tenant_id: String,
    code: i64,
    application_id: i64,
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
struct EntityRowWithId {
    record_id: String,
    tenant_id: String,
    code: i64,
    application_id: i64,
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

impl EntityRow {
    fn into_entity(self, id: Uuid) -> ApplicationEntity {
        ApplicationEntity {
            id,
            tenant_id: self.tenant_id,
            code: self.code,
            application_id: self.application_id,
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

impl EntityRowWithId {
    fn try_into_entity(self) -> Result<ApplicationEntity, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        Ok(ApplicationEntity {
            id,
            tenant_id: self.tenant_id,
            code: self.code,
            application_id: self.application_id,
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

/// SurrealDB implementation of the ApplicationEntity repository.
#[derive(Clone)]
pub struct SurrealApplicationEntityRepository<C: Connection> {
    db: Surreal<C>,
    schema: RecordSchema,
}

impl<C: Connection> SurrealApplicationEntityRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self {
            db,
            schema: RecordSchema::application_entity(),
        }
    }

    async fn fetch_row(&self, id: Uuid) -> CatalogResult<Option<EntityRow>> {
        let mut result = self
            .db
            .query("SELECT * FROM type::record('application_entity', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<EntityRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.into_iter().next())
    }

    async fn find_first(
        &self,
        where_clause: &str,
        binds: Vec<(&'static str, serde_json::Value)>,
    ) -> CatalogResult<Option<ApplicationEntity>> {
        let query =
            format!("SELECT {WITH_ID_PROJECTION} FROM application_entity WHERE {where_clause}");
        let mut builder = self.db.query(&query);
        for (name, value) in binds {
            builder = builder.bind((name, value));
        }
        let mut result = builder.await.map_err(DbError::from)?;

        let rows: Vec<EntityRowWithId> = result.take(0).map_err(DbError::from)?;
        rows.into_iter()
            .next()
            .map(|row| row.try_into_entity().map_err(CatalogError::from))
            .transpose()
    }
}

impl<C: Connection> ApplicationEntityRepository for SurrealApplicationEntityRepository<C> {
    async fn save(&self, input: NewApplicationEntity) -> CatalogResult<ApplicationEntity> {
        let doc = serde_json::to_value(&input)
            .map_err(|e| CatalogError::Internal(format!("serialize candidate: {e}")))?;
        validate::validate(&doc, &self.schema)?;

        let id = Uuid::new_v4();
        let enabled = input.enabled.unwrap_or(true);

        let result = self
            .db
            .query(
                "CREATE type::record('application_entity', $id) SET \
                 tenant_id = $tenant_id, \
                 code = $code, \
                 application_id = $application_id, \
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
            .bind(("code", input.code))
            .bind(("application_id", input.application_id))
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

        let rows: Vec<EntityRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| CatalogError::Store("create returned no record".into()))?;

        debug!(%id, code = row.code, "application entity saved");
        Ok(row.into_entity(id))
    }

    async fn find_by_id(&self, id: Uuid) -> CatalogResult<Option<ApplicationEntity>> {
        Ok(self.fetch_row(id).await?.map(|row| row.into_entity(id)))
    }

    async fn find_by_code(&self, code: i64) -> CatalogResult<Option<ApplicationEntity>> {
        self.find_first("code = $code", vec![("code", serde_json::Value::from(code))])
            .await
    }

    async fn find_by_code_and_enabled(
        &self,
        code: i64,
        enabled: bool,
    ) -> CatalogResult<Option<ApplicationEntity>> {
        self.find_first(
            "code = $code AND enabled = $enabled",
            vec![
                ("code", serde_json::Value::from(code)),
                ("enabled", serde_json::Value::from(enabled)),
            ],
        )
        .await
    }

    async fn find_one(&self, filter: &Filter) -> CatalogResult<Option<ApplicationEntity>> {
        let (clause, binds) = filter_clause(filter, &self.schema)?;
        let query =
            format!("SELECT {WITH_ID_PROJECTION} FROM application_entity WHERE {clause} LIMIT 1");
        let mut builder = self.db.query(&query);
        for (name, value) in binds {
            builder = builder.bind((name, value));
        }
        let mut result = builder.await.map_err(DbError::from)?;

        let rows: Vec<EntityRowWithId> = result.take(0).map_err(DbError::from)?;
        rows.into_iter()
            .next()
            .map(|row| row.try_into_entity().map_err(CatalogError::from))
            .transpose()
    }

    async fn find_all(&self, limit: i64) -> CatalogResult<Vec<ApplicationEntity>> {
        let mut result = if limit < 1 {
            self.db
                .query(format!("SELECT {WITH_ID_PROJECTION} FROM application_entity"))
                .await
                .map_err(DbError::from)?
        } else {
            self.db
                .query(format!(
                    "SELECT {WITH_ID_PROJECTION} FROM application_entity LIMIT $limit"
                ))
                .bind(("limit", limit))
                .await
                .map_err(DbError::from)?
        };

        let rows: Vec<EntityRowWithId> = result.take(0).map_err(DbError::from)?;
        rows.into_iter()
            .map(|row| row.try_into_entity().map_err(CatalogError::from))
            .collect()
    }

    async fn update(
        &self,
        id: Uuid,
        patch: ApplicationEntityPatch,
    ) -> CatalogResult<UpdateOutcome> {
        let current = self.fetch_row(id).await?.ok_or_else(|| CatalogError::NotFound {
            entity: self.schema.entity.to_string(),
            id: id.to_string(),
        })?;

        let doc = serde_json::to_value(&patch)
            .map_err(|e| CatalogError::Internal(format!("serialize patch: {e}")))?;
        validate::validate_patch(&doc, &self.schema)?;

        let mut sets = Vec::new();
        if differs(&patch.tenant_id, &current.tenant_id) {
            sets.push("tenant_id = $tenant_id");
        }
        if patch.code.is_some_and(|c| c != current.code) {
            sets.push("code = $code");
        }
        if patch
            .application_id
            .is_some_and(|a| a != current.application_id)
        {
            sets.push("application_id = $application_id");
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
            "UPDATE type::record('application_entity', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id.to_string()));
        if let Some(tenant_id) = patch.tenant_id {
            builder = builder.bind(("tenant_id", tenant_id));
        }
        if let Some(code) = patch.code {
            builder = builder.bind(("code", code));
        }
        if let Some(application_id) = patch.application_id {
            builder = builder.bind(("application_id", application_id));
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

        debug!(%id, "application entity updated");
        Ok(UpdateOutcome {
            matched: 1,
            modified: 1,
        })
    }

    async fn delete_all(&self) -> CatalogResult<u64> {
        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM application_entity GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        self.db
            .query("DELETE application_entity")
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
