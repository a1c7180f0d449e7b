//! Descriptor-driven schema DDL and migration runner for SurrealDB.
//!
//! Table definitions are generated from the declarative [`RecordSchema`]
//! descriptors, so the storage-level checks (SCHEMAFULL mode, length and
//! pattern ASSERTs, UNIQUE code index) enforce the same constraints the
//! in-process validation gate reports on. UUIDs are stored as strings.

use std::fmt::Write;

use appcat_core::schema::{CodePreset, FieldKind, FieldSpec, RecordSchema};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

// -----------------------------------------------------------------------
// DDL generation
// -----------------------------------------------------------------------

fn base_type(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Text => "string",
        FieldKind::Int => "int",
        FieldKind::Bool => "bool",
        FieldKind::DateTime => "datetime",
    }
}

fn assert_conditions(field: &FieldSpec) -> Vec<String> {
    let mut conditions = Vec::new();
    if let Some(min) = field.min_len {
        conditions.push(format!("string::len($value) >= {min}"));
    }
    if let Some(max) = field.max_len {
        conditions.push(format!("string::len($value) <= {max}"));
    }
    if let Some(pattern) = field.pattern {
        conditions.push(format!("string::matches($value, '{pattern}')"));
    }
    conditions
}

fn field_ddl(table: &str, field: &FieldSpec) -> String {
    // A field with a DDL default is always populated by the store, so it
    // does not need the option<> wrapper even when callers may omit it.
    let optional = !field.required && field.default.is_none();

    let mut ddl = format!("DEFINE FIELD {} ON TABLE {table} TYPE ", field.name);
    if optional {
        let _ = write!(ddl, "option<{}>", base_type(field.kind));
    } else {
        ddl.push_str(base_type(field.kind));
    }
    if let Some(default) = field.default {
        let _ = write!(ddl, " DEFAULT {default}");
    }

    let conditions = assert_conditions(field);
    if !conditions.is_empty() {
        let joined = conditions.join(" AND ");
        if optional {
            let _ = write!(ddl, " ASSERT $value = NONE OR ({joined})");
        } else {
            let _ = write!(ddl, " ASSERT {joined}");
        }
    }

    ddl.push(';');
    ddl
}

/// Generate the full DDL for one record table.
pub fn table_ddl(schema: &RecordSchema) -> String {
    let mut ddl = format!("DEFINE TABLE {} SCHEMAFULL;\n", schema.table);
    for field in &schema.fields {
        ddl.push_str(&field_ddl(schema.table, field));
        ddl.push('\n');
    }
    for field in schema.fields.iter().filter(|f| f.unique) {
        let _ = writeln!(
            ddl,
            "DEFINE INDEX idx_{}_{} ON TABLE {} COLUMNS {} UNIQUE;",
            schema.table, field.name, schema.table, field.name
        );
    }
    ddl
}

/// The record schemas the catalog persists by default.
pub fn default_schemas() -> Vec<RecordSchema> {
    vec![
        RecordSchema::application(CodePreset::Standard),
        RecordSchema::application_entity(),
    ]
}

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations with the default record schemas.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    run_migrations_with(db, &default_schemas()).await
}

/// Run all pending migrations for the given record schemas.
///
/// Creates a `_migration` tracking table on first run, then applies the
/// generated catalog DDL if the schema version is behind.
pub async fn run_migrations_with<C: Connection>(
    db: &Surreal<C>,
    schemas: &[RecordSchema],
) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    if current_version >= 1 {
        return Ok(());
    }

    let mut ddl = String::new();
    for schema in schemas {
        ddl.push_str(&table_ddl(schema));
    }

    info!(version = 1, "Applying migration: catalog_schema");
    db.query(&ddl)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    db.query("CREATE _migration SET version = 1, name = 'catalog_schema'")
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    Ok(())
}
