//! Migration and storage-level schema enforcement tests against
//! in-memory SurrealDB.

use appcat_core::models::application::NewApplication;
use appcat_core::repository::ApplicationRepository;
use appcat_db::repository::SurrealApplicationRepository;
use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

async fn setup() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    db
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let db = setup().await;
    appcat_db::run_migrations(&db).await.unwrap();
    appcat_db::run_migrations(&db).await.unwrap();

    // The catalog tables exist and accept a valid record.
    let repo = SurrealApplicationRepository::new(db);
    let app = repo
        .save(NewApplication {
            tenant_id: "IVL".into(),
            application_code: "CDA".into(),
            application_name: "FLUX CDA".into(),
            enabled: None,
            description: None,
            logo: None,
            favicon: None,
            created_by: "Kavya".into(),
            created_date: Utc::now(),
        })
        .await
        .unwrap();
    assert_eq!(app.application_code, "CDA");
}

#[tokio::test]
async fn store_rejects_documents_that_bypass_the_gate() {
    let db = setup().await;
    appcat_db::run_migrations(&db).await.unwrap();

    // Writing directly against the table, below the validation gate: the
    // SCHEMAFULL length ASSERT still rejects an over-long tenant id.
    let result = db
        .query(
            "CREATE application SET \
             tenant_id = $tenant_id, \
             application_code = 'XYZ', \
             application_name = 'Direct Write', \
             created_by = 'nobody', \
             created_date = time::now()",
        )
        .bind(("tenant_id", "x".repeat(65)))
        .await
        .unwrap()
        .check();

    assert!(result.is_err(), "expected the store to reject the document");
}
