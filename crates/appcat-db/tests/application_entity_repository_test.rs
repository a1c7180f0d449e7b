//! Integration tests for the ApplicationEntity repository implementation
//! using in-memory SurrealDB.

use appcat_core::error::CatalogError;
use appcat_core::models::application_entity::{ApplicationEntityPatch, NewApplicationEntity};
use appcat_core::repository::{ApplicationEntityRepository, Filter};
use appcat_db::repository::SurrealApplicationEntityRepository;
use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

async fn setup() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    appcat_db::run_migrations(&db).await.unwrap();
    db
}

fn new_entity(code: i64, name: &str) -> NewApplicationEntity {
    NewApplicationEntity {
        tenant_id: "IVL".into(),
        code,
        application_id: 1,
        application_name: name.into(),
        enabled: None,
        description: None,
        logo: None,
        favicon: None,
        created_by: "Srihari".into(),
        created_date: Utc::now(),
    }
}

#[tokio::test]
async fn save_and_find_by_numeric_code() {
    let db = setup().await;
    let repo = SurrealApplicationEntityRepository::new(db);

    let entity = repo.save(new_entity(42, "Docket")).await.unwrap();
    assert_eq!(entity.code, 42);
    assert_eq!(entity.application_id, 1);
    assert!(entity.enabled);

    let fetched = repo.find_by_code(42).await.unwrap().unwrap();
    assert_eq!(fetched.id, entity.id);

    assert!(repo.find_by_code(43).await.unwrap().is_none());
}

#[tokio::test]
async fn numeric_code_is_unique() {
    let db = setup().await;
    let repo = SurrealApplicationEntityRepository::new(db);

    repo.save(new_entity(7, "Docket")).await.unwrap();
    let err = repo.save(new_entity(7, "Sprint")).await.unwrap_err();
    assert!(matches!(err, CatalogError::Store(_)));

    let first = repo.find_by_code(7).await.unwrap().unwrap();
    assert_eq!(first.application_name, "Docket");
}

#[tokio::test]
async fn find_by_code_and_enabled_filters_disabled_records() {
    let db = setup().await;
    let repo = SurrealApplicationEntityRepository::new(db);

    let mut disabled = new_entity(9, "Dormant");
    disabled.enabled = Some(false);
    repo.save(disabled).await.unwrap();

    assert!(
        repo.find_by_code_and_enabled(9, true)
            .await
            .unwrap()
            .is_none()
    );
    assert!(
        repo.find_by_code_and_enabled(9, false)
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test]
async fn find_one_supports_integer_equality() {
    let db = setup().await;
    let repo = SurrealApplicationEntityRepository::new(db);

    repo.save(new_entity(1, "Docket")).await.unwrap();
    repo.save(new_entity(2, "Sprint")).await.unwrap();

    let hit = repo
        .find_one(&Filter::new().eq("application_id", 1).eq("code", 2))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(hit.application_name, "Sprint");
}

#[tokio::test]
async fn update_changes_and_noop_detection() {
    let db = setup().await;
    let repo = SurrealApplicationEntityRepository::new(db);

    let entity = repo.save(new_entity(5, "Docket")).await.unwrap();

    let outcome = repo
        .update(
            entity.id,
            ApplicationEntityPatch {
                application_name: Some("Docket Two".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(outcome.modified >= 1);

    let err = repo
        .update(
            entity.id,
            ApplicationEntityPatch {
                application_name: Some("Docket Two".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::NoOpUpdate { .. }));
}

#[tokio::test]
async fn find_all_limit_semantics() {
    let db = setup().await;
    let repo = SurrealApplicationEntityRepository::new(db);

    for i in 0..4 {
        repo.save(new_entity(i, &format!("Entity {i}"))).await.unwrap();
    }

    assert_eq!(repo.find_all(2).await.unwrap().len(), 2);
    assert_eq!(repo.find_all(-1).await.unwrap().len(), 4);

    let removed = repo.delete_all().await.unwrap();
    assert_eq!(removed, 4);
    assert!(repo.find_all(0).await.unwrap().is_empty());
}
