//! Facade integration tests: validation, audit emission and persistence
//! against in-memory SurrealDB.

use std::time::Duration;

use appcat_core::docket::{DocketError, DocketSink};
use appcat_core::error::CatalogError;
use appcat_core::models::application::{ApplicationPatch, NewApplication};
use appcat_core::models::docket::{DocketContext, DocketEvent, DocketStatus};
use appcat_core::repository::Filter;
use appcat_db::repository::SurrealApplicationRepository;
use appcat_service::{ApplicationService, MemoryDocketSink};
use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

fn ctx() -> DocketContext {
    DocketContext {
        application: "PLATFORM".into(),
        source: "application".into(),
        created_by: "SYSTEM".into(),
        ip_address: "127.0.0.1".into(),
    }
}

async fn setup() -> (
    ApplicationService<SurrealApplicationRepository<Db>, MemoryDocketSink>,
    MemoryDocketSink,
) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    appcat_db::run_migrations(&db).await.unwrap();

    let sink = MemoryDocketSink::new();
    let service = ApplicationService::new(
        SurrealApplicationRepository::new(db),
        sink.clone(),
        ctx(),
    );
    (service, sink)
}

fn new_app(code: &str, name: &str) -> NewApplication {
    NewApplication {
        tenant_id: "IVL".into(),
        application_code: code.into(),
        application_name: name.into(),
        enabled: None,
        description: None,
        logo: None,
        favicon: None,
        created_by: "Kavya".into(),
        created_date: Utc::now(),
    }
}

/// Let the spawned fire-and-forget dispatches run.
async fn drain() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}

// -----------------------------------------------------------------------
// End-to-end lifecycle
// -----------------------------------------------------------------------

#[tokio::test]
async fn save_find_update_lifecycle() {
    let (service, _sink) = setup().await;

    let saved = service.save(new_app("CDA", "FLUX CDA")).await.unwrap();

    let found = service.find_by_code("CDA").await.unwrap();
    assert_eq!(found.found().unwrap().id, saved.id);

    let outcome = service
        .update(
            &saved.id.to_string(),
            ApplicationPatch {
                application_name: Some("FLUX CDA 2".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(outcome.modified >= 1);

    let all = service.get_all(0).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].application_name, "FLUX CDA 2");
    assert_eq!(all[0].created_by, saved.created_by);
    assert_eq!(all[0].created_date, saved.created_date);
}

// -----------------------------------------------------------------------
// save
// -----------------------------------------------------------------------

#[tokio::test]
async fn invalid_save_reports_every_violation_and_never_persists() {
    let (service, sink) = setup().await;

    let mut input = new_app("ab", "FLUX CDA");
    input.tenant_id = String::new();

    let err = service.save(input).await.unwrap_err();
    let CatalogError::Validation(violations) = err else {
        panic!("expected validation error");
    };
    let fields: Vec<_> = violations.iter().map(|v| v.field.as_str()).collect();
    assert_eq!(fields, vec!["tenant_id", "application_code"]);

    assert!(service.get_all(0).await.unwrap().is_empty());

    drain().await;
    let failures: Vec<DocketEvent> = sink
        .events()
        .into_iter()
        .filter(|e| e.status == DocketStatus::Failure)
        .collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].name, "save");
    assert!(failures[0].details.contains("tenant_id"));
}

#[tokio::test]
async fn duplicate_code_surfaces_store_error() {
    let (service, _sink) = setup().await;

    service.save(new_app("CDA", "FLUX CDA")).await.unwrap();
    let err = service.save(new_app("CDA", "Other")).await.unwrap_err();
    assert!(matches!(err, CatalogError::Store(_)));
}

// -----------------------------------------------------------------------
// Lookups and sentinels
// -----------------------------------------------------------------------

#[tokio::test]
async fn lookup_miss_renders_as_empty_document() {
    let (service, _sink) = setup().await;

    let by_code = service.find_by_code("NOPE").await.unwrap();
    assert!(!by_code.is_found());
    assert_eq!(serde_json::to_value(&by_code).unwrap(), serde_json::json!({}));

    // Same convention for a well-formed but absent primary key.
    let by_id = service.get_by_id(&Uuid::new_v4().to_string()).await.unwrap();
    assert!(!by_id.is_found());
    assert_eq!(serde_json::to_value(&by_id).unwrap(), serde_json::json!({}));
}

#[tokio::test]
async fn malformed_id_rejects_without_audit() {
    let (service, sink) = setup().await;

    let err = service.get_by_id("not-a-uuid").await.unwrap_err();
    assert!(matches!(err, CatalogError::MalformedId { .. }));

    let err = service.get_by_id("").await.unwrap_err();
    assert!(matches!(err, CatalogError::InvalidArgument { .. }));

    let err = service
        .update(
            "12345",
            ApplicationPatch {
                application_name: Some("x".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::MalformedId { .. }));

    drain().await;
    assert!(
        sink.events().is_empty(),
        "argument-contract violations must not emit audit events"
    );
}

#[tokio::test]
async fn empty_code_is_an_invalid_argument() {
    let (service, sink) = setup().await;

    let err = service.find_by_code("").await.unwrap_err();
    assert!(matches!(err, CatalogError::InvalidArgument { .. }));

    let err = service.find_by_code_and_enabled(" ", true).await.unwrap_err();
    assert!(matches!(err, CatalogError::InvalidArgument { .. }));

    drain().await;
    assert!(sink.events().is_empty());
}

#[tokio::test]
async fn get_one_filters_by_arbitrary_schema_fields() {
    let (service, _sink) = setup().await;

    service.save(new_app("CDA", "FLUX CDA")).await.unwrap();
    service.save(new_app("RTP", "FLUX RTP")).await.unwrap();

    let hit = service
        .get_one(&Filter::new().eq("application_name", "FLUX RTP"))
        .await
        .unwrap();
    assert_eq!(hit.found().unwrap().application_code, "RTP");

    let err = service
        .get_one(&Filter::new().eq("colour", "blue"))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::InvalidArgument { .. }));

    let err = service.get_one(&Filter::new()).await.unwrap_err();
    assert!(matches!(err, CatalogError::InvalidArgument { .. }));
}

#[tokio::test]
async fn find_by_code_and_enabled_respects_both_attributes() {
    let (service, _sink) = setup().await;

    let mut disabled = new_app("OFF", "Dormant");
    disabled.enabled = Some(false);
    service.save(disabled).await.unwrap();

    assert!(
        !service
            .find_by_code_and_enabled("OFF", true)
            .await
            .unwrap()
            .is_found()
    );
    assert!(
        service
            .find_by_code_and_enabled("OFF", false)
            .await
            .unwrap()
            .is_found()
    );
}

// -----------------------------------------------------------------------
// update
// -----------------------------------------------------------------------

#[tokio::test]
async fn update_contract_rejections() {
    let (service, _sink) = setup().await;

    let saved = service.save(new_app("CDA", "FLUX CDA")).await.unwrap();
    let id = saved.id.to_string();

    // Empty patch cannot change anything.
    let err = service.update(&id, ApplicationPatch::default()).await.unwrap_err();
    assert!(matches!(err, CatalogError::InvalidArgument { .. }));

    // Patch reproducing current values is a distinct no-op rejection.
    let err = service
        .update(
            &id,
            ApplicationPatch {
                application_name: Some("FLUX CDA".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::NoOpUpdate { .. }));

    // Unknown id is not-found, not a no-op.
    let err = service
        .update(
            &Uuid::new_v4().to_string(),
            ApplicationPatch {
                application_name: Some("New Name".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::NotFound { .. }));
}

// -----------------------------------------------------------------------
// get_all
// -----------------------------------------------------------------------

#[tokio::test]
async fn get_all_limit_semantics() {
    let (service, _sink) = setup().await;

    assert!(service.get_all(0).await.unwrap().is_empty());

    for i in 0..5 {
        service
            .save(new_app(&format!("AP{i}"), &format!("App {i}")))
            .await
            .unwrap();
    }

    assert_eq!(service.get_all(3).await.unwrap().len(), 3);
    assert_eq!(service.get_all(0).await.unwrap().len(), 5);
    assert_eq!(service.get_all(-7).await.unwrap().len(), 5);
}

// -----------------------------------------------------------------------
// Docket emission
// -----------------------------------------------------------------------

#[tokio::test]
async fn successful_calls_emit_one_success_event_each() {
    let (service, sink) = setup().await;

    service.save(new_app("CDA", "FLUX CDA")).await.unwrap();
    service.find_by_code("CDA").await.unwrap();
    service.get_all(0).await.unwrap();

    drain().await;
    let events = sink.events();
    assert_eq!(events.len(), 3);
    assert!(events.iter().all(|e| e.status == DocketStatus::Success));

    let names: Vec<_> = events.iter().map(|e| e.name.as_str()).collect();
    assert!(names.contains(&"save"));
    assert!(names.contains(&"findByCode"));
    assert!(names.contains(&"getAll"));

    // Context travels on every event.
    assert!(events.iter().all(|e| e.application == "PLATFORM"));
    assert!(events.iter().all(|e| e.created_by == "SYSTEM"));
}

#[tokio::test]
async fn failed_delegate_appends_a_failure_event() {
    let (service, sink) = setup().await;

    let saved = service.save(new_app("CDA", "FLUX CDA")).await.unwrap();
    let _ = service
        .update(
            &saved.id.to_string(),
            ApplicationPatch {
                application_name: Some("FLUX CDA".into()), // no-op
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    drain().await;
    let update_events: Vec<DocketEvent> = sink
        .events()
        .into_iter()
        .filter(|e| e.name == "update")
        .collect();
    assert_eq!(update_events.len(), 2);
    assert_eq!(update_events[0].status, DocketStatus::Success);
    assert_eq!(update_events[1].status, DocketStatus::Failure);
    assert!(update_events[1].details.contains("does not change"));
}

/// A sink that always fails.
#[derive(Clone, Copy)]
struct FailingSink;

impl DocketSink for FailingSink {
    async fn post(&self, _event: DocketEvent) -> Result<(), DocketError> {
        Err(DocketError("docket unreachable".into()))
    }
}

#[tokio::test]
async fn failing_sink_never_gates_the_primary_operation() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    appcat_db::run_migrations(&db).await.unwrap();

    let service = ApplicationService::new(
        SurrealApplicationRepository::new(db),
        FailingSink,
        ctx(),
    );

    let saved = service.save(new_app("CDA", "FLUX CDA")).await.unwrap();
    assert_eq!(saved.application_code, "CDA");

    let found = service.find_by_code("CDA").await.unwrap();
    assert!(found.is_found());
}
