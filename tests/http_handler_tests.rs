#![cfg(feature = "http-server")]
//! Handler-level tests for the HTTP API against the local repository.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{Request, StatusCode};
use chrono::{Duration, Utc};
use tower::ServiceExt;

use ecocollect_rust::api::{BinId, UserId};
use ecocollect_rust::db::repositories::LocalRepository;
use ecocollect_rust::db::repository::{
    DirectoryRepository, FullRepository, ScheduleRepository,
};
use ecocollect_rust::http::error::AppError;
use ecocollect_rust::http::{create_router, handlers, AppState};
use ecocollect_rust::models::{Bin, NewSchedule, ScheduleStatus, User};

fn make_state() -> (Arc<LocalRepository>, AppState) {
    let repo = Arc::new(LocalRepository::new());
    let state = AppState::new(repo.clone() as Arc<dyn FullRepository>);
    (repo, state)
}

async fn seed_user_with_bin(repo: &LocalRepository) {
    repo.upsert_user(&User {
        id: UserId::new("u1"),
        display_name: "Ada".to_string(),
        address: "1 Main Street".to_string(),
        zone: Some("A".to_string()),
    })
    .await
    .unwrap();
    repo.upsert_bin(&Bin {
        id: BinId::new("b1"),
        user_id: UserId::new("u1"),
        code: "BIN-b1".to_string(),
        category: "organic".to_string(),
        active: true,
    })
    .await
    .unwrap();
    repo.insert_schedule(&NewSchedule {
        zone: "A".to_string(),
        date: Utc::now() + Duration::days(2),
        status: ScheduleStatus::Active,
        waste_types: vec!["organic".to_string()],
        time_ranges: vec![],
        total_slots: 10,
        available_slots: 10,
        collector_name: "GreenFleet".to_string(),
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn test_health_handler_reports_connected_store() {
    let (_repo, state) = make_state();
    let response = handlers::health_check(State(state)).await.unwrap();
    assert_eq!(response.0.status, "ok");
    assert_eq!(response.0.database, "connected");
}

#[tokio::test]
async fn test_health_endpoint_over_router() {
    let (_repo, state) = make_state();
    let app = create_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_get_pickups_handler() {
    let (repo, state) = make_state();
    seed_user_with_bin(&repo).await;

    let response = handlers::get_upcoming_pickups(State(state), Path("u1".to_string()))
        .await
        .unwrap();
    assert_eq!(response.0.total, 1);
    assert!(response.0.pickups[0].has_pickup);
}

#[tokio::test]
async fn test_refresh_handler_reports_outcome() {
    let (repo, state) = make_state();
    seed_user_with_bin(&repo).await;

    let response = handlers::refresh_pickups(State(state.clone()), Path("u1".to_string()))
        .await
        .unwrap();
    assert!(response.0.success);
    assert_eq!(response.0.added, 1);

    // Second run is a no-op
    let response = handlers::refresh_pickups(State(state), Path("u1".to_string()))
        .await
        .unwrap();
    assert_eq!(response.0.added, 0);
    assert_eq!(response.0.removed, 0);
}

#[tokio::test]
async fn test_refresh_handler_encodes_failure_in_body() {
    let (repo, state) = make_state();
    // User with a bin but no zone
    repo.upsert_user(&User {
        id: UserId::new("u1"),
        display_name: "Ada".to_string(),
        address: "1 Main Street".to_string(),
        zone: None,
    })
    .await
    .unwrap();
    repo.upsert_bin(&Bin {
        id: BinId::new("b1"),
        user_id: UserId::new("u1"),
        code: "BIN-b1".to_string(),
        category: "organic".to_string(),
        active: true,
    })
    .await
    .unwrap();

    let response = handlers::refresh_pickups(State(state), Path("u1".to_string()))
        .await
        .unwrap();
    assert!(!response.0.success);
    assert!(response.0.error.is_some());
}

#[tokio::test]
async fn test_zone_schedules_handler() {
    let (repo, state) = make_state();
    seed_user_with_bin(&repo).await;

    let response = handlers::list_zone_schedules(State(state), Path("A".to_string()))
        .await
        .unwrap();
    assert_eq!(response.0.zone, "A");
    assert_eq!(response.0.total, 1);
}

#[tokio::test]
async fn test_stop_stream_rejects_unknown_schedule() {
    let (_repo, state) = make_state();

    let result =
        handlers::stream_schedule_stops(State(state), Path("missing".to_string())).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}
