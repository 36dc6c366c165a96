//! Integration tests for the pickup lookup read path.

use chrono::{Duration, NaiveTime, Utc};
use ecocollect_rust::api::{BinId, ScheduleId, UserId};
use ecocollect_rust::db::repositories::LocalRepository;
use ecocollect_rust::db::repository::{
    DirectoryRepository, ScheduleRepository, StopRepository,
};
use ecocollect_rust::models::{
    Bin, NewSchedule, NewStop, ScheduleStatus, StopKind, StopStatus, TimeRange, User,
};
use ecocollect_rust::services::{upcoming_pickups, upcoming_schedules};

fn make_user(id: &str, zone: Option<&str>) -> User {
    User {
        id: UserId::new(id),
        display_name: format!("User {}", id),
        address: "7 Harbor Street".to_string(),
        zone: zone.map(str::to_string),
    }
}

fn make_bin(id: &str, user_id: &str, category: &str) -> Bin {
    Bin {
        id: BinId::new(id),
        user_id: UserId::new(user_id),
        code: format!("BIN-{}", id),
        category: category.to_string(),
        active: true,
    }
}

fn make_schedule(zone: &str, days_ahead: i64, waste_types: &[&str]) -> NewSchedule {
    NewSchedule {
        zone: zone.to_string(),
        date: Utc::now() + Duration::days(days_ahead),
        status: ScheduleStatus::Active,
        waste_types: waste_types.iter().map(|w| w.to_string()).collect(),
        time_ranges: vec![TimeRange {
            start: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            end: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
        }],
        total_slots: 30,
        available_slots: 25,
        collector_name: "GreenFleet".to_string(),
    }
}

fn make_stop(schedule_id: &ScheduleId, user_id: &str, bin: &Bin) -> NewStop {
    NewStop {
        schedule_id: schedule_id.clone(),
        user_id: UserId::new(user_id),
        bin_id: bin.id.clone(),
        bin_code: bin.code.clone(),
        category: bin.category.to_ascii_lowercase(),
        customer_name: "Test Customer".to_string(),
        address: "7 Harbor Street".to_string(),
        zone: "A".to_string(),
        kind: StopKind::Customer,
        status: StopStatus::Pending,
        notes: None,
    }
}

#[tokio::test]
async fn test_empty_user_id_returns_empty() {
    let repo = LocalRepository::new();
    assert!(upcoming_pickups(&repo, "").await.is_empty());
    assert!(upcoming_pickups(&repo, "   ").await.is_empty());
}

#[tokio::test]
async fn test_unknown_user_returns_empty() {
    let repo = LocalRepository::new();
    assert!(upcoming_pickups(&repo, "nobody").await.is_empty());
}

#[tokio::test]
async fn test_user_without_zone_returns_empty() {
    let repo = LocalRepository::new();
    repo.upsert_user(&make_user("u1", None)).await.unwrap();
    repo.upsert_bin(&make_bin("b1", "u1", "organic")).await.unwrap();
    repo.insert_schedule(&make_schedule("A", 2, &["organic"]))
        .await
        .unwrap();

    assert!(upcoming_pickups(&repo, "u1").await.is_empty());
}

#[tokio::test]
async fn test_user_without_active_bins_returns_empty() {
    let repo = LocalRepository::new();
    repo.upsert_user(&make_user("u1", Some("A"))).await.unwrap();
    let mut bin = make_bin("b1", "u1", "organic");
    bin.active = false;
    repo.upsert_bin(&bin).await.unwrap();

    assert!(upcoming_pickups(&repo, "u1").await.is_empty());
}

#[tokio::test]
async fn test_no_schedules_yields_entry_without_pickup() {
    let repo = LocalRepository::new();
    repo.upsert_user(&make_user("u1", Some("A"))).await.unwrap();
    repo.upsert_bin(&make_bin("b1", "u1", "organic")).await.unwrap();

    let pickups = upcoming_pickups(&repo, "u1").await;
    assert_eq!(pickups.len(), 1);
    assert!(!pickups[0].has_pickup);
    assert!(pickups[0].next_pickup.is_none());
}

#[tokio::test]
async fn test_nearest_schedule_is_selected() {
    let repo = LocalRepository::new();
    repo.upsert_user(&make_user("u1", Some("A"))).await.unwrap();
    repo.upsert_bin(&make_bin("b1", "u1", "organic")).await.unwrap();
    // Nearest run for the category is day+2 even though day+1 exists for
    // other waste types
    repo.insert_schedule(&make_schedule("A", 1, &["plastic"]))
        .await
        .unwrap();
    let s2 = repo
        .insert_schedule(&make_schedule("A", 2, &["organic", "general"]))
        .await
        .unwrap();
    repo.insert_schedule(&make_schedule("A", 5, &["organic"]))
        .await
        .unwrap();

    let pickups = upcoming_pickups(&repo, "u1").await;
    assert_eq!(pickups.len(), 1);
    assert!(pickups[0].has_pickup);

    let next = pickups[0].next_pickup.as_ref().unwrap();
    assert_eq!(next.schedule_id, s2);
    assert_eq!(next.zone, "A");
    assert_eq!(next.collector_name, "GreenFleet");
    assert_eq!(next.available_slots, 25);
    assert_eq!(next.time_ranges.len(), 1);
    assert!(!next.has_stop);
}

#[tokio::test]
async fn test_case_insensitive_matching_both_directions() {
    let repo = LocalRepository::new();
    repo.upsert_user(&make_user("u1", Some("A"))).await.unwrap();
    repo.upsert_bin(&make_bin("b1", "u1", "Plastic")).await.unwrap();
    repo.upsert_bin(&make_bin("b2", "u1", "glass")).await.unwrap();
    repo.insert_schedule(&make_schedule("A", 2, &["plastic", "GLASS"]))
        .await
        .unwrap();

    let pickups = upcoming_pickups(&repo, "u1").await;
    assert_eq!(pickups.len(), 2);
    assert!(pickups.iter().all(|p| p.has_pickup));
}

#[tokio::test]
async fn test_unmatched_category_has_no_pickup() {
    let repo = LocalRepository::new();
    repo.upsert_user(&make_user("u1", Some("A"))).await.unwrap();
    repo.upsert_bin(&make_bin("b1", "u1", "ceramics")).await.unwrap();
    repo.insert_schedule(&make_schedule("A", 2, &["organic", "paper"]))
        .await
        .unwrap();

    let pickups = upcoming_pickups(&repo, "u1").await;
    assert_eq!(pickups.len(), 1);
    assert!(!pickups[0].has_pickup);
    assert!(pickups[0].next_pickup.is_none());
    assert_eq!(pickups[0].category, "ceramics");
    assert_eq!(pickups[0].category_label, "Unknown");
}

#[tokio::test]
async fn test_has_stop_flag_reflects_existing_stop() {
    let repo = LocalRepository::new();
    repo.upsert_user(&make_user("u1", Some("A"))).await.unwrap();
    let bin = make_bin("b1", "u1", "organic");
    repo.upsert_bin(&bin).await.unwrap();
    let s1 = repo
        .insert_schedule(&make_schedule("A", 2, &["organic"]))
        .await
        .unwrap();

    let before = upcoming_pickups(&repo, "u1").await;
    assert!(!before[0].next_pickup.as_ref().unwrap().has_stop);

    repo.insert_stop(&make_stop(&s1, "u1", &bin)).await.unwrap();

    let after = upcoming_pickups(&repo, "u1").await;
    assert!(after[0].next_pickup.as_ref().unwrap().has_stop);
}

#[tokio::test]
async fn test_projection_carries_catalog_fields() {
    let repo = LocalRepository::new();
    repo.upsert_user(&make_user("u1", Some("A"))).await.unwrap();
    repo.upsert_bin(&make_bin("b1", "u1", "ORGANIC")).await.unwrap();

    let pickups = upcoming_pickups(&repo, "u1").await;
    assert_eq!(pickups[0].category, "organic");
    assert_eq!(pickups[0].category_label, "Organic");
    assert_eq!(pickups[0].icon, "leaf");
    assert_eq!(pickups[0].color, "#4CAF50");
    assert_eq!(pickups[0].bin_code, "BIN-b1");
}

#[tokio::test]
async fn test_past_and_inactive_schedules_are_ignored() {
    let repo = LocalRepository::new();
    repo.upsert_user(&make_user("u1", Some("A"))).await.unwrap();
    repo.upsert_bin(&make_bin("b1", "u1", "organic")).await.unwrap();
    repo.insert_schedule(&make_schedule("A", -3, &["organic"]))
        .await
        .unwrap();
    let mut completed = make_schedule("A", 2, &["organic"]);
    completed.status = ScheduleStatus::Completed;
    repo.insert_schedule(&completed).await.unwrap();

    let pickups = upcoming_pickups(&repo, "u1").await;
    assert!(!pickups[0].has_pickup);
}

#[tokio::test]
async fn test_zone_isolation() {
    let repo = LocalRepository::new();
    repo.upsert_user(&make_user("u1", Some("A"))).await.unwrap();
    repo.upsert_bin(&make_bin("b1", "u1", "organic")).await.unwrap();
    // Matching run, wrong zone
    repo.insert_schedule(&make_schedule("B", 2, &["organic"]))
        .await
        .unwrap();

    let pickups = upcoming_pickups(&repo, "u1").await;
    assert!(!pickups[0].has_pickup);
}

#[tokio::test]
async fn test_upcoming_schedules_for_zone_are_ordered() {
    let repo = LocalRepository::new();
    repo.insert_schedule(&make_schedule("A", 7, &["paper"]))
        .await
        .unwrap();
    repo.insert_schedule(&make_schedule("A", 1, &["organic"]))
        .await
        .unwrap();
    repo.insert_schedule(&make_schedule("B", 3, &["organic"]))
        .await
        .unwrap();

    let schedules = upcoming_schedules(&repo, "A").await.unwrap();
    assert_eq!(schedules.len(), 2);
    assert!(schedules[0].date < schedules[1].date);
    assert!(schedules.iter().all(|s| s.zone == "A"));
}
