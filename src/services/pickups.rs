//! Pickup lookup (read path).
//!
//! Projects each of a user's active bins onto the nearest upcoming
//! collection schedule that accepts the bin's waste category. Pure read: no
//! writes, and no error ever escapes. A missing user, missing zone, or
//! store failure all degrade to an empty result so a screen never crashes
//! on lookup.

use chrono::{DateTime, Utc};

use super::start_of_day;
use crate::api::{NextPickup, PickupProjection, ScheduleSummary, UserId};
use crate::db::repository::{
    DirectoryRepository, FullRepository, RepositoryResult, ScheduleRepository, StopRepository,
};
use crate::models::waste::{self, WasteType};
use crate::models::{Bin, Schedule};

/// Upcoming pickups for every active bin of a user.
///
/// One [`PickupProjection`] per active bin, in bin-id order. Empty when the
/// user id is blank, the user is unknown, the user has no zone, or the user
/// has no active bins.
pub async fn upcoming_pickups(
    repo: &dyn FullRepository,
    user_id: &str,
) -> Vec<PickupProjection> {
    upcoming_pickups_at(repo, user_id, Utc::now()).await
}

/// Same as [`upcoming_pickups`] with an explicit reference instant.
pub async fn upcoming_pickups_at(
    repo: &dyn FullRepository,
    user_id: &str,
    now: DateTime<Utc>,
) -> Vec<PickupProjection> {
    if user_id.trim().is_empty() {
        return Vec::new();
    }

    match try_upcoming_pickups(repo, user_id, now).await {
        Ok(pickups) => pickups,
        Err(e) => {
            tracing::warn!(user_id, error = %e, "pickup lookup failed, returning empty result");
            Vec::new()
        }
    }
}

async fn try_upcoming_pickups(
    repo: &dyn FullRepository,
    user_id: &str,
    now: DateTime<Utc>,
) -> RepositoryResult<Vec<PickupProjection>> {
    let user_id = UserId::new(user_id);

    let bins = repo.active_bins(&user_id).await?;
    if bins.is_empty() {
        return Ok(Vec::new());
    }

    let Some(user) = repo.get_user(&user_id).await? else {
        return Ok(Vec::new());
    };
    let Some(zone) = user.zone.filter(|z| !z.is_empty()) else {
        return Ok(Vec::new());
    };

    let schedules = repo.upcoming_in_zone(&zone, start_of_day(now)).await?;

    let mut pickups = Vec::with_capacity(bins.len());
    for bin in &bins {
        pickups.push(project_bin(repo, &user_id, bin, &schedules).await?);
    }
    Ok(pickups)
}

/// Build the projection for one bin against the zone's ordered schedules.
async fn project_bin(
    repo: &dyn FullRepository,
    user_id: &UserId,
    bin: &Bin,
    schedules: &[Schedule],
) -> RepositoryResult<PickupProjection> {
    let waste = WasteType::from_code(&bin.category);

    let (category, category_label, icon, color) = match waste {
        Some(w) => (w.code().to_string(), w.label(), w.icon(), w.color()),
        None => (
            bin.category.to_ascii_lowercase(),
            "Unknown",
            waste::UNKNOWN_ICON,
            waste::UNKNOWN_COLOR,
        ),
    };

    // First schedule in date order accepting the bin's category wins.
    let nearest = waste.and_then(|w| {
        schedules
            .iter()
            .find(|schedule| waste::accepts(&schedule.waste_types, w))
    });

    let next_pickup = match nearest {
        Some(schedule) => {
            let has_stop = !repo
                .stops_for_bin(&schedule.id, user_id, &bin.id)
                .await?
                .is_empty();
            Some(NextPickup {
                schedule_id: schedule.id.clone(),
                date: schedule.date,
                time_ranges: schedule.time_ranges.clone(),
                collector_name: schedule.collector_name.clone(),
                zone: schedule.zone.clone(),
                available_slots: schedule.available_slots,
                waste_types: schedule.waste_types.clone(),
                has_stop,
            })
        }
        None => None,
    };

    Ok(PickupProjection {
        bin_id: bin.id.clone(),
        bin_code: bin.code.clone(),
        category,
        category_label: category_label.to_string(),
        icon: icon.to_string(),
        color: color.to_string(),
        has_pickup: next_pickup.is_some(),
        next_pickup,
    })
}

/// Upcoming active schedules for a zone, nearest first.
pub async fn upcoming_schedules(
    repo: &dyn FullRepository,
    zone: &str,
) -> RepositoryResult<Vec<ScheduleSummary>> {
    upcoming_schedules_at(repo, zone, Utc::now()).await
}

/// Same as [`upcoming_schedules`] with an explicit reference instant.
pub async fn upcoming_schedules_at(
    repo: &dyn FullRepository,
    zone: &str,
    now: DateTime<Utc>,
) -> RepositoryResult<Vec<ScheduleSummary>> {
    let schedules = repo.upcoming_in_zone(zone, start_of_day(now)).await?;
    Ok(schedules.iter().map(ScheduleSummary::from).collect())
}
