//! Pickup schedule reconciliation (write path).
//!
//! For every active bin of a user, ensures exactly one pending stop exists
//! on the nearest upcoming schedule accepting the bin's category, and
//! cancels stale pending stops left on later schedules. Writes are
//! best-effort: a failing write is logged and counted in the per-bin
//! outcome, never aborting the rest of the run. Re-running with an
//! unchanged store is a no-op.

use chrono::{DateTime, Utc};

use super::start_of_day;
use crate::api::{BinOutcome, BinRefreshOutcome, RefreshOutcome, ScheduleId, UserId};
use crate::db::repository::{
    DirectoryRepository, FullRepository, ScheduleRepository, StopRepository,
};
use crate::models::waste::{self, WasteType};
use crate::models::{Bin, NewStop, Schedule, StopKind, StopStatus, User};

/// Reconcile all of a user's bins against the zone's upcoming schedules.
///
/// Never rejects: preconditions and store failures are reported through the
/// returned [`RefreshOutcome`]. A missing user record or missing zone yields
/// `success == false`; no bins or no eligible schedules complete normally
/// with zero counts.
pub async fn refresh_pickup_schedules(
    repo: &dyn FullRepository,
    user_id: &str,
) -> RefreshOutcome {
    refresh_pickup_schedules_at(repo, user_id, Utc::now()).await
}

/// Same as [`refresh_pickup_schedules`] with an explicit reference instant.
pub async fn refresh_pickup_schedules_at(
    repo: &dyn FullRepository,
    user_id: &str,
    now: DateTime<Utc>,
) -> RefreshOutcome {
    if user_id.trim().is_empty() {
        return RefreshOutcome::failure("User id must not be empty");
    }
    let user_id = UserId::new(user_id);

    let bins = match repo.active_bins(&user_id).await {
        Ok(bins) => bins,
        Err(e) => return RefreshOutcome::failure(format!("Failed to load bins: {}", e)),
    };
    if bins.is_empty() {
        return RefreshOutcome::completed(0, 0, Vec::new());
    }

    let user = match repo.get_user(&user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => return RefreshOutcome::failure(format!("User {} not found", user_id)),
        Err(e) => return RefreshOutcome::failure(format!("Failed to load user: {}", e)),
    };
    let Some(zone) = user.zone.clone().filter(|z| !z.is_empty()) else {
        return RefreshOutcome::failure(format!("User {} has no service zone", user_id));
    };

    let schedules = match repo.upcoming_in_zone(&zone, start_of_day(now)).await {
        Ok(schedules) => schedules,
        Err(e) => return RefreshOutcome::failure(format!("Failed to load schedules: {}", e)),
    };

    let mut added = 0u32;
    let mut removed = 0u32;
    let mut outcomes = Vec::with_capacity(bins.len());
    for bin in &bins {
        let report = reconcile_bin(repo, &user, &zone, bin, &schedules).await;
        if report.outcome == BinOutcome::Created {
            added += 1;
        }
        removed += report.cancelled;
        outcomes.push(report);
    }

    tracing::info!(user_id = %user_id, added, removed, "pickup schedules refreshed");
    RefreshOutcome::completed(added, removed, outcomes)
}

/// Reconcile a single bin: create on the nearest eligible schedule, cancel
/// pending stops on the stale ones.
///
/// The nearest write is sequenced before the stale cancellations; the stale
/// set is exactly the eligible list minus its head.
async fn reconcile_bin(
    repo: &dyn FullRepository,
    user: &User,
    zone: &str,
    bin: &Bin,
    schedules: &[Schedule],
) -> BinRefreshOutcome {
    let mut report = BinRefreshOutcome {
        bin_id: bin.id.clone(),
        outcome: BinOutcome::NoMatch,
        cancelled: 0,
    };

    let Some(bin_waste) = WasteType::from_code(&bin.category) else {
        return report;
    };
    let eligible: Vec<&Schedule> = schedules
        .iter()
        .filter(|schedule| waste::accepts(&schedule.waste_types, bin_waste))
        .collect();
    let Some((nearest, stale)) = eligible.split_first() else {
        return report;
    };

    report.outcome = match ensure_stop(repo, user, zone, bin, bin_waste, nearest).await {
        Ok(true) => BinOutcome::Created,
        Ok(false) => BinOutcome::Unchanged,
        Err(e) => {
            tracing::warn!(
                bin_id = %bin.id,
                schedule_id = %nearest.id,
                error = %e,
                "failed to create stop on nearest schedule"
            );
            BinOutcome::Failed
        }
    };

    for schedule in stale {
        match cancel_pending_stops(repo, user, bin, schedule, &nearest.id).await {
            Ok(cancelled) => report.cancelled += cancelled,
            Err(e) => {
                tracing::warn!(
                    bin_id = %bin.id,
                    schedule_id = %schedule.id,
                    error = %e,
                    "failed to cancel stale stops"
                );
            }
        }
    }

    report
}

/// Create a pending stop on `schedule` unless one already exists for the
/// (schedule, user, bin) triple. Existence is status-blind: a collected or
/// cancelled stop also suppresses creation.
async fn ensure_stop(
    repo: &dyn FullRepository,
    user: &User,
    zone: &str,
    bin: &Bin,
    bin_waste: WasteType,
    schedule: &Schedule,
) -> Result<bool, crate::db::repository::RepositoryError> {
    let existing = repo.stops_for_bin(&schedule.id, &user.id, &bin.id).await?;
    if !existing.is_empty() {
        return Ok(false);
    }

    let stop = NewStop {
        schedule_id: schedule.id.clone(),
        user_id: user.id.clone(),
        bin_id: bin.id.clone(),
        bin_code: bin.code.clone(),
        category: bin_waste.code().to_string(),
        customer_name: user.display_name.clone(),
        address: user.address.clone(),
        zone: zone.to_string(),
        kind: StopKind::Customer,
        status: StopStatus::Pending,
        notes: Some("Added automatically when refreshing pickup schedules".to_string()),
    };
    repo.insert_stop(&stop).await?;
    Ok(true)
}

/// Cancel every still-pending stop for the (schedule, user, bin) triple.
///
/// Collected, skipped, and already-cancelled stops are left untouched.
/// Individual write failures are logged and skipped so one bad stop does
/// not block the rest.
async fn cancel_pending_stops(
    repo: &dyn FullRepository,
    user: &User,
    bin: &Bin,
    schedule: &Schedule,
    nearest_id: &ScheduleId,
) -> Result<u32, crate::db::repository::RepositoryError> {
    let stops = repo.stops_for_bin(&schedule.id, &user.id, &bin.id).await?;

    let mut cancelled = 0u32;
    for stop in stops.iter().filter(|s| s.status == StopStatus::Pending) {
        let note = format!("Superseded by earlier pickup on schedule {}", nearest_id);
        match repo
            .update_stop_status(&stop.id, StopStatus::Cancelled, Some(&note))
            .await
        {
            Ok(()) => cancelled += 1,
            Err(e) => {
                tracing::warn!(stop_id = %stop.id, error = %e, "failed to cancel stop");
            }
        }
    }
    Ok(cancelled)
}
