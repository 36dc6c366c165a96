//! Service layer for business logic and orchestration.
//!
//! Services orchestrate repository calls and implement the pickup pipeline.
//! They take the repository as an explicit `&dyn FullRepository` argument so
//! callers (HTTP handlers, tests) choose the backend.

pub mod pickups;

pub mod reconcile;

pub use pickups::{
    upcoming_pickups, upcoming_pickups_at, upcoming_schedules, upcoming_schedules_at,
};
pub use reconcile::{refresh_pickup_schedules, refresh_pickup_schedules_at};

use chrono::{DateTime, NaiveTime, Utc};

/// Start of the reference instant's UTC day.
///
/// Schedule eligibility uses this as the inclusive lower bound so a run
/// later today still counts as upcoming.
pub(crate) fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive().and_time(NaiveTime::MIN).and_utc()
}
