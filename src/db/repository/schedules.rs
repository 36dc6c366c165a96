//! Schedule repository trait for collection-run queries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::error::RepositoryResult;
use crate::api::ScheduleId;
use crate::models::{NewSchedule, Schedule};

/// Repository trait for collection schedules.
///
/// Schedules are published by collector-side tooling; the pickup core reads
/// them through the ordered zone query below, which is the only query the
/// reconciliation pipeline needs.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    /// Fetch a schedule by id.
    async fn get_schedule(&self, schedule_id: &ScheduleId) -> RepositoryResult<Option<Schedule>>;

    /// Fetch upcoming active schedules for a zone.
    ///
    /// Returns schedules with `status == active` and `date >= from`,
    /// ordered by date ascending (id as tie-break). The first element is
    /// the zone's "nearest" run.
    ///
    /// # Arguments
    /// * `zone` - Service-area code
    /// * `from` - Inclusive lower bound on the collection date
    async fn upcoming_in_zone(
        &self,
        zone: &str,
        from: DateTime<Utc>,
    ) -> RepositoryResult<Vec<Schedule>>;

    /// Insert a new schedule and return its generated id.
    async fn insert_schedule(&self, schedule: &NewSchedule) -> RepositoryResult<ScheduleId>;

    /// Verify the store is reachable.
    ///
    /// # Returns
    /// * `Ok(true)` - Store answered
    /// * `Err(RepositoryError)` - If the probe fails
    async fn health_check(&self) -> RepositoryResult<bool>;
}
