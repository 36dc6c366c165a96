//! Stop repository trait for the schedule/bin join records.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::{BinId, ScheduleId, StopId, UserId};
use crate::models::{NewStop, Stop, StopStatus};

/// Repository trait for stops.
///
/// Stops are keyed by (schedule, user, bin): that triple is how
/// reconciliation decides whether a write is needed, so the keyed query
/// below must return every stop for the triple regardless of status.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait StopRepository: Send + Sync {
    /// Fetch all stops for a (schedule, user, bin) triple, any status,
    /// ordered by creation time.
    async fn stops_for_bin(
        &self,
        schedule_id: &ScheduleId,
        user_id: &UserId,
        bin_id: &BinId,
    ) -> RepositoryResult<Vec<Stop>>;

    /// Fetch every stop on a schedule, ordered by creation time.
    async fn list_stops(&self, schedule_id: &ScheduleId) -> RepositoryResult<Vec<Stop>>;

    /// Insert a new stop and return its generated id.
    ///
    /// The store assigns the id and the created/updated timestamps.
    async fn insert_stop(&self, stop: &NewStop) -> RepositoryResult<StopId>;

    /// Transition a stop to a new status, replacing its note.
    ///
    /// # Returns
    /// * `Ok(())` - The stop was updated
    /// * `Err(RepositoryError::NotFound)` - No stop with that id
    async fn update_stop_status(
        &self,
        stop_id: &StopId,
        status: StopStatus,
        note: Option<&str>,
    ) -> RepositoryResult<()>;
}
