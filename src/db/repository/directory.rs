//! Directory repository trait for customer and bin lookups.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::{BinId, UserId};
use crate::models::{Bin, User};

/// Repository trait for the customer/bin directory.
///
/// Users and bins are owned by external account and bin-management flows;
/// this backend mostly reads them, and writes only to mirror those flows
/// (seeding, tests, maintenance tooling).
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait DirectoryRepository: Send + Sync {
    /// Fetch a user by id.
    ///
    /// # Returns
    /// * `Ok(Some(User))` - The user record
    /// * `Ok(None)` - No such user
    /// * `Err(RepositoryError)` - If the lookup fails
    async fn get_user(&self, user_id: &UserId) -> RepositoryResult<Option<User>>;

    /// Insert or replace a user record.
    async fn upsert_user(&self, user: &User) -> RepositoryResult<()>;

    /// Fetch all active bins owned by a user.
    ///
    /// Inactive bins never participate in pickup lookup or reconciliation.
    ///
    /// # Returns
    /// * `Ok(Vec<Bin>)` - Active bins, ordered by id for determinism
    /// * `Err(RepositoryError)` - If the query fails
    async fn active_bins(&self, user_id: &UserId) -> RepositoryResult<Vec<Bin>>;

    /// Fetch a bin by id, active or not.
    async fn get_bin(&self, bin_id: &BinId) -> RepositoryResult<Option<Bin>>;

    /// Insert or replace a bin record.
    async fn upsert_bin(&self, bin: &Bin) -> RepositoryResult<()>;
}
