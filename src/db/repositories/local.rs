//! In-memory repository for unit testing and local development.
//!
//! Mirrors the document-store semantics the production backends provide:
//! opaque generated ids, per-collection maps, and the ordered zone query.
//! All state lives behind `parking_lot` locks, so a single instance can be
//! shared across tasks.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

use crate::api::{BinId, ScheduleId, StopId, UserId};
use crate::db::repository::{
    DirectoryRepository, ErrorContext, RepositoryError, RepositoryResult, ScheduleRepository,
    StopRepository,
};
use crate::models::{Bin, NewSchedule, NewStop, Schedule, ScheduleStatus, Stop, StopStatus, User};

/// In-memory implementation of the repository traits.
#[derive(Default)]
pub struct LocalRepository {
    users: RwLock<HashMap<UserId, User>>,
    bins: RwLock<HashMap<BinId, Bin>>,
    schedules: RwLock<HashMap<ScheduleId, Schedule>>,
    stops: RwLock<HashMap<StopId, Stop>>,
}

impl LocalRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }
}

#[async_trait]
impl DirectoryRepository for LocalRepository {
    async fn get_user(&self, user_id: &UserId) -> RepositoryResult<Option<User>> {
        Ok(self.users.read().get(user_id).cloned())
    }

    async fn upsert_user(&self, user: &User) -> RepositoryResult<()> {
        self.users.write().insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn active_bins(&self, user_id: &UserId) -> RepositoryResult<Vec<Bin>> {
        let mut bins: Vec<Bin> = self
            .bins
            .read()
            .values()
            .filter(|bin| &bin.user_id == user_id && bin.active)
            .cloned()
            .collect();
        bins.sort_by(|a, b| a.id.cmp(&b.id));
        log::debug!("active_bins: {} bin(s) for user {}", bins.len(), user_id);
        Ok(bins)
    }

    async fn get_bin(&self, bin_id: &BinId) -> RepositoryResult<Option<Bin>> {
        Ok(self.bins.read().get(bin_id).cloned())
    }

    async fn upsert_bin(&self, bin: &Bin) -> RepositoryResult<()> {
        self.bins.write().insert(bin.id.clone(), bin.clone());
        Ok(())
    }
}

#[async_trait]
impl ScheduleRepository for LocalRepository {
    async fn get_schedule(&self, schedule_id: &ScheduleId) -> RepositoryResult<Option<Schedule>> {
        Ok(self.schedules.read().get(schedule_id).cloned())
    }

    async fn upcoming_in_zone(
        &self,
        zone: &str,
        from: DateTime<Utc>,
    ) -> RepositoryResult<Vec<Schedule>> {
        let mut schedules: Vec<Schedule> = self
            .schedules
            .read()
            .values()
            .filter(|schedule| {
                schedule.zone == zone
                    && schedule.status == ScheduleStatus::Active
                    && schedule.date >= from
            })
            .cloned()
            .collect();
        schedules.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
        Ok(schedules)
    }

    async fn insert_schedule(&self, schedule: &NewSchedule) -> RepositoryResult<ScheduleId> {
        let id = ScheduleId::new(Self::generate_id());
        let stored = Schedule {
            id: id.clone(),
            zone: schedule.zone.clone(),
            date: schedule.date,
            status: schedule.status,
            waste_types: schedule.waste_types.clone(),
            time_ranges: schedule.time_ranges.clone(),
            total_slots: schedule.total_slots,
            available_slots: schedule.available_slots,
            collector_name: schedule.collector_name.clone(),
        };
        self.schedules.write().insert(id.clone(), stored);
        Ok(id)
    }

    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }
}

#[async_trait]
impl StopRepository for LocalRepository {
    async fn stops_for_bin(
        &self,
        schedule_id: &ScheduleId,
        user_id: &UserId,
        bin_id: &BinId,
    ) -> RepositoryResult<Vec<Stop>> {
        let mut stops: Vec<Stop> = self
            .stops
            .read()
            .values()
            .filter(|stop| {
                &stop.schedule_id == schedule_id
                    && &stop.user_id == user_id
                    && &stop.bin_id == bin_id
            })
            .cloned()
            .collect();
        stops.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(stops)
    }

    async fn list_stops(&self, schedule_id: &ScheduleId) -> RepositoryResult<Vec<Stop>> {
        let mut stops: Vec<Stop> = self
            .stops
            .read()
            .values()
            .filter(|stop| &stop.schedule_id == schedule_id)
            .cloned()
            .collect();
        stops.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(stops)
    }

    async fn insert_stop(&self, stop: &NewStop) -> RepositoryResult<StopId> {
        let id = StopId::new(Self::generate_id());
        let now = Utc::now();
        let stored = Stop {
            id: id.clone(),
            schedule_id: stop.schedule_id.clone(),
            user_id: stop.user_id.clone(),
            bin_id: stop.bin_id.clone(),
            bin_code: stop.bin_code.clone(),
            category: stop.category.clone(),
            customer_name: stop.customer_name.clone(),
            address: stop.address.clone(),
            zone: stop.zone.clone(),
            kind: stop.kind,
            status: stop.status,
            notes: stop.notes.clone(),
            created_at: now,
            updated_at: now,
        };
        self.stops.write().insert(id.clone(), stored);
        log::debug!("insert_stop: {} on schedule {}", id, stop.schedule_id);
        Ok(id)
    }

    async fn update_stop_status(
        &self,
        stop_id: &StopId,
        status: StopStatus,
        note: Option<&str>,
    ) -> RepositoryResult<()> {
        let mut stops = self.stops.write();
        let stop = stops.get_mut(stop_id).ok_or_else(|| {
            RepositoryError::not_found_with_context(
                "Stop not found",
                ErrorContext::new("update_stop_status")
                    .with_entity("stop")
                    .with_entity_id(stop_id),
            )
        })?;
        stop.status = status;
        if let Some(note) = note {
            stop.notes = Some(note.to_string());
        }
        stop.updated_at = Utc::now();
        Ok(())
    }
}
