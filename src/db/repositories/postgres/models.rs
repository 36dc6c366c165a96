use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;
use std::str::FromStr;

use super::schema::{bins, schedules, stops, users};
use crate::api::{BinId, ScheduleId, StopId, UserId};
use crate::db::repository::{RepositoryError, RepositoryResult};
use crate::models::{Bin, Schedule, ScheduleStatus, Stop, StopKind, StopStatus, TimeRange, User};

fn string_list_to_json(list: &[String]) -> Value {
    serde_json::to_value(list).unwrap_or_else(|_| Value::Array(Vec::new()))
}

fn json_to_string_list(value: &Value) -> RepositoryResult<Vec<String>> {
    serde_json::from_value(value.clone()).map_err(|e| {
        RepositoryError::internal(format!("Failed to parse waste-type list JSON: {}", e))
    })
}

fn time_ranges_to_json(ranges: &[TimeRange]) -> Value {
    serde_json::to_value(ranges).unwrap_or_else(|_| Value::Array(Vec::new()))
}

fn json_to_time_ranges(value: &Value) -> RepositoryResult<Vec<TimeRange>> {
    serde_json::from_value(value.clone())
        .map_err(|e| RepositoryError::internal(format!("Failed to parse time-range JSON: {}", e)))
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub user_id: String,
    pub display_name: String,
    pub address: String,
    pub zone: Option<String>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: UserId::new(row.user_id),
            display_name: row.display_name,
            address: row.address,
            zone: row.zone,
        }
    }
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        UserRow {
            user_id: user.id.value().to_string(),
            display_name: user.display_name.clone(),
            address: user.address.clone(),
            zone: user.zone.clone(),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = bins)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BinRow {
    pub bin_id: String,
    pub user_id: String,
    pub bin_code: String,
    pub category: String,
    pub active: bool,
}

impl From<BinRow> for Bin {
    fn from(row: BinRow) -> Self {
        Bin {
            id: BinId::new(row.bin_id),
            user_id: UserId::new(row.user_id),
            code: row.bin_code,
            category: row.category,
            active: row.active,
        }
    }
}

impl From<&Bin> for BinRow {
    fn from(bin: &Bin) -> Self {
        BinRow {
            bin_id: bin.id.value().to_string(),
            user_id: bin.user_id.value().to_string(),
            bin_code: bin.code.clone(),
            category: bin.category.clone(),
            active: bin.active,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = schedules)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ScheduleRow {
    pub schedule_id: String,
    pub zone: String,
    pub collection_date: DateTime<Utc>,
    pub status: String,
    pub waste_types_json: Value,
    pub time_ranges_json: Value,
    pub total_slots: i32,
    pub available_slots: i32,
    pub collector_name: String,
}

impl TryFrom<ScheduleRow> for Schedule {
    type Error = RepositoryError;

    fn try_from(row: ScheduleRow) -> Result<Self, Self::Error> {
        Ok(Schedule {
            id: ScheduleId::new(row.schedule_id),
            zone: row.zone,
            date: row.collection_date,
            status: ScheduleStatus::from_str(&row.status).map_err(RepositoryError::internal)?,
            waste_types: json_to_string_list(&row.waste_types_json)?,
            time_ranges: json_to_time_ranges(&row.time_ranges_json)?,
            total_slots: row.total_slots,
            available_slots: row.available_slots,
            collector_name: row.collector_name,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schedules)]
pub struct NewScheduleRow {
    pub schedule_id: String,
    pub zone: String,
    pub collection_date: DateTime<Utc>,
    pub status: String,
    pub waste_types_json: Value,
    pub time_ranges_json: Value,
    pub total_slots: i32,
    pub available_slots: i32,
    pub collector_name: String,
}

impl NewScheduleRow {
    pub fn from_schedule(id: &ScheduleId, schedule: &crate::models::NewSchedule) -> Self {
        NewScheduleRow {
            schedule_id: id.value().to_string(),
            zone: schedule.zone.clone(),
            collection_date: schedule.date,
            status: schedule.status.as_str().to_string(),
            waste_types_json: string_list_to_json(&schedule.waste_types),
            time_ranges_json: time_ranges_to_json(&schedule.time_ranges),
            total_slots: schedule.total_slots,
            available_slots: schedule.available_slots,
            collector_name: schedule.collector_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = stops)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StopRow {
    pub stop_id: String,
    pub schedule_id: String,
    pub user_id: String,
    pub bin_id: String,
    pub bin_code: String,
    pub category: String,
    pub customer_name: String,
    pub address: String,
    pub zone: String,
    pub stop_kind: String,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<StopRow> for Stop {
    type Error = RepositoryError;

    fn try_from(row: StopRow) -> Result<Self, Self::Error> {
        Ok(Stop {
            id: StopId::new(row.stop_id),
            schedule_id: ScheduleId::new(row.schedule_id),
            user_id: UserId::new(row.user_id),
            bin_id: BinId::new(row.bin_id),
            bin_code: row.bin_code,
            category: row.category,
            customer_name: row.customer_name,
            address: row.address,
            zone: row.zone,
            kind: StopKind::from_str(&row.stop_kind).map_err(RepositoryError::internal)?,
            status: StopStatus::from_str(&row.status).map_err(RepositoryError::internal)?,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = stops)]
pub struct NewStopRow {
    pub stop_id: String,
    pub schedule_id: String,
    pub user_id: String,
    pub bin_id: String,
    pub bin_code: String,
    pub category: String,
    pub customer_name: String,
    pub address: String,
    pub zone: String,
    pub stop_kind: String,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewStopRow {
    pub fn from_stop(id: &StopId, stop: &crate::models::NewStop, now: DateTime<Utc>) -> Self {
        NewStopRow {
            stop_id: id.value().to_string(),
            schedule_id: stop.schedule_id.value().to_string(),
            user_id: stop.user_id.value().to_string(),
            bin_id: stop.bin_id.value().to_string(),
            bin_code: stop.bin_code.clone(),
            category: stop.category.clone(),
            customer_name: stop.customer_name.clone(),
            address: stop.address.clone(),
            zone: stop.zone.clone(),
            stop_kind: stop.kind.as_str().to_string(),
            status: stop.status.as_str().to_string(),
            notes: stop.notes.clone(),
            created_at: now,
            updated_at: now,
        }
    }
}
