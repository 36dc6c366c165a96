//! Stored domain entities.
//!
//! These mirror the documents kept in the external store: customer accounts,
//! their bins, the collection schedules published per zone, and the stop
//! records that join a (user, bin) pair to a schedule. All of them are
//! read/written through the repository traits in [`crate::db::repository`].

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{BinId, ScheduleId, StopId, UserId};

/// A customer account.
///
/// Accounts created before address verification carry no `zone`;
/// reconciliation refuses to run for them rather than defaulting one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub display_name: String,
    pub address: String,
    pub zone: Option<String>,
}

/// A physical waste receptacle owned by a customer.
///
/// `category` is the raw string recorded by the bin-management flows; it is
/// normalized through [`crate::models::waste::WasteType::from_code`] wherever
/// it is compared against schedules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    pub id: BinId,
    pub user_id: UserId,
    pub code: String,
    pub category: String,
    pub active: bool,
}

/// Lifecycle state of a collection schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleStatus {
    Active,
    Completed,
    Cancelled,
}

impl ScheduleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleStatus::Active => "active",
            ScheduleStatus::Completed => "completed",
            ScheduleStatus::Cancelled => "cancelled",
        }
    }
}

impl std::str::FromStr for ScheduleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ScheduleStatus::Active),
            "completed" => Ok(ScheduleStatus::Completed),
            "cancelled" => Ok(ScheduleStatus::Cancelled),
            other => Err(format!("Unknown schedule status: {}", other)),
        }
    }
}

/// A collection window within the schedule's day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// A collector's planned collection run for one zone and date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: ScheduleId,
    pub zone: String,
    pub date: DateTime<Utc>,
    pub status: ScheduleStatus,
    /// Waste-type codes this run accepts
    pub waste_types: Vec<String>,
    pub time_ranges: Vec<TimeRange>,
    pub total_slots: i32,
    pub available_slots: i32,
    pub collector_name: String,
}

/// Insert shape for a schedule; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSchedule {
    pub zone: String,
    pub date: DateTime<Utc>,
    pub status: ScheduleStatus,
    pub waste_types: Vec<String>,
    pub time_ranges: Vec<TimeRange>,
    pub total_slots: i32,
    pub available_slots: i32,
    pub collector_name: String,
}

/// Collection state of a stop.
///
/// Reconciliation only ever moves `Pending` stops to `Cancelled`;
/// `Collected` and `Skipped` are collector-side transitions and are never
/// rewritten by this backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopStatus {
    Pending,
    Collected,
    Skipped,
    Cancelled,
}

impl StopStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StopStatus::Pending => "pending",
            StopStatus::Collected => "collected",
            StopStatus::Skipped => "skipped",
            StopStatus::Cancelled => "cancelled",
        }
    }
}

impl std::str::FromStr for StopStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(StopStatus::Pending),
            "collected" => Ok(StopStatus::Collected),
            "skipped" => Ok(StopStatus::Skipped),
            "cancelled" => Ok(StopStatus::Cancelled),
            other => Err(format!("Unknown stop status: {}", other)),
        }
    }
}

/// How a stop got onto a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopKind {
    /// Seeded by the collector when setting up the run
    Main,
    /// Added for a customer bin by reconciliation
    Customer,
}

impl StopKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StopKind::Main => "main",
            StopKind::Customer => "customer",
        }
    }
}

impl std::str::FromStr for StopKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "main" => Ok(StopKind::Main),
            "customer" => Ok(StopKind::Customer),
            other => Err(format!("Unknown stop kind: {}", other)),
        }
    }
}

/// A stop: "this bin/user is expected to be serviced on this schedule."
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub id: StopId,
    pub schedule_id: ScheduleId,
    pub user_id: UserId,
    pub bin_id: BinId,
    pub bin_code: String,
    /// Canonical waste-type code of the bin at creation time
    pub category: String,
    pub customer_name: String,
    pub address: String,
    pub zone: String,
    pub kind: StopKind,
    pub status: StopStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert shape for a stop; the store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStop {
    pub schedule_id: ScheduleId,
    pub user_id: UserId,
    pub bin_id: BinId,
    pub bin_code: String,
    pub category: String,
    pub customer_name: String,
    pub address: String,
    pub zone: String,
    pub kind: StopKind,
    pub status: StopStatus,
    pub notes: Option<String>,
}
