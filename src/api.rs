//! Public API surface for the pickup backend.
//!
//! This file consolidates the identifier newtypes and the DTO types returned
//! by the service layer and the HTTP API. All types derive
//! Serialize/Deserialize for JSON serialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use crate::models::TimeRange;

/// Customer account identifier (document id in the user collection).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Bin identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BinId(pub String);

/// Collection schedule identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ScheduleId(pub String);

/// Stop identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StopId(pub String);

macro_rules! impl_string_id {
    ($($name:ident),+) => {
        $(
            impl $name {
                pub fn new(value: impl Into<String>) -> Self {
                    $name(value.into())
                }

                pub fn value(&self) -> &str {
                    &self.0
                }
            }

            impl std::fmt::Display for $name {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    write!(f, "{}", self.0)
                }
            }

            impl From<$name> for String {
                fn from(id: $name) -> Self {
                    id.0
                }
            }
        )+
    };
}

impl_string_id!(UserId, BinId, ScheduleId, StopId);

/// Per-bin pickup projection returned by the read path.
///
/// One entry per active bin of the requesting user. `next_pickup` is `null`
/// when no upcoming in-zone schedule accepts the bin's waste category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickupProjection {
    /// Bin identifier
    pub bin_id: BinId,
    /// Human-facing bin code printed on the receptacle
    pub bin_code: String,
    /// Canonical waste-type code (lowercased raw category if unknown)
    pub category: String,
    /// Display label for the category
    pub category_label: String,
    /// Icon name for the category
    pub icon: String,
    /// Display color (hex) for the category
    pub color: String,
    /// Whether an upcoming schedule accepts this bin
    pub has_pickup: bool,
    /// Details of the nearest matching schedule, if any
    pub next_pickup: Option<NextPickup>,
}

/// Details of the nearest matching collection run for one bin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NextPickup {
    /// Schedule identifier
    pub schedule_id: ScheduleId,
    /// Collection date
    pub date: DateTime<Utc>,
    /// Collection windows within the day
    pub time_ranges: Vec<TimeRange>,
    /// Name of the collector running the schedule
    pub collector_name: String,
    /// Service zone of the schedule
    pub zone: String,
    /// Remaining stop capacity
    pub available_slots: i32,
    /// Waste-type codes the run accepts
    pub waste_types: Vec<String>,
    /// Whether a stop already exists for this (user, bin) on the schedule
    pub has_stop: bool,
}

/// What reconciliation did for a single bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinOutcome {
    /// A new pending stop was created on the nearest schedule
    Created,
    /// A stop already existed on the nearest schedule
    Unchanged,
    /// No upcoming schedule accepts the bin's category
    NoMatch,
    /// The nearest-stop write failed (logged, not fatal)
    Failed,
}

/// Per-bin reconciliation report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinRefreshOutcome {
    /// Bin identifier
    pub bin_id: BinId,
    /// What happened on the nearest schedule
    pub outcome: BinOutcome,
    /// Number of stale pending stops cancelled for this bin
    pub cancelled: u32,
}

/// Result of one reconciliation run.
///
/// Failures are encoded here rather than propagated: a missing user or zone
/// yields `success == false` with `error` set, while per-write failures keep
/// `success == true` and surface through the per-bin outcomes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshOutcome {
    /// Whether the run completed (best-effort writes included)
    pub success: bool,
    /// Number of stops created
    pub added: u32,
    /// Number of stale pending stops cancelled
    pub removed: u32,
    /// Human-readable summary on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Failure reason when `success == false`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Per-bin detail
    pub bins: Vec<BinRefreshOutcome>,
}

impl RefreshOutcome {
    /// A run that never got past its preconditions.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            added: 0,
            removed: 0,
            message: None,
            error: Some(error.into()),
            bins: Vec::new(),
        }
    }

    /// A completed run, including the zero-work case.
    pub fn completed(added: u32, removed: u32, bins: Vec<BinRefreshOutcome>) -> Self {
        Self {
            success: true,
            added,
            removed,
            message: Some(format!("Updated {} schedule(s)", added + removed)),
            error: None,
            bins,
        }
    }
}

/// Lightweight schedule projection for zone browsing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSummary {
    /// Schedule identifier
    pub schedule_id: ScheduleId,
    /// Service zone
    pub zone: String,
    /// Collection date
    pub date: DateTime<Utc>,
    /// Collection windows within the day
    pub time_ranges: Vec<TimeRange>,
    /// Waste-type codes the run accepts
    pub waste_types: Vec<String>,
    /// Name of the collector running the schedule
    pub collector_name: String,
    /// Total stop capacity
    pub total_slots: i32,
    /// Remaining stop capacity
    pub available_slots: i32,
}

impl From<&crate::models::Schedule> for ScheduleSummary {
    fn from(schedule: &crate::models::Schedule) -> Self {
        Self {
            schedule_id: schedule.id.clone(),
            zone: schedule.zone.clone(),
            date: schedule.date,
            time_ranges: schedule.time_ranges.clone(),
            waste_types: schedule.waste_types.clone(),
            collector_name: schedule.collector_name.clone(),
            total_slots: schedule.total_slots,
            available_slots: schedule.available_slots,
        }
    }
}
