//! Data Transfer Objects for the HTTP API.
//!
//! Most response types are re-exported from the core API surface since they
//! already derive Serialize/Deserialize; this module adds the HTTP-only
//! envelopes.

use serde::{Deserialize, Serialize};

// Re-export existing DTOs that are already serializable
pub use crate::api::{
    BinOutcome, BinRefreshOutcome, NextPickup, PickupProjection, RefreshOutcome, ScheduleSummary,
};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Store connection status
    pub database: String,
}

/// Upcoming pickups response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickupListResponse {
    /// One entry per active bin
    pub pickups: Vec<PickupProjection>,
    /// Total count
    pub total: usize,
}

/// Upcoming schedules for one zone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneScheduleListResponse {
    /// Service zone queried
    pub zone: String,
    /// Upcoming schedules, nearest first
    pub schedules: Vec<ScheduleSummary>,
    /// Total count
    pub total: usize,
}
