//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic.

use axum::{
    extract::{Path, State},
    response::sse::{Event, Sse},
    Json,
};
use futures::stream::Stream;
use std::convert::Infallible;
use std::time::Duration;

use super::dto::{HealthResponse, PickupListResponse, RefreshOutcome, ZoneScheduleListResponse};
use super::error::AppError;
use super::state::AppState;
use crate::api::ScheduleId;
use crate::db::repository::{ScheduleRepository, StopRepository};
use crate::services;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the store is
/// accessible.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Pickups
// =============================================================================

/// GET /v1/users/{user_id}/pickups
///
/// Per-bin projection of the user's next matching collection runs.
pub async fn get_upcoming_pickups(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> HandlerResult<PickupListResponse> {
    let pickups = services::upcoming_pickups(state.repository.as_ref(), &user_id).await;
    let total = pickups.len();

    Ok(Json(PickupListResponse { pickups, total }))
}

/// POST /v1/users/{user_id}/pickups/refresh
///
/// Run schedule reconciliation for the user. Failures are encoded in the
/// outcome body, so this endpoint answers 200 even when `success == false`.
pub async fn refresh_pickups(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> HandlerResult<RefreshOutcome> {
    let outcome = services::refresh_pickup_schedules(state.repository.as_ref(), &user_id).await;
    Ok(Json(outcome))
}

// =============================================================================
// Zone browsing
// =============================================================================

/// GET /v1/zones/{zone}/schedules
///
/// Upcoming active schedules for a service zone, nearest first.
pub async fn list_zone_schedules(
    State(state): State<AppState>,
    Path(zone): Path<String>,
) -> HandlerResult<ZoneScheduleListResponse> {
    let schedules = services::upcoming_schedules(state.repository.as_ref(), &zone).await?;
    let total = schedules.len();

    Ok(Json(ZoneScheduleListResponse {
        zone,
        schedules,
        total,
    }))
}

// =============================================================================
// Live stop updates
// =============================================================================

/// GET /v1/schedules/{schedule_id}/stops/live
///
/// Stream a schedule's stops via Server-Sent Events (SSE). Emits the current
/// stops on connect, then every stop whose `updated_at` advances past the
/// last emitted watermark.
pub async fn stream_schedule_stops(
    State(state): State<AppState>,
    Path(schedule_id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let schedule_id = ScheduleId::new(schedule_id);

    // Verify the schedule exists before holding the connection open
    if state
        .repository
        .get_schedule(&schedule_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound(format!(
            "Schedule {} not found",
            schedule_id
        )));
    }

    let repository = state.repository.clone();
    let stream = async_stream::stream! {
        let mut watermark: Option<chrono::DateTime<chrono::Utc>> = None;
        loop {
            match repository.list_stops(&schedule_id).await {
                Ok(stops) => {
                    let mut next_watermark = watermark;
                    for stop in stops
                        .iter()
                        .filter(|s| watermark.is_none_or(|w| s.updated_at > w))
                    {
                        let event_data = serde_json::to_string(stop).unwrap_or_default();
                        yield Ok(Event::default().data(event_data));
                        if next_watermark.is_none_or(|w| stop.updated_at > w) {
                            next_watermark = Some(stop.updated_at);
                        }
                    }
                    watermark = next_watermark;
                }
                Err(e) => {
                    tracing::warn!(schedule_id = %schedule_id, error = %e, "stop stream poll failed");
                }
            }

            // Wait before checking again
            tokio::time::sleep(Duration::from_millis(500)).await;
        }
    };

    Ok(Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(1))
            .text("keep-alive"),
    ))
}
