//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;

use super::dto::{
    BookingResponse, CreateBookingRequest, HealthResponse, SlotsQuery, SlotsResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::EventTypeId;
use crate::db::SchedulingRepository;
use crate::services::{self, BookingRequest, SlotQuery};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the store
/// is accessible.
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
// Slots
// =============================================================================

/// GET /v1/event-types/{event_type_id}/slots
///
/// Compute the bookable slots for an event type over an inclusive
/// host-local date range, rendered in the requested timezone.
pub async fn get_slots(
    State(state): State<AppState>,
    Path(event_type_id): Path<i64>,
    Query(params): Query<SlotsQuery>,
) -> HandlerResult<SlotsResponse> {
    let query = SlotQuery {
        event_type_id: EventTypeId::new(event_type_id),
        start_date: params.start_date,
        end_date: params.end_date,
        invitee_time_zone: params.timezone,
    };

    let response = services::get_slots(
        state.repository.as_ref(),
        state.calendar.as_ref(),
        &state.config,
        &query,
        Utc::now(),
    )
    .await?;

    Ok(Json(response.into()))
}

// =============================================================================
// Bookings
// =============================================================================

/// POST /v1/bookings
///
/// Commit a booking against a previously offered slot. Returns 409 when
/// the slot was taken in the meantime; the client should re-query.
pub async fn create_booking(
    State(state): State<AppState>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(axum::http::StatusCode, Json<BookingResponse>), AppError> {
    let booking = state
        .committer
        .commit(&BookingRequest {
            event_type_id: request.event_type_id,
            start: request.start,
            invitee: request.invitee,
        })
        .await?;

    Ok((axum::http::StatusCode::CREATED, Json(BookingResponse { booking })))
}
