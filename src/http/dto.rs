//! Data Transfer Objects for the HTTP API.
//!
//! These DTOs are used for request/response serialization in the REST
//! API. Timestamps are ISO-8601; slot instants are rendered in the
//! invitee's requested timezone at this boundary only.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::{Booking, EventTypeId, InviteeInfo};
use crate::services::SlotQueryResponse;

/// Query parameters for the slots endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SlotsQuery {
    /// First host-local date to offer, inclusive (YYYY-MM-DD)
    pub start_date: NaiveDate,
    /// Last host-local date to offer, inclusive (YYYY-MM-DD)
    pub end_date: NaiveDate,
    /// IANA timezone to render slot times in
    pub timezone: String,
}

/// One offerable slot, rendered in the invitee timezone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotDto {
    /// Slot start, ISO-8601 with the invitee's offset
    pub start: String,
    /// Slot end, ISO-8601 with the invitee's offset
    pub end: String,
}

/// Response for the slots endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotsResponse {
    /// Offerable slots keyed by host-local date
    pub slots_by_date: BTreeMap<NaiveDate, Vec<SlotDto>>,
    /// Timezone the slot instants are rendered in
    pub time_zone: String,
    /// A safety cap cut the range or a date's slot list short
    pub truncated: bool,
    /// The calendar source was unreachable and ignored (fail-open only)
    pub calendar_degraded: bool,
}

impl From<SlotQueryResponse> for SlotsResponse {
    fn from(response: SlotQueryResponse) -> Self {
        let tz = response.invitee_time_zone;
        let slots_by_date = response
            .slots_by_date
            .into_iter()
            .map(|(date, slots)| {
                let rendered = slots
                    .into_iter()
                    .map(|slot| {
                        let (start, end) = slot.localized(tz);
                        SlotDto {
                            start: start.to_rfc3339(),
                            end: end.to_rfc3339(),
                        }
                    })
                    .collect();
                (date, rendered)
            })
            .collect();

        Self {
            slots_by_date,
            time_zone: tz.name().to_string(),
            truncated: response.truncated,
            calendar_degraded: response.calendar_degraded,
        }
    }
}

/// Request body for creating a booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub event_type_id: EventTypeId,
    /// UTC start of the chosen slot, ISO-8601
    pub start: chrono::DateTime<chrono::Utc>,
    pub invitee: InviteeInfo,
}

/// Response for booking creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingResponse {
    pub booking: Booking,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}
