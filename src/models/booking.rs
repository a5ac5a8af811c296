//! Booking records: the only entity this engine writes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::time::TimeWindow;
use crate::api::{BookingId, EventTypeId, HostId};

/// Booking lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Rejected,
    Completed,
}

impl BookingStatus {
    /// Whether the booking occupies time for conflict purposes.
    pub fn occupies_time(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }
}

/// Who booked the slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviteeInfo {
    pub name: String,
    pub email: String,
    /// IANA timezone the invitee asked to see times in.
    pub time_zone: String,
}

/// An accepted or pending reservation of one event-type instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Option<BookingId>,
    /// Externally visible identifier, stable across systems.
    pub uid: Uuid,
    pub event_type_id: EventTypeId,
    pub host_id: HostId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: BookingStatus,
    /// 1 per invitee for simple bookings; partially filled for group slots.
    pub seats_taken: u32,
    pub invitee: InviteeInfo,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// The booked time as a UTC window.
    pub fn window(&self) -> TimeWindow {
        // start < end is enforced at creation.
        TimeWindow {
            start: self.start,
            end: self.end,
        }
    }

    /// Whether this booking blocks time right now.
    pub fn occupies_time(&self) -> bool {
        self.status.occupies_time()
    }
}
