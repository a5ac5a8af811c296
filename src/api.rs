//! Public API surface for the availability engine.
//!
//! This file consolidates the identifier newtypes and re-exports the
//! domain types the rest of the system consumes. All types derive
//! Serialize/Deserialize for JSON serialization.

use serde::{Deserialize, Serialize};

/// Host (schedule owner) identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HostId(pub i64);

/// Availability schedule identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ScheduleId(pub i64);

/// Event type identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventTypeId(pub i64);

/// Booking identifier (database primary key).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BookingId(pub i64);

impl HostId {
    pub fn new(value: i64) -> Self {
        HostId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl ScheduleId {
    pub fn new(value: i64) -> Self {
        ScheduleId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl EventTypeId {
    pub fn new(value: i64) -> Self {
        EventTypeId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl BookingId {
    pub fn new(value: i64) -> Self {
        BookingId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for HostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::fmt::Display for ScheduleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::fmt::Display for EventTypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::fmt::Display for BookingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<EventTypeId> for i64 {
    fn from(id: EventTypeId) -> Self {
        id.0
    }
}

pub use crate::models::{
    AvailabilitySchedule, Booking, BookingStatus, BookingWindow, DateOverride, EventType,
    InviteeInfo, LocalTimeRange, RecurringSlot, TimeWindow,
};
pub use crate::services::slots::CandidateSlot;
