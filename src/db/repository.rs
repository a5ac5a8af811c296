//! Repository traits for abstracting the booking and schedule stores.
//!
//! The engine reads event types and schedules, reads bookings, and writes
//! bookings. Implementations can use different backends (PostgreSQL,
//! in-memory storage, etc.) and must be `Send + Sync` for async sharing.
//!
//! Note on atomicity: the "insert-if-still-free" guarantee of the booking
//! flow is provided by `services::committer`, which serializes commits per
//! `(host, slot date)` around the plain primitives below. A SQL backend
//! may instead satisfy it with a serializable transaction.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::{BookingId, EventTypeId, HostId, ScheduleId};
use crate::models::{AvailabilitySchedule, Booking, BookingStatus, EventType, TimeWindow};

/// Read/write access to event types and availability schedules.
#[async_trait]
pub trait SchedulingRepository: Send + Sync {
    /// Check if the store is reachable and healthy.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Store an event type, validating configuration floors first.
    ///
    /// Floor violations surface here, at save time, never at booking time.
    async fn store_event_type(&self, event_type: &EventType) -> RepositoryResult<EventType>;

    async fn get_event_type(&self, id: EventTypeId) -> RepositoryResult<EventType>;

    /// All event types for a host; the aggregator needs them to look up
    /// the buffer policy of every existing booking.
    async fn list_event_types(&self, host_id: HostId) -> RepositoryResult<Vec<EventType>>;

    /// Store a schedule after validation.
    ///
    /// When the schedule carries `is_default`, the previous default for
    /// the host is cleared in the same write, keeping the one-default-per-
    /// host invariant without a second racing update.
    async fn store_schedule(
        &self,
        schedule: &AvailabilitySchedule,
    ) -> RepositoryResult<AvailabilitySchedule>;

    async fn get_schedule(&self, id: ScheduleId) -> RepositoryResult<AvailabilitySchedule>;

    /// The host's default schedule, `None` when the host has none
    /// (treated upstream as "no availability").
    async fn get_default_schedule(
        &self,
        host_id: HostId,
    ) -> RepositoryResult<Option<AvailabilitySchedule>>;
}

/// Read/write access to bookings: the only entity this engine writes.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Pending/confirmed bookings for a host overlapping `range`, across
    /// every event type.
    async fn list_active_bookings(
        &self,
        host_id: HostId,
        range: &TimeWindow,
    ) -> RepositoryResult<Vec<Booking>>;

    async fn get_booking(&self, id: BookingId) -> RepositoryResult<Booking>;

    /// Insert a new booking row, assigning its id.
    async fn create_booking(&self, booking: &Booking) -> RepositoryResult<Booking>;

    /// Add one seat to an existing group booking.
    async fn increment_seats(&self, id: BookingId) -> RepositoryResult<Booking>;

    /// Move a booking through its lifecycle (confirm, cancel, reject,
    /// complete).
    async fn update_booking_status(
        &self,
        id: BookingId,
        status: BookingStatus,
    ) -> RepositoryResult<Booking>;
}

/// Everything the engine needs from persistence.
pub trait FullRepository: SchedulingRepository + BookingRepository {}

impl<T: SchedulingRepository + BookingRepository> FullRepository for T {}
