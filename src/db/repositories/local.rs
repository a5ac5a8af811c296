//! In-memory local repository implementation.
//!
//! Stores everything in HashMaps behind a `parking_lot::RwLock`, giving
//! fast, deterministic, isolated execution for unit tests and local
//! development.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::api::{BookingId, EventTypeId, HostId, ScheduleId};
use crate::db::error::{ErrorContext, RepositoryError, RepositoryResult};
use crate::db::repository::{BookingRepository, SchedulingRepository};
use crate::models::{AvailabilitySchedule, Booking, BookingStatus, EventType, TimeWindow};

/// In-memory local repository.
#[derive(Clone, Default)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

#[derive(Default)]
struct LocalData {
    event_types: HashMap<EventTypeId, EventType>,
    schedules: HashMap<ScheduleId, AvailabilitySchedule>,
    bookings: HashMap<BookingId, Booking>,
    next_event_type_id: i64,
    next_schedule_id: i64,
    next_booking_id: i64,
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SchedulingRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }

    async fn store_event_type(&self, event_type: &EventType) -> RepositoryResult<EventType> {
        event_type.validate().map_err(|e| {
            RepositoryError::validation(
                e.to_string(),
                ErrorContext::new("store_event_type").with_entity("event_type"),
            )
        })?;

        let mut data = self.data.write();
        let mut stored = event_type.clone();
        let id = match stored.id {
            Some(id) => id,
            None => {
                data.next_event_type_id += 1;
                EventTypeId::new(data.next_event_type_id)
            }
        };
        stored.id = Some(id);
        data.event_types.insert(id, stored.clone());
        Ok(stored)
    }

    async fn get_event_type(&self, id: EventTypeId) -> RepositoryResult<EventType> {
        self.data.read().event_types.get(&id).cloned().ok_or_else(|| {
            RepositoryError::not_found(
                format!("event type {} does not exist", id),
                ErrorContext::new("get_event_type")
                    .with_entity("event_type")
                    .with_entity_id(id),
            )
        })
    }

    async fn list_event_types(&self, host_id: HostId) -> RepositoryResult<Vec<EventType>> {
        let mut event_types: Vec<EventType> = self
            .data
            .read()
            .event_types
            .values()
            .filter(|et| et.host_id == host_id)
            .cloned()
            .collect();
        event_types.sort_by_key(|et| et.id);
        Ok(event_types)
    }

    async fn store_schedule(
        &self,
        schedule: &AvailabilitySchedule,
    ) -> RepositoryResult<AvailabilitySchedule> {
        schedule.validate().map_err(|e| {
            RepositoryError::validation(
                e.to_string(),
                ErrorContext::new("store_schedule").with_entity("schedule"),
            )
        })?;

        let mut data = self.data.write();
        let mut stored = schedule.clone();
        let id = match stored.id {
            Some(id) => id,
            None => {
                data.next_schedule_id += 1;
                ScheduleId::new(data.next_schedule_id)
            }
        };
        stored.id = Some(id);

        // One default per host: clearing the old default and setting the
        // new one happens under the same write lock.
        if stored.is_default {
            for other in data
                .schedules
                .values_mut()
                .filter(|s| s.host_id == stored.host_id && s.id != Some(id))
            {
                other.is_default = false;
            }
        }

        data.schedules.insert(id, stored.clone());
        Ok(stored)
    }

    async fn get_schedule(&self, id: ScheduleId) -> RepositoryResult<AvailabilitySchedule> {
        self.data.read().schedules.get(&id).cloned().ok_or_else(|| {
            RepositoryError::not_found(
                format!("schedule {} does not exist", id),
                ErrorContext::new("get_schedule")
                    .with_entity("schedule")
                    .with_entity_id(id),
            )
        })
    }

    async fn get_default_schedule(
        &self,
        host_id: HostId,
    ) -> RepositoryResult<Option<AvailabilitySchedule>> {
        Ok(self
            .data
            .read()
            .schedules
            .values()
            .find(|s| s.host_id == host_id && s.is_default)
            .cloned())
    }
}

#[async_trait]
impl BookingRepository for LocalRepository {
    async fn list_active_bookings(
        &self,
        host_id: HostId,
        range: &TimeWindow,
    ) -> RepositoryResult<Vec<Booking>> {
        let mut bookings: Vec<Booking> = self
            .data
            .read()
            .bookings
            .values()
            .filter(|b| b.host_id == host_id && b.occupies_time() && b.window().overlaps(range))
            .cloned()
            .collect();
        bookings.sort_by_key(|b| (b.start, b.id));
        Ok(bookings)
    }

    async fn get_booking(&self, id: BookingId) -> RepositoryResult<Booking> {
        self.data.read().bookings.get(&id).cloned().ok_or_else(|| {
            RepositoryError::not_found(
                format!("booking {} does not exist", id),
                ErrorContext::new("get_booking")
                    .with_entity("booking")
                    .with_entity_id(id),
            )
        })
    }

    async fn create_booking(&self, booking: &Booking) -> RepositoryResult<Booking> {
        if booking.start >= booking.end {
            return Err(RepositoryError::validation(
                "booking must end after it starts",
                ErrorContext::new("create_booking").with_entity("booking"),
            ));
        }

        let mut data = self.data.write();
        data.next_booking_id += 1;
        let id = BookingId::new(data.next_booking_id);
        let mut stored = booking.clone();
        stored.id = Some(id);
        data.bookings.insert(id, stored.clone());
        Ok(stored)
    }

    async fn increment_seats(&self, id: BookingId) -> RepositoryResult<Booking> {
        let mut data = self.data.write();
        let booking = data.bookings.get_mut(&id).ok_or_else(|| {
            RepositoryError::not_found(
                format!("booking {} does not exist", id),
                ErrorContext::new("increment_seats")
                    .with_entity("booking")
                    .with_entity_id(id),
            )
        })?;
        booking.seats_taken += 1;
        Ok(booking.clone())
    }

    async fn update_booking_status(
        &self,
        id: BookingId,
        status: BookingStatus,
    ) -> RepositoryResult<Booking> {
        let mut data = self.data.write();
        let booking = data.bookings.get_mut(&id).ok_or_else(|| {
            RepositoryError::not_found(
                format!("booking {} does not exist", id),
                ErrorContext::new("update_booking_status")
                    .with_entity("booking")
                    .with_entity_id(id),
            )
        })?;
        booking.status = status;
        Ok(booking.clone())
    }
}
