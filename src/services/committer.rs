//! Booking commit: the one mutating, mutually-exclusive operation in the
//! subsystem.
//!
//! A slot returned by a prior query is never trusted at commit time; time
//! has passed and another invitee may have taken it. Under a per-`(host,
//! slot date)` async mutex the committer regenerates the candidates for
//! just that date, verifies the chosen slot survived, and only then
//! writes. Commits for different hosts or different dates never block
//! each other; there is no global lock.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::availability::{self, AvailabilityError, SlotQuery};
use super::recurrence::parse_timezone;
use crate::api::{EventTypeId, HostId};
use crate::calendar::CalendarProvider;
use crate::config::EngineConfig;
use crate::db::{BookingRepository, FullRepository, RepositoryError, SchedulingRepository};
use crate::models::{Booking, BookingStatus, ConfigError, InviteeInfo};

/// Commit failures.
#[derive(Debug, thiserror::Error)]
pub enum CommitError {
    /// The slot was taken (or stopped satisfying the placement rules)
    /// between query and commit. Expected and user-facing; the caller
    /// should re-query for fresh slots rather than retry.
    #[error("slot no longer available")]
    Conflict,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("availability temporarily unavailable: {0}")]
    CalendarUnavailable(String),

    #[error("invalid booking request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<AvailabilityError> for CommitError {
    fn from(e: AvailabilityError) -> Self {
        match e {
            AvailabilityError::Config(c) => CommitError::Config(c),
            AvailabilityError::InvalidQuery(m) => CommitError::InvalidRequest(m),
            AvailabilityError::CalendarUnavailable(m) => CommitError::CalendarUnavailable(m),
            AvailabilityError::Repository(r) => CommitError::Repository(r),
        }
    }
}

/// A commit request for one chosen slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub event_type_id: EventTypeId,
    /// UTC start of the chosen candidate slot.
    pub start: DateTime<Utc>,
    pub invitee: InviteeInfo,
}

/// Serializes booking commits per `(host, host-local slot date)`.
pub struct BookingCommitter {
    repo: Arc<dyn FullRepository>,
    calendar: Arc<dyn CalendarProvider>,
    config: EngineConfig,
    // Lock registry. Entries are pruned once the last holder releases
    // them, so the map tracks in-flight commits rather than every
    // host/date ever booked against.
    day_locks: parking_lot::Mutex<HashMap<(HostId, NaiveDate), Arc<tokio::sync::Mutex<()>>>>,
}

impl BookingCommitter {
    pub fn new(
        repo: Arc<dyn FullRepository>,
        calendar: Arc<dyn CalendarProvider>,
        config: EngineConfig,
    ) -> Self {
        Self {
            repo,
            calendar,
            config,
            day_locks: parking_lot::Mutex::new(HashMap::new()),
        }
    }

    fn day_lock(&self, key: (HostId, NaiveDate)) -> Arc<tokio::sync::Mutex<()>> {
        self.day_locks
            .lock()
            .entry(key)
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    /// Drop a registry entry nobody holds anymore. Waiters keep a clone of
    /// the `Arc`, so a strong count of one means only the map itself; a
    /// later commit for the same key simply creates a fresh mutex.
    fn prune_day_lock(&self, key: (HostId, NaiveDate)) {
        let mut locks = self.day_locks.lock();
        if locks.get(&key).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            locks.remove(&key);
        }
    }

    /// Commit a booking at the current time.
    pub async fn commit(&self, request: &BookingRequest) -> Result<Booking, CommitError> {
        self.commit_at(request, Utc::now()).await
    }

    /// Commit a booking, with `now` injected for deterministic tests.
    pub async fn commit_at(
        &self,
        request: &BookingRequest,
        now: DateTime<Utc>,
    ) -> Result<Booking, CommitError> {
        let event_type = self.repo.get_event_type(request.event_type_id).await?;
        // Configuration floors belong to event-type save time; re-assert
        // them so a corrupt row cannot produce degenerate bookings.
        event_type.validate()?;
        parse_timezone(&request.invitee.time_zone)?;

        let schedule = match event_type.schedule_id {
            Some(id) => self.repo.get_schedule(id).await?,
            None => self
                .repo
                .get_default_schedule(event_type.host_id)
                .await?
                .ok_or(CommitError::Conflict)?,
        };
        let host_tz = parse_timezone(&schedule.time_zone)?;
        let slot_date = request.start.with_timezone(&host_tz).date_naive();

        let key = (event_type.host_id, slot_date);
        let lock = self.day_lock(key);
        let result = {
            let _guard = lock.lock().await;
            self.commit_exclusive(request, &event_type, slot_date, now).await
        };
        drop(lock);
        self.prune_day_lock(key);
        result
    }

    /// The critical section: runs with the `(host, slot date)` lock held.
    async fn commit_exclusive(
        &self,
        request: &BookingRequest,
        event_type: &crate::models::EventType,
        slot_date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Booking, CommitError> {
        // Re-run the slot pipeline for just this date and confirm the
        // chosen slot is still offerable.
        let query = SlotQuery {
            event_type_id: request.event_type_id,
            start_date: slot_date,
            end_date: slot_date,
            invitee_time_zone: request.invitee.time_zone.clone(),
        };
        let fresh = availability::get_slots(
            self.repo.as_ref(),
            self.calendar.as_ref(),
            &self.config,
            &query,
            now,
        )
        .await?;
        if !fresh.contains_start(request.start) {
            return Err(CommitError::Conflict);
        }

        // Group events: join the existing partially filled booking at this
        // start instead of inserting a second row.
        if event_type.is_group() {
            if let Some(existing) = self
                .find_group_booking(event_type, request.start)
                .await?
            {
                if existing.seats_taken >= event_type.seats_per_slot {
                    return Err(CommitError::Conflict);
                }
                let id = existing
                    .id
                    .ok_or_else(|| CommitError::InvalidRequest("booking without id".into()))?;
                return Ok(self.repo.increment_seats(id).await?);
            }
        }

        let status = if event_type.requires_confirmation {
            BookingStatus::Pending
        } else {
            BookingStatus::Confirmed
        };
        let booking = Booking {
            id: None,
            uid: Uuid::new_v4(),
            event_type_id: request.event_type_id,
            host_id: event_type.host_id,
            start: request.start,
            end: request.start + event_type.duration(),
            status,
            seats_taken: 1,
            invitee: request.invitee.clone(),
            created_at: now,
        };
        Ok(self.repo.create_booking(&booking).await?)
    }

    async fn find_group_booking(
        &self,
        event_type: &crate::models::EventType,
        start: DateTime<Utc>,
    ) -> Result<Option<Booking>, CommitError> {
        let window = crate::models::TimeWindow::new(start, start + event_type.duration())
            .ok_or_else(|| CommitError::InvalidRequest("degenerate slot".into()))?;
        let bookings = self
            .repo
            .list_active_bookings(event_type.host_id, &window)
            .await?;
        Ok(bookings
            .into_iter()
            .find(|b| Some(b.event_type_id) == event_type.id && b.start == start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::NoCalendar;
    use crate::db::repositories::LocalRepository;
    use crate::db::SchedulingRepository;
    use crate::models::{AvailabilitySchedule, BookingWindow, EventType};

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    async fn committer_with_host(host: HostId) -> (BookingCommitter, EventTypeId) {
        let repo = Arc::new(LocalRepository::new());
        repo.store_schedule(&AvailabilitySchedule::weekday_nine_to_five(host, "UTC"))
            .await
            .unwrap();
        let et = repo
            .store_event_type(&EventType {
                id: None,
                host_id: host,
                name: "Intro call".to_string(),
                duration_minutes: 30,
                buffer_before_minutes: 0,
                buffer_after_minutes: 0,
                minimum_notice_minutes: 0,
                slot_interval_minutes: None,
                max_bookings_per_day: 0,
                seats_per_slot: 1,
                booking_window: BookingWindow::Unlimited,
                schedule_id: None,
                requires_confirmation: false,
            })
            .await
            .unwrap();

        let committer = BookingCommitter::new(
            repo as Arc<dyn FullRepository>,
            Arc::new(NoCalendar),
            EngineConfig::default(),
        );
        (committer, et.id.unwrap())
    }

    #[tokio::test]
    async fn test_day_lock_registry_empties_after_commits() {
        let (committer, et_id) = committer_with_host(HostId::new(1)).await;
        let now = utc("2026-02-20T12:00:00Z");

        let request = BookingRequest {
            event_type_id: et_id,
            // Monday 2026-03-02, on the UTC 09:00..17:00 grid.
            start: utc("2026-03-02T10:00:00Z"),
            invitee: InviteeInfo {
                name: "Alice".to_string(),
                email: "alice@example.com".to_string(),
                time_zone: "UTC".to_string(),
            },
        };
        committer.commit_at(&request, now).await.unwrap();
        assert_eq!(committer.day_locks.lock().len(), 0);

        // A losing commit releases its entry too.
        let off_grid = BookingRequest {
            start: utc("2026-03-02T10:10:00Z"),
            ..request
        };
        assert!(matches!(
            committer.commit_at(&off_grid, now).await,
            Err(CommitError::Conflict)
        ));
        assert_eq!(committer.day_locks.lock().len(), 0);
    }
}
