//! Slot query orchestration: the `GetSlots` seam exposed to the rest of
//! the system.
//!
//! Wires expansion, busy aggregation and slot generation together for one
//! event type and date range. Everything here is read-only; the only
//! writer in the subsystem is `services::committer`.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::busy;
use super::recurrence::{self, parse_timezone};
use super::slots::{self, CandidateSlot, SlotGenerationInputs};
use crate::api::EventTypeId;
use crate::calendar::CalendarProvider;
use crate::config::{DegradationPolicy, EngineConfig};
use crate::db::{BookingRepository, FullRepository, RepositoryError, SchedulingRepository};
use crate::models::{AvailabilitySchedule, ConfigError, EventType, TimeWindow};

/// Errors a slot query can surface to callers.
#[derive(Debug, thiserror::Error)]
pub enum AvailabilityError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid slot query: {0}")]
    InvalidQuery(String),

    /// Fail-closed calendar outage. Deliberately distinct from an empty
    /// slot list so callers never mistake it for genuine unavailability.
    #[error("availability temporarily unavailable: {0}")]
    CalendarUnavailable(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// A slot query as received from the booking page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotQuery {
    pub event_type_id: EventTypeId,
    /// First host-local date to offer, inclusive.
    pub start_date: NaiveDate,
    /// Last host-local date to offer, inclusive.
    pub end_date: NaiveDate,
    /// IANA timezone the invitee wants times rendered in.
    pub invitee_time_zone: String,
}

/// Slot query result. Slot instants stay UTC; rendering in
/// `invitee_time_zone` happens at the response boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotQueryResponse {
    pub slots_by_date: BTreeMap<NaiveDate, Vec<CandidateSlot>>,
    pub invitee_time_zone: Tz,
    /// A safety cap cut the output short.
    pub truncated: bool,
    /// Fail-open only: the calendar source was unreachable and ignored.
    pub calendar_degraded: bool,
}

impl SlotQueryResponse {
    fn empty(invitee_time_zone: Tz) -> Self {
        Self {
            slots_by_date: BTreeMap::new(),
            invitee_time_zone,
            truncated: false,
            calendar_degraded: false,
        }
    }

    /// Whether a slot with this exact UTC start survives in the output.
    pub fn contains_start(&self, start: DateTime<Utc>) -> bool {
        self.slots_by_date
            .values()
            .flatten()
            .any(|s| s.start == start)
    }
}

/// Resolve the schedule an event type books against: its own, or the
/// host's default. `None` means the host has no availability at all.
async fn resolve_schedule(
    repo: &dyn FullRepository,
    event_type: &EventType,
) -> Result<Option<AvailabilitySchedule>, AvailabilityError> {
    match event_type.schedule_id {
        Some(id) => match repo.get_schedule(id).await {
            Ok(schedule) => Ok(Some(schedule)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e.into()),
        },
        None => Ok(repo.get_default_schedule(event_type.host_id).await?),
    }
}

/// Compute the bookable slots for one event type and date range.
///
/// Pure apart from its reads: identical stores, calendar responses and
/// `now` produce identical output.
pub async fn get_slots(
    repo: &dyn FullRepository,
    calendar: &dyn CalendarProvider,
    config: &EngineConfig,
    query: &SlotQuery,
    now: DateTime<Utc>,
) -> Result<SlotQueryResponse, AvailabilityError> {
    let invitee_tz = parse_timezone(&query.invitee_time_zone)?;
    if query.end_date < query.start_date {
        return Err(AvailabilityError::InvalidQuery(format!(
            "end date {} precedes start date {}",
            query.end_date, query.start_date
        )));
    }

    // The day-range cap bounds the work itself, not just the output: clamp
    // before anything expands, fetches bookings or queries the calendar, so
    // one request can never force arbitrary-length processing.
    let capped_end = query.start_date + Duration::days(config.max_days_to_process);
    let mut truncated = false;
    let end_date = if query.end_date > capped_end {
        truncated = true;
        capped_end
    } else {
        query.end_date
    };

    let event_type = repo.get_event_type(query.event_type_id).await?;

    let schedule = match resolve_schedule(repo, &event_type).await? {
        Some(schedule) => schedule,
        // A host without a schedule simply has no availability.
        None => return Ok(SlotQueryResponse::empty(invitee_tz)),
    };
    let host_tz = parse_timezone(&schedule.time_zone)?;

    let range = query_range(host_tz, query.start_date, end_date).ok_or_else(|| {
        AvailabilityError::InvalidQuery("date range does not resolve in the host timezone".into())
    })?;

    // Bookings just outside the range can still reach into it once their
    // buffers are applied, so fetch with a day of padding.
    let padded = range.expanded(Duration::days(1), Duration::days(1));
    let bookings = repo.list_active_bookings(event_type.host_id, &padded).await?;
    let event_types: HashMap<EventTypeId, EventType> = repo
        .list_event_types(event_type.host_id)
        .await?
        .into_iter()
        .filter_map(|et| et.id.map(|id| (id, et)))
        .collect();

    let (external_busy, calendar_degraded) =
        fetch_external_busy(calendar, config, &event_type, &range).await?;

    let working = recurrence::expand(&schedule, &range, host_tz);
    let aggregated = busy::aggregate(&bookings, &event_types, &external_busy, &event_type);
    let same_type_bookings: Vec<_> = bookings
        .iter()
        .filter(|b| Some(b.event_type_id) == event_type.id)
        .cloned()
        .collect();

    let generated = slots::generate(
        &SlotGenerationInputs {
            working: &working,
            busy: &aggregated,
            event_type: &event_type,
            same_type_bookings: &same_type_bookings,
            host_tz,
            now,
            query_start: range.start,
        },
        config,
    );

    Ok(SlotQueryResponse {
        slots_by_date: generated.slots_by_date,
        invitee_time_zone: invitee_tz,
        truncated: truncated || generated.truncated,
        calendar_degraded,
    })
}

/// UTC window covering an inclusive host-local date range.
fn query_range(host_tz: Tz, start_date: NaiveDate, end_date: NaiveDate) -> Option<TimeWindow> {
    let start = recurrence::day_window(host_tz, start_date)?.start;
    let end = recurrence::day_window(host_tz, end_date)?.end;
    TimeWindow::new(start, end)
}

/// Fetch external busy windows under a bounded timeout, mapped through
/// the configured degradation policy.
async fn fetch_external_busy(
    calendar: &dyn CalendarProvider,
    config: &EngineConfig,
    event_type: &EventType,
    range: &TimeWindow,
) -> Result<(Vec<TimeWindow>, bool), AvailabilityError> {
    let fetch = calendar.get_busy_windows(event_type.host_id, range);
    let outcome = match tokio::time::timeout(config.calendar_timeout(), fetch).await {
        Ok(result) => result,
        Err(_) => Err(crate::calendar::CalendarError::Timeout),
    };

    match outcome {
        Ok(windows) => Ok((windows, false)),
        Err(e) => match config.calendar_degradation {
            DegradationPolicy::FailClosed => {
                Err(AvailabilityError::CalendarUnavailable(e.to_string()))
            }
            DegradationPolicy::FailOpen => {
                log::warn!(
                    "calendar busy fetch failed for host {}: {}; serving stale availability",
                    event_type.host_id,
                    e
                );
                Ok((Vec::new(), true))
            }
        },
    }
}
