//! Slot generation: carve offerable candidate slots out of working time.
//!
//! `generate` is a pure function of its inputs; re-running it with the
//! same inputs and the same `now` yields byte-identical output. All
//! interval math stays in UTC; host-local dates appear only for grouping,
//! per-day caps and the booking-window policy, and invitee-local time only
//! at the rendering boundary.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::busy::AggregatedBusy;
use crate::config::EngineConfig;
use crate::models::{Booking, BookingWindow, EventType, TimeWindow};

/// One offerable, not-yet-booked time window of exactly the event type's
/// duration. Transient: becomes a `Booking` only on successful commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CandidateSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl CandidateSlot {
    pub fn window(&self) -> TimeWindow {
        TimeWindow {
            start: self.start,
            end: self.end,
        }
    }

    /// Render the slot in a display timezone. Storage and comparison stay
    /// UTC; this is for the response boundary only.
    pub fn localized(&self, tz: Tz) -> (DateTime<Tz>, DateTime<Tz>) {
        (self.start.with_timezone(&tz), self.end.with_timezone(&tz))
    }
}

/// Generated slots, grouped by host-local date and sorted within each date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratedSlots {
    pub slots_by_date: BTreeMap<NaiveDate, Vec<CandidateSlot>>,
    /// Set when a safety cap cut the output short.
    pub truncated: bool,
}

impl GeneratedSlots {
    pub fn total(&self) -> usize {
        self.slots_by_date.values().map(Vec::len).sum()
    }

    /// Whether a slot with this exact start survives in the output.
    pub fn contains_start(&self, start: DateTime<Utc>) -> bool {
        self.slots_by_date
            .values()
            .flatten()
            .any(|s| s.start == start)
    }
}

/// Inputs to one generation run. Everything is read-only; the generator
/// never touches a store.
pub struct SlotGenerationInputs<'a> {
    /// Working windows from `services::recurrence`, sorted, UTC.
    pub working: &'a [TimeWindow],
    /// Aggregated busy state from `services::busy`.
    pub busy: &'a AggregatedBusy,
    /// The event type being scheduled.
    pub event_type: &'a EventType,
    /// The host's active bookings of *this* event type, for the per-day
    /// cap and group-seat handling.
    pub same_type_bookings: &'a [Booking],
    pub host_tz: Tz,
    pub now: DateTime<Utc>,
    /// Start of the queried range; day-range truncation counts from here.
    pub query_start: DateTime<Utc>,
}

/// Generate candidate slots per the engine's placement rules.
pub fn generate(inputs: &SlotGenerationInputs<'_>, config: &EngineConfig) -> GeneratedSlots {
    let event_type = inputs.event_type;
    let duration = event_type.duration();
    let interval = event_type.slot_interval();
    let notice_floor = inputs.now + event_type.minimum_notice();
    let today = inputs.now.with_timezone(&inputs.host_tz).date_naive();
    let last_processed_date = inputs
        .query_start
        .with_timezone(&inputs.host_tz)
        .date_naive()
        + Duration::days(config.max_days_to_process);

    let occupied = &inputs.busy.occupied;
    let mut truncated = false;
    let mut candidates: Vec<CandidateSlot> = Vec::new();

    for working in inputs.working {
        for free in working.subtract_all(occupied) {
            // Buffers separate the candidate from real occupied neighbors
            // only; a free edge that is also the edge of availability gets
            // no padding.
            let prev_occupied_end = occupied
                .iter()
                .map(|o| o.end)
                .filter(|end| *end <= free.start)
                .max();
            let next_occupied_start = occupied
                .iter()
                .map(|o| o.start)
                .filter(|start| *start >= free.end)
                .min();

            let earliest = match prev_occupied_end {
                Some(end) => free.start.max(end + event_type.buffer_before()),
                None => free.start,
            };
            let latest = match next_occupied_start {
                Some(start) => free.end.min(start - event_type.buffer_after()),
                None => free.end,
            };

            let mut start = earliest;
            while start + duration <= latest {
                candidates.push(CandidateSlot {
                    start,
                    end: start + duration,
                });
                start += interval;
            }
        }
    }

    // A partially filled group slot stays offerable at its exact time even
    // when the slicing grid would not reproduce it.
    for shared in &inputs.busy.shared_group_windows {
        if shared.start >= inputs.query_start && shared.duration() == duration {
            candidates.push(CandidateSlot {
                start: shared.start,
                end: shared.end,
            });
        }
    }

    candidates.sort();
    candidates.dedup();

    // Active same-type bookings per host-local date, for the per-day cap.
    let mut bookings_per_date: HashMap<NaiveDate, u32> = HashMap::new();
    for booking in inputs.same_type_bookings {
        if booking.occupies_time() {
            let date = booking.start.with_timezone(&inputs.host_tz).date_naive();
            *bookings_per_date.entry(date).or_insert(0) += 1;
        }
    }

    let mut slots_by_date: BTreeMap<NaiveDate, Vec<CandidateSlot>> = BTreeMap::new();

    'next_candidate: for slot in candidates {
        if slot.start < notice_floor {
            continue;
        }

        let local_date = slot.start.with_timezone(&inputs.host_tz).date_naive();

        if local_date > last_processed_date {
            truncated = true;
            continue;
        }
        if !within_booking_window(&event_type.booking_window, local_date, today) {
            continue;
        }
        if event_type.max_bookings_per_day > 0 {
            if let Some(&count) = bookings_per_date.get(&local_date) {
                if count >= event_type.max_bookings_per_day {
                    continue;
                }
            }
        }

        // A placement overlapping a shared group window is only valid when
        // it is that window; anything else would double-book the room.
        for shared in &inputs.busy.shared_group_windows {
            if slot.window().overlaps(shared) && slot.window() != *shared {
                continue 'next_candidate;
            }
        }

        slots_by_date.entry(local_date).or_default().push(slot);
    }

    for slots in slots_by_date.values_mut() {
        if slots.len() > config.max_slots_per_day {
            slots.truncate(config.max_slots_per_day);
            truncated = true;
        }
    }
    slots_by_date.retain(|_, slots| !slots.is_empty());

    GeneratedSlots {
        slots_by_date,
        truncated,
    }
}

fn within_booking_window(window: &BookingWindow, date: NaiveDate, today: NaiveDate) -> bool {
    match window {
        BookingWindow::Rolling { days } => date >= today && date <= today + Duration::days(*days),
        BookingWindow::Range { start, end } => date >= *start && date <= *end,
        BookingWindow::Unlimited => true,
    }
}

#[cfg(test)]
#[path = "slots_tests.rs"]
mod slots_tests;
