//! Busy-time aggregation: merge every source that blocks host time into
//! one coalesced, order-independent occupied list.
//!
//! Sources are a union, not a priority order: the host's own active
//! bookings across every event type (each padded by its *own* event
//! type's buffers) and the external calendar busy windows (buffer-free;
//! calendars carry no TimeTide buffer semantics). The candidate event
//! type's buffers are deliberately absent here; they apply against the
//! candidate slot in `services::slots`.

use std::collections::HashMap;

use crate::api::EventTypeId;
use crate::models::time::merge_windows;
use crate::models::{Booking, EventType, TimeWindow};

/// Aggregated busy state for one slot query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregatedBusy {
    /// Coalesced occupied windows, sorted by start.
    pub occupied: Vec<TimeWindow>,
    /// Windows of same-event-type group bookings that still have spare
    /// seats. These are kept out of `occupied` so the slot they anchor
    /// stays offerable; the generator refuses any other placement that
    /// overlaps them.
    pub shared_group_windows: Vec<TimeWindow>,
}

/// Merge bookings and external busy windows into occupied time.
///
/// `event_types` supplies the buffer policy of each *existing* booking;
/// a booking whose event type is unknown is taken buffer-free rather than
/// dropped. Identical inputs in any order produce identical output.
pub fn aggregate(
    bookings: &[Booking],
    event_types: &HashMap<EventTypeId, EventType>,
    external_busy: &[TimeWindow],
    candidate: &EventType,
) -> AggregatedBusy {
    let mut blocked = Vec::with_capacity(bookings.len() + external_busy.len());
    let mut shared = Vec::new();

    for booking in bookings {
        if !booking.occupies_time() {
            continue;
        }

        // A partially filled group slot of the candidate's own event type
        // stays offerable at its exact start time.
        if candidate.is_group()
            && candidate.id == Some(booking.event_type_id)
            && booking.seats_taken < candidate.seats_per_slot
        {
            shared.push(booking.window());
            continue;
        }

        let window = match event_types.get(&booking.event_type_id) {
            Some(et) => booking.window().expanded(et.buffer_before(), et.buffer_after()),
            None => booking.window(),
        };
        blocked.push(window);
    }

    blocked.extend_from_slice(external_busy);

    shared.sort();
    shared.dedup();

    AggregatedBusy {
        occupied: merge_windows(blocked),
        shared_group_windows: shared,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{BookingId, HostId};
    use crate::models::{BookingStatus, BookingWindow, InviteeInfo};
    use chrono::{DateTime, Utc};
    use proptest::prelude::*;

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn win(start: &str, end: &str) -> TimeWindow {
        TimeWindow::new(utc(start), utc(end)).unwrap()
    }

    fn event_type(id: i64, buffer_before: i64, buffer_after: i64, seats: u32) -> EventType {
        EventType {
            id: Some(EventTypeId::new(id)),
            host_id: HostId::new(1),
            name: format!("et-{}", id),
            duration_minutes: 30,
            buffer_before_minutes: buffer_before,
            buffer_after_minutes: buffer_after,
            minimum_notice_minutes: 0,
            slot_interval_minutes: None,
            max_bookings_per_day: 0,
            seats_per_slot: seats,
            booking_window: BookingWindow::Unlimited,
            schedule_id: None,
            requires_confirmation: false,
        }
    }

    fn booking(id: i64, event_type: i64, window: TimeWindow, status: BookingStatus, seats: u32) -> Booking {
        Booking {
            id: Some(BookingId::new(id)),
            uid: uuid::Uuid::nil(),
            event_type_id: EventTypeId::new(event_type),
            host_id: HostId::new(1),
            start: window.start,
            end: window.end,
            status,
            seats_taken: seats,
            invitee: InviteeInfo {
                name: "a".to_string(),
                email: "a@example.com".to_string(),
                time_zone: "UTC".to_string(),
            },
            created_at: utc("2026-01-01T00:00:00Z"),
        }
    }

    fn types(list: Vec<EventType>) -> HashMap<EventTypeId, EventType> {
        list.into_iter().map(|et| (et.id.unwrap(), et)).collect()
    }

    #[test]
    fn test_bookings_padded_by_their_own_buffers() {
        let existing = event_type(2, 15, 15, 1);
        let candidate = event_type(1, 0, 0, 1);
        let bookings = vec![booking(
            1,
            2,
            win("2026-03-02T10:00:00Z", "2026-03-02T10:30:00Z"),
            BookingStatus::Confirmed,
            1,
        )];

        let busy = aggregate(&bookings, &types(vec![existing]), &[], &candidate);
        assert_eq!(
            busy.occupied,
            vec![win("2026-03-02T09:45:00Z", "2026-03-02T10:45:00Z")]
        );
    }

    #[test]
    fn test_cancelled_bookings_do_not_block() {
        let candidate = event_type(1, 0, 0, 1);
        let bookings = vec![
            booking(1, 1, win("2026-03-02T10:00:00Z", "2026-03-02T10:30:00Z"), BookingStatus::Cancelled, 1),
            booking(2, 1, win("2026-03-02T11:00:00Z", "2026-03-02T11:30:00Z"), BookingStatus::Rejected, 1),
            booking(3, 1, win("2026-03-02T12:00:00Z", "2026-03-02T12:30:00Z"), BookingStatus::Completed, 1),
        ];

        let busy = aggregate(&bookings, &types(vec![candidate.clone()]), &[], &candidate);
        assert!(busy.occupied.is_empty());
    }

    #[test]
    fn test_other_event_types_block_cross_type() {
        // A booking on event type 2 blocks generation for event type 1.
        let candidate = event_type(1, 0, 0, 1);
        let other = event_type(2, 0, 0, 1);
        let bookings = vec![booking(
            1,
            2,
            win("2026-03-02T10:00:00Z", "2026-03-02T11:00:00Z"),
            BookingStatus::Pending,
            1,
        )];

        let busy = aggregate(&bookings, &types(vec![candidate.clone(), other]), &[], &candidate);
        assert_eq!(busy.occupied, vec![win("2026-03-02T10:00:00Z", "2026-03-02T11:00:00Z")]);
    }

    #[test]
    fn test_partially_filled_group_slot_is_shared_not_occupied() {
        let candidate = event_type(1, 0, 0, 10);
        let bookings = vec![
            booking(1, 1, win("2026-03-02T14:00:00Z", "2026-03-02T14:30:00Z"), BookingStatus::Confirmed, 3),
            // Full slot blocks like any other booking.
            booking(2, 1, win("2026-03-02T15:00:00Z", "2026-03-02T15:30:00Z"), BookingStatus::Confirmed, 10),
        ];

        let busy = aggregate(&bookings, &types(vec![candidate.clone()]), &[], &candidate);
        assert_eq!(busy.shared_group_windows, vec![win("2026-03-02T14:00:00Z", "2026-03-02T14:30:00Z")]);
        assert_eq!(busy.occupied, vec![win("2026-03-02T15:00:00Z", "2026-03-02T15:30:00Z")]);
    }

    #[test]
    fn test_group_exemption_does_not_apply_to_other_event_types() {
        // The same partially filled booking blocks a *different* candidate.
        let group = event_type(1, 0, 0, 10);
        let candidate = event_type(2, 0, 0, 1);
        let bookings = vec![booking(
            1,
            1,
            win("2026-03-02T14:00:00Z", "2026-03-02T14:30:00Z"),
            BookingStatus::Confirmed,
            3,
        )];

        let busy = aggregate(&bookings, &types(vec![group, candidate.clone()]), &[], &candidate);
        assert!(busy.shared_group_windows.is_empty());
        assert_eq!(busy.occupied.len(), 1);
    }

    #[test]
    fn test_external_busy_merges_with_bookings() {
        let candidate = event_type(1, 0, 0, 1);
        let bookings = vec![booking(
            1,
            1,
            win("2026-03-02T10:00:00Z", "2026-03-02T11:00:00Z"),
            BookingStatus::Confirmed,
            1,
        )];
        let external = vec![
            win("2026-03-02T10:30:00Z", "2026-03-02T12:00:00Z"),
            win("2026-03-02T15:00:00Z", "2026-03-02T16:00:00Z"),
        ];

        let busy = aggregate(&bookings, &types(vec![candidate.clone()]), &external, &candidate);
        assert_eq!(
            busy.occupied,
            vec![
                win("2026-03-02T10:00:00Z", "2026-03-02T12:00:00Z"),
                win("2026-03-02T15:00:00Z", "2026-03-02T16:00:00Z"),
            ]
        );
    }

    proptest! {
        /// aggregate(shuffle(inputs)) == aggregate(inputs).
        #[test]
        fn prop_order_independence(
            offsets in proptest::collection::vec((0i64..2000, 1i64..180), 0..24),
            seed in any::<u64>(),
        ) {
            let base = utc("2026-03-02T00:00:00Z");
            let windows: Vec<TimeWindow> = offsets
                .iter()
                .map(|(start_min, len_min)| {
                    let start = base + chrono::Duration::minutes(*start_min);
                    TimeWindow::new(start, start + chrono::Duration::minutes(*len_min)).unwrap()
                })
                .collect();

            let mut shuffled = windows.clone();
            // Deterministic pseudo-shuffle driven by the seed.
            let mut s = seed;
            for i in (1..shuffled.len()).rev() {
                s = s.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                shuffled.swap(i, (s % (i as u64 + 1)) as usize);
            }

            let candidate = event_type(1, 0, 0, 1);
            let a = aggregate(&[], &HashMap::new(), &windows, &candidate);
            let b = aggregate(&[], &HashMap::new(), &shuffled, &candidate);
            prop_assert_eq!(a, b);
        }
    }
}
