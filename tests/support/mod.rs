//! Shared fixtures for the integration tests.
//!
//! The recurring setup is a New York host working Mondays 09:00 to 17:00
//! local time. Monday 2026-03-02 falls in EST (UTC-5), so the working day
//! spans 14:00Z to 22:00Z.

#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, NaiveTime, Utc, Weekday};
use uuid::Uuid;

use timetide_engine::api::{EventTypeId, HostId, ScheduleId};
use timetide_engine::models::{
    AvailabilitySchedule, Booking, BookingStatus, EventType, InviteeInfo, RecurringSlot,
    TimeWindow,
};

pub const NEW_YORK: &str = "America/New_York";

pub fn utc(s: &str) -> DateTime<Utc> {
    s.parse().unwrap()
}

pub fn win(start: &str, end: &str) -> TimeWindow {
    TimeWindow::new(utc(start), utc(end)).unwrap()
}

pub fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

/// Mondays 09:00 to 17:00 in New York, stored as the host default.
pub fn monday_schedule(host_id: HostId) -> AvailabilitySchedule {
    AvailabilitySchedule {
        id: None,
        host_id,
        name: "Monday hours".to_string(),
        is_default: true,
        time_zone: NEW_YORK.to_string(),
        slots: vec![RecurringSlot::new(Weekday::Mon, t(9, 0), t(17, 0))],
        overrides: Vec::new(),
    }
}

/// A 30 minute event type with no buffers, notice or caps.
pub fn thirty_minute_event(host_id: HostId, schedule_id: Option<ScheduleId>) -> EventType {
    EventType {
        id: None,
        host_id,
        name: "Intro call".to_string(),
        duration_minutes: 30,
        buffer_before_minutes: 0,
        buffer_after_minutes: 0,
        minimum_notice_minutes: 0,
        slot_interval_minutes: None,
        max_bookings_per_day: 0,
        seats_per_slot: 1,
        booking_window: Default::default(),
        schedule_id,
        requires_confirmation: false,
    }
}

pub fn invitee(name: &str) -> InviteeInfo {
    InviteeInfo {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        time_zone: "Europe/Madrid".to_string(),
    }
}

/// A confirmed single-seat booking for an existing event type.
pub fn confirmed_booking(
    event_type_id: EventTypeId,
    host_id: HostId,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Booking {
    Booking {
        id: None,
        uid: Uuid::new_v4(),
        event_type_id,
        host_id,
        start,
        end,
        status: BookingStatus::Confirmed,
        seats_taken: 1,
        invitee: invitee("Fixture"),
        created_at: utc("2026-02-01T00:00:00Z"),
    }
}
