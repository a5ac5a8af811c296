//! Domain model types for the availability engine.

pub mod availability;
pub mod booking;
pub mod constants;
pub mod event_type;
pub mod time;

pub use availability::*;
pub use booking::*;
pub use event_type::*;
pub use time::*;

use chrono::{NaiveDate, NaiveTime, Weekday};

/// Configuration errors, surfaced at the point of configuration (schedule
/// or event-type save), never at query time.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid IANA timezone identifier: {0}")]
    InvalidTimezone(String),

    #[error("recurring slot on {day} runs backwards ({start} >= {end})")]
    InvalidWindow {
        day: Weekday,
        start: NaiveTime,
        end: NaiveTime,
    },

    #[error("override window runs backwards ({start} >= {end})")]
    InvalidOverrideWindow { start: NaiveTime, end: NaiveTime },

    #[error("recurring slots on {day} overlap")]
    OverlappingSlots { day: Weekday },

    #[error("event duration {minutes}min is below the {floor}min floor")]
    DurationBelowFloor { minutes: i64, floor: i64 },

    #[error("slot interval {minutes}min is below the {floor}min floor")]
    IntervalBelowFloor { minutes: i64, floor: i64 },

    #[error("durations, buffers and notice must not be negative")]
    NegativeDuration,

    #[error("seats per slot must be at least 1")]
    ZeroSeats,

    #[error("booking window range ends ({end}) before it starts ({start})")]
    InvalidBookingRange { start: NaiveDate, end: NaiveDate },
}
