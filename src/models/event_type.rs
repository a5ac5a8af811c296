//! Bookable meeting templates and their scheduling constraints.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::constants::{MIN_SLOT_DURATION_MINUTES, MIN_SLOT_INTERVAL_MINUTES};
use super::ConfigError;
use crate::api::{EventTypeId, HostId, ScheduleId};

/// How far into the future slots may be offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BookingWindow {
    /// Slots within `[today, today + days]`, host-local.
    Rolling { days: i64 },
    /// Slots within the inclusive host-local date bounds.
    Range { start: NaiveDate, end: NaiveDate },
    /// No bound beyond the engine's hard day-range cap.
    Unlimited,
}

impl Default for BookingWindow {
    fn default() -> Self {
        BookingWindow::Unlimited
    }
}

/// The bookable meeting template.
///
/// Durations and buffers are stored in whole minutes, matching how they
/// are configured; the engine converts to `chrono::Duration` at use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventType {
    pub id: Option<EventTypeId>,
    pub host_id: HostId,
    pub name: String,
    pub duration_minutes: i64,
    #[serde(default)]
    pub buffer_before_minutes: i64,
    #[serde(default)]
    pub buffer_after_minutes: i64,
    #[serde(default)]
    pub minimum_notice_minutes: i64,
    /// Stepping between consecutive slot starts. `None` means step by the
    /// event duration.
    #[serde(default)]
    pub slot_interval_minutes: Option<i64>,
    /// 0 means unlimited.
    #[serde(default)]
    pub max_bookings_per_day: u32,
    /// Capacity of one slot; values above 1 enable group booking.
    #[serde(default = "default_seats")]
    pub seats_per_slot: u32,
    #[serde(default)]
    pub booking_window: BookingWindow,
    /// Falls back to the host's default schedule when unset.
    #[serde(default)]
    pub schedule_id: Option<ScheduleId>,
    #[serde(default)]
    pub requires_confirmation: bool,
}

fn default_seats() -> u32 {
    1
}

impl EventType {
    pub fn duration(&self) -> Duration {
        Duration::minutes(self.duration_minutes)
    }

    pub fn buffer_before(&self) -> Duration {
        Duration::minutes(self.buffer_before_minutes)
    }

    pub fn buffer_after(&self) -> Duration {
        Duration::minutes(self.buffer_after_minutes)
    }

    pub fn minimum_notice(&self) -> Duration {
        Duration::minutes(self.minimum_notice_minutes)
    }

    /// Effective stepping between slot starts.
    pub fn slot_interval(&self) -> Duration {
        Duration::minutes(self.slot_interval_minutes.unwrap_or(self.duration_minutes))
    }

    pub fn is_group(&self) -> bool {
        self.seats_per_slot > 1
    }

    /// Validate configuration floors at event-type save time.
    ///
    /// Queries and commits assume a stored event type already passed this;
    /// the committer re-asserts it as a last line of defense.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.duration_minutes < MIN_SLOT_DURATION_MINUTES {
            return Err(ConfigError::DurationBelowFloor {
                minutes: self.duration_minutes,
                floor: MIN_SLOT_DURATION_MINUTES,
            });
        }
        if let Some(interval) = self.slot_interval_minutes {
            if interval < MIN_SLOT_INTERVAL_MINUTES {
                return Err(ConfigError::IntervalBelowFloor {
                    minutes: interval,
                    floor: MIN_SLOT_INTERVAL_MINUTES,
                });
            }
        }
        if self.buffer_before_minutes < 0
            || self.buffer_after_minutes < 0
            || self.minimum_notice_minutes < 0
        {
            return Err(ConfigError::NegativeDuration);
        }
        if self.seats_per_slot == 0 {
            return Err(ConfigError::ZeroSeats);
        }
        if let BookingWindow::Range { start, end } = self.booking_window {
            if end < start {
                return Err(ConfigError::InvalidBookingRange { start, end });
            }
        }
        if let BookingWindow::Rolling { days } = self.booking_window {
            if days < 0 {
                return Err(ConfigError::NegativeDuration);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> EventType {
        EventType {
            id: None,
            host_id: HostId::new(7),
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
        }
    }

    #[test]
    fn test_slot_interval_defaults_to_duration() {
        let et = base();
        assert_eq!(et.slot_interval(), Duration::minutes(30));

        let mut stepped = base();
        stepped.slot_interval_minutes = Some(15);
        assert_eq!(stepped.slot_interval(), Duration::minutes(15));
    }

    #[test]
    fn test_validate_floors() {
        let mut et = base();
        et.duration_minutes = 3;
        assert!(matches!(
            et.validate(),
            Err(ConfigError::DurationBelowFloor { minutes: 3, floor: 5 })
        ));

        let mut et = base();
        et.slot_interval_minutes = Some(1);
        assert!(matches!(
            et.validate(),
            Err(ConfigError::IntervalBelowFloor { .. })
        ));

        assert!(base().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_negative_and_zero_seats() {
        let mut et = base();
        et.buffer_after_minutes = -5;
        assert!(matches!(et.validate(), Err(ConfigError::NegativeDuration)));

        let mut et = base();
        et.seats_per_slot = 0;
        assert!(matches!(et.validate(), Err(ConfigError::ZeroSeats)));
    }

    #[test]
    fn test_booking_window_json_shape() {
        let rolling: BookingWindow = serde_json::from_str(r#"{"type":"rolling","days":30}"#).unwrap();
        assert_eq!(rolling, BookingWindow::Rolling { days: 30 });

        let range: BookingWindow =
            serde_json::from_str(r#"{"type":"range","start":"2026-04-01","end":"2026-04-10"}"#)
                .unwrap();
        assert!(matches!(range, BookingWindow::Range { .. }));

        assert_eq!(
            serde_json::to_string(&BookingWindow::Unlimited).unwrap(),
            r#"{"type":"unlimited"}"#
        );
    }

    #[test]
    fn test_event_type_json_defaults() {
        let et: EventType = serde_json::from_str(
            r#"{"id":null,"host_id":7,"name":"Intro call","duration_minutes":30}"#,
        )
        .unwrap();
        assert_eq!(et.seats_per_slot, 1);
        assert_eq!(et.booking_window, BookingWindow::Unlimited);
        assert!(et.slot_interval_minutes.is_none());
        assert!(!et.requires_confirmation);
    }

    #[test]
    fn test_validate_booking_range_order() {
        let mut et = base();
        et.booking_window = BookingWindow::Range {
            start: NaiveDate::from_ymd_opt(2026, 4, 10).unwrap(),
            end: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
        };
        assert!(matches!(
            et.validate(),
            Err(ConfigError::InvalidBookingRange { .. })
        ));
    }
}
