//! Availability schedules: weekly recurring slots and date overrides.
//!
//! All wall-clock values here are host-local and carry no date (recurring
//! slots) or no time (override dates). Conversion to UTC happens in
//! `services::recurrence`, never in these types.

use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::api::{HostId, ScheduleId};

/// One recurring weekly working window, host-local wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringSlot {
    pub day_of_week: Weekday,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl RecurringSlot {
    pub fn new(day_of_week: Weekday, start_time: NaiveTime, end_time: NaiveTime) -> Self {
        Self {
            day_of_week,
            start_time,
            end_time,
        }
    }
}

/// A host-local working window on a specific override date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalTimeRange {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// Pins one host-local calendar date to explicit working windows or to a
/// day off. An override replaces the recurring pattern for its date in
/// full; there is no partial merging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateOverride {
    pub date: NaiveDate,
    pub is_working: bool,
    /// Working windows for the date. Ignored when `is_working` is false.
    #[serde(default)]
    pub windows: Vec<LocalTimeRange>,
}

impl DateOverride {
    /// A full day off.
    pub fn day_off(date: NaiveDate) -> Self {
        Self {
            date,
            is_working: false,
            windows: Vec::new(),
        }
    }

    /// Explicit working windows for the date.
    pub fn working(date: NaiveDate, windows: Vec<LocalTimeRange>) -> Self {
        Self {
            date,
            is_working: true,
            windows,
        }
    }
}

/// A host's named weekly availability pattern plus its date overrides.
///
/// Exactly one schedule per host may carry `is_default`; the repository
/// enforces that with an atomic swap on update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilitySchedule {
    pub id: Option<ScheduleId>,
    pub host_id: HostId,
    pub name: String,
    pub is_default: bool,
    /// IANA timezone identifier the recurring slots are expressed in.
    pub time_zone: String,
    pub slots: Vec<RecurringSlot>,
    #[serde(default)]
    pub overrides: Vec<DateOverride>,
}

impl AvailabilitySchedule {
    /// Standard onboarding default: Monday to Friday, 09:00 to 17:00.
    pub fn weekday_nine_to_five(host_id: HostId, time_zone: impl Into<String>) -> Self {
        let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let five = NaiveTime::from_hms_opt(17, 0, 0).unwrap();
        let slots = [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
        ]
        .into_iter()
        .map(|day| RecurringSlot::new(day, nine, five))
        .collect();

        Self {
            id: None,
            host_id,
            name: "Working hours".to_string(),
            is_default: true,
            time_zone: time_zone.into(),
            slots,
            overrides: Vec::new(),
        }
    }

    /// Recurring slots for one weekday, in start-time order.
    pub fn slots_for_day(&self, day: Weekday) -> Vec<&RecurringSlot> {
        let mut slots: Vec<&RecurringSlot> =
            self.slots.iter().filter(|s| s.day_of_week == day).collect();
        slots.sort_by_key(|s| s.start_time);
        slots
    }

    /// Override for a specific host-local date, if one exists.
    pub fn override_for(&self, date: NaiveDate) -> Option<&DateOverride> {
        self.overrides.iter().find(|o| o.date == date)
    }

    /// Validate the schedule at edit time.
    ///
    /// Checks the timezone identifier, that every window runs forward, and
    /// that same-day recurring slots do not overlap. Expansion relies on
    /// these holding and does not re-check them per query.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.time_zone
            .parse::<chrono_tz::Tz>()
            .map_err(|_| ConfigError::InvalidTimezone(self.time_zone.clone()))?;

        for slot in &self.slots {
            if slot.start_time >= slot.end_time {
                return Err(ConfigError::InvalidWindow {
                    day: slot.day_of_week,
                    start: slot.start_time,
                    end: slot.end_time,
                });
            }
        }
        for window in self.overrides.iter().flat_map(|o| o.windows.iter()) {
            if window.start_time >= window.end_time {
                return Err(ConfigError::InvalidOverrideWindow {
                    start: window.start_time,
                    end: window.end_time,
                });
            }
        }

        // Same-day slots must be pairwise disjoint.
        let mut by_day = self.slots.clone();
        by_day.sort_by_key(|s| (s.day_of_week.num_days_from_monday(), s.start_time));
        for pair in by_day.windows(2) {
            if pair[0].day_of_week == pair[1].day_of_week
                && pair[1].start_time < pair[0].end_time
            {
                return Err(ConfigError::OverlappingSlots {
                    day: pair[0].day_of_week,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::HostId;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_default_schedule_is_weekday_nine_to_five() {
        let schedule = AvailabilitySchedule::weekday_nine_to_five(HostId::new(1), "Europe/Madrid");
        assert!(schedule.is_default);
        assert_eq!(schedule.slots.len(), 5);
        assert!(schedule.slots_for_day(Weekday::Sat).is_empty());
        assert_eq!(schedule.slots_for_day(Weekday::Wed).len(), 1);
        assert!(schedule.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_timezone() {
        let mut schedule = AvailabilitySchedule::weekday_nine_to_five(HostId::new(1), "Mars/Olympus");
        schedule.is_default = false;
        assert!(matches!(
            schedule.validate(),
            Err(ConfigError::InvalidTimezone(_))
        ));
    }

    #[test]
    fn test_validate_rejects_overlapping_same_day_slots() {
        let mut schedule = AvailabilitySchedule::weekday_nine_to_five(HostId::new(1), "UTC");
        schedule
            .slots
            .push(RecurringSlot::new(Weekday::Mon, t(16, 0), t(18, 0)));
        assert!(matches!(
            schedule.validate(),
            Err(ConfigError::OverlappingSlots { day: Weekday::Mon })
        ));
    }

    #[test]
    fn test_validate_allows_touching_same_day_slots() {
        let mut schedule = AvailabilitySchedule::weekday_nine_to_five(HostId::new(1), "UTC");
        schedule
            .slots
            .push(RecurringSlot::new(Weekday::Mon, t(17, 0), t(19, 0)));
        assert!(schedule.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_inverted_window() {
        let mut schedule = AvailabilitySchedule::weekday_nine_to_five(HostId::new(1), "UTC");
        schedule
            .slots
            .push(RecurringSlot::new(Weekday::Sat, t(14, 0), t(10, 0)));
        assert!(matches!(
            schedule.validate(),
            Err(ConfigError::InvalidWindow { .. })
        ));
    }

    #[test]
    fn test_override_lookup() {
        let mut schedule = AvailabilitySchedule::weekday_nine_to_five(HostId::new(1), "UTC");
        let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        schedule.overrides.push(DateOverride::day_off(date));

        let o = schedule.override_for(date).unwrap();
        assert!(!o.is_working);
        assert!(schedule
            .override_for(NaiveDate::from_ymd_opt(2026, 3, 3).unwrap())
            .is_none());
    }
}
