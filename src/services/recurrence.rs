//! Recurrence expansion: weekly patterns plus date overrides to concrete
//! UTC working windows.
//!
//! This is the only place host-local wall-clock time is converted to UTC.
//! DST disambiguation is delegated to chrono-tz: ambiguous (fall-back)
//! local times resolve to the earliest offset, nonexistent (spring-forward)
//! local times are clipped to the wall-clock range actually present that
//! day.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::models::{AvailabilitySchedule, ConfigError, TimeWindow};

/// Parse an IANA timezone identifier, failing hard on misconfiguration.
pub fn parse_timezone(id: &str) -> Result<Tz, ConfigError> {
    id.parse::<Tz>()
        .map_err(|_| ConfigError::InvalidTimezone(id.to_string()))
}

/// Resolution direction for local instants that fall in a DST gap.
#[derive(Clone, Copy, PartialEq)]
enum GapBias {
    /// Window starts move forward to the first existing wall-clock time.
    Forward,
    /// Window ends move backward to the last existing wall-clock time.
    Backward,
}

/// Resolve a host-local instant to UTC.
///
/// Ambiguous times take the earliest offset (the timezone library's
/// standard disambiguation). Times inside a spring-forward gap are probed
/// in 5-minute steps in the bias direction until a real wall-clock time is
/// found; the probe is bounded so a broken tzdata entry cannot loop.
fn resolve_local(tz: Tz, date: NaiveDate, time: NaiveTime, bias: GapBias) -> Option<DateTime<Utc>> {
    let step = match bias {
        GapBias::Forward => Duration::minutes(5),
        GapBias::Backward => Duration::minutes(-5),
    };
    let mut naive = date.and_time(time);
    // DST gaps are at most a few hours; 3h of probing covers every zone.
    for _ in 0..=36 {
        match tz.from_local_datetime(&naive) {
            chrono::LocalResult::Single(dt) => return Some(dt.with_timezone(&Utc)),
            chrono::LocalResult::Ambiguous(earliest, _) => {
                return Some(earliest.with_timezone(&Utc))
            }
            chrono::LocalResult::None => naive += step,
        }
    }
    None
}

/// Convert one host-local window on a given date to a UTC window.
///
/// Returns `None` when the window collapses entirely into a DST gap.
fn local_window_to_utc(
    tz: Tz,
    date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
) -> Option<TimeWindow> {
    let start = resolve_local(tz, date, start_time, GapBias::Forward)?;
    let end = resolve_local(tz, date, end_time, GapBias::Backward)?;
    TimeWindow::new(start, end)
}

/// The UTC window covering one whole host-local date.
///
/// Used to bound queries and per-day regeneration; midnight itself may sit
/// in a DST gap (e.g. America/Sao_Paulo historically), so both edges go
/// through gap resolution.
pub fn day_window(tz: Tz, date: NaiveDate) -> Option<TimeWindow> {
    let midnight = NaiveTime::MIN;
    let start = resolve_local(tz, date, midnight, GapBias::Forward)?;
    let end = resolve_local(tz, date.succ_opt()?, midnight, GapBias::Forward)?;
    TimeWindow::new(start, end)
}

/// Expand a schedule into concrete UTC working windows over `range`.
///
/// For each host-local calendar date touched by the range, a date override
/// (when present) replaces the recurring pattern in full; otherwise each
/// recurring slot for that weekday is converted to UTC. Results are
/// clipped to `range`, sorted by start, and never overlap (overlap within
/// one day is rejected at schedule-edit time).
pub fn expand(schedule: &AvailabilitySchedule, range: &TimeWindow, tz: Tz) -> Vec<TimeWindow> {
    let first_date = range.start.with_timezone(&tz).date_naive();
    let last_date = range.end.with_timezone(&tz).date_naive();

    let mut working = Vec::new();
    let mut date = first_date;
    while date <= last_date {
        working.extend(expand_date(schedule, date, tz, range));
        date = match date.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }
    working.sort_by_key(|w| w.start);
    working
}

fn expand_date(
    schedule: &AvailabilitySchedule,
    date: NaiveDate,
    tz: Tz,
    range: &TimeWindow,
) -> Vec<TimeWindow> {
    let mut windows = Vec::new();

    if let Some(date_override) = schedule.override_for(date) {
        if !date_override.is_working {
            return windows;
        }
        // An empty working override is a configuration mistake; it means
        // no slots that day rather than falling back to the pattern.
        for local in &date_override.windows {
            if let Some(w) = local_window_to_utc(tz, date, local.start_time, local.end_time) {
                if let Some(clipped) = w.intersect(range) {
                    windows.push(clipped);
                }
            }
        }
        return windows;
    }

    use chrono::Datelike;
    for slot in schedule.slots_for_day(date.weekday()) {
        if let Some(w) = local_window_to_utc(tz, date, slot.start_time, slot.end_time) {
            if let Some(clipped) = w.intersect(range) {
                windows.push(clipped);
            }
        }
    }
    windows
}
