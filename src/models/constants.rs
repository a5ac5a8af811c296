//! Engine floors and safety caps.

/// Smallest allowed event duration, in minutes. Event types configured
/// below this floor are rejected at save time.
pub const MIN_SLOT_DURATION_MINUTES: i64 = 5;

/// Smallest allowed slot stepping interval, in minutes.
pub const MIN_SLOT_INTERVAL_MINUTES: i64 = 5;

/// Hard cap on offered slots per host-local date. Hitting the cap
/// truncates the date's slot list and flags the response as truncated.
pub const MAX_SLOTS_PER_DAY: usize = 100;

/// Hard cap on how many days past the query start a slot query will
/// process. Longer ranges are truncated, not rejected.
pub const MAX_DAYS_TO_PROCESS: i64 = 90;
