//! Calendar provider adapter seam.
//!
//! Connected external calendars are consumed through this narrow trait:
//! already-UTC, already-merged-per-provider busy windows for a host and
//! range. OAuth, token refresh and provider wire formats live outside the
//! engine; multiple connected calendars are queried and unioned by the
//! adapter before the result reaches the aggregator. Results are never
//! cached across requests.

use async_trait::async_trait;

use crate::api::HostId;
use crate::models::TimeWindow;

/// Calendar fetch failures. The aggregation layer maps these through the
/// configured degradation policy; a timed-out fetch is the same failure.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CalendarError {
    #[error("calendar provider unavailable: {0}")]
    Unavailable(String),

    #[error("calendar fetch timed out")]
    Timeout,
}

/// Busy-interval source for one host's connected calendars.
#[async_trait]
pub trait CalendarProvider: Send + Sync {
    /// Busy windows overlapping `range`, UTC, merged per provider.
    async fn get_busy_windows(
        &self,
        host_id: HostId,
        range: &TimeWindow,
    ) -> Result<Vec<TimeWindow>, CalendarError>;
}

/// Provider for hosts with no connected calendar.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCalendar;

#[async_trait]
impl CalendarProvider for NoCalendar {
    async fn get_busy_windows(
        &self,
        _host_id: HostId,
        _range: &TimeWindow,
    ) -> Result<Vec<TimeWindow>, CalendarError> {
        Ok(Vec::new())
    }
}

/// Fixed busy windows, clipped to the queried range. Used in tests and
/// local development.
#[derive(Debug, Clone, Default)]
pub struct StaticCalendar {
    windows: Vec<TimeWindow>,
}

impl StaticCalendar {
    pub fn new(windows: Vec<TimeWindow>) -> Self {
        Self { windows }
    }
}

#[async_trait]
impl CalendarProvider for StaticCalendar {
    async fn get_busy_windows(
        &self,
        _host_id: HostId,
        range: &TimeWindow,
    ) -> Result<Vec<TimeWindow>, CalendarError> {
        Ok(self
            .windows
            .iter()
            .filter_map(|w| w.intersect(range))
            .collect())
    }
}

/// Provider that always fails, for exercising degradation policies.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnreachableCalendar;

#[async_trait]
impl CalendarProvider for UnreachableCalendar {
    async fn get_busy_windows(
        &self,
        _host_id: HostId,
        _range: &TimeWindow,
    ) -> Result<Vec<TimeWindow>, CalendarError> {
        Err(CalendarError::Unavailable("provider offline".to_string()))
    }
}
