//! Half-open UTC time window primitives.
//!
//! Every comparison, merge and subtraction in the engine happens on these
//! UTC windows; host-local wall-clock time only exists at the expansion
//! boundary (`services::recurrence`) and invitee-local time only at the
//! rendering boundary (`http::dto`).

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A half-open interval `[start, end)` of UTC instants.
///
/// Invariant: `start < end`. Empty and inverted windows are never
/// constructed; operations that would produce them return `None` or drop
/// the window from their output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Create a window, returning `None` when `start >= end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        if start < end {
            Some(Self { start, end })
        } else {
            None
        }
    }

    /// Window length.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Whether two windows share any instant.
    ///
    /// Half-open semantics: `[9, 10)` and `[10, 11)` do NOT overlap.
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Whether `other` lies entirely within this window.
    pub fn contains(&self, other: &TimeWindow) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Whether an instant lies within this window.
    pub fn contains_instant(&self, t: DateTime<Utc>) -> bool {
        self.start <= t && t < self.end
    }

    /// Intersection of two windows, `None` when disjoint.
    pub fn intersect(&self, other: &TimeWindow) -> Option<TimeWindow> {
        TimeWindow::new(self.start.max(other.start), self.end.min(other.end))
    }

    /// Subtract `other` from this window.
    ///
    /// Returns the 0, 1 or 2 remaining pieces in chronological order.
    pub fn subtract(&self, other: &TimeWindow) -> Vec<TimeWindow> {
        if !self.overlaps(other) {
            return vec![*self];
        }
        let mut pieces = Vec::with_capacity(2);
        if let Some(before) = TimeWindow::new(self.start, other.start.min(self.end)) {
            pieces.push(before);
        }
        if let Some(after) = TimeWindow::new(other.end.max(self.start), self.end) {
            pieces.push(after);
        }
        pieces
    }

    /// Subtract a set of windows from this one.
    ///
    /// `blockers` need not be sorted or disjoint. The result is sorted and
    /// pairwise disjoint.
    pub fn subtract_all(&self, blockers: &[TimeWindow]) -> Vec<TimeWindow> {
        let mut remaining = vec![*self];
        for blocker in merge_windows(blockers.to_vec()) {
            let mut next = Vec::with_capacity(remaining.len() + 1);
            for piece in &remaining {
                next.extend(piece.subtract(&blocker));
            }
            remaining = next;
            if remaining.is_empty() {
                break;
            }
        }
        remaining
    }

    /// Grow the window by `before` on the start side and `after` on the
    /// end side. Used to expand a booking by its event type's buffers.
    pub fn expanded(&self, before: Duration, after: Duration) -> TimeWindow {
        TimeWindow {
            start: self.start - before,
            end: self.end + after,
        }
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}

/// Coalesce a set of windows into maximal disjoint runs.
///
/// Overlapping and back-to-back adjacent windows are merged. The output is
/// sorted by start and independent of input order, which is what makes
/// busy-time aggregation deterministic.
pub fn merge_windows(mut windows: Vec<TimeWindow>) -> Vec<TimeWindow> {
    if windows.len() <= 1 {
        return windows;
    }
    windows.sort_by_key(|w| (w.start, w.end));
    let mut merged: Vec<TimeWindow> = Vec::with_capacity(windows.len());
    for window in windows {
        match merged.last_mut() {
            // Adjacent (end == start) runs coalesce too.
            Some(last) if window.start <= last.end => {
                last.end = last.end.max(window.end);
            }
            _ => merged.push(window),
        }
    }
    merged
}

#[cfg(test)]
#[path = "time_tests.rs"]
mod time_tests;
