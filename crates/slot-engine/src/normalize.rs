//! Normalize busy intervals into sorted, disjoint exclusion intervals.
//!
//! Each busy interval is widened by the configured break buffer, then the set
//! is sorted and overlapping or touching intervals are merged. Buffers never
//! cross the local midnight bounding the busy interval.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::config::SlotConfig;
use crate::zone::Zone;

/// A half-open `[start, end)` span of absolute time.
pub type Span = (DateTime<Utc>, DateTime<Utc>);

/// A pre-existing commitment that blocks availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl BusyInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn span(&self) -> Span {
        (self.start, self.end)
    }
}

/// Exclusion intervals derived from the busy set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExclusionSet {
    /// Busy intervals widened by the break buffer, merged.
    pub buffered: Vec<Span>,
    /// Raw busy intervals, merged. Only present when skipping the break is allowed.
    pub unbuffered: Option<Vec<Span>>,
}

/// Build the exclusion set for a busy list.
///
/// Busy intervals with `start >= end` carry no busy time and are dropped.
pub fn normalize(busy: &[BusyInterval], config: &SlotConfig, zone: &Zone) -> ExclusionSet {
    // A buffer past the TimeDelta range is clamped to the local day like any
    // other buffer longer than a day.
    let buffer = Duration::try_minutes(config.break_minutes()).unwrap_or(Duration::MAX);
    let valid = busy.iter().filter(|b| b.start < b.end);

    let buffered = merge_intervals(valid.clone().map(|b| widen(b, buffer, zone)));
    let unbuffered = config
        .skip_break_enabled()
        .then(|| merge_intervals(valid.map(BusyInterval::span)));

    ExclusionSet {
        buffered,
        unbuffered,
    }
}

/// Sort intervals and merge the ones that overlap or touch.
///
/// Returns a sorted, non-overlapping list.
pub fn merge_intervals(intervals: impl IntoIterator<Item = Span>) -> Vec<Span> {
    let mut intervals: Vec<Span> = intervals.into_iter().filter(|(s, e)| s < e).collect();
    if intervals.is_empty() {
        return Vec::new();
    }

    intervals.sort_by_key(|&(start, end)| (start, end));

    let mut merged: Vec<Span> = Vec::with_capacity(intervals.len());
    for (start, end) in intervals {
        if let Some(last) = merged.last_mut() {
            if start <= last.1 {
                last.1 = last.1.max(end);
                continue;
            }
        }
        merged.push((start, end));
    }

    merged
}

/// Widen a busy interval by `buffer` on both sides, clamped to its local days.
fn widen(busy: &BusyInterval, buffer: Duration, zone: &Zone) -> Span {
    if buffer <= Duration::zero() {
        return busy.span();
    }
    let day_start = zone.start_of_day(zone.local_date(busy.start));
    // The last covered instant decides the day, so an interval ending at
    // midnight gets no trailing buffer.
    let last_day = zone.local_date(busy.end - Duration::nanoseconds(1));
    let day_end = zone.end_of_day(last_day);

    let start = busy
        .start
        .checked_sub_signed(buffer)
        .unwrap_or(day_start)
        .max(day_start.min(busy.start));
    let end = busy
        .end
        .checked_add_signed(buffer)
        .unwrap_or(day_end)
        .min(day_end.max(busy.end));
    (start, end)
}
