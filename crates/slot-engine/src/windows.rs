//! Extract free windows from working shifts.
//!
//! Resolves each shift of each date in the search window to absolute
//! instants, clips it to the search window and subtracts the exclusion
//! intervals. The gaps left over are the free windows. The break buffer is
//! dropped for a single shift only when it would otherwise leave no room for
//! the requested duration.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use tracing::debug;

use crate::normalize::{ExclusionSet, Span};
use crate::schedule::{DaySchedule, Shift};
use crate::zone::Zone;

/// A maximal stretch of free time inside one shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeWindow {
    /// The schedule date of the shift this window belongs to.
    pub date: NaiveDate,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// The window starts where an exclusion interval ends.
    pub follows_busy: bool,
    /// The window ends where an exclusion interval starts.
    pub precedes_busy: bool,
    /// Computed from the unbuffered busy list because the break buffer left
    /// the shift without room.
    pub relaxed: bool,
}

impl FreeWindow {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn fits(&self, duration: Duration) -> bool {
        self.duration() >= duration
    }
}

/// Resolve a shift on a date to absolute instants.
///
/// Returns `None` when a boundary falls in a DST gap that the zone's policy
/// skips, or when DST resolution collapses the shift.
pub fn resolve_shift(date: NaiveDate, shift: &Shift, zone: &Zone) -> Option<Span> {
    let start = zone.resolve(date, shift.start)?;
    let end = zone.resolve(date, shift.end)?;
    (start < end).then_some((start, end))
}

/// Compute the free windows of every shift intersecting `search`.
///
/// Windows are returned in chronological order.
pub fn extract_windows(
    schedule: &BTreeMap<NaiveDate, DaySchedule>,
    exclusions: &ExclusionSet,
    search: Span,
    duration: Duration,
    zone: &Zone,
) -> Vec<FreeWindow> {
    let (search_start, search_end) = search;
    if search_start >= search_end {
        return Vec::new();
    }
    let first_day = zone.local_date(search_start);
    let last_day = zone.local_date(search_end - Duration::nanoseconds(1));

    let mut windows = Vec::new();
    for (date, day) in schedule.range(first_day..=last_day) {
        for shift in day.shifts() {
            let Some((shift_start, shift_end)) = resolve_shift(*date, shift, zone) else {
                continue;
            };
            let bounds = (shift_start.max(search_start), shift_end.min(search_end));
            if bounds.0 >= bounds.1 {
                continue;
            }
            windows.extend(shift_windows(*date, bounds, exclusions, duration));
        }
    }

    windows.sort_by_key(|w| (w.start, w.end));
    windows
}

/// Windows of one clipped shift, falling back to the unbuffered exclusions
/// when the buffered ones leave no room for `duration`.
fn shift_windows(
    date: NaiveDate,
    bounds: Span,
    exclusions: &ExclusionSet,
    duration: Duration,
) -> Vec<FreeWindow> {
    let windows = subtract(date, bounds, &exclusions.buffered, false);

    if let Some(raw) = &exclusions.unbuffered {
        if !windows.iter().any(|w| w.fits(duration)) {
            let relaxed = subtract(date, bounds, raw, true);
            if relaxed.iter().any(|w| w.fits(duration)) {
                debug!(
                    %date,
                    shift_start = %bounds.0,
                    shift_end = %bounds.1,
                    "break buffer leaves no room; using unbuffered busy list"
                );
                return relaxed;
            }
        }
    }

    windows
}

/// Subtract sorted, disjoint exclusions from `bounds`.
fn subtract(date: NaiveDate, bounds: Span, exclusions: &[Span], relaxed: bool) -> Vec<FreeWindow> {
    let (lo, hi) = bounds;
    let mut windows = Vec::new();
    let mut cursor = lo;
    let mut follows_busy = exclusions.iter().any(|&(_, end)| end == lo);

    for &(ex_start, ex_end) in exclusions.iter().filter(|&&(s, e)| s < hi && e > lo) {
        if cursor < ex_start {
            windows.push(FreeWindow {
                date,
                start: cursor,
                end: ex_start,
                follows_busy,
                precedes_busy: true,
                relaxed,
            });
        }
        if ex_end > cursor {
            cursor = ex_end;
            follows_busy = true;
        }
    }

    if cursor < hi {
        windows.push(FreeWindow {
            date,
            start: cursor,
            end: hi,
            follows_busy,
            precedes_busy: exclusions.iter().any(|&(start, _)| start == hi),
            relaxed,
        });
    }

    windows
}
