//! Enumerate candidate slot starts inside free windows.
//!
//! Starts come from three sources: a fixed grid anchored at each window's
//! start, explicit custom wall-clock times, and "smart" starts flush with
//! window edges or immediately after an exclusion interval. Custom times
//! replace the grid; smart starts are added on top of whichever is in use.

use chrono::{DateTime, Duration, Utc};
use tracing::trace;

use crate::config::SlotConfig;
use crate::normalize::ExclusionSet;
use crate::windows::FreeWindow;
use crate::zone::Zone;

/// A possible slot, tied to the window it was generated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Index of the source window in the slice passed to [`generate_candidates`].
    pub window: usize,
}

/// Generate candidates for every window that can hold `duration`.
///
/// `not_before` drops candidates starting earlier than the given instant.
/// The result is sorted by start and contains no duplicate starts.
pub fn generate_candidates(
    windows: &[FreeWindow],
    exclusions: &ExclusionSet,
    duration: Duration,
    config: &SlotConfig,
    zone: &Zone,
    not_before: Option<DateTime<Utc>>,
) -> Vec<CandidateSlot> {
    let duration_minutes = duration.num_minutes();
    let step = Duration::try_minutes(config.granularity_minutes(duration_minutes))
        .filter(|s| *s > Duration::zero())
        .unwrap_or(duration);

    let mut candidates = Vec::new();
    for (index, window) in windows.iter().enumerate() {
        if !window.fits(duration) {
            continue;
        }
        let latest = window.end - duration;

        let mut starts = match &config.custom_slot_start_times {
            Some(times) => times
                .iter()
                .filter_map(|t| zone.resolve(window.date, *t))
                .filter(|s| *s >= window.start && *s <= latest)
                .collect(),
            None => grid_starts(window.start, latest, step),
        };

        if config.allow_smart_slot_starts {
            starts.push(window.start);
            starts.push(latest);
            let list = match (&exclusions.unbuffered, window.relaxed) {
                (Some(raw), true) => raw.as_slice(),
                _ => exclusions.buffered.as_slice(),
            };
            starts.extend(
                list.iter()
                    .map(|&(_, end)| end)
                    .filter(|end| *end >= window.start && *end <= latest),
            );
        }

        if let Some(limit) = not_before {
            starts.retain(|s| *s >= limit);
        }

        starts.sort();
        starts.dedup();
        trace!(
            window_start = %window.start,
            window_end = %window.end,
            candidates = starts.len(),
            "generated window candidates"
        );

        candidates.extend(starts.into_iter().map(|start| CandidateSlot {
            start,
            end: start + duration,
            window: index,
        }));
    }

    candidates.sort_by_key(|c| (c.start, c.end));
    candidates.dedup_by_key(|c| c.start);
    candidates
}

fn grid_starts(first: DateTime<Utc>, latest: DateTime<Utc>, step: Duration) -> Vec<DateTime<Utc>> {
    let mut starts = Vec::new();
    let mut cursor = Some(first);
    while let Some(start) = cursor.filter(|s| *s <= latest) {
        starts.push(start);
        cursor = start.checked_add_signed(step);
    }
    starts
}
