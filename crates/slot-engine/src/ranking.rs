//! Score candidates against scheduling preferences and order them.
//!
//! Every candidate starts in the `Normal` tier. Back-to-back placement can
//! promote it to `Preferred`; leaving an unusable sliver in its window demotes
//! it to `Discouraged`, which wins over a promotion. Tiers are emitted in
//! order, and within a tier the configured start/end bias decides the order.

use std::cmp::Ordering;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::candidates::CandidateSlot;
use crate::config::SlotConfig;
use crate::windows::FreeWindow;

/// Two instants closer than this count as the same boundary.
const BOUNDARY_TOLERANCE_SECS: i64 = 60;

/// Ranking bucket, ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PriorityTier {
    Preferred,
    Normal,
    Discouraged,
}

/// A candidate with its tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedSlot {
    pub slot: CandidateSlot,
    pub tier: PriorityTier,
}

/// The shortest booking length worth keeping room for.
///
/// Non-positive entries are ignored; without any usable entry the requested
/// duration is the only typical duration.
pub fn smallest_typical_duration(duration: Duration, other_typical_minutes: Option<&[i64]>) -> Duration {
    other_typical_minutes
        .unwrap_or_default()
        .iter()
        .copied()
        .filter(|m| *m > 0)
        .filter_map(Duration::try_minutes)
        .min()
        .unwrap_or(duration)
}

/// Tier for one candidate inside its window.
pub fn classify(
    candidate: &CandidateSlot,
    window: &FreeWindow,
    config: &SlotConfig,
    smallest_typical: Duration,
) -> PriorityTier {
    if config.gap_penalty_enabled() {
        let leftover = window.end - candidate.end;
        if leftover > Duration::zero() && leftover < smallest_typical {
            return PriorityTier::Discouraged;
        }
    }

    if config.prefer_back_to_back {
        let after_busy = window.follows_busy && same_boundary(candidate.start, window.start);
        let before_busy = window.precedes_busy && same_boundary(candidate.end, window.end);
        if after_busy || before_busy {
            return PriorityTier::Preferred;
        }
    }

    PriorityTier::Normal
}

/// Assign tiers, order, and drop the low-priority tier when configured.
///
/// `windows` must be the slice the candidates were generated from.
pub fn rank_candidates(
    candidates: &[CandidateSlot],
    windows: &[FreeWindow],
    duration: Duration,
    config: &SlotConfig,
    other_typical_minutes: Option<&[i64]>,
) -> Vec<RankedSlot> {
    let smallest = smallest_typical_duration(duration, other_typical_minutes);

    let mut ranked: Vec<RankedSlot> = candidates
        .iter()
        .filter_map(|c| {
            let window = windows.get(c.window)?;
            Some(RankedSlot {
                slot: *c,
                tier: classify(c, window, config, smallest),
            })
        })
        .filter(|r| !(config.filter_low_priority_slots && r.tier == PriorityTier::Discouraged))
        .collect();

    ranked.sort_by(|a, b| a.tier.cmp(&b.tier).then_with(|| within_tier(&a.slot, &b.slot, config)));
    ranked
}

fn within_tier(a: &CandidateSlot, b: &CandidateSlot, config: &SlotConfig) -> Ordering {
    match (config.prefer_later_starts, config.prefer_earlier_ends) {
        (false, false) => a.start.cmp(&b.start),
        (true, false) => b.start.cmp(&a.start),
        (false, true) => a.end.cmp(&b.end).then_with(|| a.start.cmp(&b.start)),
        (true, true) => a.end.cmp(&b.end).then_with(|| b.start.cmp(&a.start)),
    }
}

fn same_boundary(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    (a - b).num_seconds().abs() < BOUNDARY_TOLERANCE_SECS
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 16, h, m, 0).unwrap()
    }

    fn window(start: DateTime<Utc>, end: DateTime<Utc>, follows: bool, precedes: bool) -> FreeWindow {
        FreeWindow {
            date: NaiveDate::from_ymd_opt(2026, 3, 16).unwrap(),
            start,
            end,
            follows_busy: follows,
            precedes_busy: precedes,
            relaxed: false,
        }
    }

    fn slot(h: u32, m: u32) -> CandidateSlot {
        let start = at(h, m);
        CandidateSlot {
            start,
            end: start + Duration::minutes(30),
            window: 0,
        }
    }

    #[test]
    fn tiers_are_ordered_best_first() {
        assert!(PriorityTier::Preferred < PriorityTier::Normal);
        assert!(PriorityTier::Normal < PriorityTier::Discouraged);
    }

    #[test]
    fn back_to_back_is_preferred() {
        let w = window(at(10, 30), at(12, 0), true, true);
        let config = SlotConfig {
            prefer_back_to_back: true,
            ..SlotConfig::default()
        };
        let half_hour = Duration::minutes(30);
        assert_eq!(classify(&slot(10, 30), &w, &config, half_hour), PriorityTier::Preferred);
        assert_eq!(classify(&slot(11, 30), &w, &config, half_hour), PriorityTier::Preferred);
        assert_eq!(classify(&slot(11, 0), &w, &config, half_hour), PriorityTier::Normal);
    }

    #[test]
    fn shift_edges_are_not_back_to_back() {
        let w = window(at(9, 0), at(10, 0), false, false);
        let config = SlotConfig {
            prefer_back_to_back: true,
            ..SlotConfig::default()
        };
        assert_eq!(
            classify(&slot(9, 0), &w, &config, Duration::minutes(30)),
            PriorityTier::Normal
        );
    }

    #[test]
    fn sliver_leftover_is_discouraged_even_when_back_to_back() {
        // 10:30-11:15 window, 30 min slot at 10:30 leaves 15 min.
        let w = window(at(10, 30), at(11, 15), true, false);
        let config = SlotConfig {
            prefer_back_to_back: true,
            discourage_large_gaps: true,
            ..SlotConfig::default()
        };
        assert_eq!(
            classify(&slot(10, 30), &w, &config, Duration::minutes(30)),
            PriorityTier::Discouraged
        );
        // A 15 minute booking type makes the sliver usable again.
        assert_eq!(
            classify(&slot(10, 30), &w, &config, Duration::minutes(15)),
            PriorityTier::Preferred
        );
    }

    #[test]
    fn smallest_typical_ignores_nonsense_entries() {
        let d = Duration::minutes(30);
        assert_eq!(smallest_typical_duration(d, None), d);
        assert_eq!(smallest_typical_duration(d, Some(&[])), d);
        assert_eq!(smallest_typical_duration(d, Some(&[0, -5, 45, 20])), Duration::minutes(20));
    }

    #[test]
    fn ordering_and_filtering() {
        let windows = vec![window(at(9, 0), at(10, 45), false, false)];
        let candidates = vec![slot(9, 0), slot(9, 30), slot(10, 0)];

        let mut config = SlotConfig {
            discourage_large_gaps: true,
            ..SlotConfig::default()
        };
        // 10:00 leaves 15 minutes, below the 30 minute typical duration.
        let ranked = rank_candidates(&candidates, &windows, Duration::minutes(30), &config, None);
        let order: Vec<_> = ranked.iter().map(|r| r.slot.start).collect();
        assert_eq!(order, vec![at(9, 0), at(9, 30), at(10, 0)]);
        assert_eq!(ranked[2].tier, PriorityTier::Discouraged);

        config.prefer_later_starts = true;
        let ranked = rank_candidates(&candidates, &windows, Duration::minutes(30), &config, None);
        let order: Vec<_> = ranked.iter().map(|r| r.slot.start).collect();
        assert_eq!(order, vec![at(9, 30), at(9, 0), at(10, 0)]);

        config.filter_low_priority_slots = true;
        let ranked = rank_candidates(&candidates, &windows, Duration::minutes(30), &config, None);
        assert_eq!(ranked.len(), 2);
        assert!(ranked.iter().all(|r| r.tier == PriorityTier::Normal));
    }
}
