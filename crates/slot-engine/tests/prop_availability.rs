//! Property-based tests for slot computation using proptest.
//!
//! These verify invariants that hold for *any* working day and busy set, not
//! just the scenarios in `availability_tests.rs`.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use slot_engine::windows::resolve_shift;
use slot_engine::{
    compute_availability, AvailabilityRequest, BusyInterval, DaySchedule, SearchWindow, Shift,
    SlotConfig, TimeSlot, WallTime, Zone,
};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// Two non-overlapping shifts between 06:00 and 20:00, in 5 minute units.
fn arb_shifts() -> impl Strategy<Value = Vec<(u32, u32)>> {
    prop::collection::btree_set(72u32..=240, 4).prop_map(|set| {
        let v: Vec<u32> = set.into_iter().collect();
        vec![(v[0] * 5, v[1] * 5), (v[2] * 5, v[3] * 5)]
    })
}

/// Busy intervals between 02:00 and 22:00, 5 to 120 minutes long.
fn arb_busy() -> impl Strategy<Value = Vec<(u32, u32)>> {
    prop::collection::vec((24u32..=240, 1u32..=24), 0..6)
        .prop_map(|v| v.into_iter().map(|(s, l)| (s * 5, (s + l) * 5)).collect())
}

fn arb_duration() -> impl Strategy<Value = i64> {
    prop_oneof![Just(15i64), Just(30), Just(45), Just(60)]
}

fn arb_break() -> impl Strategy<Value = Option<i64>> {
    prop_oneof![Just(None), Just(Some(5i64)), Just(Some(15)), Just(Some(30))]
}

fn arb_config() -> impl Strategy<Value = SlotConfig> {
    (
        arb_break(),
        prop_oneof![Just(None), Just(Some(10i64)), Just(Some(15)), Just(Some(30))],
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(
            |(brk, gran, smart, b2b, gaps, later, earlier, filter)| SlotConfig {
                break_duration_minutes: brk,
                slot_granularity_minutes: gran,
                allow_smart_slot_starts: smart,
                prefer_back_to_back: b2b,
                discourage_large_gaps: gaps,
                prefer_later_starts: later,
                prefer_earlier_ends: earlier,
                filter_low_priority_slots: filter,
                ..SlotConfig::default()
            },
        )
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 16).unwrap()
}

fn minute(m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 16, 0, 0, 0).unwrap() + Duration::minutes(m as i64)
}

fn wall(m: u32) -> WallTime {
    WallTime::new(m / 60, m % 60).unwrap()
}

fn build(
    shifts: &[(u32, u32)],
    busy: &[(u32, u32)],
    duration: i64,
    config: SlotConfig,
) -> AvailabilityRequest {
    let day_schedule = DaySchedule::new(
        shifts
            .iter()
            .map(|&(s, e)| Shift::new(wall(s), wall(e)).unwrap())
            .collect(),
    )
    .unwrap();
    let mut req = AvailabilityRequest::new(
        Zone::utc(),
        BTreeMap::from([(day(), day_schedule)]),
        duration,
        SearchWindow::new(minute(0), minute(24 * 60)),
    );
    req.busy = busy
        .iter()
        .map(|&(s, e)| BusyInterval::new(minute(s), minute(e)))
        .collect();
    req.config = config;
    req
}

fn count(req: &AvailabilityRequest) -> usize {
    compute_availability(req).unwrap().len()
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config())]

    #[test]
    fn slots_lie_inside_a_shift_with_exact_duration(
        shifts in arb_shifts(),
        busy in arb_busy(),
        duration in arb_duration(),
        config in arb_config(),
    ) {
        let req = build(&shifts, &busy, duration, config);
        let slots = compute_availability(&req).unwrap();
        let bounds: Vec<_> = req.schedule[&day()]
            .shifts()
            .iter()
            .filter_map(|s| resolve_shift(day(), s, &req.zone))
            .collect();

        for slot in &slots {
            prop_assert_eq!(slot.duration_minutes(), duration);
            let inside = bounds
                .iter()
                .filter(|(start, end)| slot.start >= *start && slot.end <= *end)
                .count();
            prop_assert_eq!(inside, 1, "slot {:?} not inside exactly one shift", slot);
        }
    }

    #[test]
    fn slots_respect_buffered_busy_time(
        shifts in arb_shifts(),
        busy in arb_busy(),
        duration in arb_duration(),
        config in arb_config(),
    ) {
        let buffer = Duration::minutes(config.break_minutes());
        let req = build(&shifts, &busy, duration, config);
        for slot in compute_availability(&req).unwrap() {
            for b in &req.busy {
                prop_assert!(
                    !slot.overlaps(b.start - buffer, b.end + buffer),
                    "slot {:?} overlaps buffered busy {:?}", slot, b
                );
            }
        }
    }

    #[test]
    fn skip_break_still_respects_raw_busy_time(
        shifts in arb_shifts(),
        busy in arb_busy(),
        duration in arb_duration(),
        config in arb_config(),
    ) {
        let config = SlotConfig { allow_skip_break: true, ..config };
        let req = build(&shifts, &busy, duration, config);
        for slot in compute_availability(&req).unwrap() {
            for b in &req.busy {
                prop_assert!(!slot.overlaps(b.start, b.end));
            }
        }
    }

    #[test]
    fn skip_break_never_loses_slots_in_a_shift(
        shifts in arb_shifts(),
        busy in arb_busy(),
        duration in arb_duration(),
        config in arb_config(),
    ) {
        // The fallback only ever replaces a shift that had no slot at all.
        let base = SlotConfig { filter_low_priority_slots: false, ..config };
        let strict = build(&shifts, &busy, duration, SlotConfig { allow_skip_break: false, ..base.clone() });
        let relaxed = build(&shifts, &busy, duration, SlotConfig { allow_skip_break: true, ..base });
        let relaxed_slots: Vec<TimeSlot> = compute_availability(&relaxed).unwrap();
        for slot in compute_availability(&strict).unwrap() {
            prop_assert!(relaxed_slots.contains(&slot), "slot {:?} lost by fallback", slot);
        }
    }

    #[test]
    fn computation_is_deterministic(
        shifts in arb_shifts(),
        busy in arb_busy(),
        duration in arb_duration(),
        config in arb_config(),
    ) {
        let req = build(&shifts, &busy, duration, config);
        prop_assert_eq!(compute_availability(&req).unwrap(), compute_availability(&req).unwrap());

        let mut reversed = req.clone();
        reversed.busy.reverse();
        prop_assert_eq!(compute_availability(&req).unwrap(), compute_availability(&reversed).unwrap());
    }

    #[test]
    fn adding_busy_time_never_adds_slots(
        shifts in arb_shifts(),
        busy in arb_busy(),
        extra in (24u32..=240, 1u32..=24),
        duration in arb_duration(),
        brk in arb_break(),
        b2b in any::<bool>(),
        gaps in any::<bool>(),
    ) {
        // Grid spacing no larger than the duration, no smart starts, no fallback.
        let config = SlotConfig {
            break_duration_minutes: brk,
            slot_granularity_minutes: Some(duration),
            prefer_back_to_back: b2b,
            discourage_large_gaps: gaps,
            ..SlotConfig::default()
        };
        let before = build(&shifts, &busy, duration, config.clone());
        let mut more_busy = busy.clone();
        more_busy.push((extra.0 * 5, (extra.0 + extra.1) * 5));
        let after = build(&shifts, &more_busy, duration, config);
        prop_assert!(count(&after) <= count(&before));
    }

    #[test]
    fn relaxing_the_filter_never_removes_slots(
        shifts in arb_shifts(),
        busy in arb_busy(),
        duration in arb_duration(),
        config in arb_config(),
    ) {
        let filtered = build(&shifts, &busy, duration, SlotConfig { filter_low_priority_slots: true, ..config.clone() });
        let unfiltered = build(&shifts, &busy, duration, SlotConfig { filter_low_priority_slots: false, ..config });
        prop_assert!(count(&unfiltered) >= count(&filtered));
    }

    #[test]
    fn without_preferences_output_is_chronological(
        shifts in arb_shifts(),
        busy in arb_busy(),
        duration in arb_duration(),
        brk in arb_break(),
        smart in any::<bool>(),
    ) {
        let config = SlotConfig {
            break_duration_minutes: brk,
            allow_smart_slot_starts: smart,
            ..SlotConfig::default()
        };
        let slots = compute_availability(&build(&shifts, &busy, duration, config)).unwrap();
        prop_assert!(slots.windows(2).all(|w| w[0].start < w[1].start));
    }
}
