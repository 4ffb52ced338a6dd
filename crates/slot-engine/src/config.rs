//! Scheduling preferences for a single availability computation.

use serde::{Deserialize, Serialize};

use crate::schedule::WallTime;

/// Per-request slot configuration. Every field is optional and independently
/// togglable; the `Default` value generates plain chronological grid slots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SlotConfig {
    /// Buffer required between a busy interval and any slot, on both sides.
    pub break_duration_minutes: Option<i64>,
    /// Grid spacing for candidate starts. Defaults to the requested duration.
    pub slot_granularity_minutes: Option<i64>,
    /// Drop the break buffer for a shift when it would otherwise hold no slot.
    pub allow_skip_break: bool,
    /// Explicit start times. When set, they replace the grid.
    pub custom_slot_start_times: Option<Vec<WallTime>>,
    /// Add starts flush with window edges and right after busy intervals.
    pub allow_smart_slot_starts: bool,
    pub prefer_back_to_back: bool,
    pub discourage_large_gaps: bool,
    pub lower_priority_if_no_following_booking: bool,
    pub prefer_later_starts: bool,
    pub prefer_earlier_ends: bool,
    /// Drop discouraged slots instead of listing them last.
    pub filter_low_priority_slots: bool,
    /// Slots must start at least this long after the request's `now`.
    pub minimum_notice_minutes: Option<i64>,
}

impl SlotConfig {
    /// Break buffer in minutes; negative values count as no buffer.
    pub fn break_minutes(&self) -> i64 {
        self.break_duration_minutes.unwrap_or(0).max(0)
    }

    /// Grid spacing for a given duration. Non-positive spacing falls back to the duration.
    pub fn granularity_minutes(&self, duration_minutes: i64) -> i64 {
        match self.slot_granularity_minutes {
            Some(g) if g > 0 => g,
            _ => duration_minutes,
        }
    }

    pub fn gap_penalty_enabled(&self) -> bool {
        self.discourage_large_gaps || self.lower_priority_if_no_following_booking
    }

    pub fn skip_break_enabled(&self) -> bool {
        self.allow_skip_break && self.break_minutes() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_camel_case_with_missing_fields() {
        let config: SlotConfig = serde_json::from_str(
            r#"{"breakDurationMinutes": 15, "preferBackToBack": true,
                "customSlotStartTimes": ["09:15", "13:45"]}"#,
        )
        .unwrap();
        assert_eq!(config.break_minutes(), 15);
        assert!(config.prefer_back_to_back);
        assert!(!config.allow_skip_break);
        assert_eq!(config.custom_slot_start_times.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn granularity_defaults_to_duration() {
        let mut config = SlotConfig::default();
        assert_eq!(config.granularity_minutes(45), 45);
        config.slot_granularity_minutes = Some(0);
        assert_eq!(config.granularity_minutes(45), 45);
        config.slot_granularity_minutes = Some(15);
        assert_eq!(config.granularity_minutes(45), 15);
    }

    #[test]
    fn either_gap_flag_enables_the_penalty() {
        let config = SlotConfig {
            lower_priority_if_no_following_booking: true,
            ..SlotConfig::default()
        };
        assert!(config.gap_penalty_enabled());
        assert!(!SlotConfig::default().gap_penalty_enabled());
    }
}
