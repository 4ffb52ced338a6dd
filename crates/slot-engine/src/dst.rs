//! DST transition policies for wall-clock times.

use serde::{Deserialize, Serialize};

/// Policy for resolving wall-clock times that fall on a DST transition.
///
/// Ambiguous times (the repeated hour when clocks fall back) always resolve to
/// the earlier of the two instants. The policy decides what happens to times
/// that do not exist at all (the skipped hour when clocks spring forward).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DstPolicy {
    /// Drop times that fall in the DST gap (e.g., 2:30 AM during spring forward).
    Skip,
    /// Shift to the first valid time after the gap (2:30 AM becomes 3:00 AM).
    ShiftForward,
    /// Keep the UTC offset in force before the gap, so 2:30 AM EST becomes
    /// 3:30 AM EDT (RFC 5545 semantics).
    #[default]
    WallClock,
}
