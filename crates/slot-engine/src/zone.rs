//! Timezone resolution for wall-clock times.
//!
//! A [`Zone`] is passed into every computation explicitly; nothing about the
//! zone is cached between calls.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;

use crate::dst::DstPolicy;
use crate::error::{Result, SlotError};
use crate::schedule::WallTime;

/// Upper bound on how far a DST gap search walks, in minutes.
const MAX_GAP_MINUTES: i64 = 24 * 60;

/// An IANA timezone together with the policy for DST gaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Zone {
    tz: Tz,
    dst_policy: DstPolicy,
}

impl Zone {
    pub fn new(tz: Tz, dst_policy: DstPolicy) -> Self {
        Self { tz, dst_policy }
    }

    pub fn utc() -> Self {
        Self::new(Tz::UTC, DstPolicy::default())
    }

    /// Parse an IANA timezone name (e.g., "America/New_York").
    ///
    /// # Errors
    /// Returns `SlotError::InvalidTimezone` if the name is not a known IANA identifier.
    pub fn parse(name: &str, dst_policy: DstPolicy) -> Result<Self> {
        let tz: Tz = name
            .parse()
            .map_err(|_| SlotError::InvalidTimezone(name.to_string()))?;
        Ok(Self::new(tz, dst_policy))
    }

    /// The local calendar date of an instant.
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.tz).date_naive()
    }

    /// Render an instant in this zone.
    pub fn localize(&self, instant: DateTime<Utc>) -> DateTime<Tz> {
        instant.with_timezone(&self.tz)
    }

    /// The first instant of a local date.
    ///
    /// Independent of the DST policy: when midnight falls in a gap the day
    /// starts at the first valid instant after it.
    pub fn start_of_day(&self, date: NaiveDate) -> DateTime<Utc> {
        let midnight = date.and_time(chrono::NaiveTime::MIN);
        match self.tz.from_local_datetime(&midnight) {
            LocalResult::Single(dt) => dt.with_timezone(&Utc),
            LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
            LocalResult::None => self
                .first_valid_after(midnight)
                .unwrap_or_else(|| Utc.from_utc_datetime(&midnight)),
        }
    }

    /// The first instant of the local date following `date`.
    pub fn end_of_day(&self, date: NaiveDate) -> DateTime<Utc> {
        match date.succ_opt() {
            Some(next) => self.start_of_day(next),
            None => DateTime::<Utc>::MAX_UTC,
        }
    }

    /// Resolve a wall-clock time on a date to an absolute instant.
    ///
    /// Returns `None` only when the time falls in a DST gap and the policy is
    /// [`DstPolicy::Skip`]. `24:00` resolves to midnight starting the next date.
    pub fn resolve(&self, date: NaiveDate, wall: WallTime) -> Option<DateTime<Utc>> {
        if wall.is_end_of_day() {
            return Some(self.end_of_day(date));
        }
        let naive = date.and_time(wall.to_naive_time()?);
        match self.tz.from_local_datetime(&naive) {
            LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
            LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
            LocalResult::None => match self.dst_policy {
                DstPolicy::Skip => None,
                DstPolicy::ShiftForward => self.first_valid_after(naive),
                DstPolicy::WallClock => self.with_offset_before_gap(naive),
            },
        }
    }

    fn first_valid_after(&self, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
        (1..=MAX_GAP_MINUTES).find_map(|m| {
            self.tz
                .from_local_datetime(&(naive + Duration::minutes(m)))
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
        })
    }

    fn with_offset_before_gap(&self, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
        let before = (1..=MAX_GAP_MINUTES).find_map(|m| {
            self.tz
                .from_local_datetime(&(naive - Duration::minutes(m)))
                .latest()
        })?;
        let offset_secs = before.offset().fix().local_minus_utc() as i64;
        Some(Utc.from_utc_datetime(&(naive - Duration::seconds(offset_secs))))
    }
}

impl Default for Zone {
    fn default() -> Self {
        Self::utc()
    }
}
