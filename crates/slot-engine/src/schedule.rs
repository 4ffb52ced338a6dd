//! Working hours: wall-clock times, shifts, per-date schedules and manual
//! weekly schedules.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};

const MINUTES_PER_DAY: u16 = 24 * 60;

/// A clock time without a date, at minute precision.
///
/// Serialized as `"HH:MM"`. `"24:00"` is accepted and means the midnight that
/// ends the day, which is only useful as a shift end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WallTime {
    minutes: u16,
}

impl WallTime {
    pub const END_OF_DAY: WallTime = WallTime {
        minutes: MINUTES_PER_DAY,
    };

    /// # Errors
    /// Returns `SlotError::InvalidWallTime` for anything past `24:00`.
    pub fn new(hour: u32, minute: u32) -> Result<Self> {
        let valid = (hour < 24 && minute < 60) || (hour == 24 && minute == 0);
        if !valid {
            return Err(SlotError::InvalidWallTime(format!(
                "{:02}:{:02}",
                hour, minute
            )));
        }
        Ok(Self {
            minutes: (hour * 60 + minute) as u16,
        })
    }

    pub fn hour(&self) -> u32 {
        u32::from(self.minutes / 60)
    }

    pub fn minute(&self) -> u32 {
        u32::from(self.minutes % 60)
    }

    pub fn is_end_of_day(&self) -> bool {
        self.minutes == MINUTES_PER_DAY
    }

    /// `None` for `24:00`, which has no `NaiveTime` representation.
    pub fn to_naive_time(&self) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(self.hour(), self.minute(), 0)
    }
}

impl FromStr for WallTime {
    type Err = SlotError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || SlotError::InvalidWallTime(s.to_string());
        let (h, m) = s.trim().split_once(':').ok_or_else(invalid)?;
        if h.is_empty() || h.len() > 2 || m.len() != 2 {
            return Err(invalid());
        }
        let hour: u32 = h.parse().map_err(|_| invalid())?;
        let minute: u32 = m.parse().map_err(|_| invalid())?;
        Self::new(hour, minute).map_err(|_| invalid())
    }
}

impl TryFrom<String> for WallTime {
    type Error = SlotError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<WallTime> for String {
    fn from(value: WallTime) -> Self {
        value.to_string()
    }
}

impl fmt::Display for WallTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// One working-hours interval within a calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    pub start: WallTime,
    pub end: WallTime,
}

impl Shift {
    /// # Errors
    /// Returns `SlotError::InvalidShift` unless `start < end`.
    pub fn new(start: WallTime, end: WallTime) -> Result<Self> {
        let shift = Self { start, end };
        shift.validate()?;
        Ok(shift)
    }

    pub fn validate(&self) -> Result<()> {
        if self.start >= self.end {
            return Err(SlotError::InvalidShift(format!(
                "{}-{}: start must be before end",
                self.start, self.end
            )));
        }
        Ok(())
    }
}

/// The ordered, non-overlapping shifts of one date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DaySchedule(Vec<Shift>);

impl DaySchedule {
    /// Build a schedule, sorting the shifts by start.
    ///
    /// # Errors
    /// Returns `SlotError::InvalidShift` if any shift is inverted or two shifts overlap.
    pub fn new(mut shifts: Vec<Shift>) -> Result<Self> {
        shifts.sort_by_key(|s| (s.start, s.end));
        let schedule = Self(shifts);
        schedule.validate()?;
        Ok(schedule)
    }

    pub fn shifts(&self) -> &[Shift] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check every shift and that no two shifts overlap. Touching shifts are allowed.
    pub fn validate(&self) -> Result<()> {
        for shift in &self.0 {
            shift.validate()?;
        }
        let mut sorted: Vec<&Shift> = self.0.iter().collect();
        sorted.sort_by_key(|s| (s.start, s.end));
        for pair in sorted.windows(2) {
            if pair[1].start < pair[0].end {
                return Err(SlotError::InvalidShift(format!(
                    "{}-{} overlaps {}-{}",
                    pair[0].start, pair[0].end, pair[1].start, pair[1].end
                )));
            }
        }
        Ok(())
    }
}

impl From<Shift> for DaySchedule {
    fn from(shift: Shift) -> Self {
        Self(vec![shift])
    }
}

/// Manual weekly working hours with per-date overrides.
///
/// An override replaces the weekday's shifts for that date; an empty override
/// marks the date as a day off.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WeeklySchedule {
    pub monday: Vec<Shift>,
    pub tuesday: Vec<Shift>,
    pub wednesday: Vec<Shift>,
    pub thursday: Vec<Shift>,
    pub friday: Vec<Shift>,
    pub saturday: Vec<Shift>,
    pub sunday: Vec<Shift>,
    pub overrides: BTreeMap<NaiveDate, Vec<Shift>>,
}

impl WeeklySchedule {
    pub fn shifts_for(&self, weekday: Weekday) -> &[Shift] {
        match weekday {
            Weekday::Mon => &self.monday,
            Weekday::Tue => &self.tuesday,
            Weekday::Wed => &self.wednesday,
            Weekday::Thu => &self.thursday,
            Weekday::Fri => &self.friday,
            Weekday::Sat => &self.saturday,
            Weekday::Sun => &self.sunday,
        }
    }

    /// Same shifts on every weekday from Monday to Friday.
    pub fn weekdays(shifts: Vec<Shift>) -> Self {
        Self {
            monday: shifts.clone(),
            tuesday: shifts.clone(),
            wednesday: shifts.clone(),
            thursday: shifts.clone(),
            friday: shifts,
            ..Self::default()
        }
    }

    /// Expand into per-date schedules for `from..=to`. Days without working
    /// hours are omitted.
    ///
    /// # Errors
    /// Returns `SlotError::InvalidShift` if a weekday or override is malformed.
    pub fn expand(&self, from: NaiveDate, to: NaiveDate) -> Result<BTreeMap<NaiveDate, DaySchedule>> {
        let mut days = BTreeMap::new();
        for date in from.iter_days().take_while(|d| *d <= to) {
            let shifts = match self.overrides.get(&date) {
                Some(over) => over.as_slice(),
                None => self.shifts_for(date.weekday()),
            };
            if shifts.is_empty() {
                continue;
            }
            days.insert(date, DaySchedule::new(shifts.to_vec())?);
        }
        Ok(days)
    }
}
