//! Bookable slot computation.
//!
//! This is the engine's entry point. It ties the stages together:
//! busy intervals are normalized into exclusions, subtracted from the
//! working shifts to get free windows, candidates are generated inside the
//! windows, ranked against the configured preferences, and emitted as plain
//! [`TimeSlot`]s, best first.
//!
//! The computation is a pure function of the [`AvailabilityRequest`]. It
//! reads no clock and keeps no state between calls.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::candidates::{generate_candidates, CandidateSlot};
use crate::config::SlotConfig;
use crate::dst::DstPolicy;
use crate::error::{Result, SlotError};
use crate::normalize::{normalize, BusyInterval, ExclusionSet};
use crate::ranking::{rank_candidates, RankedSlot};
use crate::schedule::{DaySchedule, WeeklySchedule};
use crate::windows::{extract_windows, FreeWindow};
use crate::zone::Zone;

/// A bookable slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeSlot {
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Whether the slot shares any time with `[start, end)`. Touching is not overlap.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start < end && start < self.end
    }
}

impl From<CandidateSlot> for TimeSlot {
    fn from(c: CandidateSlot) -> Self {
        Self {
            start: c.start,
            end: c.end,
        }
    }
}

impl From<RankedSlot> for TimeSlot {
    fn from(r: RankedSlot) -> Self {
        r.slot.into()
    }
}

/// The half-open range of instants to search for slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl SearchWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }
}

/// Everything one availability computation needs.
#[derive(Debug, Clone, PartialEq)]
pub struct AvailabilityRequest {
    pub zone: Zone,
    /// Working hours per local date in `zone`.
    pub schedule: BTreeMap<NaiveDate, DaySchedule>,
    /// Busy intervals from every connected calendar; may overlap.
    pub busy: Vec<BusyInterval>,
    pub duration_minutes: i64,
    pub window: SearchWindow,
    pub config: SlotConfig,
    /// Other booking lengths the calendar should keep room for.
    pub other_typical_durations: Option<Vec<i64>>,
    /// Reference instant for `minimum_notice_minutes`.
    pub now: Option<DateTime<Utc>>,
}

impl AvailabilityRequest {
    pub fn new(
        zone: Zone,
        schedule: BTreeMap<NaiveDate, DaySchedule>,
        duration_minutes: i64,
        window: SearchWindow,
    ) -> Self {
        Self {
            zone,
            schedule,
            busy: Vec::new(),
            duration_minutes,
            window,
            config: SlotConfig::default(),
            other_typical_durations: None,
            now: None,
        }
    }

    /// Parse and validate a JSON request (see [`RequestSpec`]).
    pub fn from_json(json: &str) -> Result<Self> {
        let spec: RequestSpec =
            serde_json::from_str(json).map_err(|e| SlotError::InvalidRequest(e.to_string()))?;
        spec.try_into()
    }

    /// Reject structurally invalid input.
    ///
    /// # Errors
    /// `InvalidDuration` for a non-positive duration, `InvalidWindow` for an
    /// empty or inverted search window, `InvalidShift` for malformed shifts.
    pub fn validate(&self) -> Result<()> {
        self.duration()?;
        validate_window(&self.window)?;
        for (date, day) in &self.schedule {
            day.validate().map_err(|e| match e {
                SlotError::InvalidShift(msg) => SlotError::InvalidShift(format!("{}: {}", date, msg)),
                other => other,
            })?;
        }
        Ok(())
    }

    fn duration(&self) -> Result<Duration> {
        if self.duration_minutes <= 0 {
            return Err(SlotError::InvalidDuration(format!(
                "duration must be positive, got {} minutes",
                self.duration_minutes
            )));
        }
        Duration::try_minutes(self.duration_minutes).ok_or_else(|| {
            SlotError::InvalidDuration(format!("{} minutes is out of range", self.duration_minutes))
        })
    }

    fn not_before(&self) -> Option<DateTime<Utc>> {
        let now = self.now?;
        let notice = Duration::try_minutes(self.config.minimum_notice_minutes.unwrap_or(0).max(0))?;
        now.checked_add_signed(notice)
    }
}

/// JSON form of an [`AvailabilityRequest`].
///
/// Working hours come from `schedule` (explicit dates), `weekly` (weekday
/// hours with date overrides), or both; explicit dates win.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestSpec {
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default)]
    pub dst_policy: DstPolicy,
    #[serde(default)]
    pub schedule: BTreeMap<NaiveDate, DaySchedule>,
    #[serde(default)]
    pub weekly: Option<WeeklySchedule>,
    #[serde(default)]
    pub busy: Vec<BusyInterval>,
    pub duration_minutes: i64,
    pub window: SearchWindow,
    #[serde(default)]
    pub config: SlotConfig,
    #[serde(default)]
    pub other_typical_durations: Option<Vec<i64>>,
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl TryFrom<RequestSpec> for AvailabilityRequest {
    type Error = SlotError;

    fn try_from(spec: RequestSpec) -> Result<Self> {
        let zone = Zone::parse(&spec.timezone, spec.dst_policy)?;
        validate_window(&spec.window)?;

        let mut schedule = match &spec.weekly {
            Some(weekly) => {
                let first = zone.local_date(spec.window.start);
                let last = zone.local_date(spec.window.end - Duration::nanoseconds(1));
                weekly.expand(first, last)?
            }
            None => BTreeMap::new(),
        };
        schedule.extend(spec.schedule);

        Ok(Self {
            zone,
            schedule,
            busy: spec.busy,
            duration_minutes: spec.duration_minutes,
            window: spec.window,
            config: spec.config,
            other_typical_durations: spec.other_typical_durations,
            now: spec.now,
        })
    }
}

fn validate_window(window: &SearchWindow) -> Result<()> {
    if window.start >= window.end {
        return Err(SlotError::InvalidWindow(format!(
            "start {} must be before end {}",
            window.start.to_rfc3339(),
            window.end.to_rfc3339()
        )));
    }
    Ok(())
}

/// Compute the bookable slots for a request.
///
/// Slots are ordered best first: by priority tier, then by the configured
/// start/end bias, which without any preference flags is plain chronological
/// order. No available time is an empty list, never an error.
///
/// # Errors
/// Returns an error only for structurally invalid input (see
/// [`AvailabilityRequest::validate`]).
pub fn compute_availability(request: &AvailabilityRequest) -> Result<Vec<TimeSlot>> {
    request.validate()?;
    let duration = request.duration()?;

    let exclusions = normalize(&request.busy, &request.config, &request.zone);
    let windows = windows_for(request, &exclusions, duration);
    let candidates = generate_candidates(
        &windows,
        &exclusions,
        duration,
        &request.config,
        &request.zone,
        request.not_before(),
    );
    let ranked = rank_candidates(
        &candidates,
        &windows,
        duration,
        &request.config,
        request.other_typical_durations.as_deref(),
    );

    debug!(
        days = request.schedule.len(),
        busy = request.busy.len(),
        exclusions = exclusions.buffered.len(),
        windows = windows.len(),
        candidates = candidates.len(),
        slots = ranked.len(),
        "computed availability"
    );

    Ok(ranked.into_iter().map(TimeSlot::from).collect())
}

/// The free windows a request's slots would be drawn from.
///
/// # Errors
/// Same as [`compute_availability`].
pub fn free_windows(request: &AvailabilityRequest) -> Result<Vec<FreeWindow>> {
    request.validate()?;
    let duration = request.duration()?;
    let exclusions = normalize(&request.busy, &request.config, &request.zone);
    Ok(windows_for(request, &exclusions, duration))
}

fn windows_for(
    request: &AvailabilityRequest,
    exclusions: &ExclusionSet,
    duration: Duration,
) -> Vec<FreeWindow> {
    extract_windows(
        &request.schedule,
        exclusions,
        (request.window.start, request.window.end),
        duration,
        &request.zone,
    )
}
