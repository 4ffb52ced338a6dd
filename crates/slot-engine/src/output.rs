//! Localized JSON output shared by every front end.
//!
//! Instants are rendered as RFC 3339 strings in the request's timezone and
//! keys are camelCase, matching the request format.

use serde::Serialize;

use crate::availability::TimeSlot;
use crate::windows::FreeWindow;
use crate::zone::Zone;

/// A [`TimeSlot`] rendered in a timezone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedSlot {
    pub start: String,
    pub end: String,
    pub duration_minutes: i64,
}

/// A [`FreeWindow`] rendered in a timezone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedWindow {
    pub date: String,
    pub start: String,
    pub end: String,
    pub duration_minutes: i64,
    pub follows_busy: bool,
    pub precedes_busy: bool,
    pub relaxed: bool,
}

impl LocalizedSlot {
    pub fn new(slot: &TimeSlot, zone: &Zone) -> Self {
        Self {
            start: zone.localize(slot.start).to_rfc3339(),
            end: zone.localize(slot.end).to_rfc3339(),
            duration_minutes: slot.duration_minutes(),
        }
    }
}

impl LocalizedWindow {
    pub fn new(window: &FreeWindow, zone: &Zone) -> Self {
        Self {
            date: window.date.to_string(),
            start: zone.localize(window.start).to_rfc3339(),
            end: zone.localize(window.end).to_rfc3339(),
            duration_minutes: window.duration().num_minutes(),
            follows_busy: window.follows_busy,
            precedes_busy: window.precedes_busy,
            relaxed: window.relaxed,
        }
    }
}

pub fn localize_slots(slots: &[TimeSlot], zone: &Zone) -> Vec<LocalizedSlot> {
    slots.iter().map(|s| LocalizedSlot::new(s, zone)).collect()
}

pub fn localize_windows(windows: &[FreeWindow], zone: &Zone) -> Vec<LocalizedWindow> {
    windows.iter().map(|w| LocalizedWindow::new(w, zone)).collect()
}
