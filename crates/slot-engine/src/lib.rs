//! # slot-engine
//!
//! Timezone-aware bookable slot computation for booking calendars.
//!
//! Given a person's working hours, the busy intervals already committed
//! across their calendars, a requested appointment duration and a set of
//! scheduling preferences, the engine computes the ordered list of bookable
//! slots. It is a pure function of its inputs: no I/O, no clock reads, no
//! shared state, so it can be called concurrently per request.
//!
//! ## Modules
//!
//! - [`availability`] -- Entry point: request types and [`compute_availability`]
//! - [`normalize`] -- Busy intervals → sorted, disjoint, buffered exclusions
//! - [`windows`] -- Shifts minus exclusions → free windows
//! - [`candidates`] -- Grid, custom and smart slot starts inside free windows
//! - [`output`] -- Localized camelCase JSON shapes for slots and windows
//! - [`ranking`] -- Priority tiers and preference ordering
//! - [`schedule`] -- Wall-clock times, shifts, day and weekly schedules
//! - [`config`] -- Per-request slot configuration
//! - [`zone`] -- Wall-clock to instant resolution in an IANA timezone
//! - [`dst`] -- DST gap policies
//! - [`error`] -- Error types

pub mod availability;
pub mod candidates;
pub mod config;
pub mod dst;
pub mod error;
pub mod normalize;
pub mod output;
pub mod ranking;
pub mod schedule;
pub mod windows;
pub mod zone;

pub use availability::{
    compute_availability, free_windows, AvailabilityRequest, RequestSpec, SearchWindow, TimeSlot,
};
pub use config::SlotConfig;
pub use dst::DstPolicy;
pub use error::SlotError;
pub use normalize::BusyInterval;
pub use output::{localize_slots, localize_windows, LocalizedSlot, LocalizedWindow};
pub use ranking::PriorityTier;
pub use schedule::{DaySchedule, Shift, WallTime, WeeklySchedule};
pub use windows::FreeWindow;
pub use zone::Zone;
