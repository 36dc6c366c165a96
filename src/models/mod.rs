//! Domain model types.
//!
//! - [`entities`]: users, bins, schedules, and stops as stored
//! - [`waste`]: the canonical waste-type catalog and category matcher

pub mod entities;
pub mod waste;

pub use entities::{
    Bin, NewSchedule, NewStop, Schedule, ScheduleStatus, Stop, StopKind, StopStatus, TimeRange,
    User,
};
pub use waste::WasteType;
