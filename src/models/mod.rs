//! Timetabling domain models.
//!
//! Core data types for the course-hour assignment problem. Inputs
//! ([`CourseUnit`], [`SlotCandidate`] and the structures derived from
//! them) are read-only for a whole run; [`Gene`]/[`Individual`] are the
//! evolving state; [`ScheduleResult`] is the output contract.
//!
//! | Type | Role |
//! |------|------|
//! | `CourseUnit` | one required teaching hour (input) |
//! | `SlotPool` / `AllowSet` | permitted placements (input, derived) |
//! | `Gene` / `Individual` | candidate timetables (evolving) |
//! | `ScheduleResult` | scored schedule (output) |

mod gene;
mod slot;
mod unit;

pub use gene::{Gene, Individual, Placement, ScheduleResult};
pub use slot::{AllowSet, RoomTypeMap, SlotCandidate, SlotPool};
pub use unit::{CourseUnit, GroupTypeId, SessionKind, Weekday};
