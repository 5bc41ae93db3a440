//! Domain types for Slotwatch
//!
//! This module contains the core domain types:
//! - SlotRecord: one open onboarding slot reported by the Booking Service
//! - TargetDateSet: the operator's validated selection of dates
//! - PollOutcome / BookingResult: classified results of the two service calls
//! - LoopState / Termination: lifecycle of a poll-and-book loop

pub mod outcome;
pub mod slot;
pub mod state;

pub use outcome::{BookingResult, PollOutcome};
pub use slot::{SlotRecord, TargetDateSet, DATE_FORMAT};
pub use state::{LoopState, Termination};
