//! Outcome reporting
//!
//! The poll loop reports through an ordered, timestamped event stream;
//! the one-off query reports through an availability summary.

mod events;
mod summary;

pub use events::{Event, EventStream, Reporter, Severity};
pub use summary::AvailabilitySummary;
