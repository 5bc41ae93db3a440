//! Runner module - the poll-and-book control loop.
//!
//! This module provides:
//! - PollLoop, which queries, matches and books until done or stopped
//! - StopHandle, the cooperative cancellation flag
//! - Session, which keeps at most one loop running for the operator

mod poll_loop;
mod session;
mod stop;

pub use poll_loop::{LoopHandle, PollLoop, PollLoopConfig};
pub use session::Session;
pub use stop::StopHandle;
