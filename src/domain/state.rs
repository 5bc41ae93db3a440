//! Poll loop lifecycle.

use std::fmt;

/// How a loop run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// A booking was confirmed for this date
    Success(String),
    /// The operator asked the loop to stop
    Cancelled,
    /// Unrecoverable: bad credentials, stale session or unreadable response
    Fatal(String),
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::Success(date) => write!(f, "booked {}", date),
            Termination::Cancelled => write!(f, "cancelled"),
            Termination::Fatal(reason) => write!(f, "fatal: {}", reason),
        }
    }
}

/// State of a poll loop. Only the loop itself writes this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopState {
    Running,
    StopRequested,
    Terminated(Termination),
}

impl LoopState {
    /// Check if the loop has finished (no further network calls)
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoopState::Terminated(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_state_terminal() {
        assert!(!LoopState::Running.is_terminal());
        assert!(!LoopState::StopRequested.is_terminal());
        assert!(LoopState::Terminated(Termination::Cancelled).is_terminal());
    }

    #[test]
    fn test_termination_display() {
        assert_eq!(Termination::Success("2025-06-09".into()).to_string(), "booked 2025-06-09");
        assert_eq!(Termination::Cancelled.to_string(), "cancelled");
        assert_eq!(
            Termination::Fatal("session invalid".into()).to_string(),
            "fatal: session invalid"
        );
    }
}
