//! Classified results of Booking Service calls.
//!
//! Every network failure is folded into one of these tags at the client
//! boundary; the poll loop never sees a raw transport error.

use super::slot::SlotRecord;

/// Result of one query for available slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// Well-formed answer listing the currently open slots, in service order
    Slots(Vec<SlotRecord>),
    /// Body parsed but lacked `data.dateList`; the session is stale
    AuthExpired { snippet: String },
    /// Body was not JSON
    MalformedResponse { snippet: String },
    /// Timeout, connection failure, non-2xx status or empty body
    TransientError(String),
}

/// Result of one booking submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingResult {
    /// Service confirmed the booking for this date
    Booked(String),
    /// Service answered but declined, with its message or the whole body
    Rejected(String),
    /// Transport failure or non-2xx status
    NetworkError(String),
}

impl BookingResult {
    pub fn is_booked(&self) -> bool {
        matches!(self, BookingResult::Booked(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_result_is_booked() {
        assert!(BookingResult::Booked("2025-06-09".into()).is_booked());
        assert!(!BookingResult::Rejected("slot full".into()).is_booked());
        assert!(!BookingResult::NetworkError("HTTP 502".into()).is_booked());
    }
}
