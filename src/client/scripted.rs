//! Scripted Booking Service for driving the poll loop without a network.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::client::BookingService;
use crate::credentials::Credentials;
use crate::domain::{BookingResult, PollOutcome, SlotRecord};

/// Replays queued outcomes in order and records every call.
///
/// Once the query script runs dry every further query answers with an empty
/// slot list; an unscripted booking is rejected.
#[derive(Default)]
pub struct ScriptedBookingService {
    queries: Mutex<VecDeque<PollOutcome>>,
    bookings: Mutex<VecDeque<BookingResult>>,
    submitted: Mutex<Vec<String>>,
    query_calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    delay: Duration,
}

impl ScriptedBookingService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: queue the next query outcome
    pub fn with_query(self, outcome: PollOutcome) -> Self {
        self.lock_queries().push_back(outcome);
        self
    }

    /// Builder: queue the next booking result
    pub fn with_booking(self, result: BookingResult) -> Self {
        self.lock_bookings().push_back(result);
        self
    }

    /// Builder: make every call take this long
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn query_calls(&self) -> usize {
        self.query_calls.load(Ordering::SeqCst)
    }

    /// Dates submitted for booking, in call order
    pub fn submitted(&self) -> Vec<String> {
        self.submitted.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Highest number of calls that were ever running at once
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn lock_queries(&self) -> std::sync::MutexGuard<'_, VecDeque<PollOutcome>> {
        self.queries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_bookings(&self) -> std::sync::MutexGuard<'_, VecDeque<BookingResult>> {
        self.bookings.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn enter(&self) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }

    fn leave(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl BookingService for ScriptedBookingService {
    async fn query_available_slots(&self, _credentials: &Credentials) -> PollOutcome {
        self.enter().await;
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        let outcome = self
            .lock_queries()
            .pop_front()
            .unwrap_or_else(|| PollOutcome::Slots(Vec::new()));
        self.leave();
        outcome
    }

    async fn submit_booking(&self, _credentials: &Credentials, slot: &SlotRecord) -> BookingResult {
        self.enter().await;
        if let Ok(mut submitted) = self.submitted.lock() {
            submitted.push(slot.date.clone());
        }
        let result = self
            .lock_bookings()
            .pop_front()
            .unwrap_or_else(|| BookingResult::Rejected("unscripted booking".to_string()));
        self.leave();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn credentials() -> Credentials {
        Credentials::from_entries(BTreeMap::new()).unwrap()
    }

    #[tokio::test]
    async fn test_replays_queries_then_empty() {
        let service = ScriptedBookingService::new()
            .with_query(PollOutcome::TransientError("timeout".into()));

        assert_eq!(
            service.query_available_slots(&credentials()).await,
            PollOutcome::TransientError("timeout".into())
        );
        assert_eq!(
            service.query_available_slots(&credentials()).await,
            PollOutcome::Slots(vec![])
        );
        assert_eq!(service.query_calls(), 2);
    }

    #[tokio::test]
    async fn test_records_submitted_dates() {
        let service = ScriptedBookingService::new()
            .with_booking(BookingResult::Booked("2025-06-09".into()));

        let first = service
            .submit_booking(&credentials(), &SlotRecord::new("2025-06-09"))
            .await;
        let second = service
            .submit_booking(&credentials(), &SlotRecord::new("2025-06-16"))
            .await;

        assert!(first.is_booked());
        assert!(matches!(second, BookingResult::Rejected(_)));
        assert_eq!(service.submitted(), vec!["2025-06-09", "2025-06-16"]);
        assert_eq!(service.max_in_flight(), 1);
    }
}
