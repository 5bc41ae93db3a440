//! Booking Service client layer
//!
//! This module provides:
//! - BookingService trait for the two remote operations (query, submit)
//! - HttpBookingClient talking to the real service over reqwest
//! - Response classification into typed outcomes
//! - ScriptedBookingService, a recording fake for tests

pub mod classify;
pub mod http;
pub mod scripted;

use async_trait::async_trait;

use crate::credentials::Credentials;
use crate::domain::{BookingResult, PollOutcome, SlotRecord};

pub use classify::{classify_booking, classify_query, snippet};
pub use http::HttpBookingClient;
pub use scripted::ScriptedBookingService;

/// The remote scheduling service.
///
/// Implementations never retry and never return transport errors: every
/// failure is classified into the returned outcome.
#[async_trait]
pub trait BookingService: Send + Sync {
    /// Ask which onboarding dates are currently open
    async fn query_available_slots(&self, credentials: &Credentials) -> PollOutcome;

    /// Try to book one open slot
    async fn submit_booking(&self, credentials: &Credentials, slot: &SlotRecord) -> BookingResult;
}
