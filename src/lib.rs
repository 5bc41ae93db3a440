//! Slotwatch - grab a reservation slot the moment it opens
//!
//! Slotwatch polls a remote scheduling service for open onboarding dates,
//! compares them against the dates the operator wants, and submits a booking
//! as soon as one of them appears. It stops on the first confirmed booking,
//! on an operator stop request, or when the session turns out to be stale.

pub mod calendar;
pub mod client;
pub mod config;
pub mod credentials;
pub mod domain;
pub mod error;
pub mod matching;
pub mod report;
pub mod runner;

pub use error::{Result, SlotwatchError};
