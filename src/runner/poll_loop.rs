//! Poll-and-book loop.
//!
//! Each round queries the Booking Service, reports the open dates, and
//! tries to book every open target date in service order. The first
//! confirmed booking ends the loop. Between rounds the loop sleeps in short
//! steps so a stop request is honoured quickly.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::client::BookingService;
use crate::config::{MAX_INTERVAL_SECS, PollConfig, validate_interval};
use crate::credentials::{CredentialSource, Credentials};
use crate::domain::{BookingResult, LoopState, PollOutcome, TargetDateSet, Termination};
use crate::error::{Result, SlotwatchError};
use crate::matching::{select_matches, status_line};
use crate::report::{EventStream, Reporter};
use crate::runner::stop::StopHandle;

/// Timing for the PollLoop.
///
/// Only built through [`PollLoopConfig::new`] or [`PollLoopConfig::from_poll_config`],
/// so a loop never sees a zero step or an interval outside the accepted range.
#[derive(Debug, Clone, PartialEq)]
pub struct PollLoopConfig {
    interval: Duration,
    sleep_step: Duration,
}

impl Default for PollLoopConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            sleep_step: Duration::from_millis(500),
        }
    }
}

impl PollLoopConfig {
    /// `interval` is the pause between rounds, at most an hour and never zero.
    /// `sleep_step` is how often the pause checks for a stop request.
    pub fn new(interval: Duration, sleep_step: Duration) -> Result<Self> {
        if interval.is_zero() || interval > Duration::from_secs(MAX_INTERVAL_SECS) {
            return Err(SlotwatchError::InvalidInterval(interval.as_secs()));
        }
        if sleep_step.is_zero() {
            return Err(SlotwatchError::Configuration(
                "poll sleep step must be greater than zero".to_string(),
            ));
        }
        Ok(Self { interval, sleep_step })
    }

    /// Build from the `poll` config section, enforcing the whole-second interval range
    pub fn from_poll_config(poll: &PollConfig) -> Result<Self> {
        let interval = validate_interval(poll.interval_secs)?;
        if poll.sleep_step_ms == 0 {
            return Err(SlotwatchError::Configuration(
                "poll.sleep_step_ms must be greater than zero".to_string(),
            ));
        }
        Self::new(interval, Duration::from_millis(poll.sleep_step_ms))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn sleep_step(&self) -> Duration {
        self.sleep_step
    }
}

/// A single poll-and-book run over one target set.
pub struct PollLoop<S: BookingService> {
    service: Arc<S>,
    credentials: Arc<dyn CredentialSource>,
    targets: TargetDateSet,
    config: PollLoopConfig,
    stop: StopHandle,
    state: LoopState,
}

impl<S: BookingService + 'static> PollLoop<S> {
    pub fn new(
        service: Arc<S>,
        credentials: Arc<dyn CredentialSource>,
        targets: TargetDateSet,
        config: PollLoopConfig,
    ) -> Self {
        Self {
            service,
            credentials,
            targets,
            config,
            stop: StopHandle::new(),
            state: LoopState::Running,
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn state(&self) -> &LoopState {
        &self.state
    }

    /// Run on a background task
    pub fn spawn(self) -> (LoopHandle, EventStream) {
        let (reporter, events) = Reporter::channel();
        let stop = self.stop.clone();
        let mut poll_loop = self;
        let task = tokio::spawn(async move { poll_loop.run(reporter).await });
        (LoopHandle { stop, task }, events)
    }

    /// Run until a booking succeeds, the operator stops us, or the session turns out to be unusable.
    pub async fn run(&mut self, reporter: Reporter) -> Termination {
        self.state = LoopState::Running;

        let credentials = match self.credentials.load() {
            Ok(credentials) => credentials,
            Err(e) => {
                reporter.error(format!("Cannot load credentials: {}", e));
                return self.terminate(reporter, Termination::Fatal(e.to_string()));
            }
        };
        for warning in credentials.warnings() {
            reporter.warn(warning.clone());
        }

        loop {
            if let Some(termination) = self.round(&credentials, &reporter).await {
                return self.terminate(reporter, termination);
            }

            if self.sleep_interruptible().await {
                return self.terminate(reporter, Termination::Cancelled);
            }
        }
    }

    /// One query → match → book pass. `Some` ends the loop.
    async fn round(&mut self, credentials: &Credentials, reporter: &Reporter) -> Option<Termination> {
        if self.observe_stop() {
            return Some(Termination::Cancelled);
        }

        reporter.info("Querying available dates…");
        let matches = match self.service.query_available_slots(credentials).await {
            PollOutcome::Slots(slots) => {
                reporter.info(status_line(&slots, &self.targets));
                select_matches(&slots, &self.targets)
            }
            PollOutcome::TransientError(detail) => {
                reporter.debug(format!("Query failed: {}", detail));
                Vec::new()
            }
            PollOutcome::AuthExpired { snippet } => {
                reporter.error(format!(
                    "Session expired or login invalid, refresh the credential file (response: {})",
                    snippet
                ));
                return Some(Termination::Fatal(
                    "session invalid: credentials expired or rejected".to_string(),
                ));
            }
            PollOutcome::MalformedResponse { snippet } => {
                reporter.error(format!("Response is not valid JSON: {:?}", snippet));
                return Some(Termination::Fatal(
                    "malformed response from booking service".to_string(),
                ));
            }
        };

        if self.observe_stop() {
            return Some(Termination::Cancelled);
        }

        if matches.is_empty() {
            reporter.info(format!(
                "No open slot for {}, retrying in {}",
                self.targets,
                format_interval(self.config.interval)
            ));
            return None;
        }

        for slot in &matches {
            if self.observe_stop() {
                return Some(Termination::Cancelled);
            }

            reporter.info(format!("Submitting booking for {}…", slot.date));
            match self.service.submit_booking(credentials, slot).await {
                BookingResult::Booked(date) => {
                    reporter.info(format!("Booking confirmed for {}", date));
                    return Some(Termination::Success(date));
                }
                BookingResult::Rejected(reason) => {
                    reporter.warn(format!("Booking for {} rejected: {}", slot.date, reason));
                }
                BookingResult::NetworkError(detail) => {
                    reporter.warn(format!("Booking for {} failed: {}", slot.date, detail));
                }
            }
        }

        None
    }

    /// Sleep for the interval in `sleep_step` slices. Returns true if a stop was requested.
    async fn sleep_interruptible(&mut self) -> bool {
        let mut remaining = self.config.interval;
        while !remaining.is_zero() {
            if self.observe_stop() {
                return true;
            }
            let step = remaining.min(self.config.sleep_step);
            tokio::time::sleep(step).await;
            remaining = remaining.saturating_sub(step);
        }
        self.observe_stop()
    }

    fn observe_stop(&mut self) -> bool {
        if self.stop.is_stop_requested() {
            self.state = LoopState::StopRequested;
            return true;
        }
        false
    }

    fn terminate(&mut self, reporter: Reporter, termination: Termination) -> Termination {
        self.state = LoopState::Terminated(termination.clone());
        reporter.finish(termination.clone());
        termination
    }
}

fn format_interval(interval: Duration) -> String {
    if interval.subsec_millis() == 0 {
        format!("{}s", interval.as_secs())
    } else {
        format!("{}ms", interval.as_millis())
    }
}

/// Owner's side of a spawned PollLoop.
pub struct LoopHandle {
    stop: StopHandle,
    task: JoinHandle<Termination>,
}

impl LoopHandle {
    pub fn request_stop(&self) {
        self.stop.request_stop();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the loop to end on its own
    pub async fn join(self) -> Termination {
        match self.task.await {
            Ok(termination) => termination,
            Err(e) => Termination::Fatal(format!("poll loop task failed: {}", e)),
        }
    }

    /// Request a stop and wait up to `grace` for the loop to acknowledge.
    ///
    /// Gives the handle back if the loop is still busy (e.g. mid-request).
    pub async fn stop_and_wait(mut self, grace: Duration) -> std::result::Result<Termination, LoopHandle> {
        self.request_stop();
        match tokio::time::timeout(grace, &mut self.task).await {
            Ok(Ok(termination)) => Ok(termination),
            Ok(Err(e)) => Ok(Termination::Fatal(format!("poll loop task failed: {}", e))),
            Err(_) => Err(self),
        }
    }
}
