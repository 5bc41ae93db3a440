//! Operator session: owns at most one running poll loop.

use std::sync::Arc;
use std::time::Duration;

use crate::client::BookingService;
use crate::credentials::CredentialSource;
use crate::domain::{PollOutcome, TargetDateSet, Termination};
use crate::error::{Result, SlotwatchError};
use crate::report::EventStream;
use crate::runner::poll_loop::{LoopHandle, PollLoop, PollLoopConfig};

/// Starts, stops and queries on behalf of the operator.
///
/// Must be used from inside a tokio runtime; `start` spawns the loop task.
pub struct Session<S: BookingService + 'static> {
    service: Arc<S>,
    credentials: Arc<dyn CredentialSource>,
    config: PollLoopConfig,
    active: Option<LoopHandle>,
}

impl<S: BookingService + 'static> Session<S> {
    pub fn new(service: Arc<S>, credentials: Arc<dyn CredentialSource>, config: PollLoopConfig) -> Self {
        Self {
            service,
            credentials,
            config,
            active: None,
        }
    }

    /// Check if a loop is currently running
    pub fn is_running(&self) -> bool {
        self.active.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Validate the raw date selection and start a loop over it
    pub fn start_dates<I, D>(&mut self, dates: I) -> Result<EventStream>
    where
        I: IntoIterator<Item = D>,
        D: AsRef<str>,
    {
        let targets = TargetDateSet::new(dates)?;
        self.start(targets)
    }

    /// Start a loop. Fails if one is already running.
    pub fn start(&mut self, targets: TargetDateSet) -> Result<EventStream> {
        if self.is_running() {
            return Err(SlotwatchError::SessionActive);
        }

        log::info!(
            "Starting poll loop for {} every {:?}",
            targets,
            self.config.interval()
        );
        let poll_loop = PollLoop::new(
            self.service.clone(),
            self.credentials.clone(),
            targets,
            self.config.clone(),
        );
        let (handle, events) = poll_loop.spawn();
        self.active = Some(handle);
        Ok(events)
    }

    /// Ask the running loop to stop and wait up to `grace` for it to finish.
    ///
    /// Returns `None` when nothing was running or the loop is still busy with
    /// a request; in the latter case the loop stays registered and will stop
    /// once that request completes.
    pub async fn stop(&mut self, grace: Duration) -> Option<Termination> {
        let Some(handle) = self.active.take() else {
            log::warn!("Stop requested but no poll loop is running");
            return None;
        };

        match handle.stop_and_wait(grace).await {
            Ok(termination) => Some(termination),
            Err(handle) => {
                log::warn!("Poll loop did not acknowledge stop within {:?}", grace);
                self.active = Some(handle);
                None
            }
        }
    }

    /// Wait for the running loop to end on its own
    pub async fn wait(&mut self) -> Option<Termination> {
        let handle = self.active.take()?;
        Some(handle.join().await)
    }

    /// One query without booking, for the operator to see what is open
    pub async fn query_once(&self) -> Result<PollOutcome> {
        let credentials = self.credentials.load()?;
        for warning in credentials.warnings() {
            log::warn!("{}", warning);
        }
        Ok(self.service.query_available_slots(&credentials).await)
    }
}
