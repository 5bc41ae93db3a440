//! Timestamped event stream emitted by the poll loop.

use chrono::{DateTime, Local};
use tokio::sync::mpsc;

use crate::domain::Termination;

/// How prominently a line should be shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Recoverable diagnostics (transient network errors)
    Debug,
    Info,
    Warn,
    Error,
}

/// One entry in the event stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Line {
        at: DateTime<Local>,
        severity: Severity,
        message: String,
    },
    /// Always the last event of a run
    Finished {
        at: DateTime<Local>,
        termination: Termination,
    },
}

impl Event {
    pub fn at(&self) -> DateTime<Local> {
        match self {
            Event::Line { at, .. } | Event::Finished { at, .. } => *at,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Event::Finished { .. })
    }

    pub fn termination(&self) -> Option<&Termination> {
        match self {
            Event::Finished { termination, .. } => Some(termination),
            Event::Line { .. } => None,
        }
    }

    /// Human readable text with a `[HH:MM:SS]` prefix
    pub fn render(&self) -> String {
        let stamp = self.at().format("[%H:%M:%S]");
        match self {
            Event::Line { severity, message, .. } => match severity {
                Severity::Debug => format!("{} [DEBUG] {}", stamp, message),
                Severity::Warn => format!("{} [WARN] {}", stamp, message),
                Severity::Error => format!("{} [ERROR] {}", stamp, message),
                Severity::Info => format!("{} {}", stamp, message),
            },
            Event::Finished { termination, .. } => match termination {
                Termination::Success(date) => {
                    format!("{} Booked {}, stopping", stamp, date)
                }
                Termination::Cancelled => format!("{} Stopped by operator", stamp),
                Termination::Fatal(reason) => format!("{} FATAL: {}", stamp, reason),
            },
        }
    }
}

/// Receiving half of a loop's event stream
pub type EventStream = mpsc::UnboundedReceiver<Event>;

/// Sending half of a loop's event stream.
///
/// `finish` consumes the reporter, so nothing can be emitted after the
/// terminal event.
#[derive(Debug)]
pub struct Reporter {
    tx: mpsc::UnboundedSender<Event>,
}

impl Reporter {
    /// Create a connected reporter and stream
    pub fn channel() -> (Self, EventStream) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn emit(&self, severity: Severity, message: impl Into<String>) {
        let message = message.into();
        match severity {
            Severity::Debug => log::debug!("{}", message),
            Severity::Info => log::info!("{}", message),
            Severity::Warn => log::warn!("{}", message),
            Severity::Error => log::error!("{}", message),
        }
        self.send(Event::Line {
            at: Local::now(),
            severity,
            message,
        });
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.emit(Severity::Debug, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.emit(Severity::Info, message);
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.emit(Severity::Warn, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.emit(Severity::Error, message);
    }

    /// Emit the terminal event and close the stream
    pub fn finish(self, termination: Termination) {
        log::info!("Poll loop finished: {}", termination);
        self.send(Event::Finished {
            at: Local::now(),
            termination,
        });
    }

    fn send(&self, event: Event) {
        // A closed stream means nobody is watching; the loop carries on regardless.
        if self.tx.send(event).is_err() {
            log::debug!("Event stream closed, dropping event");
        }
    }
}
