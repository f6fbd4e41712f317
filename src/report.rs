use std::sync::Mutex;

use log::{error, info};

// ---------------------------------------------------------------------------
// Status messages
// ---------------------------------------------------------------------------

/// Category of a user-facing status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    /// Row count right after reading.
    Info,
    /// Row count after cleaning.
    Success,
    /// Coordinate columns were renamed.
    Note,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub level: StatusLevel,
    pub text: String,
}

/// Sink for the loader's status messages.
///
/// Hosts plug in whatever surface they have (a dashboard banner, a log, a
/// test recorder).
pub trait StatusReporter: Send + Sync {
    fn report(&self, message: StatusMessage);

    fn info(&self, text: String) {
        self.report(StatusMessage { level: StatusLevel::Info, text });
    }

    fn success(&self, text: String) {
        self.report(StatusMessage { level: StatusLevel::Success, text });
    }

    fn note(&self, text: String) {
        self.report(StatusMessage { level: StatusLevel::Note, text });
    }

    fn error(&self, text: String) {
        self.report(StatusMessage { level: StatusLevel::Error, text });
    }
}

// ---------------------------------------------------------------------------
// Reporters
// ---------------------------------------------------------------------------

/// Forwards status messages to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl StatusReporter for LogReporter {
    fn report(&self, message: StatusMessage) {
        match message.level {
            StatusLevel::Error => error!("{}", message.text),
            _ => info!("{}", message.text),
        }
    }
}

/// Keeps every message in memory, in emission order.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    messages: Mutex<Vec<StatusMessage>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far.
    pub fn messages(&self) -> Vec<StatusMessage> {
        self.lock().clone()
    }

    /// Drain the recorded messages.
    pub fn take(&self) -> Vec<StatusMessage> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<StatusMessage>> {
        // a panicking reporter thread leaves the list intact
        self.messages.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl StatusReporter for RecordingReporter {
    fn report(&self, message: StatusMessage) {
        self.lock().push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_reporter_keeps_order() {
        let rec = RecordingReporter::new();
        rec.info("one".into());
        rec.success("two".into());
        rec.note("three".into());
        rec.error("four".into());

        let levels: Vec<_> = rec.messages().iter().map(|m| m.level).collect();
        assert_eq!(
            levels,
            vec![StatusLevel::Info, StatusLevel::Success, StatusLevel::Note, StatusLevel::Error]
        );
        assert_eq!(rec.take().len(), 4);
        assert!(rec.messages().is_empty());
    }
}
