//! Progress reporting.
//!
//! Status updates are best-effort: a sink cannot fail and the pipeline never
//! waits on it.

/// Receiver of human-readable progress messages.
pub trait StatusSink {
    /// Deliver one status message.
    fn announce(&self, message: &str);
}

impl<F> StatusSink for F
where
    F: Fn(&str),
{
    fn announce(&self, message: &str) {
        self(message)
    }
}

/// Forwards status messages to the `log` facade at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogStatus;

impl StatusSink for LogStatus {
    fn announce(&self, message: &str) {
        log::info!("{}", message);
    }
}

/// Discards status messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStatus;

impl StatusSink for NullStatus {
    fn announce(&self, _message: &str) {}
}
