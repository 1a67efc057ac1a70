use log::{error, warn};

/// Receives renderer diagnostics. Emission never affects the render outcome.
pub trait DiagnosticSink: Send + Sync {
    /// Non-empty renderer stderr.
    fn error(&self, message: &str);

    /// Non-empty validation warnings.
    fn warn(&self, message: &str);
}

/// Forwards diagnostics to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn error(&self, message: &str) {
        error!(target: "mjmlify", "{}", message);
    }

    fn warn(&self, message: &str) {
        warn!(target: "mjmlify", "{}", message);
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn error(&self, _message: &str) {}

    fn warn(&self, _message: &str) {}
}
