//! Diagnostic sink for failures inside the logging pipeline itself

use std::sync::Arc;

/// Receives non-fatal diagnostics such as per-event encode or write failures
pub trait ErrorReporter: Send + Sync {
    fn report(&self, message: &str);
}

/// Writes `[LOGGER ERROR]` lines to stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrReporter;

impl ErrorReporter for StderrReporter {
    fn report(&self, message: &str) {
        eprintln!("[LOGGER ERROR] {}", message);
    }
}

impl<F> ErrorReporter for F
where
    F: Fn(&str) + Send + Sync,
{
    fn report(&self, message: &str) {
        self(message)
    }
}

/// Reporter used when none is configured
pub fn default_reporter() -> Arc<dyn ErrorReporter> {
    Arc::new(StderrReporter)
}

/// Report an irrecoverable configuration error and terminate the process
pub fn report_exit(message: &str) -> ! {
    eprintln!("[LOGGER FATAL] {}", message);
    std::process::exit(1)
}
