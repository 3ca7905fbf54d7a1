//! Console writer implementation

use crate::core::{Encoder, Filter, Result, Writer};
use std::io::Write;
use std::sync::Arc;

/// Stream a [`ConsoleWriter`] prints to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsoleTarget {
    #[default]
    Stdout,
    Stderr,
}

/// Writes payloads to the process's standard output or error
///
/// Payloads are written as-is; pair it with an encoder to turn JSON events
/// into formatted lines when it sits behind an [`AsyncWriter`](crate::AsyncWriter).
#[derive(Default)]
pub struct ConsoleWriter {
    target: ConsoleTarget,
    encoder: Option<Arc<dyn Encoder>>,
    filter: Option<Arc<dyn Filter>>,
}

impl ConsoleWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stderr() -> Self {
        Self {
            target: ConsoleTarget::Stderr,
            ..Self::default()
        }
    }

    /// Attach the encoder an [`AsyncWriter`](crate::AsyncWriter) applies
    /// before handing payloads to this writer
    ///
    /// # Example
    ///
    /// ```
    /// use rust_pattern_logger::{ConsoleWriter, PatternEncoder};
    ///
    /// let writer = ConsoleWriter::new()
    ///     .with_encoder(PatternEncoder::new("#level #message").unwrap());
    /// ```
    #[must_use]
    pub fn with_encoder<E: Encoder + 'static>(mut self, encoder: E) -> Self {
        self.encoder = Some(Arc::new(encoder));
        self
    }

    #[must_use]
    pub fn with_filter<F: Filter + 'static>(mut self, filter: F) -> Self {
        self.filter = Some(Arc::new(filter));
        self
    }

    pub fn target(&self) -> ConsoleTarget {
        self.target
    }
}

impl Writer for ConsoleWriter {
    fn write(&mut self, payload: &[u8]) -> Result<usize> {
        match self.target {
            ConsoleTarget::Stdout => std::io::stdout().lock().write_all(payload)?,
            ConsoleTarget::Stderr => std::io::stderr().lock().write_all(payload)?,
        }
        Ok(payload.len())
    }

    fn flush(&mut self) -> Result<()> {
        match self.target {
            ConsoleTarget::Stdout => std::io::stdout().flush()?,
            ConsoleTarget::Stderr => std::io::stderr().flush()?,
        }
        Ok(())
    }

    fn encoder(&self) -> Option<Arc<dyn Encoder>> {
        self.encoder.clone()
    }

    fn filter(&self) -> Option<Arc<dyn Filter>> {
        self.filter.clone()
    }

    fn name(&self) -> &str {
        "console"
    }
}
