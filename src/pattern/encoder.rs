//! Pattern-driven encoder turning JSON event payloads into text lines

use super::compiler::PatternCompiler;
use super::converter::{Converter, ConverterChain};
use super::parser::Pattern;
use super::registry::ConverterRegistry;
use crate::core::error::{LoggerError, Result};
use crate::core::log_event::LogEvent;
use crate::core::reporter::report_exit;
use crate::core::writer::Encoder;
use parking_lot::Mutex;
use std::fmt;

/// Layout used when none (or an empty one) is configured
pub const DEFAULT_LAYOUT: &str =
    "#color(#date{2006-01-02}){cyan} #color(#level) #message #fields";

struct EncoderState {
    buf: Vec<u8>,
    chain: ConverterChain,
}

/// Formats events according to a compiled layout
///
/// The compiled chain and its scratch buffer are shared behind a lock, so a
/// single encoder can serve several threads; each call serializes on it.
///
/// # Example
///
/// ```
/// use rust_pattern_logger::{LogEvent, LogLevel, PatternEncoder};
///
/// let encoder = PatternEncoder::new("#level #message").unwrap();
/// let line = encoder.encode_event(&LogEvent::new(LogLevel::Info, "hello")).unwrap();
/// assert_eq!(line, b"INFO hello\n");
/// ```
pub struct PatternEncoder {
    layout: String,
    state: Mutex<EncoderState>,
}

impl PatternEncoder {
    /// Compile `layout` with the built-in converters
    pub fn new(layout: &str) -> Result<Self> {
        Self::builder().layout(layout).build()
    }

    pub fn builder() -> PatternEncoderBuilder {
        PatternEncoderBuilder::new()
    }

    pub fn layout(&self) -> &str {
        &self.layout
    }

    /// Render one event followed by a newline
    pub fn encode_event(&self, event: &LogEvent) -> Result<Vec<u8>> {
        let mut state = self.state.lock();
        let EncoderState { buf, chain } = &mut *state;
        buf.clear();
        chain.convert(event, buf);
        buf.push(b'\n');
        let line = buf.clone();
        buf.clear();
        Ok(line)
    }
}

impl Encoder for PatternEncoder {
    /// Decode a JSON event payload and render it
    fn encode(&self, payload: &[u8]) -> Result<Vec<u8>> {
        let event = LogEvent::from_json(payload)?;
        self.encode_event(&event)
    }
}

impl Default for PatternEncoder {
    fn default() -> Self {
        PatternEncoderBuilder::new().build_or_exit()
    }
}

impl fmt::Debug for PatternEncoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternEncoder")
            .field("layout", &self.layout)
            .finish()
    }
}

/// Builder for [`PatternEncoder`]
///
/// Custom converters registered here extend (or shadow) the built-in set.
pub struct PatternEncoderBuilder {
    layout: String,
    registry: ConverterRegistry,
}

impl PatternEncoderBuilder {
    pub fn new() -> Self {
        Self {
            layout: DEFAULT_LAYOUT.to_string(),
            registry: ConverterRegistry::with_builtins(),
        }
    }

    /// Set the layout; an empty string keeps the default
    pub fn layout(mut self, layout: impl Into<String>) -> Self {
        let layout = layout.into();
        if !layout.is_empty() {
            self.layout = layout;
        }
        self
    }

    pub fn converter<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Converter + Send + Sync + 'static,
    {
        self.registry.register(name, factory);
        self
    }

    pub fn build(self) -> Result<PatternEncoder> {
        let pattern = Pattern::parse(&self.layout)?;
        let chain = PatternCompiler::new(&self.registry).compile(&pattern)?;
        Ok(PatternEncoder {
            layout: self.layout,
            state: Mutex::new(EncoderState {
                buf: Vec::with_capacity(256),
                chain,
            }),
        })
    }

    /// Build, terminating the process if the layout does not parse or compile
    ///
    /// For setups where a broken layout is a deployment error rather than
    /// something to recover from.
    pub fn build_or_exit(self) -> PatternEncoder {
        self.build()
            .unwrap_or_else(|e| report_exit(&build_failure_message(&e)))
    }
}

/// Diagnostic for a layout that failed to build, prefixed by the failing stage
fn build_failure_message(err: &LoggerError) -> String {
    match err {
        LoggerError::Parse { .. } => format!("parse pattern error, {}", err),
        _ => format!("compile pattern error, {}", err),
    }
}

impl Default for PatternEncoderBuilder {
    fn default() -> Self {
        Self::new()
    }
}
