//! # Rust Pattern Logger
//!
//! Pattern-driven formatting of log events and lossy asynchronous delivery
//! to slow writers.
//!
//! ## Features
//!
//! - **Pattern layouts**: `#color(#date{2006-01-02}){cyan} #level #message #fields`
//!   compiled once into a chain of converters
//! - **Extensible**: register custom converters next to the built-in ones
//! - **Non-blocking writes**: a bounded queue discards payloads instead of
//!   stalling producers when the consumer falls behind
//! - **Fault isolation**: encoder and writer failures are reported and skipped
//!
//! ## Example
//!
//! ```
//! use rust_pattern_logger::prelude::*;
//!
//! let encoder = PatternEncoder::new("#level #message #fields").unwrap();
//! let event = LogEvent::new(LogLevel::Info, "listening").with_field("port", 8080i64);
//! assert_eq!(encoder.encode_event(&event).unwrap(), b"INFO listening port=8080\n");
//! ```

pub mod core;
pub mod pattern;
pub mod writers;

pub mod prelude {
    #[cfg(feature = "console")]
    pub use crate::writers::ConsoleWriter;
    #[cfg(feature = "file")]
    pub use crate::writers::FileWriter;
    pub use crate::core::{
        AsyncWriter, AsyncWriterBuilder, AsyncWriterConfig, BoundedEventQueue, Encoder,
        ErrorReporter, FieldValue, Filter, LogContext, LogEvent, LogLevel, LoggerError, Result,
        Writer, WriterMetrics,
    };
    pub use crate::pattern::{
        Converter, ConverterRegistry, CustomConverter, Pattern, PatternEncoder, PatternNode,
    };
    pub use crate::writers::LevelFilter;
}

#[cfg(feature = "console")]
pub use writers::{ConsoleTarget, ConsoleWriter};
#[cfg(feature = "file")]
pub use writers::FileWriter;
pub use writers::LevelFilter;

pub use core::{
    AsyncWriter, AsyncWriterBuilder, AsyncWriterConfig, BoundedEventQueue, DateLayout, Encoder,
    ErrorReporter, FieldValue, Filter, LogContext, LogEvent, LogLevel, LoggerError, Result,
    StderrReporter, Writer, WriterMetrics, DEFAULT_GUARD_BAND, DEFAULT_QUEUE_CAPACITY,
    DEFAULT_SHUTDOWN_TIMEOUT,
};
pub use pattern::{
    Converter, ConverterChain, ConverterRegistry, CustomConverter, Pattern, PatternCompiler,
    PatternEncoder, PatternEncoderBuilder, PatternNode, DEFAULT_LAYOUT,
};
