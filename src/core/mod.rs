//! Core types and traits

pub mod async_writer;
pub mod bounded_queue;
pub mod error;
pub mod log_context;
pub mod log_event;
pub mod log_level;
pub mod metrics;
pub mod reporter;
pub mod timestamp;
pub mod writer;

pub use async_writer::{
    AsyncWriter, AsyncWriterBuilder, AsyncWriterConfig, DEFAULT_GUARD_BAND,
    DEFAULT_SHUTDOWN_TIMEOUT,
};
pub use bounded_queue::{BoundedEventQueue, DEFAULT_QUEUE_CAPACITY};
pub use error::{LoggerError, Result};
pub use log_context::{FieldValue, LogContext};
pub use log_event::LogEvent;
pub use log_level::LogLevel;
pub use metrics::WriterMetrics;
pub use reporter::{default_reporter, report_exit, ErrorReporter, StderrReporter};
pub use timestamp::{DateLayout, DEFAULT_DATE_LAYOUT};
pub use writer::{Encoder, Filter, Writer};
