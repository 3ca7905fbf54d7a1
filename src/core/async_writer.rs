//! Asynchronous, lossy delivery of payloads to a slow downstream writer
//!
//! Producers hand payloads to [`AsyncWriter::write`], which never blocks:
//! when the queue is within the guard band of being full the payload is
//! discarded and reported as zero bytes written. A single worker thread
//! drains the queue, applies the downstream writer's filter and encoder and
//! forwards the result. Failures on the worker side are reported and the
//! payload is skipped; nothing is retried.

use super::{
    bounded_queue::{BoundedEventQueue, DEFAULT_QUEUE_CAPACITY},
    error::{LoggerError, Result},
    metrics::WriterMetrics,
    reporter::{default_reporter, ErrorReporter},
    writer::{Encoder, Filter, Writer},
};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Payloads are discarded once this many slots or fewer remain free
pub const DEFAULT_GUARD_BAND: usize = 16;

/// Default shutdown timeout used when an [`AsyncWriter`] is dropped
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for an [`AsyncWriter`]
///
/// Deserializes from any serde format; missing keys take their defaults.
///
/// ```
/// use rust_pattern_logger::AsyncWriterConfig;
///
/// let config: AsyncWriterConfig = serde_json::from_str(r#"{"capacity": 1024}"#).unwrap();
/// assert_eq!(config.capacity, 1024);
/// assert_eq!(config.guard_band, 16);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AsyncWriterConfig {
    /// Number of queue slots
    pub capacity: usize,
    /// Low-water mark of free slots below which payloads are discarded
    pub guard_band: usize,
    /// Name of the worker thread
    pub thread_name: String,
}

impl Default for AsyncWriterConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_QUEUE_CAPACITY,
            guard_band: DEFAULT_GUARD_BAND,
            thread_name: "async-writer".to_string(),
        }
    }
}

impl AsyncWriterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(LoggerError::config(
                "AsyncWriter",
                "capacity must be greater than zero",
            ));
        }
        if self.guard_band >= self.capacity {
            return Err(LoggerError::config(
                "AsyncWriter",
                format!(
                    "guard band {} leaves no usable slots in a queue of {}",
                    self.guard_band, self.capacity
                ),
            ));
        }
        Ok(())
    }
}

/// Everything the worker owns once started
struct WorkerParts {
    downstream: Box<dyn Writer>,
    encoder: Option<Arc<dyn Encoder>>,
    filter: Option<Arc<dyn Filter>>,
}

pub struct AsyncWriter {
    queue: Arc<BoundedEventQueue>,
    /// Serializes the capacity decision across producers
    producer_lock: Mutex<()>,
    guard_band: usize,
    thread_name: String,
    pending: Mutex<Option<WorkerParts>>,
    handle: Mutex<Option<thread::JoinHandle<()>>>,
    started: AtomicBool,
    metrics: Arc<WriterMetrics>,
    reporter: Arc<dyn ErrorReporter>,
}

impl AsyncWriter {
    /// Wrap `downstream` with the default configuration
    ///
    /// The worker is not running until [`AsyncWriter::start`] is called.
    pub fn new<W: Writer + 'static>(downstream: W) -> Result<Self> {
        Self::builder().build(downstream)
    }

    pub fn builder() -> AsyncWriterBuilder {
        AsyncWriterBuilder::new()
    }

    fn from_parts(
        config: AsyncWriterConfig,
        reporter: Arc<dyn ErrorReporter>,
        downstream: Box<dyn Writer>,
    ) -> Result<Self> {
        config.validate()?;
        let queue = Arc::new(BoundedEventQueue::new(config.capacity)?);

        // Capabilities are queried once; the worker never asks again.
        let encoder = downstream.encoder();
        let filter = downstream.filter();

        Ok(Self {
            queue,
            producer_lock: Mutex::new(()),
            guard_band: config.guard_band,
            thread_name: config.thread_name,
            pending: Mutex::new(Some(WorkerParts {
                downstream,
                encoder,
                filter,
            })),
            handle: Mutex::new(None),
            started: AtomicBool::new(false),
            metrics: Arc::new(WriterMetrics::new()),
            reporter,
        })
    }

    /// Spawn the worker thread
    ///
    /// Calling this again after a successful start is a no-op.
    pub fn start(&self) -> Result<()> {
        let mut pending = self.pending.lock();
        let Some(parts) = pending.take() else {
            return Ok(());
        };

        let queue = Arc::clone(&self.queue);
        let metrics = Arc::clone(&self.metrics);
        let reporter = Arc::clone(&self.reporter);

        let handle = thread::Builder::new()
            .name(self.thread_name.clone())
            .spawn(move || run_worker(&queue, parts, &metrics, reporter.as_ref()))?;

        *self.handle.lock() = Some(handle);
        self.started.store(true, Ordering::Release);
        Ok(())
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }

    /// Queue a payload for delivery without blocking
    ///
    /// Returns `Ok(payload.len())` when queued and `Ok(0)` when the payload
    /// was discarded because the queue is near full or already stopped.
    pub fn write(&self, payload: &[u8]) -> Result<usize> {
        let _guard = self.producer_lock.lock();

        match self.queue.put_if_above(payload, self.guard_band) {
            Ok(true) => {
                self.metrics.record_enqueued();
                Ok(payload.len())
            }
            Ok(false) | Err(LoggerError::QueueClosed) => {
                self.metrics.record_dropped();
                Ok(0)
            }
            Err(e) => Err(e),
        }
    }

    /// Free queue slots right now
    pub fn remaining_capacity(&self) -> usize {
        self.queue.remaining_capacity()
    }

    /// Payloads waiting for the worker
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }

    pub fn metrics(&self) -> &WriterMetrics {
        &self.metrics
    }

    /// Close the queue, let the worker drain it and wait for it to exit
    ///
    /// Payloads written after this call are discarded. Returns `false` if the
    /// worker did not finish within `timeout` or panicked.
    pub fn stop(&self, timeout: Duration) -> bool {
        self.queue.close();

        let Some(handle) = self.handle.lock().take() else {
            return true;
        };

        let start = Instant::now();
        loop {
            if handle.is_finished() {
                if let Err(e) = handle.join() {
                    self.reporter.report(&format!(
                        "async writer worker panicked during shutdown: {}",
                        panic_message(&*e)
                    ));
                    return false;
                }
                return true;
            }

            if start.elapsed() >= timeout {
                self.reporter.report(&format!(
                    "async writer worker did not finish within {:?}; {} payloads may be lost",
                    timeout,
                    self.queue.len()
                ));
                return false;
            }

            thread::sleep(Duration::from_millis(5));
        }
    }
}

impl Writer for AsyncWriter {
    fn write(&mut self, payload: &[u8]) -> Result<usize> {
        AsyncWriter::write(self, payload)
    }

    fn name(&self) -> &str {
        "async"
    }
}

impl Drop for AsyncWriter {
    fn drop(&mut self) {
        self.stop(DEFAULT_SHUTDOWN_TIMEOUT);
    }
}

impl std::fmt::Debug for AsyncWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncWriter")
            .field("queue", &self.queue)
            .field("guard_band", &self.guard_band)
            .field("started", &self.is_started())
            .finish()
    }
}

fn run_worker(
    queue: &BoundedEventQueue,
    parts: WorkerParts,
    metrics: &WriterMetrics,
    reporter: &dyn ErrorReporter,
) {
    let WorkerParts {
        mut downstream,
        encoder,
        filter,
    } = parts;
    let mut payload = Vec::new();

    while queue.take_into(&mut payload) {
        if let Some(ref filter) = filter {
            if filter.should_drop(&payload) {
                metrics.record_filtered();
                continue;
            }
        }

        let encoded;
        let bytes: &[u8] = match encoder {
            Some(ref encoder) => {
                match panic::catch_unwind(AssertUnwindSafe(|| encoder.encode(&payload))) {
                    Ok(Ok(data)) => {
                        encoded = data;
                        encoded.as_slice()
                    }
                    Ok(Err(e)) => {
                        reporter.report(&format!("async writer encode error: {}", e));
                        metrics.record_encode_failure();
                        continue;
                    }
                    Err(panic_info) => {
                        reporter.report(&format!(
                            "async writer encoder panicked: {}",
                            panic_message(&*panic_info)
                        ));
                        metrics.record_encode_failure();
                        continue;
                    }
                }
            }
            None => payload.as_slice(),
        };

        match panic::catch_unwind(AssertUnwindSafe(|| downstream.write(bytes))) {
            Ok(Ok(_)) => {
                metrics.record_delivered();
            }
            Ok(Err(e)) => {
                reporter.report(&format!(
                    "async writer write error ({}): {}",
                    downstream.name(),
                    e
                ));
                metrics.record_write_failure();
            }
            Err(panic_info) => {
                reporter.report(&format!(
                    "async writer downstream '{}' panicked: {}",
                    downstream.name(),
                    panic_message(&*panic_info)
                ));
                metrics.record_write_failure();
            }
        }

        // Flush once the backlog is gone rather than after every payload
        if queue.is_empty() {
            if let Err(e) = downstream.flush() {
                reporter.report(&format!("async writer flush error: {}", e));
            }
        }
    }

    if let Err(e) = downstream.flush() {
        reporter.report(&format!("async writer flush error: {}", e));
    }
}

fn panic_message(panic_info: &(dyn Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Builder for [`AsyncWriter`]
///
/// # Example
///
/// ```
/// use rust_pattern_logger::{AsyncWriter, Result, Writer};
///
/// struct Discard;
///
/// impl Writer for Discard {
///     fn write(&mut self, payload: &[u8]) -> Result<usize> {
///         Ok(payload.len())
///     }
///
///     fn name(&self) -> &str {
///         "discard"
///     }
/// }
///
/// let writer = AsyncWriter::builder()
///     .capacity(1024)
///     .guard_band(32)
///     .build(Discard)
///     .unwrap();
/// writer.start().unwrap();
/// assert_eq!(writer.write(b"hello").unwrap(), 5);
/// ```
pub struct AsyncWriterBuilder {
    config: AsyncWriterConfig,
    reporter: Option<Arc<dyn ErrorReporter>>,
}

impl AsyncWriterBuilder {
    pub fn new() -> Self {
        Self {
            config: AsyncWriterConfig::default(),
            reporter: None,
        }
    }

    /// Replace the whole configuration
    #[must_use]
    pub fn config(mut self, config: AsyncWriterConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.config.capacity = capacity;
        self
    }

    #[must_use]
    pub fn guard_band(mut self, guard_band: usize) -> Self {
        self.config.guard_band = guard_band;
        self
    }

    #[must_use]
    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.config.thread_name = name.into();
        self
    }

    /// Where worker-side encode and write failures are reported
    #[must_use]
    pub fn reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    pub fn build<W: Writer + 'static>(self, downstream: W) -> Result<AsyncWriter> {
        AsyncWriter::from_parts(
            self.config,
            self.reporter.unwrap_or_else(default_reporter),
            Box::new(downstream),
        )
    }
}

impl Default for AsyncWriterBuilder {
    fn default() -> Self {
        Self::new()
    }
}
