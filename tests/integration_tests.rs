//! Integration tests for the pattern logger
//!
//! These tests verify:
//! - Pattern layouts render events end to end
//! - Colored level output
//! - Async delivery through an encoder and filter
//! - Failure isolation in the worker
//! - File output

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use rust_pattern_logger::prelude::*;
use rust_pattern_logger::FileWriter;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// Forwards each payload to a channel, optionally with an encoder and filter
struct ChannelWriter {
    tx: Sender<Vec<u8>>,
    encoder: Option<Arc<dyn Encoder>>,
    filter: Option<Arc<dyn Filter>>,
}

impl ChannelWriter {
    fn new() -> (Self, Receiver<Vec<u8>>) {
        let (tx, rx) = unbounded();
        (
            Self {
                tx,
                encoder: None,
                filter: None,
            },
            rx,
        )
    }

    fn with_encoder(mut self, encoder: impl Encoder + 'static) -> Self {
        self.encoder = Some(Arc::new(encoder));
        self
    }

    fn with_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filter = Some(Arc::new(filter));
        self
    }
}

impl Writer for ChannelWriter {
    fn write(&mut self, payload: &[u8]) -> Result<usize> {
        self.tx
            .send(payload.to_vec())
            .map_err(|e| LoggerError::writer(e.to_string()))?;
        Ok(payload.len())
    }

    fn encoder(&self) -> Option<Arc<dyn Encoder>> {
        self.encoder.clone()
    }

    fn filter(&self) -> Option<Arc<dyn Filter>> {
        self.filter.clone()
    }

    fn name(&self) -> &str {
        "channel"
    }
}

fn collecting_reporter() -> (Arc<dyn ErrorReporter>, Arc<Mutex<Vec<String>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let reporter: Arc<dyn ErrorReporter> =
        Arc::new(move |msg: &str| sink.lock().push(msg.to_string()));
    (reporter, seen)
}

fn event_json(level: &str, message: &str) -> Vec<u8> {
    format!(r#"{{"level":"{}","message":"{}"}}"#, level, message).into_bytes()
}

#[test]
fn test_level_message_layout() {
    let encoder = PatternEncoder::new("#level #message").expect("layout should compile");
    let line = encoder
        .encode(&event_json("INFO", "hello"))
        .expect("encode should succeed");
    assert_eq!(line, b"INFO hello\n");
}

#[test]
fn test_colored_level_inside_outer_color() {
    let encoder = PatternEncoder::new("#color(#level){cyan}").unwrap();
    let line = encoder
        .encode_event(&LogEvent::new(LogLevel::Error, "ignored"))
        .unwrap();
    assert_eq!(line, b"\x1b[36m\x1b[31mERROR\x1b[0m\x1b[0m\n");
}

#[test]
fn test_fields_and_logger_layout() {
    let encoder = PatternEncoder::new("[#logger{12}] #message (#fields)").unwrap();
    let event = LogEvent::new(LogLevel::Info, "request done")
        .with_logger("net/http/server")
        .with_field("status", 200i64)
        .with_field("elapsed", Duration::from_millis(15))
        .with_field("cached", false);
    let line = String::from_utf8(encoder.encode_event(&event).unwrap()).unwrap();
    assert_eq!(
        line,
        "[n/h/server] request done (status=200 elapsed=15ms cached=false)\n"
    );
}

#[test]
fn test_json_round_trip_through_encoder() {
    let event = LogEvent::new(LogLevel::Warn, "cache miss").with_field("key", "user:42");
    let payload = event.to_json().unwrap();

    let encoder = PatternEncoder::new("#date{2006-01-02T15:04:05} #level #message #fields")
        .unwrap();
    let line = String::from_utf8(encoder.encode(&payload).unwrap()).unwrap();
    let expected_date = event.timestamp.format("%Y-%m-%dT%H:%M:%S").to_string();
    assert_eq!(
        line,
        format!("{} WARN cache miss key=user:42\n", expected_date)
    );
}

#[test]
fn test_date_keeps_payload_zone_across_midnight() {
    let encoder = PatternEncoder::new("#date{2006-01-02 15:04 -07:00} #level #message").unwrap();
    let payload = br#"{"time":"2021-03-05T02:00:00+05:00","level":"WARN","message":"late"}"#;
    let line = encoder.encode(payload).unwrap();
    assert_eq!(line, b"2021-03-05 02:00 +05:00 WARN late\n");

    // Re-encoding the decoded event keeps the same wall clock
    let event = LogEvent::from_json(payload).unwrap();
    let reencoded = encoder.encode(&event.to_json().unwrap()).unwrap();
    assert_eq!(reencoded, line);
}

#[test]
fn test_async_pipeline_delivers_encoded_lines_in_order() {
    let (writer, rx) = ChannelWriter::new();
    let writer = writer.with_encoder(PatternEncoder::new("#level #message").unwrap());

    let async_writer = AsyncWriter::new(writer).unwrap();
    async_writer.start().unwrap();

    for i in 0..50 {
        let payload = event_json("DEBUG", &format!("message {}", i));
        assert_eq!(async_writer.write(&payload).unwrap(), payload.len());
    }

    assert!(async_writer.stop(Duration::from_secs(5)));

    let lines: Vec<String> = rx
        .try_iter()
        .map(|line| String::from_utf8(line).unwrap())
        .collect();
    let expected: Vec<String> = (0..50).map(|i| format!("DEBUG message {}\n", i)).collect();
    assert_eq!(lines, expected);
    assert_eq!(async_writer.metrics().delivered_count(), 50);
}

#[test]
fn test_async_pipeline_applies_level_filter() {
    let (writer, rx) = ChannelWriter::new();
    let writer = writer
        .with_encoder(PatternEncoder::new("#level #message").unwrap())
        .with_filter(LevelFilter::new(LogLevel::Warn));

    let async_writer = AsyncWriter::new(writer).unwrap();
    async_writer.start().unwrap();

    async_writer.write(&event_json("DEBUG", "hidden")).unwrap();
    async_writer.write(&event_json("ERROR", "shown")).unwrap();
    async_writer.write(&event_json("INFO", "hidden")).unwrap();
    async_writer.stop(Duration::from_secs(5));

    let lines: Vec<Vec<u8>> = rx.try_iter().collect();
    assert_eq!(lines, vec![b"ERROR shown\n".to_vec()]);
    assert_eq!(async_writer.metrics().filtered_count(), 2);
}

#[test]
fn test_encode_failure_is_reported_and_skipped() {
    let (reporter, seen) = collecting_reporter();
    let (writer, rx) = ChannelWriter::new();
    let writer = writer.with_encoder(PatternEncoder::new("#message").unwrap());

    let async_writer = AsyncWriter::builder()
        .reporter(reporter)
        .build(writer)
        .unwrap();
    async_writer.start().unwrap();

    async_writer.write(b"{not json").unwrap();
    async_writer.write(&event_json("INFO", "after")).unwrap();
    async_writer.stop(Duration::from_secs(5));

    let lines: Vec<Vec<u8>> = rx.try_iter().collect();
    assert_eq!(lines, vec![b"after\n".to_vec()]);

    let reports = seen.lock();
    assert_eq!(reports.len(), 1);
    assert!(reports[0].contains("encode error"), "got {:?}", reports[0]);
    assert_eq!(async_writer.metrics().encode_failure_count(), 1);
}

/// Panics on payloads containing "boom"
struct PanickyWriter {
    written: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl Writer for PanickyWriter {
    fn write(&mut self, payload: &[u8]) -> Result<usize> {
        if payload.windows(4).any(|w| w == b"boom") {
            panic!("downstream exploded");
        }
        self.written.lock().push(payload.to_vec());
        Ok(payload.len())
    }

    fn name(&self) -> &str {
        "panicky"
    }
}

#[test]
fn test_downstream_panic_does_not_stop_worker() {
    let (reporter, seen) = collecting_reporter();
    let written = Arc::new(Mutex::new(Vec::new()));
    let async_writer = AsyncWriter::builder()
        .reporter(reporter)
        .build(PanickyWriter {
            written: Arc::clone(&written),
        })
        .unwrap();
    async_writer.start().unwrap();

    async_writer.write(b"one").unwrap();
    async_writer.write(b"boom").unwrap();
    async_writer.write(b"two").unwrap();
    assert!(async_writer.stop(Duration::from_secs(5)));

    assert_eq!(*written.lock(), vec![b"one".to_vec(), b"two".to_vec()]);
    assert!(seen
        .lock()
        .iter()
        .any(|msg| msg.contains("downstream exploded")));
    assert_eq!(async_writer.metrics().write_failure_count(), 1);
}

#[test]
fn test_file_writer_behind_async_writer() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("async_file.log");

    let file_writer = FileWriter::new(&log_file)
        .expect("Failed to create file writer")
        .with_encoder(PatternEncoder::new("#level #message #fields").unwrap());

    {
        let async_writer = AsyncWriter::new(file_writer).unwrap();
        async_writer.start().unwrap();
        for i in 0..20 {
            let event = LogEvent::new(LogLevel::Info, "tick").with_field("n", i as i64);
            async_writer.write(&event.to_json().unwrap()).unwrap();
        }
        // Dropping stops the worker and flushes the file
    }

    let content = std::fs::read_to_string(&log_file).expect("Failed to read log file");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 20);
    assert_eq!(lines[0], "INFO tick n=0");
    assert_eq!(lines[19], "INFO tick n=19");
}

#[test]
fn test_writes_after_stop_are_discarded() {
    let (writer, rx) = ChannelWriter::new();
    let async_writer = AsyncWriter::new(writer).unwrap();
    async_writer.start().unwrap();
    async_writer.stop(Duration::from_secs(5));

    assert_eq!(async_writer.write(b"late").unwrap(), 0);
    assert!(rx.try_recv().is_err());
    assert_eq!(async_writer.metrics().dropped_count(), 1);
}

#[test]
fn test_message_injection_is_neutralized() {
    let encoder = PatternEncoder::new("#level #message").unwrap();
    let line = encoder
        .encode(br#"{"level":"INFO","message":"login\nERROR forged"}"#)
        .unwrap();
    let text = String::from_utf8(line).unwrap();
    assert_eq!(text.lines().count(), 1);
    assert!(text.contains("\\n"));
}
