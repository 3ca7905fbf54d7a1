//! Asynchronous writer example
//!
//! Demonstrates non-blocking writes through an AsyncWriter, a level filter
//! and the delivery metrics.
//!
//! Run with: cargo run --example async_logging

use rust_pattern_logger::prelude::*;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

fn main() -> Result<()> {
    println!("=== Rust Pattern Logger - Async Writer Example ===\n");

    let console = ConsoleWriter::new()
        .with_encoder(PatternEncoder::new("#date{15:04:05.000} #color(#level) #message #fields")?)
        .with_filter(LevelFilter::new(LogLevel::Info));

    let writer = Arc::new(
        AsyncWriter::builder()
            .capacity(1024)
            .thread_name("demo-writer")
            .build(console)?,
    );
    writer.start()?;

    println!("1. Writing from 4 threads:");
    let start = Instant::now();
    let handles: Vec<_> = (0..4)
        .map(|t| {
            let writer = Arc::clone(&writer);
            thread::spawn(move || -> Result<()> {
                for i in 0..5 {
                    let level = if i % 2 == 0 { LogLevel::Info } else { LogLevel::Debug };
                    let event = LogEvent::new(level, format!("worker {} step {}", t, i))
                        .with_field("thread", t as i64);
                    writer.write(&event.to_json()?)?;
                }
                Ok(())
            })
        })
        .collect();

    for handle in handles {
        if let Ok(Err(e)) = handle.join() {
            eprintln!("producer failed: {}", e);
        }
    }
    println!("   queued 20 events in {:?}", start.elapsed());

    writer.stop(Duration::from_secs(5));

    let metrics = writer.metrics();
    println!("\n2. Metrics:");
    println!("   enqueued:  {}", metrics.enqueued_count());
    println!("   dropped:   {}", metrics.dropped_count());
    println!("   filtered:  {}", metrics.filtered_count());
    println!("   delivered: {}", metrics.delivered_count());

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
