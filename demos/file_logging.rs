//! File writer example
//!
//! Demonstrates writing pattern-formatted lines to a file through an
//! AsyncWriter.
//!
//! Run with: cargo run --example file_logging

use rust_pattern_logger::prelude::*;
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== Rust Pattern Logger - File Writer Example ===\n");

    let path = std::env::temp_dir().join("rust_pattern_logger_demo.log");
    let _ = std::fs::remove_file(&path);

    let file = FileWriter::new(&path)?.with_encoder(
        PatternEncoder::new("#date{2006-01-02T15:04:05.000Z07:00} #level #message #fields")?,
    );

    let writer = AsyncWriter::new(file)?;
    writer.start()?;

    for i in 0..10 {
        let event = LogEvent::new(LogLevel::Info, "order processed")
            .with_field("order_id", 1000 + i as i64)
            .with_field("elapsed", Duration::from_millis(12 + i));
        writer.write(&event.to_json()?)?;
    }
    writer
        .write(&LogEvent::new(LogLevel::Error, "payment gateway timeout").to_json()?)?;

    writer.stop(Duration::from_secs(5));

    println!("Wrote to {}:\n", path.display());
    print!("{}", std::fs::read_to_string(&path)?);

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
