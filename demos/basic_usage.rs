//! Basic pattern encoder usage example
//!
//! Demonstrates formatting events with the default and custom layouts.
//!
//! Run with: cargo run --example basic_usage

use rust_pattern_logger::prelude::*;

fn main() -> Result<()> {
    println!("=== Rust Pattern Logger - Basic Usage Example ===\n");

    // Default layout: colored date, colored level, message and fields
    let encoder = PatternEncoder::default();
    println!("1. Default layout: {}", encoder.layout());
    for level in LogLevel::ALL {
        let event = LogEvent::new(level, format!("This is a {} message", level))
            .with_field("attempt", 1i64);
        print!("{}", String::from_utf8_lossy(&encoder.encode_event(&event)?));
    }

    println!("\n2. Custom layout with logger name abbreviation:");
    let encoder = PatternEncoder::new("#date{15:04:05.000} [#logger{16}] #level: #message")?;
    let event = LogEvent::new(LogLevel::Info, "connection accepted")
        .with_logger("net/http/server/Listener");
    print!("{}", String::from_utf8_lossy(&encoder.encode_event(&event)?));

    println!("\n3. Encoding a JSON payload:");
    let payload = br#"{"level":"WARN","message":"disk almost full","free_mb":512}"#;
    let encoder = PatternEncoder::new("#color(#level #message){yellow} #fields")?;
    print!("{}", String::from_utf8_lossy(&encoder.encode(payload)?));

    println!("\n4. Broken layouts are reported:");
    match PatternEncoder::new("#color(#level") {
        Ok(_) => println!("   unexpectedly compiled"),
        Err(e) => println!("   {}", e),
    }
    match PatternEncoder::new("#level #thread") {
        Ok(_) => println!("   unexpectedly compiled"),
        Err(e) => println!("   {}", e),
    }

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
