//! Severity threshold applied to JSON event payloads

use crate::core::{Filter, LogLevel};
use serde::Deserialize;
use std::borrow::Cow;

#[derive(Deserialize)]
struct LevelOnly<'a> {
    #[serde(borrow, default)]
    level: Option<Cow<'a, str>>,
}

/// Drops payloads whose `level` is below a minimum
///
/// Payloads without a level count as INFO, matching how they are encoded.
/// Payloads that are not JSON are kept so the encoder can report them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelFilter {
    min_level: LogLevel,
}

impl LevelFilter {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }
}

impl Filter for LevelFilter {
    fn should_drop(&self, payload: &[u8]) -> bool {
        let Ok(header) = serde_json::from_slice::<LevelOnly<'_>>(payload) else {
            return false;
        };
        let level = header
            .level
            .and_then(|l| l.parse::<LogLevel>().ok())
            .unwrap_or_default();
        level < self.min_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drops_below_minimum() {
        let filter = LevelFilter::new(LogLevel::Warn);
        assert!(filter.should_drop(br#"{"level":"DEBUG","message":"x"}"#));
        assert!(filter.should_drop(br#"{"message":"no level"}"#));
        assert!(!filter.should_drop(br#"{"level":"WARN"}"#));
        assert!(!filter.should_drop(br#"{"level":"error","message":"x"}"#));
    }

    #[test]
    fn test_keeps_undecodable_payloads() {
        let filter = LevelFilter::new(LogLevel::Fatal);
        assert!(!filter.should_drop(b"plain text"));
    }
}
