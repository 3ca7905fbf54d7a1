//! Log event structure

use super::error::{LoggerError, Result};
use super::log_context::{FieldValue, LogContext};
use super::log_level::LogLevel;
use chrono::{DateTime, FixedOffset, Offset, TimeZone, Utc};

/// JSON key holding the severity in an encoded event payload
pub const LEVEL_FIELD_KEY: &str = "level";
/// JSON key holding the RFC 3339 timestamp in an encoded event payload
pub const TIMESTAMP_FIELD_KEY: &str = "time";
/// JSON key holding the message in an encoded event payload
pub const MESSAGE_FIELD_KEY: &str = "message";
/// JSON key holding the optional logger name in an encoded event payload
pub const LOGGER_FIELD_KEY: &str = "logger";

/// One log occurrence as seen by the pattern converters
#[derive(Debug, Clone, PartialEq)]
pub struct LogEvent {
    pub level: LogLevel,
    /// Kept in the offset it was recorded with so `#date` renders local time
    pub timestamp: DateTime<FixedOffset>,
    pub message: String,
    pub logger: Option<String>,
    pub fields: LogContext,
}

impl LogEvent {
    /// Sanitize log message to prevent log injection attacks
    ///
    /// Replaces newlines, carriage returns, and tabs with escape sequences
    /// so one event always renders as one line.
    fn sanitize_message(message: &str) -> String {
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            timestamp: Self::now(),
            message: Self::sanitize_message(&message.into()),
            logger: None,
            fields: LogContext::new(),
        }
    }

    fn now() -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&Utc.fix())
    }

    /// Set the timestamp, keeping the offset of `timestamp`'s zone
    pub fn with_timestamp<Tz: TimeZone>(mut self, timestamp: DateTime<Tz>) -> Self {
        let offset = timestamp.offset().fix();
        self.timestamp = timestamp.with_timezone(&offset);
        self
    }

    pub fn with_logger(mut self, logger: impl Into<String>) -> Self {
        self.logger = Some(logger.into());
        self
    }

    pub fn with_field<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.fields.add_field(key, value);
        self
    }

    pub fn with_fields(mut self, fields: LogContext) -> Self {
        self.fields = fields;
        self
    }

    /// Decode an event from a JSON object payload
    ///
    /// The level, time, message and logger keys are lifted out; every other
    /// key becomes a field in document order. The time keeps the offset it
    /// was written with. A missing level reads as INFO, a missing time as
    /// now and a missing message as empty.
    pub fn from_json(payload: &[u8]) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_slice(payload)?;
        let serde_json::Value::Object(mut map) = value else {
            return Err(LoggerError::encode("event payload is not a JSON object"));
        };

        let level = match map.shift_remove(LEVEL_FIELD_KEY) {
            Some(serde_json::Value::String(s)) => s.parse().unwrap_or_default(),
            _ => LogLevel::default(),
        };

        let timestamp = match map.shift_remove(TIMESTAMP_FIELD_KEY) {
            Some(serde_json::Value::String(s)) => DateTime::parse_from_rfc3339(&s)
                .map_err(|e| LoggerError::encode(format!("invalid timestamp '{}': {}", s, e)))?,
            Some(other) => {
                return Err(LoggerError::encode(format!(
                    "timestamp must be an RFC 3339 string, got {}",
                    other
                )))
            }
            None => Self::now(),
        };

        let message = match map.shift_remove(MESSAGE_FIELD_KEY) {
            Some(serde_json::Value::String(s)) => Self::sanitize_message(&s),
            Some(serde_json::Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };

        let logger = match map.shift_remove(LOGGER_FIELD_KEY) {
            Some(serde_json::Value::String(s)) => Some(s),
            _ => None,
        };

        let fields = map
            .into_iter()
            .map(|(k, v)| (k, FieldValue::from_json_value(v)))
            .collect();

        Ok(Self {
            level,
            timestamp,
            message,
            logger,
            fields,
        })
    }

    /// Encode the event as a JSON object payload accepted by [`LogEvent::from_json`]
    pub fn to_json(&self) -> Result<Vec<u8>> {
        let mut map = serde_json::Map::new();
        map.insert(
            LEVEL_FIELD_KEY.to_string(),
            serde_json::Value::String(self.level.to_str().to_string()),
        );
        map.insert(
            TIMESTAMP_FIELD_KEY.to_string(),
            serde_json::Value::String(
                self.timestamp
                    .to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true),
            ),
        );
        map.insert(
            MESSAGE_FIELD_KEY.to_string(),
            serde_json::Value::String(self.message.clone()),
        );
        if let Some(ref logger) = self.logger {
            map.insert(
                LOGGER_FIELD_KEY.to_string(),
                serde_json::Value::String(logger.clone()),
            );
        }
        for (key, value) in self.fields.iter() {
            map.insert(key.to_string(), value.to_json_value());
        }

        Ok(serde_json::to_vec(&serde_json::Value::Object(map))?)
    }
}
