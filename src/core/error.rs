//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Malformed pattern string
    #[error("Pattern parse error at position {position}: {message}")]
    Parse { position: usize, message: String },

    /// Pattern references a converter name with no registered factory
    #[error("Unknown converter '#{name}'")]
    UnknownConverter { name: String },

    /// A single event could not be encoded
    #[error("Encode error: {message}")]
    Encode { message: String },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Queue full with buffer details
    #[error("Log queue full: {current}/{max} payloads buffered")]
    QueueFull { current: usize, max: usize },

    /// Queue was closed and no longer accepts payloads
    #[error("Log queue closed")]
    QueueClosed,

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// File lock error
    #[error("Failed to acquire file lock on '{path}'")]
    FileLockError { path: String },

    /// Writer error (generic)
    #[error("Writer error: {0}")]
    WriterError(String),
}

impl LoggerError {
    /// Create a pattern parse error at a byte offset
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        LoggerError::Parse {
            position,
            message: message.into(),
        }
    }

    /// Create an unknown converter error
    pub fn unknown_converter(name: impl Into<String>) -> Self {
        LoggerError::UnknownConverter { name: name.into() }
    }

    /// Create an encode error
    pub fn encode(message: impl Into<String>) -> Self {
        LoggerError::Encode {
            message: message.into(),
        }
    }

    /// Create a queue full error with buffer details
    pub fn queue_full(current: usize, max: usize) -> Self {
        LoggerError::QueueFull { current, max }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a file lock error
    pub fn file_lock(path: impl Into<String>) -> Self {
        LoggerError::FileLockError { path: path.into() }
    }

    /// Create a writer error (generic)
    pub fn writer<S: Into<String>>(msg: S) -> Self {
        LoggerError::WriterError(msg.into())
    }

    /// Whether this error comes from a broken pattern rather than a single event
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            LoggerError::Parse { .. }
                | LoggerError::UnknownConverter { .. }
                | LoggerError::InvalidConfiguration { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::queue_full(256, 256);
        assert!(matches!(err, LoggerError::QueueFull { .. }));

        let err = LoggerError::config("AsyncWriter", "capacity must be positive");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let err = LoggerError::unknown_converter("thread");
        assert!(matches!(err, LoggerError::UnknownConverter { ref name } if name == "thread"));
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::queue_full(100, 256);
        assert_eq!(err.to_string(), "Log queue full: 100/256 payloads buffered");

        let err = LoggerError::parse(7, "unclosed '('");
        assert_eq!(
            err.to_string(),
            "Pattern parse error at position 7: unclosed '('"
        );

        let err = LoggerError::unknown_converter("thread");
        assert_eq!(err.to_string(), "Unknown converter '#thread'");
    }

    #[test]
    fn test_configuration_classification() {
        assert!(LoggerError::parse(0, "x").is_configuration());
        assert!(LoggerError::unknown_converter("x").is_configuration());
        assert!(!LoggerError::encode("bad json").is_configuration());
        assert!(!LoggerError::writer("disk full").is_configuration());
    }
}
