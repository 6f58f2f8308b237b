//! Error types for wf-logstats

use thiserror::Error;

/// Errors produced while reading, parsing and analyzing workflow logs
#[derive(Debug, Error)]
pub enum WfLogstatsError {
    /// A log row or message could not be parsed
    #[error("parse error: {message}")]
    Parse {
        message: String,
        line_number: Option<usize>,
        line_content: Option<String>,
    },

    /// A timestamp string could not be interpreted
    #[error("invalid timestamp '{value}': {message}")]
    Timestamp { message: String, value: String },

    /// Invalid CLI or estimator configuration
    #[error("configuration error: {message}")]
    Configuration {
        message: String,
        field: Option<String>,
    },

    /// Underlying I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV deserialization failure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization failure
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Anything that should not happen during normal operation
    #[error("unexpected error: {message}")]
    Unexpected {
        message: String,
        context: Option<String>,
    },
}

/// Convenience result alias used throughout the crate
pub type Result<T> = std::result::Result<T, WfLogstatsError>;

/// Build a [`WfLogstatsError::Parse`]
pub fn parse_error(message: &str, line_number: Option<usize>, line_content: Option<&str>) -> WfLogstatsError {
    WfLogstatsError::Parse {
        message: message.to_string(),
        line_number,
        line_content: line_content.map(|l| l.to_string()),
    }
}

/// Build a [`WfLogstatsError::Timestamp`]
pub fn timestamp_error(message: &str, value: &str) -> WfLogstatsError {
    WfLogstatsError::Timestamp {
        message: message.to_string(),
        value: value.to_string(),
    }
}

/// Build a [`WfLogstatsError::Configuration`]
pub fn config_error(message: &str, field: Option<&str>) -> WfLogstatsError {
    WfLogstatsError::Configuration {
        message: message.to_string(),
        field: field.map(|f| f.to_string()),
    }
}

/// Map a `std::fmt` failure into [`WfLogstatsError::Unexpected`]
pub fn fmt_error(e: std::fmt::Error) -> WfLogstatsError {
    WfLogstatsError::Unexpected {
        message: e.to_string(),
        context: Some("text formatting".to_string()),
    }
}
