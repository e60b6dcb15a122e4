use std::time::Duration;
use thiserror::Error;

/// Why the student data source could not produce a record set
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceFailure {
    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("malformed payload: {0}")]
    Malformed(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

#[derive(Error, Debug)]
pub enum SeatError {
    #[error("Data source unavailable: {0}")]
    SourceUnavailable(SourceFailure),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown export format: {0}")]
    UnknownFormat(String),
}

impl SeatError {
    pub fn malformed(message: impl Into<String>) -> Self {
        SeatError::SourceUnavailable(SourceFailure::Malformed(message.into()))
    }

    pub fn is_source_unavailable(&self) -> bool {
        matches!(self, SeatError::SourceUnavailable(_))
    }
}

impl From<SourceFailure> for SeatError {
    fn from(failure: SourceFailure) -> Self {
        SeatError::SourceUnavailable(failure)
    }
}

impl From<reqwest::Error> for SeatError {
    fn from(err: reqwest::Error) -> Self {
        let failure = if let Some(status) = err.status() {
            SourceFailure::Status(status.as_u16())
        } else if err.is_decode() {
            SourceFailure::Malformed(err.to_string())
        } else {
            SourceFailure::Network(err.to_string())
        };
        SeatError::SourceUnavailable(failure)
    }
}

pub type Result<T> = std::result::Result<T, SeatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_failures_render_their_cause() {
        let err: SeatError = SourceFailure::Status(503).into();
        assert!(err.is_source_unavailable());
        assert_eq!(err.to_string(), "Data source unavailable: unexpected HTTP status 503");

        let err = SeatError::malformed("expected an array");
        assert!(err.to_string().contains("expected an array"));
    }

    #[test]
    fn config_errors_are_not_source_failures() {
        let err = SeatError::Config("timeout must be positive".to_string());
        assert!(!err.is_source_unavailable());
    }
}
