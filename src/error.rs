//! Crate-level error type

use thiserror::Error;

/// Errors raised outside the numeric core (loading, export, configuration)
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Export was requested before any schedule was calculated
    #[error("schedule is empty; calculate the mortgage first")]
    EmptySchedule,

    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),

    #[error("invalid loan record `{name}`: {reason}")]
    InvalidRecord { name: String, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_conversion() {
        let err: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "loans.csv").into();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.to_string(), "I/O error: loans.csv");
    }

    #[test]
    fn test_record_message() {
        let err = Error::InvalidRecord {
            name: String::new(),
            reason: "name is empty".to_string(),
        };
        assert_eq!(err.to_string(), "invalid loan record ``: name is empty");
    }
}
