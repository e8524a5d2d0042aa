//! Structured error types for the homscore crates.

use thiserror::Error;

/// Unified error type for all homscore operations.
#[derive(Debug, Error)]
pub enum HomscoreError {
    /// I/O error (file not found, permission denied, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A line of a text input could not be parsed.
    #[error("malformed input at line {line}: {message}")]
    MalformedInputLine {
        /// 1-based line number within the input.
        line: usize,
        /// What was wrong with the line.
        message: String,
    },

    /// Invalid input (bad arguments, out-of-range values)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A score series covers a different set of instances from the
    /// series already held in a collection.
    #[error("inconsistent instance set: {0}")]
    InconsistentInstanceSet(String),

    /// A multi-metric record names a different set of metrics from the
    /// series already held in a collection.
    #[error("inconsistent metric set: {0}")]
    InconsistentMetricSet(String),

    /// A series with this name is already present.
    #[error("duplicate series name: {0}")]
    DuplicateSeriesName(String),

    /// A lookup by name or label found nothing.
    #[error("not found: {0}")]
    NotFound(String),

    /// No entries have a full score at or above the requested cutoff.
    #[error("no entries have a full score >= {cutoff}")]
    EmptyWantedSet {
        /// The full-score cutoff that selected nothing.
        cutoff: f64,
    },

    /// A calibrated threshold failed to reach the requested sensitivity.
    ///
    /// Only raised when the caller asks for strict calibration; otherwise
    /// the shortfall is reported as a [`crate::Diagnostic`].
    #[error("requested sensitivity {requested} but achieved {achieved}")]
    InsufficientSensitivity {
        /// The sensitivity the caller asked for.
        requested: f64,
        /// The sensitivity realised over the whole population.
        achieved: f64,
    },
}

/// Convenience alias used throughout the homscore crates.
pub type Result<T> = std::result::Result<T, HomscoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: HomscoreError = io.into();
        assert!(matches!(err, HomscoreError::Io(_)));
    }

    #[test]
    fn messages_carry_context() {
        let err = HomscoreError::MalformedInputLine {
            line: 7,
            message: "expected 3 fields, found 2".into(),
        };
        assert_eq!(
            err.to_string(),
            "malformed input at line 7: expected 3 fields, found 2"
        );
        let err = HomscoreError::EmptyWantedSet { cutoff: 80.5 };
        assert_eq!(err.to_string(), "no entries have a full score >= 80.5");
    }
}
