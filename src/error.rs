//! Error types for the gavel library.

use std::io;
use thiserror::Error;

/// Result type alias for gavel operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while structuring an agenda document.
///
/// Layout anomalies and structural violations are deliberately *not* errors:
/// they are logged as warnings and processing continues (see the `layout` and
/// `structure` modules). The variants here are genuinely fatal conditions.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error reading or writing JSON (page dumps, models, agendas).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error reading or writing a CSV line table.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The paginated source could not be interpreted.
    #[error("Layout source error: {0}")]
    Source(String),

    /// A training row has zero or more than one role indicator set.
    ///
    /// This indicates a corrupted label set and always aborts training.
    #[error("Invalid training label on row {row} ({line_id}): {active} role indicators set, expected exactly 1")]
    InvalidLabel {
        /// Zero-based row index within the training table.
        row: usize,
        /// The `line_id` of the offending row.
        line_id: String,
        /// Number of role indicator columns set on the row.
        active: usize,
    },

    /// The training set is empty or degenerate (e.g. a single class).
    #[error("Unusable training set: {0}")]
    Training(String),

    /// A line was handed to the classifier before the model was fitted,
    /// or a persisted model is internally inconsistent.
    #[error("Model error: {0}")]
    Model(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidLabel {
            row: 12,
            line_id: "gavilan_04-05-2016_12".to_string(),
            active: 2,
        };
        assert_eq!(
            err.to_string(),
            "Invalid training label on row 12 (gavilan_04-05-2016_12): 2 role indicators set, expected exactly 1"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
