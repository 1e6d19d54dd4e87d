//! Error types for preprocessing operations.

use std::fmt;

/// Error type for tensor construction, scaling and denormalization.
#[derive(Debug, Clone, PartialEq)]
pub enum PreprocessingError {
    /// No rows to build tensors from or to fit a scaler on.
    InsufficientData(String),
    /// A column's `max - min` is zero or not finite, so min-max scaling is undefined.
    DegenerateRange { column: String },
    /// Feature dimension mismatch.
    FeatureMismatch {
        expected_features: usize,
        got_features: usize,
    },
    /// Shape mismatch between expected and actual tensor dimensions.
    InvalidShape { expected: String, got: String },
}

impl fmt::Display for PreprocessingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreprocessingError::InsufficientData(msg) => {
                write!(f, "Insufficient data: {}", msg)
            }
            PreprocessingError::DegenerateRange { column } => {
                write!(
                    f,
                    "Degenerate range: column '{}' has no finite, non-zero spread",
                    column
                )
            }
            PreprocessingError::FeatureMismatch {
                expected_features,
                got_features,
            } => {
                write!(
                    f,
                    "Feature mismatch: expected {} features, got {}",
                    expected_features, got_features
                )
            }
            PreprocessingError::InvalidShape { expected, got } => {
                write!(f, "Invalid shape: expected {}, got {}", expected, got)
            }
        }
    }
}

impl std::error::Error for PreprocessingError {}
