//! Errors raised while obtaining raw records.

use std::fmt;

/// Error type for data sources.
#[derive(Debug)]
pub enum DataError {
    /// The source could not be reached or read.
    Unavailable(String),
    /// The payload was reachable but is not a JSON array of records.
    Parse(String),
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataError::Unavailable(msg) => write!(f, "Data unavailable: {}", msg),
            DataError::Parse(msg) => write!(f, "Malformed data: {}", msg),
        }
    }
}

impl std::error::Error for DataError {}

impl From<std::io::Error> for DataError {
    fn from(err: std::io::Error) -> Self {
        DataError::Unavailable(err.to_string())
    }
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        DataError::Parse(err.to_string())
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for DataError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            DataError::Parse(err.to_string())
        } else {
            DataError::Unavailable(err.to_string())
        }
    }
}
