use std::fmt;

/// Error type for visualization sinks.
#[derive(Debug)]
pub enum SinkError {
    /// Writing the event failed.
    Io(std::io::Error),
    /// The event could not be encoded.
    Encode(String),
    /// The sink refused the request.
    Rejected(String),
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkError::Io(err) => write!(f, "Sink I/O error: {}", err),
            SinkError::Encode(msg) => write!(f, "Sink encoding error: {}", msg),
            SinkError::Rejected(msg) => write!(f, "Sink rejected request: {}", msg),
        }
    }
}

impl std::error::Error for SinkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SinkError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SinkError {
    fn from(err: std::io::Error) -> Self {
        SinkError::Io(err)
    }
}

impl From<serde_json::Error> for SinkError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            SinkError::Io(err.into())
        } else {
            SinkError::Encode(err.to_string())
        }
    }
}
