/// Error types for the zone explorer core
use thiserror::Error;

/// Main error type for zone explorer operations
#[derive(Error, Debug)]
pub enum RezError {
    /// A hydrated or encoded value fell outside its allowed domain
    #[error("Invalid value for {key}: {reason}")]
    Validation { key: String, reason: String },

    /// A filter kind the backend query contract cannot express
    #[error("Filter {id} type not supported by api ({kind})")]
    UnsupportedFilterKind { id: String, kind: String },

    /// Non-2xx response or transport failure
    #[error("Network error{}: {message}", status.map(|s| format!(" ({s})")).unwrap_or_default())]
    Network {
        status: Option<u16>,
        message: String,
    },

    /// An operation was requested without the state it needs
    #[error("{0}")]
    Precondition(String),

    /// Persistent key-value store failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Failed to parse or serialize JSON data
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to read or write CSV data
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RezError {
    pub fn validation(key: impl Into<String>, reason: impl Into<String>) -> Self {
        RezError::Validation {
            key: key.into(),
            reason: reason.into(),
        }
    }

    pub fn network(status: Option<u16>, message: impl Into<String>) -> Self {
        RezError::Network {
            status,
            message: message.into(),
        }
    }

    /// HTTP status carried by a network error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            RezError::Network { status, .. } => *status,
            _ => None,
        }
    }
}

/// Type alias for Results using RezError
pub type Result<T> = std::result::Result<T, RezError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_error_display_includes_status() {
        let err = RezError::network(Some(503), "Unexpected error (503).");
        assert_eq!(err.to_string(), "Network error (503): Unexpected error (503).");
        assert_eq!(err.status(), Some(503));
    }

    #[test]
    fn network_error_without_status() {
        let err = RezError::network(None, "connection refused");
        assert_eq!(err.to_string(), "Network error: connection refused");
        assert_eq!(err.status(), None);
    }
}
