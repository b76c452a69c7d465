//! Error types for the PPPoE simulator

use thiserror::Error;

/// Result type alias for simulator operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the PPPoE simulator
#[derive(Error, Debug)]
pub enum Error {
    /// Network I/O error
    #[error("Network I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A declared length would read past the end of the buffer
    #[error("Truncated {context}: need {needed} bytes, have {available}")]
    TruncatedFrame {
        context: &'static str,
        needed: usize,
        available: usize,
    },

    /// The inbound frame source ended or failed
    #[error("Transport closed: {0}")]
    TransportClosed(String),

    /// The transport could not be opened on the selected interface
    #[error("Transport unavailable: {0}")]
    TransportUnavailable(String),

    /// Interface not found
    #[error("Interface '{0}' not found")]
    InterfaceNotFound(String),

    /// Capture error
    #[error("Packet capture error: {0}")]
    Capture(String),

    /// Invalid parameter error
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },
}

impl Error {
    /// Create a truncation error for a structure that needed more bytes
    pub fn truncated(context: &'static str, needed: usize, available: usize) -> Self {
        Error::TruncatedFrame {
            context,
            needed,
            available,
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter<S: Into<String>>(name: S, reason: S) -> Self {
        Error::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncated_display() {
        let err = Error::truncated("LCP option", 6, 3);
        assert_eq!(
            err.to_string(),
            "Truncated LCP option: need 6 bytes, have 3"
        );
    }
}
