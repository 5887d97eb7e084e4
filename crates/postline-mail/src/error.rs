//! Error types for the mail facade.

use crate::transport::TransportError;

/// Result type alias for mail facade operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the mail facade.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Sender or recipient address failed validation.
    #[error("Invalid email address '{address}': {reason}")]
    InvalidAddress {
        /// The offending input.
        address: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// No To, Cc or Bcc recipients were supplied.
    #[error("No recipients specified")]
    NoRecipients,

    /// Body subtype is neither `plain` nor `html`.
    #[error("Unsupported body subtype: {0}")]
    UnsupportedSubtype(String),

    /// Recipient type is not one of `to`, `cc`, `bcc`.
    #[error("Invalid recipient type: {0}")]
    InvalidRecipientType(String),

    /// Options value is not a flat key/value object.
    #[error("Invalid properties: {0}")]
    InvalidProperties(String),

    /// A single property has a value that cannot be used.
    #[error("Invalid value for property '{key}': {reason}")]
    InvalidProperty {
        /// Property key.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// Configuration is incomplete or inconsistent.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The underlying transport failed.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid_property(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidProperty {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if retrying the same call might succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_transient())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_converts() {
        let err: Error = TransportError::Connection("refused".into()).into();
        assert!(matches!(err, Error::Transport(_)));
        assert_eq!(err.to_string(), "Transport error: Connection failed: refused");
    }

    #[test]
    fn test_is_transient() {
        let err: Error = TransportError::rejected(451, "try later").into();
        assert!(err.is_transient());
        assert!(!Error::NoRecipients.is_transient());
    }

    #[test]
    fn test_invalid_property_display() {
        let err = Error::invalid_property("mail.smtp.port", "not a number");
        assert_eq!(
            err.to_string(),
            "Invalid value for property 'mail.smtp.port': not a number"
        );
    }
}
