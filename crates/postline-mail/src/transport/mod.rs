//! The seam between the mail facade and whatever actually delivers mail.
//!
//! - [`SmtpTransport`]: delivers over SMTP using `lettre`
//! - [`MemoryTransport`]: records messages in memory

mod memory;
mod smtp;

use std::future::Future;

pub use memory::MemoryTransport;
pub use smtp::SmtpTransport;

use crate::message::OutgoingMessage;

/// Something that can deliver an [`OutgoingMessage`].
pub trait Transport: Send + Sync {
    /// Delivers one message. Implementations must not retry.
    fn send(
        &self,
        message: &OutgoingMessage,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Checks that the remote end is reachable and accepts our login.
    fn test_connection(&self) -> impl Future<Output = Result<bool, TransportError>> + Send;
}

/// Transport-level failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The transport could not be constructed from its options.
    #[error("Transport setup failed: {0}")]
    Build(String),

    /// Could not connect, negotiate TLS, or authenticate.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Server rejected the message.
    #[error("Server rejected message ({code}): {message}")]
    Rejected {
        /// Reply code (e.g., 550).
        code: u16,
        /// Error message from server.
        message: String,
    },

    /// The message could not be converted for the transport.
    #[error("Message could not be built: {0}")]
    Message(String),
}

impl TransportError {
    /// Creates a rejection from a reply code and message.
    #[must_use]
    pub fn rejected(code: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            code,
            message: message.into(),
        }
    }

    /// Returns true if this is a permanent error (5xx).
    #[must_use]
    pub const fn is_permanent(&self) -> bool {
        matches!(self, Self::Rejected { code, .. } if *code >= 500 && *code < 600)
    }

    /// Returns true if this is a transient error (4xx).
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Rejected { code, .. } if *code >= 400 && *code < 500)
    }
}
