//! In-memory transport.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{Transport, TransportError};
use crate::message::OutgoingMessage;

#[derive(Debug, Default)]
struct State {
    sent: Vec<OutgoingMessage>,
    fail_next: Option<TransportError>,
}

/// Transport that keeps delivered messages in memory.
///
/// Clones share the same log, so a test can keep one handle and give the
/// other to a client.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    state: Arc<Mutex<State>>,
}

impl MemoryTransport {
    /// Creates an empty transport.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Makes the next `send` fail with `error` instead of recording.
    pub fn fail_next(&self, error: TransportError) {
        self.lock().fail_next = Some(error);
    }

    /// Returns a copy of every message delivered so far.
    #[must_use]
    pub fn sent(&self) -> Vec<OutgoingMessage> {
        self.lock().sent.clone()
    }

    /// Returns the most recently delivered message.
    #[must_use]
    pub fn last(&self) -> Option<OutgoingMessage> {
        self.lock().sent.last().cloned()
    }

    /// Number of messages delivered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().sent.len()
    }

    /// Returns true if nothing was delivered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().sent.is_empty()
    }

    /// Forgets every delivered message.
    pub fn clear(&self) {
        self.lock().sent.clear();
    }
}

impl Transport for MemoryTransport {
    async fn send(&self, message: &OutgoingMessage) -> Result<(), TransportError> {
        let mut state = self.lock();
        if let Some(error) = state.fail_next.take() {
            return Err(error);
        }
        state.sent.push(message.clone());
        Ok(())
    }

    async fn test_connection(&self) -> Result<bool, TransportError> {
        Ok(true)
    }
}
