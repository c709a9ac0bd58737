use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::mpsc;

use super::error::ClientError;
use super::message::ProtocolMessage;

/// Everything the client pushes to its subscriber.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    /// A decoded inbound frame, keepalive probes included.
    Message(ProtocolMessage),

    /// A problem that did not come back through a caller's own `Result`:
    /// undecodable frames and failed automatic keepalive replies.
    Error(ClientError),

    /// The server or network closed the connection. Not emitted for
    /// [`TmiClient::disconnect`](super::manager::TmiClient::disconnect).
    Disconnected { reason: String },
}

/// At most one listener per client. Replacing it drops the old sender, so
/// the previous receiver sees the channel end.
#[derive(Clone, Default)]
pub struct SubscriberSlot {
    inner: Arc<RwLock<Option<mpsc::UnboundedSender<ClientEvent>>>>,
}

impl SubscriberSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&self, tx: Option<mpsc::UnboundedSender<ClientEvent>>) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = tx;
    }

    pub fn is_set(&self) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|tx| !tx.is_closed())
    }

    /// Deliver an event. No subscriber, or one that hung up, drops it.
    pub fn emit(&self, event: ClientEvent) {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(tx) = guard.as_ref() {
            if tx.send(event).is_err() {
                tracing::trace!("subscriber dropped, event discarded");
            }
        }
    }
}
