use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{mpsc, oneshot, Mutex};
use tracing::{debug, info};

use crate::irc::connection::{self, SessionSlot, TWITCH_IRC_WS_URL};
use crate::irc::error::ClientError;
use crate::irc::event::{ClientEvent, SubscriberSlot};
use crate::irc::sender::{CommandSender, Outbound, SendHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connected,
}

/// Owner-facing chat client.
///
/// Holds at most one connection and one subscriber. Send operations queue
/// their frame and return immediately; await the [`SendHandle`] to learn when
/// the write finished. Reconnecting after a
/// [`ClientEvent::Disconnected`] is up to the caller.
pub struct TmiClient {
    endpoint: String,
    sessions: SessionSlot,
    subscriber: SubscriberSlot,
    lifecycle: Mutex<()>,
    next_session_id: AtomicU64,
}

impl Default for TmiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl TmiClient {
    pub fn new() -> Self {
        Self::with_endpoint(TWITCH_IRC_WS_URL)
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            sessions: SessionSlot::default(),
            subscriber: SubscriberSlot::new(),
            lifecycle: Mutex::new(()),
            next_session_id: AtomicU64::new(1),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Register a fresh subscriber, replacing any previous one.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<ClientEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscriber.replace(Some(tx));
        rx
    }

    pub fn set_subscriber(&self, tx: mpsc::UnboundedSender<ClientEvent>) {
        self.subscriber.replace(Some(tx));
    }

    pub fn clear_subscriber(&self) {
        self.subscriber.replace(None);
    }

    pub fn state(&self) -> ConnectionState {
        if self.sessions.is_occupied() {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        }
    }

    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// Open the connection. Already connected is a no-op. On failure the
    /// client stays disconnected.
    pub async fn connect(&self) -> Result<(), ClientError> {
        let _lifecycle = self.lifecycle.lock().await;
        if self.sessions.is_occupied() {
            debug!("connect() while already connected, ignoring");
            return Ok(());
        }

        info!("Connecting to {}", self.endpoint);
        let ws = connection::open(&self.endpoint).await?;
        let id = self.next_session_id.fetch_add(1, Ordering::Relaxed);
        connection::install_session(id, ws, &self.sessions, self.subscriber.clone());
        info!("Connected to {}", self.endpoint);
        Ok(())
    }

    /// Close the connection gracefully. Already disconnected is a no-op.
    ///
    /// Frames queued before this call are written before the close frame.
    pub async fn disconnect(&self) -> Result<(), ClientError> {
        let _lifecycle = self.lifecycle.lock().await;
        let Some(session) = self.sessions.take() else {
            return Ok(());
        };

        let (done, closed) = oneshot::channel();
        let result = if session.outbound.send(Outbound::Close { done }).is_ok() {
            closed.await.unwrap_or(Ok(()))
        } else {
            Ok(())
        };
        let _ = session.task.await;
        info!("Disconnected from {}", self.endpoint);
        result
    }

    pub fn authenticate(&self, token: &str) -> Result<SendHandle, ClientError> {
        self.sender()?.authenticate(token)
    }

    pub fn set_nickname(&self, nickname: &str) -> Result<SendHandle, ClientError> {
        self.sender()?.set_nickname(nickname)
    }

    pub fn join_channel(&self, channel: &str) -> Result<SendHandle, ClientError> {
        self.sender()?.join_channel(channel)
    }

    pub fn send_chat_message(
        &self,
        nickname: &str,
        channel: &str,
        text: &str,
    ) -> Result<SendHandle, ClientError> {
        self.sender()?.send_chat_message(nickname, channel, text)
    }

    pub fn send_keepalive_response(&self) -> Result<SendHandle, ClientError> {
        self.sender()?.send_keepalive_response()
    }

    /// Sender for the live session, for callers that issue from other tasks.
    pub fn sender(&self) -> Result<CommandSender, ClientError> {
        self.sessions.sender().ok_or(ClientError::NotConnected)
    }
}

impl Drop for TmiClient {
    fn drop(&mut self) {
        if let Some(session) = self.sessions.take() {
            session.task.abort();
        }
    }
}
