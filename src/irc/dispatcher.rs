//! Per-line inbound handling.
//!
//! The session task calls [`Dispatcher::dispatch`] once per received line, in
//! order, never concurrently. Keepalive probes are answered before the frame
//! is forwarded, and a bad line never stops the loop.

use tracing::{debug, warn};

use super::error::ClientError;
use super::event::{ClientEvent, SubscriberSlot};
use super::message::ProtocolMessage;
use super::sender::CommandSender;

/// Liveness probe command sent by the server.
pub const PING: &str = "PING";

pub struct Dispatcher {
    sender: CommandSender,
    subscriber: SubscriberSlot,
}

impl Dispatcher {
    pub fn new(sender: CommandSender, subscriber: SubscriberSlot) -> Self {
        Self { sender, subscriber }
    }

    pub fn dispatch(&self, raw: &str) {
        let message = match ProtocolMessage::decode(raw) {
            Ok(message) => message,
            Err(e) => {
                warn!("Skipping undecodable frame: {}", e);
                self.subscriber.emit(ClientEvent::Error(e));
                return;
            }
        };

        if message.is_command(PING) {
            self.answer_keepalive();
        }

        self.subscriber.emit(ClientEvent::Message(message));
    }

    /// Queue the PONG now and report a failed write through the subscriber.
    fn answer_keepalive(&self) {
        debug!("Keepalive probe received, answering");
        match self.sender.send_keepalive_response() {
            Ok(handle) => {
                let subscriber = self.subscriber.clone();
                tokio::spawn(async move {
                    if let Err(e) = handle.await {
                        report_keepalive_failure(&subscriber, e);
                    }
                });
            }
            Err(e) => report_keepalive_failure(&self.subscriber, e),
        }
    }
}

fn report_keepalive_failure(subscriber: &SubscriberSlot, e: ClientError) {
    let e = match e {
        ClientError::Transport(_) => e,
        other => ClientError::Transport(format!("keepalive response failed: {}", other)),
    };
    warn!("Keepalive response failed: {}", e);
    subscriber.emit(ClientEvent::Error(e));
}
