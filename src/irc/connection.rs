use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{connect_async_tls_with_config, Connector, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use super::dispatcher::Dispatcher;
use super::error::ClientError;
use super::event::{ClientEvent, SubscriberSlot};
use super::sender::{CommandSender, Outbound, WriteResult};

/// Twitch chat over secure WebSocket.
pub const TWITCH_IRC_WS_URL: &str = "wss://irc-ws.chat.twitch.tv:443";

/// How long a requested close waits for the server's close reply.
const CLOSE_GRACE: Duration = Duration::from_secs(5);

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, WsMessage>;
type WsSource = SplitStream<WsStream>;

/// A live connection: its outbound queue and the task that owns the socket.
pub(crate) struct Session {
    pub id: u64,
    pub sender: CommandSender,
    pub outbound: mpsc::UnboundedSender<Outbound>,
    pub task: JoinHandle<()>,
}

/// The single current session, shared between the client and the session
/// task so an unsolicited close can flip the client back to disconnected.
#[derive(Clone, Default)]
pub(crate) struct SessionSlot {
    inner: Arc<RwLock<Option<Session>>>,
}

impl SessionSlot {
    pub fn sender(&self) -> Option<CommandSender> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|s| s.sender.clone())
    }

    pub fn is_occupied(&self) -> bool {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    pub fn take(&self) -> Option<Session> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner).take()
    }

    /// Clear the slot only if it still holds session `id`. Returns whether it did.
    fn release(&self, id: u64) -> bool {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if guard.as_ref().is_some_and(|s| s.id == id) {
            *guard = None;
            true
        } else {
            false
        }
    }
}

/// Open the WebSocket. Nothing is spawned and no state changes on failure.
pub(crate) async fn open(endpoint: &str) -> Result<WsStream, ClientError> {
    let connector = if endpoint.starts_with("ws://") {
        Connector::Plain
    } else {
        tls_connector()?
    };
    let (ws, response) = connect_async_tls_with_config(endpoint, None, false, Some(connector)).await?;
    debug!("WebSocket handshake with {} complete ({})", endpoint, response.status());
    Ok(ws)
}

fn tls_connector() -> Result<Connector, ClientError> {
    let roots = rustls::RootCertStore::from_iter(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    let provider = Arc::new(rustls::crypto::aws_lc_rs::default_provider());
    let config = rustls::ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .map_err(|e| ClientError::Transport(format!("TLS setup failed: {}", e)))?
        .with_root_certificates(roots)
        .with_no_client_auth();
    Ok(Connector::Rustls(Arc::new(config)))
}

/// Install a new session into `slot` and start its task.
///
/// The slot lock is held while spawning, so the task cannot observe the slot
/// before its own session is in it.
pub(crate) fn install_session(
    id: u64,
    ws: WsStream,
    slot: &SessionSlot,
    subscriber: SubscriberSlot,
) {
    let (outbound, outbound_rx) = mpsc::unbounded_channel();
    let sender = CommandSender::new(outbound.clone());
    let dispatcher = Dispatcher::new(sender.clone(), subscriber.clone());

    let mut guard = slot.inner.write().unwrap_or_else(PoisonError::into_inner);
    let task = tokio::spawn(run_session(id, ws, outbound_rx, dispatcher, slot.clone(), subscriber));
    *guard = Some(Session {
        id,
        sender,
        outbound,
        task,
    });
}

/// Owns the socket for the lifetime of one connection.
///
/// Reads are dispatched line by line in arrival order. Writes are taken one
/// at a time from the outbound queue, so frames never interleave.
async fn run_session(
    id: u64,
    ws: WsStream,
    mut outbound: mpsc::UnboundedReceiver<Outbound>,
    dispatcher: Dispatcher,
    slot: SessionSlot,
    subscriber: SubscriberSlot,
) {
    let (mut sink, mut source) = ws.split();

    let reason = loop {
        tokio::select! {
            frame = source.next() => match frame {
                Some(Ok(WsMessage::Text(text))) => {
                    for line in text.lines() {
                        dispatcher.dispatch(line);
                    }
                }
                Some(Ok(WsMessage::Close(frame))) => {
                    break match frame {
                        Some(f) => format!("closed by server ({}): {}", f.code, f.reason),
                        None => "closed by server".to_string(),
                    };
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => break format!("transport error: {}", e),
                None => break "connection closed".to_string(),
            },
            item = outbound.recv() => match item {
                Some(Outbound::Line { line, done }) => {
                    let result = write_line(&mut sink, line).await;
                    let failure = result.as_ref().err().map(ToString::to_string);
                    let _ = done.send(result);
                    if let Some(failure) = failure {
                        break failure;
                    }
                }
                Some(Outbound::Close { done }) => {
                    let result = close_gracefully(&mut sink, &mut source).await;
                    fail_pending(&mut outbound);
                    let _ = done.send(result);
                    debug!("Session {} closed on request", id);
                    return;
                }
                // Every sender is gone: the client was dropped without disconnecting
                None => {
                    let _ = close_gracefully(&mut sink, &mut source).await;
                    return;
                }
            },
        }
    };

    let current = slot.release(id);
    fail_pending(&mut outbound);
    let _ = tokio::time::timeout(CLOSE_GRACE, sink.close()).await;

    if current {
        info!("Connection lost: {}", reason);
        subscriber.emit(ClientEvent::Disconnected { reason });
    }
}

async fn write_line(sink: &mut WsSink, mut line: String) -> WriteResult {
    line.push_str("\r\n");
    sink.send(WsMessage::Text(line)).await.map_err(|e| {
        warn!("Write failed: {}", e);
        ClientError::from(e)
    })
}

/// Send our close frame, then read until the server answers or the grace
/// period runs out. Frames arriving meanwhile are not dispatched.
async fn close_gracefully(sink: &mut WsSink, source: &mut WsSource) -> WriteResult {
    sink.close().await?;
    let drained = tokio::time::timeout(CLOSE_GRACE, async {
        while let Some(Ok(frame)) = source.next().await {
            if frame.is_close() {
                break;
            }
        }
    })
    .await;
    if drained.is_err() {
        debug!("No close reply within {:?}, dropping socket", CLOSE_GRACE);
    }
    Ok(())
}

/// Stop accepting lines and fail whatever was still queued.
fn fail_pending(outbound: &mut mpsc::UnboundedReceiver<Outbound>) {
    outbound.close();
    while let Ok(item) = outbound.try_recv() {
        let done = match item {
            Outbound::Line { done, .. } | Outbound::Close { done } => done,
        };
        let _ = done.send(Err(ClientError::Transport(
            "connection closed before the frame was written".to_string(),
        )));
    }
}
