//! Outbound command formatting and submission.
//!
//! Every operation formats exactly one line and pushes it onto the session's
//! outbound queue without waiting. A single writer drains that queue, so
//! lines hit the socket whole and in submission order. The returned
//! [`SendHandle`] resolves once the write has actually happened.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::{mpsc, oneshot};

use super::error::ClientError;
use super::message::encode;

/// Server name used in keepalive replies and the PRIVMSG host mask.
pub const SERVER_NAME: &str = "tmi.twitch.tv";

pub type WriteResult = Result<(), ClientError>;

/// Work item for the session writer.
#[derive(Debug)]
pub(crate) enum Outbound {
    Line {
        line: String,
        done: oneshot::Sender<WriteResult>,
    },
    /// Close the socket gracefully; `done` fires once the close handshake ends.
    Close { done: oneshot::Sender<WriteResult> },
}

/// Completion of one queued write.
#[must_use = "a SendHandle does nothing unless awaited; drop it to fire and forget"]
#[derive(Debug)]
pub struct SendHandle {
    rx: oneshot::Receiver<WriteResult>,
}

impl Future for SendHandle {
    type Output = WriteResult;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map(|res| {
            res.unwrap_or_else(|_| {
                Err(ClientError::Transport(
                    "connection closed before the frame was written".to_string(),
                ))
            })
        })
    }
}

/// Cheap, cloneable handle onto one session's outbound queue.
#[derive(Debug, Clone)]
pub struct CommandSender {
    outbound: mpsc::UnboundedSender<Outbound>,
}

impl CommandSender {
    pub(crate) fn new(outbound: mpsc::UnboundedSender<Outbound>) -> Self {
        Self { outbound }
    }

    /// `PASS oauth:<token>`
    pub fn authenticate(&self, token: &str) -> Result<SendHandle, ClientError> {
        require_word("access token", token)?;
        let credential = format!("oauth:{}", token);
        self.send_line(encode("PASS", &[&credential], None))
    }

    /// `NICK <nickname>`
    pub fn set_nickname(&self, nickname: &str) -> Result<SendHandle, ClientError> {
        require_word("nickname", nickname)?;
        self.send_line(encode("NICK", &[nickname], None))
    }

    /// `JOIN #<channel>`, lower-cased.
    pub fn join_channel(&self, channel: &str) -> Result<SendHandle, ClientError> {
        let target = channel_target(channel)?;
        self.send_line(encode("JOIN", &[&target], None))
    }

    /// `:<nick>!<nick>@<nick>.tmi.twitch.tv PRIVMSG #<channel> :<text>`
    pub fn send_chat_message(
        &self,
        nickname: &str,
        channel: &str,
        text: &str,
    ) -> Result<SendHandle, ClientError> {
        require_word("nickname", nickname)?;
        let target = channel_target(channel)?;
        reject_line_breaks("message text", text)?;
        let line = format!(
            ":{nick}!{nick}@{nick}.{server} {}",
            encode("PRIVMSG", &[&target], Some(text)),
            nick = nickname,
            server = SERVER_NAME,
        );
        self.send_line(line)
    }

    /// `PONG :tmi.twitch.tv`
    pub fn send_keepalive_response(&self) -> Result<SendHandle, ClientError> {
        self.send_line(encode("PONG", &[], Some(SERVER_NAME)))
    }

    /// Whether the session writer is still accepting lines.
    pub fn is_open(&self) -> bool {
        !self.outbound.is_closed()
    }

    fn send_line(&self, line: String) -> Result<SendHandle, ClientError> {
        let (done, rx) = oneshot::channel();
        self.outbound
            .send(Outbound::Line { line, done })
            .map_err(|_| ClientError::NotConnected)?;
        Ok(SendHandle { rx })
    }
}

/// Normalise a channel name to `#lowercase`. A leading `#` from the caller
/// is not doubled.
pub fn channel_target(channel: &str) -> Result<String, ClientError> {
    let name = channel.strip_prefix('#').unwrap_or(channel);
    require_word("channel name", name)?;
    Ok(format!("#{}", name.to_lowercase()))
}

fn require_non_empty(what: &str, value: &str) -> Result<(), ClientError> {
    if value.trim().is_empty() {
        return Err(ClientError::InvalidArgument(format!("{} must not be empty", what)));
    }
    reject_line_breaks(what, value)
}

/// Non-empty and free of spaces, so it stays a single middle parameter.
fn require_word(what: &str, value: &str) -> Result<(), ClientError> {
    require_non_empty(what, value)?;
    if value.contains(' ') {
        return Err(ClientError::InvalidArgument(format!(
            "{} contains a space: {:?}",
            what, value
        )));
    }
    Ok(())
}

fn reject_line_breaks(what: &str, value: &str) -> Result<(), ClientError> {
    // A CR or LF would let the caller smuggle a second command onto the wire
    if value.contains(['\r', '\n']) {
        return Err(ClientError::InvalidArgument(format!("{} contains a line break", what)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sender() -> (CommandSender, mpsc::UnboundedReceiver<Outbound>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (CommandSender::new(tx), rx)
    }

    fn next_line(rx: &mut mpsc::UnboundedReceiver<Outbound>) -> String {
        match rx.try_recv().unwrap() {
            Outbound::Line { line, .. } => line,
            Outbound::Close { .. } => panic!("unexpected close"),
        }
    }

    #[test]
    fn test_frame_formats() {
        let (s, mut rx) = sender();
        let _ = s.authenticate("abc123").unwrap();
        let _ = s.set_nickname("xeno").unwrap();
        let _ = s.join_channel("MyChannel").unwrap();
        let _ = s.send_keepalive_response().unwrap();
        let _ = s.send_chat_message("xeno", "MyChannel", "hello there").unwrap();

        assert_eq!(next_line(&mut rx), "PASS oauth:abc123");
        assert_eq!(next_line(&mut rx), "NICK xeno");
        assert_eq!(next_line(&mut rx), "JOIN #mychannel");
        assert_eq!(next_line(&mut rx), "PONG :tmi.twitch.tv");
        assert_eq!(
            next_line(&mut rx),
            ":xeno!xeno@xeno.tmi.twitch.tv PRIVMSG #mychannel :hello there"
        );
    }

    #[test]
    fn test_invalid_arguments_produce_no_io() {
        let (s, mut rx) = sender();
        assert!(matches!(s.authenticate(""), Err(ClientError::InvalidArgument(_))));
        assert!(matches!(s.set_nickname("  "), Err(ClientError::InvalidArgument(_))));
        assert!(matches!(s.join_channel("#"), Err(ClientError::InvalidArgument(_))));
        assert!(matches!(
            s.send_chat_message("xeno", "chan", "hi\r\nQUIT"),
            Err(ClientError::InvalidArgument(_))
        ));
        assert!(matches!(
            s.set_nickname("xeno JOIN #other"),
            Err(ClientError::InvalidArgument(_))
        ));
        assert!(matches!(
            s.send_chat_message("a b", "chan", "hi"),
            Err(ClientError::InvalidArgument(_))
        ));
        assert!(matches!(s.authenticate("abc def"), Err(ClientError::InvalidArgument(_))));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_closed_queue_is_not_connected() {
        let (s, rx) = sender();
        drop(rx);
        assert!(!s.is_open());
        assert_eq!(s.join_channel("chan").unwrap_err(), ClientError::NotConnected);
    }

    #[test]
    fn test_channel_target_normalises() {
        assert_eq!(channel_target("MyChannel").unwrap(), "#mychannel");
        assert_eq!(channel_target("#LOUD").unwrap(), "#loud");
        assert!(channel_target("two words").is_err());
    }

    #[tokio::test]
    async fn test_handle_resolves_with_writer_result() {
        let (s, mut rx) = sender();
        let handle = s.send_keepalive_response().unwrap();
        match rx.recv().await.unwrap() {
            Outbound::Line { done, .. } => done.send(Ok(())).unwrap(),
            Outbound::Close { .. } => unreachable!(),
        }
        assert_eq!(handle.await, Ok(()));

        let handle = s.send_keepalive_response().unwrap();
        drop(rx);
        assert!(matches!(handle.await, Err(ClientError::Transport(_))));
    }
}
