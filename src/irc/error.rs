use thiserror::Error;

/// Failures surfaced by the chat client.
///
/// `Clone` so the same value can be handed back to a caller and also pushed
/// through the subscriber channel as a [`ClientEvent::Error`](super::event::ClientEvent).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The raw line was empty, blank, or had no command token.
    #[error("malformed frame: {0:?}")]
    MalformedFrame(String),

    /// A send was attempted without a live connection.
    #[error("not connected")]
    NotConnected,

    /// The socket failed during connect, write, or mid-session.
    #[error("transport error: {0}")]
    Transport(String),

    /// A command argument was rejected before any I/O happened.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<tokio_tungstenite::tungstenite::Error> for ClientError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        ClientError::Transport(e.to_string())
    }
}
