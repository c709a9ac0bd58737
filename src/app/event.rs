use crate::irc::ClientEvent;

#[derive(Debug)]
pub enum AppEvent {
    /// Something from the chat client's subscriber channel
    Client(ClientEvent),

    /// One line typed on stdin
    Input(String),
    InputClosed,

    /// The reconnect delay after a lost connection has elapsed
    ReconnectDue,
    /// Outcome of a background reconnect and login
    ReconnectFinished(Result<(), String>),

    /// Ctrl-C
    Interrupt,
}
