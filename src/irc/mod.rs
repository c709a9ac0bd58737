//! Chat protocol layer: line codec, connection management, command sending,
//! and inbound dispatch.

pub mod commands;
pub mod connection;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod manager;
pub mod message;
pub mod sender;

pub use connection::TWITCH_IRC_WS_URL;
pub use error::ClientError;
pub use event::ClientEvent;
pub use manager::{ConnectionState, TmiClient};
pub use message::ProtocolMessage;
pub use sender::{CommandSender, SendHandle};
