//! Twitch chat (TMI) client over secure WebSocket.
//!
//! [`irc::TmiClient`] owns the connection, answers keepalive probes on its
//! own, and hands every inbound frame to a single subscriber channel. The
//! [`auth`] module covers the OAuth collaborators that feed it a token.

pub mod app;
pub mod auth;
pub mod config;
pub mod irc;
pub mod logging;
