//! Access-token handoff from an external authorization flow.
//!
//! The token is opaque here: it is carried, never parsed or validated.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

/// Placeholder credential Twitch accepts for anonymous, read-only logins.
const ANONYMOUS_PASSWORD: &str = "SCHMOOPIIE";

/// Bearer token. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn anonymous() -> Self {
        Self(ANONYMOUS_PASSWORD.to_string())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("token source went away before delivering a token")]
pub struct TokenAbandoned;

/// One-shot delivery side, handed to whatever obtains the token.
#[derive(Debug)]
pub struct TokenSender(oneshot::Sender<AccessToken>);

impl TokenSender {
    /// Deliver the token. Consumes the sender, so it fires at most once per
    /// authentication cycle. Returns `false` if nobody is waiting any more.
    pub fn deliver(self, token: impl Into<String>) -> bool {
        self.0.send(AccessToken::new(token)).is_ok()
    }
}

/// Awaitable receiving side.
#[derive(Debug)]
pub struct PendingToken(oneshot::Receiver<AccessToken>);

impl Future for PendingToken {
    type Output = Result<AccessToken, TokenAbandoned>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.0).poll(cx).map(|res| res.map_err(|_| TokenAbandoned))
    }
}

/// Start one authentication cycle.
pub fn token_handoff() -> (TokenSender, PendingToken) {
    let (tx, rx) = oneshot::channel();
    (TokenSender(tx), PendingToken(rx))
}

/// Pull `access_token` out of a pasted redirect URL, fragment, or query
/// string. Input without that parameter is taken as the bare token.
pub fn extract_access_token(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let params = match input.find(['#', '?']) {
        Some(pos) => &input[pos + 1..],
        None => input,
    };
    let found = params
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "access_token")
        .map(|(_, value)| value.to_string());

    match found {
        Some(token) if token.is_empty() => None,
        Some(token) => Some(token),
        None if input.contains("://") || input.contains('=') => None,
        None => Some(input.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_handoff_delivers_once() {
        let (tx, pending) = token_handoff();
        assert!(tx.deliver("abc"));
        assert_eq!(pending.await.unwrap().secret(), "abc");
    }

    #[tokio::test]
    async fn test_dropped_sender_abandons() {
        let (tx, pending) = token_handoff();
        drop(tx);
        assert_eq!(pending.await, Err(TokenAbandoned));
    }

    #[test]
    fn test_debug_is_redacted() {
        let token = AccessToken::new("hunter2");
        assert!(!format!("{:?}", token).contains("hunter2"));
    }

    #[test]
    fn test_extract_from_redirect_fragment() {
        let pasted = "http://localhost:3000/#access_token=0123abc&scope=chat%3Aread&token_type=bearer";
        assert_eq!(extract_access_token(pasted).as_deref(), Some("0123abc"));
        assert_eq!(
            extract_access_token("access_token=xyz&token_type=bearer").as_deref(),
            Some("xyz")
        );
    }

    #[test]
    fn test_extract_bare_token() {
        assert_eq!(extract_access_token("  0123abc \n").as_deref(), Some("0123abc"));
        assert_eq!(extract_access_token(""), None);
        assert_eq!(extract_access_token("http://x/#access_token=&a=b"), None);
    }
}
