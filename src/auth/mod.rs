//! Collaborators of the chat client that deal with OAuth: the scope table,
//! the authorization URL, and the token handoff.

pub mod authorize;
pub mod scope;
pub mod token;

pub use authorize::{AuthUrlError, AuthorizationUrl};
pub use scope::Scope;
pub use token::{extract_access_token, token_handoff, AccessToken, PendingToken, TokenSender};
