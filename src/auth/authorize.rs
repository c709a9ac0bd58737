//! Authorization URL for Twitch's implicit-grant OAuth flow.

use std::collections::BTreeSet;

use thiserror::Error;
use url::Url;

use super::scope::Scope;

const AUTHORIZE_ENDPOINT: &str = "https://id.twitch.tv/oauth2/authorize";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthUrlError {
    #[error("Client ID has not been defined.")]
    MissingClientId,
    #[error("Redirect URI not provided.")]
    MissingRedirectUri,
    #[error("Scopes have not been defined.")]
    NoScopes,
    #[error("authorization URL is invalid: {0}")]
    InvalidUrl(String),
}

/// Builds the URL a user opens to grant the client an access token.
///
/// ```
/// use tmichat::auth::{AuthorizationUrl, Scope};
///
/// let url = AuthorizationUrl::builder()
///     .client_id("abc")
///     .redirect_uri("http://localhost:3000/".parse().unwrap())
///     .scope(Scope::ChatRead)
///     .build_string()
///     .unwrap();
/// assert!(url.ends_with("&response_type=token&scope=chat:read"));
/// ```
#[derive(Debug, Default)]
pub struct AuthorizationUrl {
    client_id: Option<String>,
    redirect_uri: Option<Url>,
    scopes: BTreeSet<Scope>,
}

impl AuthorizationUrl {
    pub fn builder() -> Self {
        Self::default()
    }

    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn redirect_uri(mut self, uri: Url) -> Self {
        self.redirect_uri = Some(uri);
        self
    }

    /// Replace the scope set.
    pub fn scopes(mut self, scopes: impl IntoIterator<Item = Scope>) -> Self {
        self.scopes = scopes.into_iter().collect();
        self
    }

    pub fn scope(mut self, scope: Scope) -> Self {
        self.scopes.insert(scope);
        self
    }

    pub fn build_string(&self) -> Result<String, AuthUrlError> {
        let client_id = self
            .client_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or(AuthUrlError::MissingClientId)?;
        let redirect_uri = self.redirect_uri.as_ref().ok_or(AuthUrlError::MissingRedirectUri)?;
        if self.scopes.is_empty() {
            return Err(AuthUrlError::NoScopes);
        }

        let scope = self
            .scopes
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join("%20");

        Ok(format!(
            "{}?client_id={}&redirect_uri={}&response_type=token&scope={}",
            AUTHORIZE_ENDPOINT, client_id, redirect_uri, scope
        ))
    }

    pub fn build(&self) -> Result<Url, AuthUrlError> {
        let raw = self.build_string()?;
        Url::parse(&raw).map_err(|e| AuthUrlError::InvalidUrl(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn redirect() -> Url {
        "http://localhost:4567/callback/twitch".parse().unwrap()
    }

    #[test]
    fn test_missing_client_id() {
        let b = AuthorizationUrl::builder().redirect_uri(redirect()).scope(Scope::ChatRead);
        assert_eq!(b.build_string(), Err(AuthUrlError::MissingClientId));
        let b = b.client_id("");
        assert_eq!(b.build_string(), Err(AuthUrlError::MissingClientId));
    }

    #[test]
    fn test_missing_redirect_uri() {
        let b = AuthorizationUrl::builder().client_id("abc").scope(Scope::ChatRead);
        assert_eq!(b.build_string(), Err(AuthUrlError::MissingRedirectUri));
    }

    #[test]
    fn test_empty_scopes() {
        let b = AuthorizationUrl::builder().client_id("abc").redirect_uri(redirect());
        assert_eq!(b.build_string(), Err(AuthUrlError::NoScopes));
        let b = b.scope(Scope::ChatRead).scopes([]);
        assert_eq!(b.build_string(), Err(AuthUrlError::NoScopes));
    }

    #[test]
    fn test_url_layout_and_scope_order() {
        let url = AuthorizationUrl::builder()
            .client_id("abc")
            .redirect_uri(redirect())
            .scopes([Scope::ChatRead, Scope::BitsRead, Scope::ChatEdit, Scope::ChatRead])
            .build_string()
            .unwrap();
        assert_eq!(
            url,
            "https://id.twitch.tv/oauth2/authorize?client_id=abc\
             &redirect_uri=http://localhost:4567/callback/twitch\
             &response_type=token&scope=bits:read%20chat:edit%20chat:read"
        );
    }

    #[test]
    fn test_build_parses_as_url() {
        let url = AuthorizationUrl::builder()
            .client_id("abc")
            .redirect_uri(redirect())
            .scope(Scope::ChatEdit)
            .build()
            .unwrap();
        assert_eq!(url.host_str(), Some("id.twitch.tv"));
        assert!(url.query_pairs().any(|(k, v)| k == "response_type" && v == "token"));
    }
}
