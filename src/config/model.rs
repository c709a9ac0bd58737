//! Configuration data model.
//!
//! All structs derive `Serialize`/`Deserialize` for TOML persistence.
//! Every field has a sensible default so the client works out of the box
//! as an anonymous reader.

use serde::{Deserialize, Serialize};

use super::nickname::generate_nickname;
use crate::auth::Scope;
use crate::irc::TWITCH_IRC_WS_URL;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub connection: ConnectionConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where to connect and who to be once connected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Login name. Leave as a `justinfan<digits>` name for read-only access.
    #[serde(default = "default_nickname")]
    pub nickname: String,
    /// Channel joined after login.
    #[serde(default = "default_channel")]
    pub channel: String,
    /// OAuth token without the `oauth:` prefix. Prompted for when absent and
    /// the nickname is not anonymous.
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default = "default_true")]
    pub reconnect: bool,
    #[serde(default = "default_reconnect_delay")]
    pub reconnect_delay_secs: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            nickname: default_nickname(),
            channel: default_channel(),
            access_token: None,
            reconnect: true,
            reconnect_delay_secs: default_reconnect_delay(),
        }
    }
}

/// Settings for building the authorization URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Application client ID registered with Twitch.
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,
    #[serde(default = "default_scopes")]
    pub scopes: Vec<Scope>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            redirect_uri: default_redirect_uri(),
            scopes: default_scopes(),
        }
    }
}

/// Chat transcript logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_dir: default_log_dir(),
        }
    }
}

fn default_endpoint() -> String {
    TWITCH_IRC_WS_URL.to_string()
}
fn default_nickname() -> String {
    generate_nickname()
}
fn default_channel() -> String {
    "twitchdev".to_string()
}
fn default_true() -> bool {
    true
}
fn default_reconnect_delay() -> u64 {
    5
}
fn default_redirect_uri() -> String {
    "http://localhost:3000/".to_string()
}
fn default_scopes() -> Vec<Scope> {
    vec![Scope::ChatRead, Scope::ChatEdit]
}
fn default_log_dir() -> String {
    "~/.local/share/tmichat/logs".to_string()
}
