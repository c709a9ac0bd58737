use crate::config::nickname::is_anonymous;
use crate::config::AppConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
}

#[derive(Debug)]
pub struct AppState {
    pub nickname: String,
    /// Channel plain text is posted to, without the `#`.
    pub current_channel: Option<String>,
    pub status: ConnectionStatus,
    pub reconnect: bool,
    pub reconnect_delay_secs: u64,
    pub timestamp_format: String,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        let channel = config.connection.channel.trim().trim_start_matches('#');
        Self {
            nickname: config.connection.nickname.clone(),
            current_channel: (!channel.is_empty()).then(|| channel.to_lowercase()),
            status: ConnectionStatus::Disconnected,
            reconnect: config.connection.reconnect,
            reconnect_delay_secs: config.connection.reconnect_delay_secs,
            timestamp_format: "%H:%M".to_string(),
        }
    }

    /// Anonymous logins can read but not post.
    pub fn read_only(&self) -> bool {
        is_anonymous(&self.nickname)
    }

    pub fn is_self(&self, nick: &str) -> bool {
        nick.eq_ignore_ascii_case(&self.nickname)
    }
}
