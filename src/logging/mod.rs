//! Chat transcript logging to disk.
//!
//! When enabled, writes channel messages to daily log files organized by
//! channel. Log files are named `<channel>_<date>.log` and stored in the
//! configured log directory (default: `~/.local/share/tmichat/logs/`).

use crate::config::LoggingConfig;
use crate::irc::ProtocolMessage;
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use tracing::warn;

/// Writes PRIVMSG lines to per-channel daily log files.
///
/// File handles are cached for the lifetime of the logger to avoid repeated
/// opens. A file that cannot be opened is skipped.
pub struct ChatLogger {
    enabled: bool,
    log_dir: PathBuf,
    file_handles: HashMap<String, fs::File>,
}

impl ChatLogger {
    pub fn new(config: &LoggingConfig) -> Self {
        Self {
            enabled: config.enabled,
            log_dir: expand_home(&config.log_dir),
            file_handles: HashMap::new(),
        }
    }

    /// Append a channel message. No-op if logging is disabled or the frame
    /// is not a PRIVMSG to a channel.
    pub fn log_message(&mut self, msg: &ProtocolMessage) {
        if !self.enabled || !msg.is_command("PRIVMSG") {
            return;
        }
        let (Some(channel), Some(text)) = (msg.arguments.first(), msg.arguments.get(1)) else {
            return;
        };
        if !channel.starts_with('#') {
            return;
        }

        let now = chrono::Local::now();
        let sender = msg.source_nick().unwrap_or("?");
        let line = format!("[{}] <{}> {}", now.format("%H:%M:%S"), sender, text);

        // Sanitize channel for filename
        let safe_target: String = channel
            .trim_start_matches('#')
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' { c } else { '_' })
            .collect();
        let filename = format!("{}_{}.log", safe_target, now.format("%Y-%m-%d"));

        if !self.file_handles.contains_key(&filename) {
            let filepath = self.log_dir.join(&filename);
            let opened = fs::create_dir_all(&self.log_dir)
                .and_then(|_| OpenOptions::new().create(true).append(true).open(&filepath));
            match opened {
                Ok(file) => {
                    self.file_handles.insert(filename.clone(), file);
                }
                Err(e) => {
                    warn!("Cannot open chat log {}: {}", filepath.display(), e);
                    return;
                }
            }
        }

        if let Some(handle) = self.file_handles.get_mut(&filename) {
            if let Err(e) = writeln!(handle, "{}", line) {
                warn!("Chat log write failed: {}", e);
            }
        }
    }
}

/// Expand a leading `~/` to the home directory.
fn expand_home(dir: &str) -> PathBuf {
    match dir.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(dir)),
        None => PathBuf::from(dir),
    }
}
