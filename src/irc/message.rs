//! Line codec for the chat protocol.
//!
//! One line in, one [`ProtocolMessage`] out. Only the envelope is understood:
//! an optional `:prefix`, the command, and its arguments, the last of which may
//! be a trailing argument introduced by ` :` that keeps its spaces. IRCv3 tags
//! are not parsed.

use std::fmt;
use std::str::FromStr;

use super::error::ClientError;

/// Marker that introduces the trailing argument.
const TRAILING_MARKER: &str = " :";

/// A single decoded frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolMessage {
    /// Origin annotation including its leading `:`, e.g. `":tmi.twitch.tv"`.
    pub prefix: Option<String>,
    /// Command as received. Compare with `eq_ignore_ascii_case`.
    pub command: String,
    pub arguments: Vec<String>,
}

impl ProtocolMessage {
    /// Decode one raw line.
    ///
    /// Surrounding whitespace (including a trailing `\r`) is ignored. Blank
    /// input, a prefix with nothing after it, or an empty command token is a
    /// [`ClientError::MalformedFrame`].
    pub fn decode(raw: &str) -> Result<Self, ClientError> {
        let line = raw.trim();
        if line.is_empty() {
            return Err(ClientError::MalformedFrame(raw.to_string()));
        }

        let (prefix, remainder) = if line.starts_with(':') {
            match line.split_once(' ') {
                Some((prefix, rest)) => (Some(prefix.to_string()), rest),
                None => return Err(ClientError::MalformedFrame(raw.to_string())),
            }
        } else {
            (None, line)
        };

        let mut tokens: Vec<String> = match remainder.split_once(TRAILING_MARKER) {
            Some((head, trailing)) => {
                let mut tokens = split_spaces(head);
                tokens.push(trailing.to_string());
                tokens
            }
            None => split_spaces(remainder),
        };

        if tokens.is_empty() || tokens[0].is_empty() {
            return Err(ClientError::MalformedFrame(raw.to_string()));
        }
        let command = tokens.remove(0);

        Ok(Self {
            prefix,
            command,
            arguments: tokens,
        })
    }

    /// Case-insensitive command check.
    pub fn is_command(&self, command: &str) -> bool {
        self.command.eq_ignore_ascii_case(command)
    }

    /// The trailing (last) argument, if any.
    pub fn trailing(&self) -> Option<&str> {
        self.arguments.last().map(String::as_str)
    }

    /// Nickname part of a `:nick!user@host` prefix.
    pub fn source_nick(&self) -> Option<&str> {
        let prefix = self.prefix.as_deref()?.strip_prefix(':')?;
        prefix.split(['!', '@']).next().filter(|n| !n.is_empty())
    }
}

/// Tokenize on single spaces. Interior empty tokens survive; trailing ones
/// do not.
fn split_spaces(s: &str) -> Vec<String> {
    let mut tokens: Vec<String> = s.split(' ').map(str::to_string).collect();
    while tokens.last().is_some_and(|t| t.is_empty()) {
        tokens.pop();
    }
    tokens
}

/// Format an outbound line (no terminator, no prefix).
///
/// `params` are joined with single spaces; `trailing`, when given, is appended
/// after ` :` verbatim.
pub fn encode(command: &str, params: &[&str], trailing: Option<&str>) -> String {
    let mut line = String::from(command);
    for param in params {
        line.push(' ');
        line.push_str(param);
    }
    if let Some(trailing) = trailing {
        line.push_str(TRAILING_MARKER);
        line.push_str(trailing);
    }
    line
}

impl fmt::Display for ProtocolMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(prefix) = &self.prefix {
            write!(f, "{} ", prefix)?;
        }
        let (params, trailing) = match self.arguments.split_last() {
            Some((last, rest)) if last.is_empty() || last.contains(' ') || last.starts_with(':') => {
                (rest, Some(last.as_str()))
            }
            _ => (self.arguments.as_slice(), None),
        };
        let params: Vec<&str> = params.iter().map(String::as_str).collect();
        f.write_str(&encode(&self.command, &params, trailing))
    }
}

impl FromStr for ProtocolMessage {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_prefix_and_no_arguments() {
        let msg = ProtocolMessage::decode(":tmi.twitch.tv PING").unwrap();
        assert_eq!(msg.prefix.as_deref(), Some(":tmi.twitch.tv"));
        assert_eq!(msg.command, "PING");
        assert!(msg.arguments.is_empty());
    }

    #[test]
    fn test_decode_trailing_keeps_spaces() {
        let msg = ProtocolMessage::decode("PRIVMSG #chan :hello world").unwrap();
        assert_eq!(msg.prefix, None);
        assert_eq!(msg.command, "PRIVMSG");
        assert_eq!(msg.arguments, vec!["#chan", "hello world"]);
    }

    #[test]
    fn test_decode_full_privmsg() {
        let msg = ProtocolMessage::decode(
            ":ronni!ronni@ronni.tmi.twitch.tv PRIVMSG #dallas :Kappa  Keepo :) Kappa\r\n",
        )
        .unwrap();
        assert_eq!(msg.prefix.as_deref(), Some(":ronni!ronni@ronni.tmi.twitch.tv"));
        assert_eq!(msg.source_nick(), Some("ronni"));
        assert_eq!(msg.arguments, vec!["#dallas", "Kappa  Keepo :) Kappa"]);
        assert_eq!(msg.trailing(), Some("Kappa  Keepo :) Kappa"));
    }

    #[test]
    fn test_decode_numeric_with_leading_args() {
        let msg = ProtocolMessage::decode(":tmi.twitch.tv 001 justinfan123 :Welcome, GLHF!").unwrap();
        assert_eq!(msg.command, "001");
        assert_eq!(msg.arguments, vec!["justinfan123", "Welcome, GLHF!"]);
    }

    #[test]
    fn test_decode_prefix_with_only_trailing() {
        let msg = ProtocolMessage::decode(":tmi.twitch.tv PING :tmi.twitch.tv").unwrap();
        assert_eq!(msg.prefix.as_deref(), Some(":tmi.twitch.tv"));
        assert_eq!(msg.command, "PING");
        assert_eq!(msg.arguments, vec!["tmi.twitch.tv"]);
    }

    #[test]
    fn test_decode_several_leading_args_then_trailing() {
        let msg =
            ProtocolMessage::decode(":a!a@a CAP * ACK :twitch.tv/membership twitch.tv/tags").unwrap();
        assert_eq!(msg.prefix.as_deref(), Some(":a!a@a"));
        assert_eq!(msg.command, "CAP");
        assert_eq!(
            msg.arguments,
            vec!["*", "ACK", "twitch.tv/membership twitch.tv/tags"]
        );
        assert_eq!(msg.source_nick(), Some("a"));
    }

    #[test]
    fn test_decode_rejects_blank() {
        assert!(matches!(ProtocolMessage::decode(""), Err(ClientError::MalformedFrame(_))));
        assert!(matches!(ProtocolMessage::decode("   "), Err(ClientError::MalformedFrame(_))));
        assert!(matches!(ProtocolMessage::decode("\r\n"), Err(ClientError::MalformedFrame(_))));
    }

    #[test]
    fn test_decode_rejects_bare_prefix_and_empty_command() {
        assert!(ProtocolMessage::decode(":tmi.twitch.tv").is_err());
        assert!(ProtocolMessage::decode(":tmi.twitch.tv  PING").is_err());
    }

    #[test]
    fn test_split_drops_trailing_empty_tokens_only() {
        let msg = ProtocolMessage::decode("PRIVMSG #chan  :hi").unwrap();
        assert_eq!(msg.arguments, vec!["#chan", "hi"]);

        let msg = ProtocolMessage::decode("MODE #chan  +o").unwrap();
        assert_eq!(msg.arguments, vec!["#chan", "", "+o"]);
    }

    #[test]
    fn test_encode_formats() {
        assert_eq!(encode("JOIN", &["#mychannel"], None), "JOIN #mychannel");
        assert_eq!(encode("PONG", &[], Some("tmi.twitch.tv")), "PONG :tmi.twitch.tv");
        assert_eq!(encode("PRIVMSG", &["#c"], Some("a b")), "PRIVMSG #c :a b");
    }

    #[test]
    fn test_encode_then_decode_without_trailing() {
        let line = encode("CAP", &["REQ", "twitch.tv/membership"], None);
        let msg: ProtocolMessage = line.parse().unwrap();
        assert_eq!(msg.command, "CAP");
        assert_eq!(msg.arguments, vec!["REQ", "twitch.tv/membership"]);
    }

    #[test]
    fn test_display_round_trips_decoded_message() {
        let raw = ":foo!foo@foo.tmi.twitch.tv PRIVMSG #bar :two words";
        let msg = ProtocolMessage::decode(raw).unwrap();
        assert_eq!(msg.to_string(), raw);
        assert_eq!(ProtocolMessage::decode(&msg.to_string()).unwrap(), msg);
    }

    #[test]
    fn test_is_command_ignores_case() {
        for raw in ["ping", "PING", "PiNg"] {
            assert!(ProtocolMessage::decode(raw).unwrap().is_command("PING"));
        }
    }
}
