//! User slash-command parser.
//!
//! Parses `/command arg1 arg2 ...` input lines into typed [`ParsedCommand`]
//! values for the interactive front end. Anything that is not a slash command
//! is chat text for the current channel.

/// A parsed user command. Each variant corresponds to a `/command`.
#[derive(Debug, PartialEq)]
pub enum ParsedCommand {
    Join { channel: String },
    Msg { channel: String, text: String },
    Quit,
    Help,
}

/// Parse a slash-command string into a [`ParsedCommand`].
///
/// Returns `None` if the input does not start with `/` or is not a recognized
/// command. Commands are case-insensitive.
pub fn parse_command(input: &str) -> Option<ParsedCommand> {
    let input = input.trim();
    let rest = input.strip_prefix('/')?;

    let parts: Vec<&str> = rest.splitn(3, ' ').collect();
    let cmd = parts.first()?.to_lowercase();

    match cmd.as_str() {
        "join" | "j" => {
            let channel = parts.get(1).filter(|c| !c.is_empty())?.to_string();
            Some(ParsedCommand::Join { channel })
        }
        "msg" | "say" => {
            let channel = parts.get(1).filter(|c| !c.is_empty())?.to_string();
            let text = parts.get(2).unwrap_or(&"").to_string();
            if text.is_empty() {
                return None;
            }
            Some(ParsedCommand::Msg { channel, text })
        }
        "quit" | "exit" => Some(ParsedCommand::Quit),
        "help" | "h" => Some(ParsedCommand::Help),
        _ => None,
    }
}

pub const HELP_LINES: &[&str] = &[
    "/join <channel>         switch to and join a channel",
    "/msg <channel> <text>   post to a specific channel",
    "/quit                   disconnect and exit",
    "anything else           post to the current channel",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_join() {
        assert_eq!(
            parse_command("/join Forsen"),
            Some(ParsedCommand::Join { channel: "Forsen".into() })
        );
        assert_eq!(
            parse_command("/J #forsen"),
            Some(ParsedCommand::Join { channel: "#forsen".into() })
        );
        assert_eq!(parse_command("/join"), None);
    }

    #[test]
    fn test_parse_msg_keeps_spaces() {
        assert_eq!(
            parse_command("/msg chan hello there  friend"),
            Some(ParsedCommand::Msg {
                channel: "chan".into(),
                text: "hello there  friend".into()
            })
        );
        assert_eq!(parse_command("/msg chan"), None);
    }

    #[test]
    fn test_non_commands() {
        assert_eq!(parse_command("hello"), None);
        assert_eq!(parse_command("/unknown x"), None);
        assert_eq!(parse_command("/QUIT"), Some(ParsedCommand::Quit));
        assert_eq!(parse_command("/help"), Some(ParsedCommand::Help));
    }
}
