use crate::app::action::Action;
use crate::app::event::AppEvent;
use crate::app::state::*;
use crate::irc::commands::{self, ParsedCommand};
use crate::irc::{ClientEvent, ProtocolMessage};
use chrono::Local;
use tracing::debug;

pub fn handle_event(state: &mut AppState, event: AppEvent) -> Vec<Action> {
    match event {
        AppEvent::Client(ClientEvent::Message(message)) => handle_chat_message(state, message),
        AppEvent::Client(ClientEvent::Error(error)) => {
            vec![Action::Print(format!("!!! {}", error))]
        }
        AppEvent::Client(ClientEvent::Disconnected { reason }) => {
            state.status = ConnectionStatus::Disconnected;
            let mut actions = vec![Action::Print(format!("*** Disconnected: {}", reason))];
            if state.reconnect {
                actions.push(Action::Print(format!(
                    "*** Reconnecting in {}s",
                    state.reconnect_delay_secs
                )));
                actions.push(Action::ScheduleReconnect {
                    delay_secs: state.reconnect_delay_secs,
                });
            } else {
                actions.push(Action::Quit);
            }
            actions
        }
        AppEvent::Input(line) => handle_input(state, &line),
        AppEvent::InputClosed | AppEvent::Interrupt => vec![Action::Quit],
        AppEvent::ReconnectDue => {
            state.status = ConnectionStatus::Connecting;
            vec![Action::Reconnect]
        }
        AppEvent::ReconnectFinished(Ok(())) => {
            state.status = ConnectionStatus::Connected;
            vec![Action::Print("*** Reconnected".to_string())]
        }
        AppEvent::ReconnectFinished(Err(reason)) => {
            state.status = ConnectionStatus::Disconnected;
            let mut actions = vec![Action::Print(format!("!!! Reconnect failed: {}", reason))];
            if state.reconnect {
                actions.push(Action::ScheduleReconnect {
                    delay_secs: state.reconnect_delay_secs,
                });
            } else {
                actions.push(Action::Quit);
            }
            actions
        }
    }
}

fn handle_chat_message(state: &mut AppState, message: ProtocolMessage) -> Vec<Action> {
    let ts = Local::now().format(&state.timestamp_format).to_string();
    let nick = message.source_nick().unwrap_or("").to_string();

    match message.command.to_uppercase().as_str() {
        "PRIVMSG" => {
            let (Some(target), Some(text)) = (message.arguments.first(), message.arguments.get(1))
            else {
                return vec![];
            };
            let line = format!("[{}] {} <{}> {}", ts, target, nick, text);
            vec![Action::Print(line), Action::LogMessage(message)]
        }
        "001" => {
            state.status = ConnectionStatus::Connected;
            vec![Action::Print(format!("*** Logged in as {}", state.nickname))]
        }
        "JOIN" if state.is_self(&nick) => {
            let channel = message.arguments.first().cloned().unwrap_or_default();
            vec![Action::Print(format!("*** Joined {}", channel))]
        }
        "NOTICE" => {
            let text = message.trailing().unwrap_or("");
            vec![Action::Print(format!("-tmi- {}", text))]
        }
        _ => {
            debug!("Unhandled frame: {}", message);
            vec![]
        }
    }
}

fn handle_input(state: &mut AppState, line: &str) -> Vec<Action> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return vec![];
    }

    match commands::parse_command(line) {
        Some(ParsedCommand::Join { channel }) => {
            let channel = channel.trim_start_matches('#').to_lowercase();
            state.current_channel = Some(channel.clone());
            vec![Action::JoinChannel { channel }]
        }
        Some(ParsedCommand::Msg { channel, text }) => say(state, channel, text),
        Some(ParsedCommand::Quit) => vec![Action::Quit],
        Some(ParsedCommand::Help) => commands::HELP_LINES
            .iter()
            .map(|l| Action::Print(l.to_string()))
            .collect(),
        None if line.starts_with('/') => {
            vec![Action::Print(format!("Unknown command: {} (try /help)", line))]
        }
        None => match state.current_channel.clone() {
            Some(channel) => say(state, channel, line.to_string()),
            None => vec![Action::Print("Not in a channel. Use /join <channel>".to_string())],
        },
    }
}

fn say(state: &AppState, channel: String, text: String) -> Vec<Action> {
    if state.read_only() {
        return vec![Action::Print(
            "Anonymous login is read-only; set nickname and access_token in the config to chat"
                .to_string(),
        )];
    }
    vec![Action::SendMessage { channel, text }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::irc::ClientError;

    fn state(nick: &str) -> AppState {
        let mut cfg = AppConfig::default();
        cfg.connection.nickname = nick.to_string();
        cfg.connection.channel = "#Dallas".to_string();
        AppState::new(&cfg)
    }

    fn client_msg(raw: &str) -> AppEvent {
        AppEvent::Client(ClientEvent::Message(ProtocolMessage::decode(raw).unwrap()))
    }

    #[test]
    fn test_initial_channel_normalised() {
        assert_eq!(state("xeno").current_channel.as_deref(), Some("dallas"));
    }

    #[test]
    fn test_privmsg_printed_and_logged() {
        let mut s = state("xeno");
        let actions = handle_event(&mut s, client_msg(":ronni!ronni@ronni.tmi.twitch.tv PRIVMSG #dallas :hi all"));
        assert_eq!(actions.len(), 2);
        match &actions[0] {
            Action::Print(line) => assert!(line.ends_with("#dallas <ronni> hi all")),
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(actions[1], Action::LogMessage(_)));
    }

    #[test]
    fn test_ping_is_silent() {
        let mut s = state("xeno");
        assert!(handle_event(&mut s, client_msg("PING :tmi.twitch.tv")).is_empty());
    }

    #[test]
    fn test_welcome_marks_connected() {
        let mut s = state("xeno");
        handle_event(&mut s, client_msg(":tmi.twitch.tv 001 xeno :Welcome, GLHF!"));
        assert_eq!(s.status, ConnectionStatus::Connected);
    }

    #[test]
    fn test_plain_text_goes_to_current_channel() {
        let mut s = state("xeno");
        assert_eq!(
            handle_event(&mut s, AppEvent::Input("hello there\n".into())),
            vec![Action::SendMessage {
                channel: "dallas".into(),
                text: "hello there".into()
            }]
        );
    }

    #[test]
    fn test_join_switches_channel() {
        let mut s = state("xeno");
        let actions = handle_event(&mut s, AppEvent::Input("/join #Forsen".into()));
        assert_eq!(actions, vec![Action::JoinChannel { channel: "forsen".into() }]);
        assert_eq!(s.current_channel.as_deref(), Some("forsen"));
    }

    #[test]
    fn test_anonymous_cannot_post() {
        let mut s = state("justinfan12345");
        let actions = handle_event(&mut s, AppEvent::Input("hi".into()));
        assert!(matches!(actions.as_slice(), [Action::Print(_)]));
    }

    #[test]
    fn test_disconnect_schedules_reconnect_or_quits() {
        let mut s = state("xeno");
        let actions = handle_event(
            &mut s,
            AppEvent::Client(ClientEvent::Disconnected { reason: "eof".into() }),
        );
        assert!(actions.contains(&Action::ScheduleReconnect { delay_secs: 5 }));

        s.reconnect = false;
        let actions = handle_event(
            &mut s,
            AppEvent::Client(ClientEvent::Disconnected { reason: "eof".into() }),
        );
        assert_eq!(actions.last(), Some(&Action::Quit));
    }

    #[test]
    fn test_reconnect_outcome() {
        let mut s = state("xeno");
        assert_eq!(handle_event(&mut s, AppEvent::ReconnectDue), vec![Action::Reconnect]);
        assert_eq!(s.status, ConnectionStatus::Connecting);

        let actions = handle_event(&mut s, AppEvent::ReconnectFinished(Err("refused".into())));
        assert_eq!(s.status, ConnectionStatus::Disconnected);
        assert_eq!(
            actions,
            vec![
                Action::Print("!!! Reconnect failed: refused".into()),
                Action::ScheduleReconnect { delay_secs: 5 },
            ]
        );

        handle_event(&mut s, AppEvent::ReconnectFinished(Ok(())));
        assert_eq!(s.status, ConnectionStatus::Connected);
    }

    #[test]
    fn test_errors_are_printed() {
        let mut s = state("xeno");
        let actions = handle_event(&mut s, AppEvent::Client(ClientEvent::Error(ClientError::NotConnected)));
        assert_eq!(actions, vec![Action::Print("!!! not connected".into())]);
    }
}
