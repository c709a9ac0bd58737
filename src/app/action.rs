use crate::irc::ProtocolMessage;

#[derive(Debug, PartialEq)]
pub enum Action {
    Print(String),
    LogMessage(ProtocolMessage),
    JoinChannel { channel: String },
    SendMessage { channel: String, text: String },
    ScheduleReconnect { delay_secs: u64 },
    Reconnect,
    Quit,
}
