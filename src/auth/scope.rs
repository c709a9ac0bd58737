//! Twitch API permission scopes.
//!
//! See <https://dev.twitch.tv/docs/authentication#scopes>.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A permission scope. Ordering follows declaration order, which is the order
/// scopes appear in a generated authorization URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Scope {
    #[serde(rename = "analytics:read:extensions")]
    AnalyticsReadExtensions,
    #[serde(rename = "analytics:read:games")]
    AnalyticsReadGames,
    #[serde(rename = "bits:read")]
    BitsRead,
    #[serde(rename = "channel:edit:commercial")]
    ChannelEditCommercial,
    #[serde(rename = "channel:manage:broadcast")]
    ChannelManageBroadcast,
    #[serde(rename = "channel:manage:extensions")]
    ChannelManageExtensions,
    #[serde(rename = "channel:manage:polls")]
    ChannelManagePolls,
    #[serde(rename = "channel:manage:predictions")]
    ChannelManagePredictions,
    #[serde(rename = "channel:manage:redemptions")]
    ChannelManageRedemptions,
    #[serde(rename = "channel:manage:schedule")]
    ChannelManageSchedule,
    #[serde(rename = "channel:manage:videos")]
    ChannelManageVideos,
    #[serde(rename = "channel:read:editors")]
    ChannelReadEditors,
    #[serde(rename = "channel:read:hype_train")]
    ChannelReadHypeTrain,
    #[serde(rename = "channel:read:polls")]
    ChannelReadPolls,
    #[serde(rename = "channel:read:predictions")]
    ChannelReadPredictions,
    #[serde(rename = "channel:read:redemptions")]
    ChannelReadRedemptions,
    #[serde(rename = "channel:read:stream_key")]
    ChannelReadStreamKey,
    #[serde(rename = "channel:read:subscriptions")]
    ChannelReadSubscriptions,
    #[serde(rename = "clips:edit")]
    ClipsEdit,
    #[serde(rename = "moderation:read")]
    ModerationRead,
    #[serde(rename = "moderation:manage:automod")]
    ModerationManageAutomod,
    #[serde(rename = "user:edit")]
    UserEdit,
    #[serde(rename = "user:manage:blocked_users")]
    UserManageBlockedUsers,
    #[serde(rename = "user:read:blocked_users")]
    UserReadBlockedUsers,
    #[serde(rename = "user:read:broadcast")]
    UserReadBroadcast,
    #[serde(rename = "user:read:email")]
    UserReadEmail,
    #[serde(rename = "user:read:follows")]
    UserReadFollows,
    #[serde(rename = "user:read:subscriptions")]
    UserReadSubscriptions,
    /// Perform moderation actions; the user must be a moderator in the channel.
    #[serde(rename = "channel:moderate")]
    ChannelModerate,
    /// Send live stream chat and rooms messages.
    #[serde(rename = "chat:edit")]
    ChatEdit,
    /// View live stream chat and rooms messages.
    #[serde(rename = "chat:read")]
    ChatRead,
    #[serde(rename = "whispers:read")]
    WhispersRead,
    #[serde(rename = "whispers:edit")]
    WhispersEdit,
}

impl Scope {
    pub const ALL: [Scope; 33] = [
        Scope::AnalyticsReadExtensions,
        Scope::AnalyticsReadGames,
        Scope::BitsRead,
        Scope::ChannelEditCommercial,
        Scope::ChannelManageBroadcast,
        Scope::ChannelManageExtensions,
        Scope::ChannelManagePolls,
        Scope::ChannelManagePredictions,
        Scope::ChannelManageRedemptions,
        Scope::ChannelManageSchedule,
        Scope::ChannelManageVideos,
        Scope::ChannelReadEditors,
        Scope::ChannelReadHypeTrain,
        Scope::ChannelReadPolls,
        Scope::ChannelReadPredictions,
        Scope::ChannelReadRedemptions,
        Scope::ChannelReadStreamKey,
        Scope::ChannelReadSubscriptions,
        Scope::ClipsEdit,
        Scope::ModerationRead,
        Scope::ModerationManageAutomod,
        Scope::UserEdit,
        Scope::UserManageBlockedUsers,
        Scope::UserReadBlockedUsers,
        Scope::UserReadBroadcast,
        Scope::UserReadEmail,
        Scope::UserReadFollows,
        Scope::UserReadSubscriptions,
        Scope::ChannelModerate,
        Scope::ChatEdit,
        Scope::ChatRead,
        Scope::WhispersRead,
        Scope::WhispersEdit,
    ];

    /// Identifier as Twitch spells it.
    pub fn as_str(self) -> &'static str {
        match self {
            Scope::AnalyticsReadExtensions => "analytics:read:extensions",
            Scope::AnalyticsReadGames => "analytics:read:games",
            Scope::BitsRead => "bits:read",
            Scope::ChannelEditCommercial => "channel:edit:commercial",
            Scope::ChannelManageBroadcast => "channel:manage:broadcast",
            Scope::ChannelManageExtensions => "channel:manage:extensions",
            Scope::ChannelManagePolls => "channel:manage:polls",
            Scope::ChannelManagePredictions => "channel:manage:predictions",
            Scope::ChannelManageRedemptions => "channel:manage:redemptions",
            Scope::ChannelManageSchedule => "channel:manage:schedule",
            Scope::ChannelManageVideos => "channel:manage:videos",
            Scope::ChannelReadEditors => "channel:read:editors",
            Scope::ChannelReadHypeTrain => "channel:read:hype_train",
            Scope::ChannelReadPolls => "channel:read:polls",
            Scope::ChannelReadPredictions => "channel:read:predictions",
            Scope::ChannelReadRedemptions => "channel:read:redemptions",
            Scope::ChannelReadStreamKey => "channel:read:stream_key",
            Scope::ChannelReadSubscriptions => "channel:read:subscriptions",
            Scope::ClipsEdit => "clips:edit",
            Scope::ModerationRead => "moderation:read",
            Scope::ModerationManageAutomod => "moderation:manage:automod",
            Scope::UserEdit => "user:edit",
            Scope::UserManageBlockedUsers => "user:manage:blocked_users",
            Scope::UserReadBlockedUsers => "user:read:blocked_users",
            Scope::UserReadBroadcast => "user:read:broadcast",
            Scope::UserReadEmail => "user:read:email",
            Scope::UserReadFollows => "user:read:follows",
            Scope::UserReadSubscriptions => "user:read:subscriptions",
            Scope::ChannelModerate => "channel:moderate",
            Scope::ChatEdit => "chat:edit",
            Scope::ChatRead => "chat:read",
            Scope::WhispersRead => "whispers:read",
            Scope::WhispersEdit => "whispers:edit",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown scope: {0}")]
pub struct UnknownScope(pub String);

impl FromStr for Scope {
    type Err = UnknownScope;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scope::ALL
            .into_iter()
            .find(|scope| scope.as_str() == s)
            .ok_or_else(|| UnknownScope(s.to_string()))
    }
}
