//! Channel entity - text, voice, DM, and category channels

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::entities::user::User;
use crate::id::Snowflake;

/// Channel kind discriminant, serialized as a bare integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum ChannelType {
    /// Text channel within a guild
    #[default]
    GuildText = 0,
    /// Direct message between two users
    Dm = 1,
    /// Voice channel within a guild
    GuildVoice = 2,
    /// Direct message between multiple users
    GroupDm = 3,
    /// Organizational category containing channels
    GuildCategory = 4,
    /// Announcement channel users can follow
    GuildNews = 5,
    /// Store-page channel
    GuildStore = 6,
}

impl ChannelType {
    /// Create a `ChannelType` from a raw integer value
    #[must_use]
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::GuildText),
            1 => Some(Self::Dm),
            2 => Some(Self::GuildVoice),
            3 => Some(Self::GroupDm),
            4 => Some(Self::GuildCategory),
            5 => Some(Self::GuildNews),
            6 => Some(Self::GuildStore),
            _ => None,
        }
    }

    /// Get the raw integer value
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Check if this channel kind carries messages
    #[must_use]
    pub const fn is_text_based(self) -> bool {
        matches!(self, Self::GuildText | Self::Dm | Self::GroupDm | Self::GuildNews)
    }

    /// Check if this channel kind is a direct-message channel
    #[must_use]
    pub const fn is_dm(self) -> bool {
        matches!(self, Self::Dm | Self::GroupDm)
    }
}

impl Serialize for ChannelType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.as_u8())
    }
}

impl<'de> Deserialize<'de> for ChannelType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = u8::deserialize(deserializer)?;
        Self::from_u8(value)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid channel type: {value}")))
    }
}

/// Per-channel permission override for a role or member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PermissionOverwrite {
    pub id: Snowflake,
    /// 0 for a role override, 1 for a member override
    #[serde(rename = "type", default)]
    pub kind: u8,
    #[serde(default)]
    pub allow: String,
    #[serde(default)]
    pub deny: String,
}

/// Channel snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Channel {
    pub id: Snowflake,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<Snowflake>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: ChannelType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message_id: Option<Snowflake>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_pin_timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub nsfw: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub position: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_limit: Option<u32>,
    /// DM participants; empty for guild channels
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recipients: Vec<User>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permission_overwrites: Vec<PermissionOverwrite>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Snowflake>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_limit_per_user: Option<u32>,
}

impl Channel {
    /// Mention string for this channel
    #[must_use]
    pub fn mention(&self) -> String {
        format!("<#{}>", self.id)
    }
}
