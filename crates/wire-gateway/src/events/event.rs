//! Typed event union
//!
//! One variant per known event, each holding a named snapshot of the entity
//! it carries. The `Unknown` case preserves payloads for tags this client
//! does not recognize, keeping the session forward compatible.

use serde::Deserialize;
use serde_json::Value;
use wire_core::{Channel, Guild, Member, Message, Role, Snowflake, User};

use crate::protocol::{Ready, Resumed};

/// Payload of GUILD_ROLE_CREATE and GUILD_ROLE_UPDATE
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GuildRole {
    pub role: Role,
    pub guild_id: Snowflake,
}

/// Payload of GUILD_ROLE_DELETE; only the IDs survive deletion
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GuildRoleDelete {
    pub role_id: Snowflake,
    pub guild_id: Snowflake,
}

/// A decoded dispatch event
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Session established after identify
    Ready(Ready),
    /// Session re-attached after resume
    Resumed(Resumed),

    GuildCreate(Guild),
    GuildUpdate(Guild),
    GuildDelete(Guild),

    ChannelCreate(Channel),
    ChannelUpdate(Channel),
    ChannelDelete(Channel),

    GuildMemberAdd(Member),
    GuildMemberUpdate(Member),
    GuildMemberRemove(Member),

    GuildRoleCreate(GuildRole),
    GuildRoleUpdate(GuildRole),
    GuildRoleDelete(GuildRoleDelete),

    MessageCreate(Message),
    MessageUpdate(Message),
    MessageDelete(Message),

    UserUpdate(User),

    /// Dispatch with a tag this client does not know; the payload is carried
    /// through opaque
    Unknown { event_type: String, data: Value },
}

impl Event {
    /// The wire tag this event was dispatched under
    #[must_use]
    pub fn event_type(&self) -> &str {
        match self {
            Self::Ready(_) => "READY",
            Self::Resumed(_) => "RESUMED",
            Self::GuildCreate(_) => "GUILD_CREATE",
            Self::GuildUpdate(_) => "GUILD_UPDATE",
            Self::GuildDelete(_) => "GUILD_DELETE",
            Self::ChannelCreate(_) => "CHANNEL_CREATE",
            Self::ChannelUpdate(_) => "CHANNEL_UPDATE",
            Self::ChannelDelete(_) => "CHANNEL_DELETE",
            Self::GuildMemberAdd(_) => "GUILD_MEMBER_ADD",
            Self::GuildMemberUpdate(_) => "GUILD_MEMBER_UPDATE",
            Self::GuildMemberRemove(_) => "GUILD_MEMBER_REMOVE",
            Self::GuildRoleCreate(_) => "GUILD_ROLE_CREATE",
            Self::GuildRoleUpdate(_) => "GUILD_ROLE_UPDATE",
            Self::GuildRoleDelete(_) => "GUILD_ROLE_DELETE",
            Self::MessageCreate(_) => "MESSAGE_CREATE",
            Self::MessageUpdate(_) => "MESSAGE_UPDATE",
            Self::MessageDelete(_) => "MESSAGE_DELETE",
            Self::UserUpdate(_) => "USER_UPDATE",
            Self::Unknown { event_type, .. } => event_type,
        }
    }

    /// Check whether this is the catch-all unknown case
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown { .. })
    }
}
