//! Gateway intents bitmask
//!
//! Sent during identify to scope which event categories the session receives.
//! Serialized as a bare integer in the identify payload.

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

bitflags! {
    /// Event-category subscription mask for the identify handshake
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Intents: u64 {
        /// Guild create/update/delete and role events
        const GUILDS                   = 1 << 0;
        /// Member add/update/remove (privileged)
        const GUILD_MEMBERS            = 1 << 1;
        /// Ban add/remove
        const GUILD_BANS               = 1 << 2;
        /// Emoji updates
        const GUILD_EMOJIS             = 1 << 3;
        /// Integration updates
        const GUILD_INTEGRATIONS       = 1 << 4;
        /// Webhook updates
        const GUILD_WEBHOOKS           = 1 << 5;
        /// Invite create/delete
        const GUILD_INVITES            = 1 << 6;
        /// Voice state updates
        const GUILD_VOICE_STATES       = 1 << 7;
        /// Presence updates (privileged)
        const GUILD_PRESENCES          = 1 << 8;
        /// Message create/update/delete in guild channels
        const GUILD_MESSAGES           = 1 << 9;
        /// Reaction events in guild channels
        const GUILD_MESSAGE_REACTIONS  = 1 << 10;
        /// Typing start in guild channels
        const GUILD_MESSAGE_TYPING     = 1 << 11;
        /// Message events in direct messages
        const DIRECT_MESSAGES          = 1 << 12;
        /// Reaction events in direct messages
        const DIRECT_MESSAGE_REACTIONS = 1 << 13;
        /// Typing start in direct messages
        const DIRECT_MESSAGE_TYPING    = 1 << 14;
    }
}

impl Intents {
    /// All intents that do not require privileged approval
    #[must_use]
    pub const fn unprivileged() -> Self {
        Self::all()
            .difference(Self::GUILD_MEMBERS)
            .difference(Self::GUILD_PRESENCES)
    }

    /// Check whether this mask contains any privileged intent
    #[must_use]
    pub const fn is_privileged(self) -> bool {
        self.intersects(Self::GUILD_MEMBERS.union(Self::GUILD_PRESENCES))
    }
}

impl Serialize for Intents {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(self.bits())
    }
}

impl<'de> Deserialize<'de> for Intents {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = u64::deserialize(deserializer)?;
        Ok(Self::from_bits_truncate(bits))
    }
}

impl fmt::Display for Intents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}
