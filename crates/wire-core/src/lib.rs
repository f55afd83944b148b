//! # wire-core
//!
//! Wire-level domain model for the chat gateway: IDs, intent bitmasks,
//! immutable entity snapshots, and the outbound REST-adjacent payloads.
//! This crate has zero dependencies on transport or runtime infrastructure;
//! everything here is a serialization target.

pub mod entities;
pub mod id;
pub mod intents;
pub mod mentions;
pub mod rest;

// Re-export commonly used types at crate root
pub use entities::{
    Attachment, Channel, ChannelType, Embed, EmbedAuthor, EmbedField, EmbedFooter, EmbedImage,
    EmbedProvider, EmbedThumbnail, EmbedVideo, Guild, Member, Message, MessageType,
    PermissionOverwrite, PremiumTier, Role, User, VerificationLevel,
};
pub use id::{Snowflake, SnowflakeParseError};
pub use intents::Intents;
pub use mentions::{AllowedMentions, MentionError, MentionKind};
pub use rest::{FileUpload, MessageSend, WebhookSend};
