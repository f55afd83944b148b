//! Entity snapshots
//!
//! Immutable point-in-time records as received from the gateway. These are
//! serialization targets only; whichever cache layer consumes dispatched
//! events owns them afterwards.

mod channel;
mod embed;
mod guild;
mod member;
mod message;
mod role;
mod user;

pub use channel::{Channel, ChannelType, PermissionOverwrite};
pub use embed::{
    Embed, EmbedAuthor, EmbedField, EmbedFooter, EmbedImage, EmbedProvider, EmbedThumbnail,
    EmbedVideo,
};
pub use guild::{Guild, PremiumTier, VerificationLevel};
pub use member::Member;
pub use message::{Attachment, Message, MessageType};
pub use role::Role;
pub use user::User;
