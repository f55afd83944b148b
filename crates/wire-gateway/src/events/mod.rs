//! Typed event dispatch
//!
//! Second decode phase: once the envelope's tag is known, the opaque payload
//! is decoded into a concrete entity wrapper.

mod dispatcher;
mod event;
mod types;

pub use dispatcher::dispatch;
pub use event::{Event, GuildRole, GuildRoleDelete};
pub use types::EventType;
