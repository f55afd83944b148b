//! Dispatch-frame decoding
//!
//! Maps a dispatch frame's type tag to a typed payload decode. An unknown
//! tag is decoded as [`Event::Unknown`]; a known tag whose payload fails to
//! decode is a [`SchemaError`] the controller logs and survives.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::event::Event;
use super::types::EventType;
use crate::error::SchemaError;

fn decode<T: DeserializeOwned>(event_type: EventType, data: Value) -> Result<T, SchemaError> {
    serde_json::from_value(data).map_err(|source| SchemaError {
        event_type: event_type.as_str().to_string(),
        source,
    })
}

/// Decode a dispatch payload into a typed event
///
/// `event_type` is the raw `t` tag from the envelope; `data` the opaque `d`
/// payload. Unknown tags are never an error.
pub fn dispatch(event_type: &str, data: Value) -> Result<Event, SchemaError> {
    let Some(known) = EventType::parse(event_type) else {
        return Ok(Event::Unknown {
            event_type: event_type.to_string(),
            data,
        });
    };

    let event = match known {
        EventType::Ready => Event::Ready(decode(known, data)?),
        EventType::Resumed => Event::Resumed(decode(known, data)?),
        EventType::GuildCreate => Event::GuildCreate(decode(known, data)?),
        EventType::GuildUpdate => Event::GuildUpdate(decode(known, data)?),
        EventType::GuildDelete => Event::GuildDelete(decode(known, data)?),
        EventType::ChannelCreate => Event::ChannelCreate(decode(known, data)?),
        EventType::ChannelUpdate => Event::ChannelUpdate(decode(known, data)?),
        EventType::ChannelDelete => Event::ChannelDelete(decode(known, data)?),
        EventType::GuildMemberAdd => Event::GuildMemberAdd(decode(known, data)?),
        EventType::GuildMemberUpdate => Event::GuildMemberUpdate(decode(known, data)?),
        EventType::GuildMemberRemove => Event::GuildMemberRemove(decode(known, data)?),
        EventType::GuildRoleCreate => Event::GuildRoleCreate(decode(known, data)?),
        EventType::GuildRoleUpdate => Event::GuildRoleUpdate(decode(known, data)?),
        EventType::GuildRoleDelete => Event::GuildRoleDelete(decode(known, data)?),
        EventType::MessageCreate => Event::MessageCreate(decode(known, data)?),
        EventType::MessageUpdate => Event::MessageUpdate(decode(known, data)?),
        EventType::MessageDelete => Event::MessageDelete(decode(known, data)?),
        EventType::UserUpdate => Event::UserUpdate(decode(known, data)?),
    };
    Ok(event)
}
