//! Control payload definitions
//!
//! Payload shapes for the non-dispatch opcodes. A heartbeat's payload is the
//! bare last sequence number (or null) and has no struct here.

use serde::{Deserialize, Serialize};
use wire_core::{Channel, Guild, Intents, User};

/// Payload for op 10 (Hello)
///
/// Sent by the server immediately after connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hello {
    /// Heartbeat interval in milliseconds
    pub heartbeat_interval: u64,
}

/// Client platform properties reported during identify
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifyProperties {
    pub os: String,
    pub browser: String,
    pub device: String,
}

impl Default for IdentifyProperties {
    fn default() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            browser: "wire-gateway".to_string(),
            device: "wire-gateway".to_string(),
        }
    }
}

/// Payload for op 2 (Identify)
///
/// Authenticates a fresh session. Immutable once sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identify {
    pub token: String,
    pub properties: IdentifyProperties,
    /// Protocol version
    pub v: u8,
    /// Member-list threshold above which a guild is delivered as "large"
    pub large_threshold: u32,
    pub compress: bool,
    /// `[shard_index, shard_count]`
    pub shard: [u32; 2],
    pub intents: Intents,
}

/// Payload for op 4 (Resume)
///
/// Re-attaches to a prior session after a recoverable drop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resume {
    pub token: String,
    /// Session ID to resume
    pub session_id: String,
    /// Last received sequence number
    pub seq: u64,
}

/// Payload for op 3 (Status Update)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    /// New status (online, idle, dnd, offline)
    pub status: String,
}

impl StatusUpdate {
    /// Valid status values
    pub const VALID_STATUSES: &'static [&'static str] = &["online", "idle", "dnd", "offline"];

    /// Check if the status is valid
    #[must_use]
    pub fn is_valid_status(&self) -> bool {
        Self::VALID_STATUSES.contains(&self.status.as_str())
    }
}

/// Dispatch payload for the READY event
///
/// Establishes the session: the session ID here is what a later resume
/// presents back to the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ready {
    pub v: u8,
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub private_channels: Vec<Channel>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub guilds: Vec<Guild>,
}

/// Dispatch payload for the RESUMED event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Resumed {}
