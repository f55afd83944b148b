//! Role entity - guild role snapshot

use serde::{Deserialize, Serialize};

use crate::id::Snowflake;

/// Guild role snapshot
///
/// `permissions` is kept as the string-encoded bitset exactly as transmitted;
/// interpretation belongs to the permission layer, not the wire model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Role {
    pub id: Snowflake,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub managed: bool,
    #[serde(default)]
    pub mentionable: bool,
    #[serde(default)]
    pub hoist: bool,
    #[serde(default)]
    pub color: u32,
    #[serde(default)]
    pub position: i32,
    #[serde(default)]
    pub permissions: String,
}

impl Role {
    /// Mention string for this role
    #[must_use]
    pub fn mention(&self) -> String {
        format!("<@&{}>", self.id)
    }
}
