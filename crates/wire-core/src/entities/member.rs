//! Member entity - a user's state within one guild

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::user::User;
use crate::id::Snowflake;

/// Guild member snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Member {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<Snowflake>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nick: Option<String>,
    /// Role IDs assigned to this member
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<Snowflake>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joined_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub premium_since: Option<DateTime<Utc>>,
    #[serde(default)]
    pub deaf: bool,
    #[serde(default)]
    pub mute: bool,
}

impl Member {
    /// Display name: nickname if set, otherwise the account username
    #[must_use]
    pub fn display_name(&self) -> &str {
        if let Some(nick) = &self.nick {
            return nick;
        }
        self.user.as_ref().map_or("", |u| u.username.as_str())
    }

    /// Check whether the member carries a given role
    #[must_use]
    pub fn has_role(&self, role_id: Snowflake) -> bool {
        self.roles.contains(&role_id)
    }
}
