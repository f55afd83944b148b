//! Allowed-mentions directive
//!
//! Controls which mentions the server will parse out of an outbound message.
//! `parse` is deliberately always serialized: a default value means no
//! mentions are allowed, so absence of the field is never read as allow-all.

use serde::{Deserialize, Serialize};

use crate::id::Snowflake;

/// Mention categories the server may parse from message content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MentionKind {
    /// Role mentions
    Roles,
    /// User mentions
    Users,
    /// @everyone and @here
    Everyone,
}

/// Directive scoping which mentions an outbound message may trigger
///
/// The broad `parse` tags and the explicit ID lists are mutually exclusive
/// per category: supplying `roles` IDs together with `MentionKind::Roles` in
/// `parse` is ambiguous and rejected by [`AllowedMentions::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AllowedMentions {
    pub parse: Vec<MentionKind>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<Snowflake>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<Snowflake>,
}

/// Conflicting allowed-mentions directive
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MentionError {
    #[error("explicit role IDs cannot be combined with parse=roles")]
    RolesConflict,
    #[error("explicit user IDs cannot be combined with parse=users")]
    UsersConflict,
}

impl AllowedMentions {
    /// Directive permitting no mentions at all
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Allow a broad mention category to be parsed
    #[must_use]
    pub fn with_parse(mut self, kind: MentionKind) -> Self {
        if !self.parse.contains(&kind) {
            self.parse.push(kind);
        }
        self
    }

    /// Allow mentioning a specific role
    #[must_use]
    pub fn with_role(mut self, role_id: Snowflake) -> Self {
        self.roles.push(role_id);
        self
    }

    /// Allow mentioning a specific user
    #[must_use]
    pub fn with_user(mut self, user_id: Snowflake) -> Self {
        self.users.push(user_id);
        self
    }

    /// Reject directives where a category appears both broadly and as IDs
    pub fn validate(&self) -> Result<(), MentionError> {
        if !self.roles.is_empty() && self.parse.contains(&MentionKind::Roles) {
            return Err(MentionError::RolesConflict);
        }
        if !self.users.is_empty() && self.parse.contains(&MentionKind::Users) {
            return Err(MentionError::UsersConflict);
        }
        Ok(())
    }
}
