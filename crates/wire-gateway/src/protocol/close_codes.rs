//! Close codes and the client-side reconnect policy
//!
//! The transport's close code is the only signal the client gets about why a
//! connection died; [`CloseCode::classify`] is the single place that verdict
//! is turned into an action.

use serde::{Deserialize, Serialize};

/// Gateway close codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum CloseCode {
    /// Unknown error occurred
    UnknownError = 4000,
    /// Invalid opcode sent
    UnknownOpcode = 4001,
    /// Invalid payload encoding (JSON decode error)
    DecodeError = 4002,
    /// Sent a payload before Identify
    NotAuthenticated = 4003,
    /// Invalid token provided
    AuthenticationFailed = 4004,
    /// Sent Identify twice
    AlreadyAuthenticated = 4005,
    /// Invalid sequence number for Resume
    InvalidSequence = 4007,
    /// Too many payloads (rate limited)
    RateLimited = 4008,
    /// Session has timed out
    SessionTimeout = 4009,
    /// Invalid shard configuration
    InvalidShard = 4010,
    /// Sharding is required
    ShardingRequired = 4011,
    /// Invalid/outdated API version
    InvalidApiVersion = 4012,
    /// Invalid intents bitmask
    InvalidIntents = 4013,
    /// Privileged intents not approved for this client
    DisallowedIntents = 4014,
}

/// What the session controller does after a close
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseAction {
    /// Reconnect and resume the remembered session
    Resume,
    /// Reconnect with a fresh identify; the old session is gone
    Reidentify,
    /// Terminal; surface the error and stop
    Fatal,
}

impl CloseCode {
    /// Create a `CloseCode` from a raw u16 value
    #[must_use]
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            4000 => Some(Self::UnknownError),
            4001 => Some(Self::UnknownOpcode),
            4002 => Some(Self::DecodeError),
            4003 => Some(Self::NotAuthenticated),
            4004 => Some(Self::AuthenticationFailed),
            4005 => Some(Self::AlreadyAuthenticated),
            4007 => Some(Self::InvalidSequence),
            4008 => Some(Self::RateLimited),
            4009 => Some(Self::SessionTimeout),
            4010 => Some(Self::InvalidShard),
            4011 => Some(Self::ShardingRequired),
            4012 => Some(Self::InvalidApiVersion),
            4013 => Some(Self::InvalidIntents),
            4014 => Some(Self::DisallowedIntents),
            _ => None,
        }
    }

    /// Get the raw u16 value
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Terminal codes: reconnecting cannot succeed, zero retries
    #[must_use]
    pub const fn is_fatal(self) -> bool {
        matches!(
            self,
            Self::AuthenticationFailed
                | Self::InvalidShard
                | Self::ShardingRequired
                | Self::InvalidApiVersion
                | Self::InvalidIntents
                | Self::DisallowedIntents
        )
    }

    /// Codes after which the remembered session is still resumable
    #[must_use]
    pub const fn can_resume(self) -> bool {
        matches!(
            self,
            Self::UnknownError
                | Self::DecodeError
                | Self::AlreadyAuthenticated
                | Self::RateLimited
                | Self::SessionTimeout
        )
    }

    /// Classify an optional transport close code into a controller action
    ///
    /// Unknown and non-gateway codes (abnormal closure, no code at all) carry
    /// no protocol verdict and default to a resume attempt.
    #[must_use]
    pub fn classify(code: Option<u16>) -> CloseAction {
        match code.and_then(Self::from_u16) {
            Some(c) if c.is_fatal() => CloseAction::Fatal,
            Some(c) if c.can_resume() => CloseAction::Resume,
            Some(_) => CloseAction::Reidentify,
            None => CloseAction::Resume,
        }
    }

    /// Get the description for this close code
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::UnknownError => "Unknown error occurred",
            Self::UnknownOpcode => "Invalid opcode sent",
            Self::DecodeError => "Invalid payload encoding",
            Self::NotAuthenticated => "Not authenticated",
            Self::AuthenticationFailed => "Authentication failed",
            Self::AlreadyAuthenticated => "Already authenticated",
            Self::InvalidSequence => "Invalid sequence number",
            Self::RateLimited => "Rate limited",
            Self::SessionTimeout => "Session timeout",
            Self::InvalidShard => "Invalid shard configuration",
            Self::ShardingRequired => "Sharding required",
            Self::InvalidApiVersion => "Invalid API version",
            Self::InvalidIntents => "Invalid intents",
            Self::DisallowedIntents => "Disallowed intents",
        }
    }

    /// Get the name of this close code
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::UnknownError => "UnknownError",
            Self::UnknownOpcode => "UnknownOpcode",
            Self::DecodeError => "DecodeError",
            Self::NotAuthenticated => "NotAuthenticated",
            Self::AuthenticationFailed => "AuthenticationFailed",
            Self::AlreadyAuthenticated => "AlreadyAuthenticated",
            Self::InvalidSequence => "InvalidSequence",
            Self::RateLimited => "RateLimited",
            Self::SessionTimeout => "SessionTimeout",
            Self::InvalidShard => "InvalidShard",
            Self::ShardingRequired => "ShardingRequired",
            Self::InvalidApiVersion => "InvalidApiVersion",
            Self::InvalidIntents => "InvalidIntents",
            Self::DisallowedIntents => "DisallowedIntents",
        }
    }
}

impl std::fmt::Display for CloseCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.name(), self.as_u16(), self.description())
    }
}

impl From<CloseCode> for u16 {
    fn from(code: CloseCode) -> Self {
        code.as_u16()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_code_from_u16() {
        assert_eq!(CloseCode::from_u16(4000), Some(CloseCode::UnknownError));
        assert_eq!(CloseCode::from_u16(4004), Some(CloseCode::AuthenticationFailed));
        assert_eq!(CloseCode::from_u16(4014), Some(CloseCode::DisallowedIntents));
        assert_eq!(CloseCode::from_u16(1000), None);
        assert_eq!(CloseCode::from_u16(4006), None); // 4006 is not defined
    }

    #[test]
    fn test_fatal_codes() {
        assert!(CloseCode::AuthenticationFailed.is_fatal());
        assert!(CloseCode::InvalidShard.is_fatal());
        assert!(CloseCode::ShardingRequired.is_fatal());
        assert!(CloseCode::InvalidApiVersion.is_fatal());
        assert!(CloseCode::InvalidIntents.is_fatal());
        assert!(CloseCode::DisallowedIntents.is_fatal());

        assert!(!CloseCode::UnknownError.is_fatal());
        assert!(!CloseCode::SessionTimeout.is_fatal());
    }

    #[test]
    fn test_resume_safe_codes() {
        assert!(CloseCode::UnknownError.can_resume());
        assert!(CloseCode::RateLimited.can_resume());
        assert!(CloseCode::SessionTimeout.can_resume());

        // sequence desync means the session is gone
        assert!(!CloseCode::InvalidSequence.can_resume());
        assert!(!CloseCode::NotAuthenticated.can_resume());
        assert!(!CloseCode::AuthenticationFailed.can_resume());
    }

    #[test]
    fn test_classify() {
        assert_eq!(CloseCode::classify(Some(4004)), CloseAction::Fatal);
        assert_eq!(CloseCode::classify(Some(4013)), CloseAction::Fatal);
        assert_eq!(CloseCode::classify(Some(4009)), CloseAction::Resume);
        assert_eq!(CloseCode::classify(Some(4007)), CloseAction::Reidentify);
        assert_eq!(CloseCode::classify(Some(4001)), CloseAction::Reidentify);
        // abnormal closure and missing codes default to resume
        assert_eq!(CloseCode::classify(Some(1006)), CloseAction::Resume);
        assert_eq!(CloseCode::classify(None), CloseAction::Resume);
    }

    #[test]
    fn test_close_code_display() {
        let display = format!("{}", CloseCode::AuthenticationFailed);
        assert!(display.contains("4004"));
        assert!(display.contains("Authentication"));
    }
}
