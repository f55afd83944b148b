//! Client configuration

use std::time::Duration;

use serde::Deserialize;
use wire_core::Intents;

use crate::protocol::{Identify, IdentifyProperties, Resume};
use crate::session::Session;

/// Protocol version this client speaks
pub const PROTOCOL_VERSION: u8 = 6;

/// Reconnect backoff policy
#[derive(Debug, Clone, Deserialize)]
pub struct BackoffConfig {
    /// First-retry window
    #[serde(default = "default_backoff_base", with = "duration_millis")]
    pub base: Duration,
    /// Cap on the retry window
    #[serde(default = "default_backoff_max", with = "duration_millis")]
    pub max: Duration,
    /// Total connection attempts before giving up for good
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            base: default_backoff_base(),
            max: default_backoff_max(),
            max_attempts: default_max_attempts(),
        }
    }
}

/// Gateway client configuration
///
/// Built once and handed to the controller; the identify payload derived
/// from it is immutable for the life of the session.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Authentication token
    pub token: String,

    /// Client platform properties reported on identify
    #[serde(default)]
    pub properties: IdentifyProperties,

    /// Member-list threshold above which guilds arrive as "large"
    #[serde(default = "default_large_threshold")]
    pub large_threshold: u32,

    /// Ask the server for compressed payloads
    #[serde(default)]
    pub compress: bool,

    /// `[shard_index, shard_count]`
    #[serde(default = "default_shard")]
    pub shard: [u32; 2],

    /// Event-category subscription mask
    #[serde(default)]
    pub intents: Intents,

    /// Resume attempts after a resumable drop before escalating to a fresh
    /// identify
    #[serde(default = "default_max_resume_attempts")]
    pub max_resume_attempts: u32,

    /// Reconnect backoff policy
    #[serde(default)]
    pub reconnect: BackoffConfig,
}

impl GatewayConfig {
    /// Create a configuration with defaults for everything but the token
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            properties: IdentifyProperties::default(),
            large_threshold: default_large_threshold(),
            compress: false,
            shard: default_shard(),
            intents: Intents::default(),
            max_resume_attempts: default_max_resume_attempts(),
            reconnect: BackoffConfig::default(),
        }
    }

    /// Set the intents mask
    #[must_use]
    pub fn with_intents(mut self, intents: Intents) -> Self {
        self.intents = intents;
        self
    }

    /// Set the shard pair
    #[must_use]
    pub fn with_shard(mut self, index: u32, count: u32) -> Self {
        self.shard = [index, count];
        self
    }

    /// Set the large-guild threshold
    #[must_use]
    pub fn with_large_threshold(mut self, threshold: u32) -> Self {
        self.large_threshold = threshold;
        self
    }

    /// Set the reconnect backoff policy
    #[must_use]
    pub fn with_reconnect(mut self, reconnect: BackoffConfig) -> Self {
        self.reconnect = reconnect;
        self
    }

    /// Build the identify payload for a fresh session
    #[must_use]
    pub fn identify(&self) -> Identify {
        Identify {
            token: self.token.clone(),
            properties: self.properties.clone(),
            v: PROTOCOL_VERSION,
            large_threshold: self.large_threshold,
            compress: self.compress,
            shard: self.shard,
            intents: self.intents,
        }
    }

    /// Build the resume payload for a remembered session
    #[must_use]
    pub fn resume(&self, session: &Session) -> Resume {
        Resume {
            token: self.token.clone(),
            session_id: session.id.clone(),
            seq: session.last_sequence,
        }
    }
}

fn default_large_threshold() -> u32 {
    250
}

fn default_shard() -> [u32; 2] {
    [0, 1]
}

fn default_max_resume_attempts() -> u32 {
    3
}

fn default_backoff_base() -> Duration {
    Duration::from_secs(1)
}

fn default_backoff_max() -> Duration {
    Duration::from_secs(64)
}

fn default_max_attempts() -> u32 {
    10
}

mod duration_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
