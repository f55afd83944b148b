//! Outbound REST-adjacent payloads
//!
//! Shapes consumed by the HTTP layer when sending messages; the gateway never
//! carries these. File contents travel out of band as multipart parts and are
//! therefore excluded from the JSON body.

use serde::{Deserialize, Serialize};

use crate::entities::Embed;
use crate::mentions::{AllowedMentions, MentionError};

/// A file to upload alongside a message, sent as an out-of-band binary part
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileUpload {
    pub name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl FileUpload {
    /// Create an upload from a name, MIME type, and raw bytes
    #[must_use]
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            data,
        }
    }
}

/// Body for sending a message to a channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MessageSend {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embed: Option<Embed>,
    #[serde(default)]
    pub tts: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_mentions: Option<AllowedMentions>,
    /// Uploaded as multipart parts, never inlined in the JSON body
    #[serde(skip)]
    pub files: Vec<FileUpload>,
}

impl MessageSend {
    /// Create a plain-text message body
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    /// Attach the single rich embed
    #[must_use]
    pub fn with_embed(mut self, embed: Embed) -> Self {
        self.embed = Some(embed);
        self
    }

    /// Set the allowed-mentions directive
    #[must_use]
    pub fn with_allowed_mentions(mut self, mentions: AllowedMentions) -> Self {
        self.allowed_mentions = Some(mentions);
        self
    }

    /// Attach a file upload
    #[must_use]
    pub fn with_file(mut self, file: FileUpload) -> Self {
        self.files.push(file);
        self
    }

    /// Validate the body before handing it to the HTTP layer
    pub fn validate(&self) -> Result<(), MentionError> {
        if let Some(mentions) = &self.allowed_mentions {
            mentions.validate()?;
        }
        Ok(())
    }
}

/// Body for executing a webhook
///
/// Structurally distinct from [`MessageSend`]: webhooks carry a display
/// identity override and a list of embeds, and have no channel context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WebhookSend {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub tts: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Embed>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_mentions: Option<AllowedMentions>,
}

impl WebhookSend {
    /// Create a plain-text webhook body
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    /// Override the displayed username
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Append an embed
    #[must_use]
    pub fn with_embed(mut self, embed: Embed) -> Self {
        self.embeds.push(embed);
        self
    }

    /// Set the allowed-mentions directive
    #[must_use]
    pub fn with_allowed_mentions(mut self, mentions: AllowedMentions) -> Self {
        self.allowed_mentions = Some(mentions);
        self
    }

    /// Validate the body before handing it to the HTTP layer
    pub fn validate(&self) -> Result<(), MentionError> {
        if let Some(mentions) = &self.allowed_mentions {
            mentions.validate()?;
        }
        Ok(())
    }
}
