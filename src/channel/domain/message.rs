//! Channel message entity with a write-once task back-link.

use super::{ChannelDomainError, ChannelId, MessageId};
use crate::task::domain::{TaskId, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Media kind carried alongside a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    /// An image the created task inherits.
    Image,
    /// Any other opaque attachment.
    File,
}

/// An opaque media reference attached to a message.
///
/// The engine stores URLs only; binary storage is an external
/// collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaAttachment {
    /// Opaque URL into the binary storage collaborator.
    pub url: String,
    /// Attachment kind.
    pub kind: MediaKind,
}

impl MediaAttachment {
    /// Creates an image attachment.
    #[must_use]
    pub fn image(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: MediaKind::Image,
        }
    }

    /// Creates a generic file attachment.
    #[must_use]
    pub fn file(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: MediaKind::File,
        }
    }
}

/// A message posted to a channel.
///
/// Messages are immutable except for the single `linked_task_id`
/// back-link write performed by the ingestion pipeline. A sender of
/// `None` marks a system-authored message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelMessage {
    id: MessageId,
    channel_id: ChannelId,
    content: String,
    sender_id: Option<UserId>,
    media: Option<MediaAttachment>,
    linked_task_id: Option<TaskId>,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedMessageData {
    /// Persisted message identifier.
    pub id: MessageId,
    /// Persisted channel reference.
    pub channel_id: ChannelId,
    /// Persisted content.
    pub content: String,
    /// Persisted sender, `None` for system messages.
    pub sender_id: Option<UserId>,
    /// Persisted media attachment, if any.
    pub media: Option<MediaAttachment>,
    /// Persisted task back-link, if already written.
    pub linked_task_id: Option<TaskId>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl ChannelMessage {
    /// Creates a user-authored message.
    #[must_use]
    pub fn new(
        channel_id: ChannelId,
        content: impl Into<String>,
        sender_id: UserId,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: MessageId::new(),
            channel_id,
            content: content.into(),
            sender_id: Some(sender_id),
            media: None,
            linked_task_id: None,
            created_at: clock.utc(),
        }
    }

    /// Creates a system-authored message (no sender).
    #[must_use]
    pub fn system(channel_id: ChannelId, content: impl Into<String>, clock: &impl Clock) -> Self {
        Self {
            id: MessageId::new(),
            channel_id,
            content: content.into(),
            sender_id: None,
            media: None,
            linked_task_id: None,
            created_at: clock.utc(),
        }
    }

    /// Reconstructs a message from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedMessageData) -> Self {
        Self {
            id: data.id,
            channel_id: data.channel_id,
            content: data.content,
            sender_id: data.sender_id,
            media: data.media,
            linked_task_id: data.linked_task_id,
            created_at: data.created_at,
        }
    }

    /// Attaches media to the message.
    #[must_use]
    pub fn with_media(mut self, media: MediaAttachment) -> Self {
        self.media = Some(media);
        self
    }

    /// Returns the message identifier.
    #[must_use]
    pub const fn id(&self) -> MessageId {
        self.id
    }

    /// Returns the channel reference.
    #[must_use]
    pub const fn channel_id(&self) -> ChannelId {
        self.channel_id
    }

    /// Returns the message content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the sender, or `None` for system messages.
    #[must_use]
    pub const fn sender_id(&self) -> Option<UserId> {
        self.sender_id
    }

    /// Returns whether the message is system-authored.
    #[must_use]
    pub const fn is_system(&self) -> bool {
        self.sender_id.is_none()
    }

    /// Returns the media attachment, if any.
    #[must_use]
    pub const fn media(&self) -> Option<&MediaAttachment> {
        self.media.as_ref()
    }

    /// Returns the URL of an attached image, if the media is an image.
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        match &self.media {
            Some(attachment) if attachment.kind == MediaKind::Image => {
                Some(attachment.url.as_str())
            }
            _ => None,
        }
    }

    /// Returns the task back-link, if written.
    #[must_use]
    pub const fn linked_task_id(&self) -> Option<TaskId> {
        self.linked_task_id
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Writes the task back-link.
    ///
    /// The link is write-once; the ingestion pipeline is its only
    /// legitimate writer.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelDomainError::TaskAlreadyLinked`] when a link is
    /// already set. The existing link is left untouched.
    pub fn link_task(&mut self, task_id: TaskId) -> Result<(), ChannelDomainError> {
        if self.linked_task_id.is_some() {
            return Err(ChannelDomainError::TaskAlreadyLinked(self.id));
        }
        self.linked_task_id = Some(task_id);
        Ok(())
    }
}
