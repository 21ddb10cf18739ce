//! Channel entity.

use super::{ChannelDomainError, ChannelId};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Kind tag for a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    /// Catch-all channel, also the notification fallback target.
    General,
    /// Channel whose name corresponds to a department work queue.
    Department,
    /// Restricted-membership channel.
    Private,
}

impl ChannelKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Department => "department",
            Self::Private => "private",
        }
    }
}

impl TryFrom<&str> for ChannelKind {
    type Error = ParseChannelKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "general" => Ok(Self::General),
            "department" => Ok(Self::Department),
            "private" => Ok(Self::Private),
            _ => Err(ParseChannelKindError(value.to_owned())),
        }
    }
}

/// Error returned while parsing channel kinds from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown channel kind: {0}")]
pub struct ParseChannelKindError(pub String);

/// A chat channel.
///
/// Channel names are unique; department channels share their name with
/// the department they feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    id: ChannelId,
    name: String,
    kind: ChannelKind,
}

impl Channel {
    /// Creates a new channel.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelDomainError::EmptyChannelName`] when the name is
    /// empty after trimming.
    pub fn new(name: impl Into<String>, kind: ChannelKind) -> Result<Self, ChannelDomainError> {
        let normalized = name.into().trim().to_owned();
        if normalized.is_empty() {
            return Err(ChannelDomainError::EmptyChannelName);
        }
        Ok(Self {
            id: ChannelId::new(),
            name: normalized,
            kind,
        })
    }

    /// Returns the channel identifier.
    #[must_use]
    pub const fn id(&self) -> ChannelId {
        self.id
    }

    /// Returns the channel name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the channel kind.
    #[must_use]
    pub const fn kind(&self) -> ChannelKind {
        self.kind
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.name)
    }
}
