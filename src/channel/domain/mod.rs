//! Domain model for channels, departments, and messages.

mod channel;
mod department;
mod error;
mod ids;
mod message;
mod trigger;

pub use channel::{Channel, ChannelKind, ParseChannelKindError};
pub use department::Department;
pub use error::ChannelDomainError;
pub use ids::{ChannelId, MessageId};
pub use message::{ChannelMessage, MediaAttachment, MediaKind, PersistedMessageData};
pub use trigger::{Trigger, TriggerConfig, extract_priority_override};
