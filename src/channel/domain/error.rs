//! Error types for channel domain validation.

use super::MessageId;
use thiserror::Error;

/// Errors returned while constructing channel domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChannelDomainError {
    /// The channel name is empty after trimming.
    #[error("channel name must not be empty")]
    EmptyChannelName,

    /// The department name is empty after trimming.
    #[error("department name must not be empty")]
    EmptyDepartmentName,

    /// The message already carries a task back-link.
    #[error("message {0} is already linked to a task")]
    TaskAlreadyLinked(MessageId),
}
