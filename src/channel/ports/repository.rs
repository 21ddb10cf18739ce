//! Repository ports for channel, department, message, and usage persistence.

use crate::channel::domain::{Channel, ChannelId, ChannelMessage, Department, MessageId};
use crate::task::domain::{DepartmentId, TaskId, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for channel repository operations.
pub type ChannelRepositoryResult<T> = Result<T, ChannelRepositoryError>;

/// Result type for department repository operations.
pub type DepartmentRepositoryResult<T> = Result<T, DepartmentRepositoryError>;

/// Result type for message repository operations.
pub type MessageRepositoryResult<T> = Result<T, MessageRepositoryError>;

/// Result type for usage ledger operations.
pub type UsageLedgerResult<T> = Result<T, UsageLedgerError>;

/// Channel persistence contract.
#[async_trait]
pub trait ChannelRepository: Send + Sync {
    /// Stores a new channel.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelRepositoryError::DuplicateName`] when the name is
    /// already taken.
    async fn store(&self, channel: &Channel) -> ChannelRepositoryResult<()>;

    /// Finds a channel by identifier. Returns `None` when absent.
    async fn find_by_id(&self, id: ChannelId) -> ChannelRepositoryResult<Option<Channel>>;

    /// Finds a channel by exact name. Returns `None` when absent.
    async fn find_by_name(&self, name: &str) -> ChannelRepositoryResult<Option<Channel>>;
}

/// Errors returned by channel repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ChannelRepositoryError {
    /// A channel with the same name already exists.
    #[error("duplicate channel name: {0}")]
    DuplicateName(String),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ChannelRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// Department persistence contract.
///
/// Implementations must enforce a unique constraint on the department
/// name so concurrent find-or-create callers cannot produce duplicates;
/// the resolver relies on insert-then-fallback-to-select semantics.
#[async_trait]
pub trait DepartmentRepository: Send + Sync {
    /// Inserts a new department.
    ///
    /// # Errors
    ///
    /// Returns [`DepartmentRepositoryError::DuplicateName`] when another
    /// row already holds the name; the caller re-reads the winner.
    async fn insert(&self, department: &Department) -> DepartmentRepositoryResult<()>;

    /// Finds a department by identifier. Returns `None` when absent.
    async fn find_by_id(&self, id: DepartmentId) -> DepartmentRepositoryResult<Option<Department>>;

    /// Finds a department by exact name. Returns `None` when absent.
    async fn find_by_name(&self, name: &str) -> DepartmentRepositoryResult<Option<Department>>;
}

/// Errors returned by department repository implementations.
#[derive(Debug, Clone, Error)]
pub enum DepartmentRepositoryError {
    /// A department with the same name already exists.
    #[error("duplicate department name: {0}")]
    DuplicateName(String),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl DepartmentRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// Message persistence contract.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Stores a new message.
    ///
    /// # Errors
    ///
    /// Returns [`MessageRepositoryError::DuplicateMessage`] when the
    /// message ID already exists.
    async fn store(&self, message: &ChannelMessage) -> MessageRepositoryResult<()>;

    /// Finds a message by identifier. Returns `None` when absent.
    async fn find_by_id(&self, id: MessageId) -> MessageRepositoryResult<Option<ChannelMessage>>;

    /// Returns a channel's messages in posting order.
    async fn list_by_channel(
        &self,
        channel_id: ChannelId,
    ) -> MessageRepositoryResult<Vec<ChannelMessage>>;

    /// Writes the write-once task back-link onto a message.
    ///
    /// # Errors
    ///
    /// Returns [`MessageRepositoryError::NotFound`] when the message does
    /// not exist, or [`MessageRepositoryError::TaskAlreadyLinked`] when a
    /// link was already written; the existing link is never overwritten.
    async fn link_task(&self, id: MessageId, task_id: TaskId) -> MessageRepositoryResult<()>;
}

/// Errors returned by message repository implementations.
#[derive(Debug, Clone, Error)]
pub enum MessageRepositoryError {
    /// A message with the same identifier already exists.
    #[error("duplicate message identifier: {0}")]
    DuplicateMessage(MessageId),

    /// The message was not found.
    #[error("message not found: {0}")]
    NotFound(MessageId),

    /// The message already carries a task back-link.
    #[error("message {0} is already linked to a task")]
    TaskAlreadyLinked(MessageId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl MessageRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// Per-user accumulator for parser token/resource usage.
#[async_trait]
pub trait UsageLedger: Send + Sync {
    /// Adds parser usage against the acting user.
    async fn record(&self, user_id: UserId, tokens: u64) -> UsageLedgerResult<()>;

    /// Returns the accumulated usage for a user.
    async fn total_for(&self, user_id: UserId) -> UsageLedgerResult<u64>;
}

/// Errors returned by usage ledger implementations.
#[derive(Debug, Clone, Error)]
pub enum UsageLedgerError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl UsageLedgerError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
