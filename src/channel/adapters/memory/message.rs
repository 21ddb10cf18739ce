//! In-memory message repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::channel::{
    domain::{ChannelId, ChannelMessage, MessageId},
    ports::{MessageRepository, MessageRepositoryError, MessageRepositoryResult},
};
use crate::task::domain::TaskId;

/// Thread-safe in-memory message repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMessageRepository {
    state: Arc<RwLock<HashMap<MessageId, ChannelMessage>>>,
}

impl InMemoryMessageRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> MessageRepositoryError {
    MessageRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn store(&self, message: &ChannelMessage) -> MessageRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.contains_key(&message.id()) {
            return Err(MessageRepositoryError::DuplicateMessage(message.id()));
        }
        state.insert(message.id(), message.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: MessageId) -> MessageRepositoryResult<Option<ChannelMessage>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.get(&id).cloned())
    }

    async fn list_by_channel(
        &self,
        channel_id: ChannelId,
    ) -> MessageRepositoryResult<Vec<ChannelMessage>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut messages: Vec<ChannelMessage> = state
            .values()
            .filter(|message| message.channel_id() == channel_id)
            .cloned()
            .collect();
        messages.sort_by_key(ChannelMessage::created_at);
        Ok(messages)
    }

    async fn link_task(&self, id: MessageId, task_id: TaskId) -> MessageRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let message = state
            .get_mut(&id)
            .ok_or(MessageRepositoryError::NotFound(id))?;
        message
            .link_task(task_id)
            .map_err(|_| MessageRepositoryError::TaskAlreadyLinked(id))
    }
}
