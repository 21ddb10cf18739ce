//! In-memory channel repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::channel::{
    domain::{Channel, ChannelId},
    ports::{ChannelRepository, ChannelRepositoryError, ChannelRepositoryResult},
};

/// Thread-safe in-memory channel repository with a unique name index.
#[derive(Debug, Clone, Default)]
pub struct InMemoryChannelRepository {
    state: Arc<RwLock<InMemoryChannelState>>,
}

#[derive(Debug, Default)]
struct InMemoryChannelState {
    channels: HashMap<ChannelId, Channel>,
    name_index: HashMap<String, ChannelId>,
}

impl InMemoryChannelRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> ChannelRepositoryError {
    ChannelRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl ChannelRepository for InMemoryChannelRepository {
    async fn store(&self, channel: &Channel) -> ChannelRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.name_index.contains_key(channel.name()) {
            return Err(ChannelRepositoryError::DuplicateName(
                channel.name().to_owned(),
            ));
        }
        state.name_index.insert(channel.name().to_owned(), channel.id());
        state.channels.insert(channel.id(), channel.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: ChannelId) -> ChannelRepositoryResult<Option<Channel>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.channels.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> ChannelRepositoryResult<Option<Channel>> {
        let state = self.state.read().map_err(lock_error)?;
        let channel = state
            .name_index
            .get(name)
            .and_then(|id| state.channels.get(id))
            .cloned();
        Ok(channel)
    }
}
