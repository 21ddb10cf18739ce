//! In-memory revision repository with a durable per-task counter.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{Revision, RevisionId, RevisionNumber, TaskId},
    ports::{RevisionRepository, RevisionRepositoryError, RevisionRepositoryResult},
};

/// Thread-safe in-memory revision repository.
///
/// Numbers come from a running counter per task, not from counting rows,
/// so the sequence stays gap-free even after deletions.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRevisionRepository {
    state: Arc<RwLock<InMemoryRevisionState>>,
}

#[derive(Debug, Default)]
struct InMemoryRevisionState {
    revisions: HashMap<RevisionId, Revision>,
    counters: HashMap<TaskId, u32>,
}

impl InMemoryRevisionRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> RevisionRepositoryError {
    RevisionRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl RevisionRepository for InMemoryRevisionRepository {
    async fn next_number(&self, task_id: TaskId) -> RevisionRepositoryResult<RevisionNumber> {
        let mut state = self.state.write().map_err(lock_error)?;
        let counter = state.counters.entry(task_id).or_insert(0);
        let next = counter
            .checked_add(1)
            .ok_or(RevisionRepositoryError::CounterOverflow(task_id))?;
        *counter = next;
        RevisionNumber::new(next)
            .map_err(|_| RevisionRepositoryError::CounterOverflow(task_id))
    }

    async fn store(&self, revision: &Revision) -> RevisionRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.revisions.contains_key(&revision.id()) {
            return Err(RevisionRepositoryError::DuplicateRevision(revision.id()));
        }
        state.revisions.insert(revision.id(), revision.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: RevisionId) -> RevisionRepositoryResult<Option<Revision>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.revisions.get(&id).cloned())
    }

    async fn find_by_task(&self, task_id: TaskId) -> RevisionRepositoryResult<Vec<Revision>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut revisions: Vec<Revision> = state
            .revisions
            .values()
            .filter(|revision| revision.task_id() == task_id)
            .cloned()
            .collect();
        revisions.sort_by_key(Revision::number);
        Ok(revisions)
    }

    async fn remove(&self, id: RevisionId) -> RevisionRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state
            .revisions
            .remove(&id)
            .map(|_| ())
            .ok_or(RevisionRepositoryError::NotFound(id))
    }

    async fn remove_for_task(&self, task_id: TaskId) -> RevisionRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state
            .revisions
            .retain(|_, revision| revision.task_id() != task_id);
        state.counters.remove(&task_id);
        Ok(())
    }
}
