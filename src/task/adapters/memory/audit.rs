//! In-memory append-only audit log.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{AuditEntry, TaskId},
    ports::{AuditLogRepository, AuditLogRepositoryError, AuditLogResult},
};

/// Thread-safe in-memory audit log.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAuditLog {
    state: Arc<RwLock<Vec<AuditEntry>>>,
}

impl InMemoryAuditLog {
    /// Creates an empty in-memory audit log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> AuditLogRepositoryError {
    AuditLogRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl AuditLogRepository for InMemoryAuditLog {
    async fn append(&self, entry: &AuditEntry) -> AuditLogResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.push(entry.clone());
        Ok(())
    }

    async fn find_by_task(&self, task_id: TaskId) -> AuditLogResult<Vec<AuditEntry>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .iter()
            .filter(|entry| entry.task_id() == task_id)
            .cloned()
            .collect())
    }

    async fn remove_for_task(&self, task_id: TaskId) -> AuditLogResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.retain(|entry| entry.task_id() != task_id);
        Ok(())
    }
}
