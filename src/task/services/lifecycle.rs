//! Task lifecycle orchestration: creation, updates, listing, and removal.

use crate::task::{
    domain::{
        AuditAction, AuditEntry, FieldChange, Task, TaskDomainError, TaskDraft, TaskId, TaskPatch,
        UserId,
    },
    ports::{
        AuditLogRepository, AuditLogRepositoryError, RevisionRepository, RevisionRepositoryError,
        TaskFilter, TaskRepository, TaskRepositoryError,
    },
};
use mockable::Clock;
use serde_json::{Value, json};
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// The task does not exist.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// Task persistence failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),

    /// Revision persistence failed during a cascade.
    #[error(transparent)]
    RevisionStore(#[from] RevisionRepositoryError),

    /// Audit-log persistence failed.
    #[error(transparent)]
    AuditLog(#[from] AuditLogRepositoryError),
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Result of applying a patch: the updated task plus the observable
/// change descriptors.
///
/// The service performs no notification side effects; callers forward a
/// non-empty `changes` list to the notification fanout.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskUpdateOutcome {
    /// The task after the patch.
    pub task: Task,
    /// Observable field changes, empty when the patch was a no-op.
    pub changes: Vec<FieldChange>,
}

/// Task lifecycle orchestration service.
///
/// Owns the status state machine and the audit trail. Every status value
/// is accepted from every other status; moves outside the conventional
/// progression are logged at WARN but applied.
#[derive(Clone)]
pub struct TaskLifecycleService<R, V, A, C>
where
    R: TaskRepository,
    V: RevisionRepository,
    A: AuditLogRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<R>,
    revisions: Arc<V>,
    audit: Arc<A>,
    clock: Arc<C>,
}

impl<R, V, A, C> TaskLifecycleService<R, V, A, C>
where
    R: TaskRepository,
    V: RevisionRepository,
    A: AuditLogRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(tasks: Arc<R>, revisions: Arc<V>, audit: Arc<A>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            revisions,
            audit,
            clock,
        }
    }

    /// Creates a new task in the `todo` status and records a `created`
    /// audit entry.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] when the draft title is
    /// empty, or [`TaskLifecycleError::Repository`] when persistence
    /// fails.
    pub async fn create(
        &self,
        draft: TaskDraft,
        requester_id: UserId,
    ) -> TaskLifecycleResult<Task> {
        let task = Task::new(draft, requester_id, &*self.clock)?;
        self.tasks.store(&task).await?;
        self.append_audit(
            &task,
            Some(requester_id),
            AuditAction::Created,
            Value::Null,
            task.snapshot(),
        )
        .await?;
        tracing::info!(task_id = %task.id(), status = %task.status(), "task created");
        Ok(task)
    }

    /// Retrieves a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task does not
    /// exist.
    pub async fn get(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.tasks
            .find_by_id(task_id)
            .await?
            .ok_or(TaskLifecycleError::NotFound(task_id))
    }

    /// Lists tasks matching the filter.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the listing fails.
    pub async fn list(&self, filter: &TaskFilter) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.tasks.list(filter).await?)
    }

    /// Applies a patch to a task, records the audit entry, and returns
    /// the observable change descriptors.
    ///
    /// When `note` is supplied it is appended as a comment audit entry
    /// alongside the update.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task does not
    /// exist, [`TaskLifecycleError::Domain`] when the patch fails
    /// validation, or a persistence error. A failed update leaves the
    /// task unchanged.
    pub async fn update(
        &self,
        task_id: TaskId,
        patch: &TaskPatch,
        actor_id: Option<UserId>,
        note: Option<&str>,
    ) -> TaskLifecycleResult<TaskUpdateOutcome> {
        let mut task = self.get(task_id).await?;
        let previous = task.snapshot();

        if let Some(target) = patch.status()
            && target != task.status()
            && !task.status().is_conventional_move(target)
        {
            tracing::warn!(
                task_id = %task_id,
                from = %task.status(),
                to = %target,
                "unconventional status move applied"
            );
        }

        let changes = task.apply(patch, &*self.clock)?;
        self.tasks.update(&task).await?;

        if let Some(text) = note {
            self.append_comment(&task, actor_id, text).await?;
        }
        self.append_audit(&task, actor_id, AuditAction::Updated, previous, task.snapshot())
            .await?;

        tracing::debug!(task_id = %task_id, changed = changes.len(), "task updated");
        Ok(TaskUpdateOutcome { task, changes })
    }

    /// Appends a standalone comment to a task's audit trail.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task does not
    /// exist or [`TaskLifecycleError::Domain`] when the text is empty.
    pub async fn add_comment(
        &self,
        task_id: TaskId,
        text: &str,
        actor_id: Option<UserId>,
    ) -> TaskLifecycleResult<AuditEntry> {
        let task = self.get(task_id).await?;
        self.append_comment(&task, actor_id, text).await
    }

    /// Removes a task, cascading to its revisions and audit entries.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task does not
    /// exist.
    pub async fn remove(&self, task_id: TaskId) -> TaskLifecycleResult<()> {
        // Verify existence before touching children.
        let _existing = self.get(task_id).await?;
        self.revisions.remove_for_task(task_id).await?;
        self.audit.remove_for_task(task_id).await?;
        self.tasks.remove(task_id).await?;
        tracing::info!(task_id = %task_id, "task removed with cascade");
        Ok(())
    }

    /// Returns a task's audit entries in append order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::AuditLog`] when the lookup fails.
    pub async fn audit_trail(&self, task_id: TaskId) -> TaskLifecycleResult<Vec<AuditEntry>> {
        Ok(self.audit.find_by_task(task_id).await?)
    }

    async fn append_comment(
        &self,
        task: &Task,
        actor_id: Option<UserId>,
        text: &str,
    ) -> TaskLifecycleResult<AuditEntry> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyComment.into());
        }
        self.append_audit(
            task,
            actor_id,
            AuditAction::Commented,
            Value::Null,
            json!({ "comment": trimmed }),
        )
        .await
    }

    async fn append_audit(
        &self,
        task: &Task,
        actor_id: Option<UserId>,
        action: AuditAction,
        previous: Value,
        new: Value,
    ) -> TaskLifecycleResult<AuditEntry> {
        let entry = AuditEntry::new(task.id(), actor_id, action, previous, new, &*self.clock);
        self.audit.append(&entry).await?;
        Ok(entry)
    }
}
