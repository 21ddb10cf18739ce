//! Revision tracker: rework-request creation and per-task numbering.

use crate::task::{
    domain::{
        FieldChange, Revision, RevisionFields, RevisionId, RevisionReceipt, RevisionSeverity,
        RevisionType, Task, TaskDomainError, TaskId, TaskPatch, TaskStatus, UserId,
    },
    ports::{AuditLogRepository, RevisionRepository, RevisionRepositoryError, TaskRepository},
    services::{TaskLifecycleError, TaskLifecycleService},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Payload for a rework request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionRequest {
    kind: RevisionType,
    severity: RevisionSeverity,
    description: String,
    attachment_url: Option<String>,
}

impl RevisionRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(
        kind: RevisionType,
        severity: RevisionSeverity,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            severity,
            description: description.into(),
            attachment_url: None,
        }
    }

    /// Attaches a supporting URL.
    #[must_use]
    pub fn with_attachment_url(mut self, url: impl Into<String>) -> Self {
        self.attachment_url = Some(url.into());
        self
    }
}

/// Service-level errors for the revision tracker.
#[derive(Debug, Error)]
pub enum RevisionTrackerError {
    /// The target task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The revision does not exist.
    #[error("revision not found: {0}")]
    RevisionNotFound(RevisionId),

    /// Domain validation failed (empty description).
    #[error(transparent)]
    Validation(#[from] TaskDomainError),

    /// Revision persistence failed.
    #[error(transparent)]
    Repository(#[from] RevisionRepositoryError),

    /// The status move or its audit entry failed.
    #[error(transparent)]
    Lifecycle(TaskLifecycleError),
}

impl From<TaskLifecycleError> for RevisionTrackerError {
    fn from(err: TaskLifecycleError) -> Self {
        match err {
            TaskLifecycleError::NotFound(task_id) => Self::TaskNotFound(task_id),
            other => Self::Lifecycle(other),
        }
    }
}

/// Result type for revision tracker operations.
pub type RevisionTrackerResult<T> = Result<T, RevisionTrackerError>;

/// Result of a rework request: the stored revision, the task after its
/// move to `revision_pending`, and the change descriptors for fanout.
#[derive(Debug, Clone, PartialEq)]
pub struct RevisionOutcome {
    /// The newly stored revision.
    pub revision: Revision,
    /// The task after the status move.
    pub task: Task,
    /// Observable changes from the status move.
    pub changes: Vec<FieldChange>,
}

/// Rework-request sub-workflow service.
///
/// Owns the creation of revision records and their per-task numbering;
/// progression through the `revision_*` statuses is driven by ordinary
/// lifecycle updates.
#[derive(Clone)]
pub struct RevisionTracker<R, V, A, C>
where
    R: TaskRepository,
    V: RevisionRepository,
    A: AuditLogRepository,
    C: Clock + Send + Sync,
{
    lifecycle: Arc<TaskLifecycleService<R, V, A, C>>,
    revisions: Arc<V>,
    clock: Arc<C>,
}

impl<R, V, A, C> RevisionTracker<R, V, A, C>
where
    R: TaskRepository,
    V: RevisionRepository,
    A: AuditLogRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new revision tracker.
    #[must_use]
    pub const fn new(
        lifecycle: Arc<TaskLifecycleService<R, V, A, C>>,
        revisions: Arc<V>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            lifecycle,
            revisions,
            clock,
        }
    }

    /// Records a rework request and moves the task to `revision_pending`.
    ///
    /// Validation happens before any write: an empty description or a
    /// missing task leaves the revision counter untouched and writes no
    /// rows.
    ///
    /// # Errors
    ///
    /// Returns [`RevisionTrackerError::Validation`] for an empty
    /// description, [`RevisionTrackerError::TaskNotFound`] for a missing
    /// task, or a persistence error.
    pub async fn request_revision(
        &self,
        task_id: TaskId,
        request: RevisionRequest,
        requester_id: UserId,
    ) -> RevisionTrackerResult<RevisionOutcome> {
        if request.description.trim().is_empty() {
            return Err(TaskDomainError::EmptyRevisionDescription.into());
        }
        let _target = self.lifecycle.get(task_id).await?;

        let number = self.revisions.next_number(task_id).await?;
        let revision = Revision::new(
            RevisionFields {
                task_id,
                number,
                kind: request.kind,
                severity: request.severity,
                description: request.description,
                attachment_url: request.attachment_url,
                requester_id,
            },
            &*self.clock,
        )?;
        self.revisions.store(&revision).await?;
        tracing::info!(
            task_id = %task_id,
            revision = %revision.number(),
            severity = ?revision.severity(),
            "revision requested"
        );

        let patch = TaskPatch::new().with_status(TaskStatus::RevisionPending);
        let outcome = self
            .lifecycle
            .update(task_id, &patch, Some(requester_id), None)
            .await?;

        Ok(RevisionOutcome {
            revision,
            task: outcome.task,
            changes: outcome.changes,
        })
    }

    /// Builds the display receipt for a revision.
    ///
    /// # Errors
    ///
    /// Returns [`RevisionTrackerError::RevisionNotFound`] when the
    /// revision does not exist, or [`RevisionTrackerError::TaskNotFound`]
    /// when its task has since been removed.
    pub async fn receipt(&self, revision_id: RevisionId) -> RevisionTrackerResult<RevisionReceipt> {
        let revision = self
            .revisions
            .find_by_id(revision_id)
            .await?
            .ok_or(RevisionTrackerError::RevisionNotFound(revision_id))?;
        let task = self.lifecycle.get(revision.task_id()).await?;
        Ok(RevisionReceipt {
            revision,
            task_title: task.title().to_owned(),
        })
    }

    /// Returns a task's revisions ordered by revision number.
    ///
    /// # Errors
    ///
    /// Returns [`RevisionTrackerError::Repository`] when the lookup
    /// fails.
    pub async fn list_for_task(&self, task_id: TaskId) -> RevisionTrackerResult<Vec<Revision>> {
        Ok(self.revisions.find_by_task(task_id).await?)
    }
}
