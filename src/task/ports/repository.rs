//! Repository ports for task, revision, and audit-log persistence.

use crate::task::domain::{
    AuditEntry, DepartmentId, Revision, RevisionId, RevisionNumber, Task, TaskId, TaskStatus,
    UserId,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Result type for revision repository operations.
pub type RevisionRepositoryResult<T> = Result<T, RevisionRepositoryError>;

/// Result type for audit-log repository operations.
pub type AuditLogResult<T> = Result<T, AuditLogRepositoryError>;

/// Listing filter for tasks.
///
/// Unset fields match everything; set fields are combined conjunctively.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    status: Option<TaskStatus>,
    department_id: Option<DepartmentId>,
    owner_id: Option<UserId>,
    requester_id: Option<UserId>,
}

impl TaskFilter {
    /// Creates a filter matching every task.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to a lifecycle status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts to a department.
    #[must_use]
    pub const fn with_department(mut self, department_id: DepartmentId) -> Self {
        self.department_id = Some(department_id);
        self
    }

    /// Restricts to an owner.
    #[must_use]
    pub const fn with_owner(mut self, owner_id: UserId) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    /// Restricts to a requester.
    #[must_use]
    pub const fn with_requester(mut self, requester_id: UserId) -> Self {
        self.requester_id = Some(requester_id);
        self
    }

    /// Returns whether the task satisfies every set restriction.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.status.is_none_or(|status| task.status() == status)
            && self
                .department_id
                .is_none_or(|department_id| task.department_id() == department_id)
            && self.owner_id.is_none_or(|owner_id| task.owner_id() == Some(owner_id))
            && self
                .requester_id
                .is_none_or(|requester_id| task.requester_id() == requester_id)
    }
}

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID
    /// already exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists changes to an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn update(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier. Returns `None` when absent.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Lists tasks matching the filter, ordered by creation time.
    async fn list(&self, filter: &TaskFilter) -> TaskRepositoryResult<Vec<Task>>;

    /// Removes a task row.
    ///
    /// Cascading removal of revisions and audit entries is orchestrated
    /// by the lifecycle service, not the repository.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn remove(&self, id: TaskId) -> TaskRepositoryResult<()>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// Revision persistence contract.
///
/// Revision numbers are allocated from a durable per-task counter so the
/// sequence survives deletions and stays gap-free under concurrent
/// requests on the same task.
#[async_trait]
pub trait RevisionRepository: Send + Sync {
    /// Allocates the next revision number for a task.
    ///
    /// The counter is bumped durably; the returned number is never handed
    /// out again for the same task.
    async fn next_number(&self, task_id: TaskId) -> RevisionRepositoryResult<RevisionNumber>;

    /// Stores a new revision.
    ///
    /// # Errors
    ///
    /// Returns [`RevisionRepositoryError::DuplicateRevision`] when the
    /// revision ID already exists.
    async fn store(&self, revision: &Revision) -> RevisionRepositoryResult<()>;

    /// Finds a revision by identifier. Returns `None` when absent.
    async fn find_by_id(&self, id: RevisionId) -> RevisionRepositoryResult<Option<Revision>>;

    /// Returns a task's revisions ordered by revision number.
    async fn find_by_task(&self, task_id: TaskId) -> RevisionRepositoryResult<Vec<Revision>>;

    /// Removes a single revision row.
    ///
    /// The per-task counter is unaffected, so later allocations continue
    /// from the highest number ever issued.
    ///
    /// # Errors
    ///
    /// Returns [`RevisionRepositoryError::NotFound`] when the revision
    /// does not exist.
    async fn remove(&self, id: RevisionId) -> RevisionRepositoryResult<()>;

    /// Removes all revisions and the counter for a task (cascade).
    async fn remove_for_task(&self, task_id: TaskId) -> RevisionRepositoryResult<()>;
}

/// Errors returned by revision repository implementations.
#[derive(Debug, Clone, Error)]
pub enum RevisionRepositoryError {
    /// A revision with the same identifier already exists.
    #[error("duplicate revision identifier: {0}")]
    DuplicateRevision(RevisionId),

    /// The revision was not found.
    #[error("revision not found: {0}")]
    NotFound(RevisionId),

    /// The per-task counter produced an invalid number.
    #[error("revision counter overflow for task {0}")]
    CounterOverflow(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl RevisionRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// Append-only audit-log contract.
#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    /// Appends an audit entry.
    async fn append(&self, entry: &AuditEntry) -> AuditLogResult<()>;

    /// Returns a task's audit entries in append order.
    async fn find_by_task(&self, task_id: TaskId) -> AuditLogResult<Vec<AuditEntry>>;

    /// Removes all audit entries for a task (cascade).
    async fn remove_for_task(&self, task_id: TaskId) -> AuditLogResult<()>;
}

/// Errors returned by audit-log repository implementations.
#[derive(Debug, Clone, Error)]
pub enum AuditLogRepositoryError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl AuditLogRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
