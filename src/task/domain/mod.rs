//! Domain model for task lifecycle management.
//!
//! The task domain models work items moving through the status state
//! machine, per-task rework revisions, and immutable audit entries while
//! keeping all infrastructure concerns outside of the domain boundary.

mod audit;
mod change;
mod error;
mod ids;
mod revision;
mod status;
mod task;

pub use audit::{AuditAction, AuditEntry};
pub use change::{ChangeIcon, ChangedField, FieldChange};
pub use error::{ParsePriorityError, ParseTaskStatusError, TaskDomainError};
pub use ids::{AuditEntryId, DepartmentId, RevisionId, TaskId, UserId};
pub use revision::{
    Revision, RevisionFields, RevisionNumber, RevisionReceipt, RevisionSeverity, RevisionType,
};
pub use status::{Priority, TaskStatus};
pub use task::{PersistedTaskData, Task, TaskDraft, TaskPatch};
