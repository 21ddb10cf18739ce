//! Revision (rework request) types for the revision sub-workflow.

use super::{RevisionId, TaskDomainError, TaskId, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a rework request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevisionType {
    /// Visual or layout rework.
    Visual,
    /// Behavioural or logic rework.
    Logic,
    /// Copy or content rework.
    Content,
    /// Defect fix.
    Bug,
    /// Anything else.
    Other,
}

/// Severity of a rework request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevisionSeverity {
    /// Cosmetic.
    Low,
    /// Noticeable but not blocking.
    Medium,
    /// Blocking for some users.
    High,
    /// Blocking for everyone.
    Critical,
}

/// Strictly increasing per-task revision number, starting at 1.
///
/// Numbers are allocated from a durable per-task counter and are never
/// reused, even when an earlier revision is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RevisionNumber(u32);

impl RevisionNumber {
    /// Creates a validated revision number.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidRevisionNumber`] when the value
    /// is zero.
    pub const fn new(value: u32) -> Result<Self, TaskDomainError> {
        if value == 0 {
            return Err(TaskDomainError::InvalidRevisionNumber);
        }
        Ok(Self(value))
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for RevisionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A recorded rework request against a task.
///
/// Revisions are immutable once created and exclusively owned by their
/// task; they are created only through the revision tracker service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Revision {
    id: RevisionId,
    task_id: TaskId,
    number: RevisionNumber,
    kind: RevisionType,
    severity: RevisionSeverity,
    description: String,
    attachment_url: Option<String>,
    requester_id: UserId,
    created_at: DateTime<Utc>,
}

/// Construction fields for a revision record.
#[derive(Debug, Clone, PartialEq)]
pub struct RevisionFields {
    /// Owning task.
    pub task_id: TaskId,
    /// Allocated per-task number.
    pub number: RevisionNumber,
    /// Rework category.
    pub kind: RevisionType,
    /// Rework severity.
    pub severity: RevisionSeverity,
    /// Required, non-empty description.
    pub description: String,
    /// Optional attachment URL.
    pub attachment_url: Option<String>,
    /// Requesting user.
    pub requester_id: UserId,
}

impl Revision {
    /// Creates a new revision record.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyRevisionDescription`] when the
    /// description is empty after trimming.
    pub fn new(fields: RevisionFields, clock: &impl Clock) -> Result<Self, TaskDomainError> {
        let description = fields.description.trim().to_owned();
        if description.is_empty() {
            return Err(TaskDomainError::EmptyRevisionDescription);
        }

        Ok(Self {
            id: RevisionId::new(),
            task_id: fields.task_id,
            number: fields.number,
            kind: fields.kind,
            severity: fields.severity,
            description,
            attachment_url: fields.attachment_url,
            requester_id: fields.requester_id,
            created_at: clock.utc(),
        })
    }

    /// Returns the revision identifier.
    #[must_use]
    pub const fn id(&self) -> RevisionId {
        self.id
    }

    /// Returns the owning task identifier.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the per-task revision number.
    #[must_use]
    pub const fn number(&self) -> RevisionNumber {
        self.number
    }

    /// Returns the rework category.
    #[must_use]
    pub const fn kind(&self) -> RevisionType {
        self.kind
    }

    /// Returns the rework severity.
    #[must_use]
    pub const fn severity(&self) -> RevisionSeverity {
        self.severity
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the attachment URL, if any.
    #[must_use]
    pub fn attachment_url(&self) -> Option<&str> {
        self.attachment_url.as_deref()
    }

    /// Returns the requesting user.
    #[must_use]
    pub const fn requester_id(&self) -> UserId {
        self.requester_id
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Read-only display projection of a revision plus its task's title.
///
/// Receipts are derived on demand and never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevisionReceipt {
    /// The underlying revision record.
    pub revision: Revision,
    /// Title of the owning task at projection time.
    pub task_title: String,
}
