//! Append-only audit entries recording task mutations.

use super::{AuditEntryId, TaskId, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Action tag carried by an audit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Task was created.
    Created,
    /// Task fields were updated.
    Updated,
    /// A comment was appended.
    Commented,
}

impl AuditAction {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Commented => "commented",
        }
    }
}

/// An immutable record of one task mutation's before/after state.
///
/// Entries are append-only; they are never mutated and are deleted only
/// when their task is removed (cascade).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    id: AuditEntryId,
    task_id: TaskId,
    actor_id: Option<UserId>,
    action: AuditAction,
    previous: serde_json::Value,
    new: serde_json::Value,
    created_at: DateTime<Utc>,
}

impl AuditEntry {
    /// Creates a new audit entry.
    ///
    /// An `actor_id` of `None` marks the mutation as system-initiated.
    #[must_use]
    pub fn new(
        task_id: TaskId,
        actor_id: Option<UserId>,
        action: AuditAction,
        previous: serde_json::Value,
        new: serde_json::Value,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: AuditEntryId::new(),
            task_id,
            actor_id,
            action,
            previous,
            new,
            created_at: clock.utc(),
        }
    }

    /// Returns the entry identifier.
    #[must_use]
    pub const fn id(&self) -> AuditEntryId {
        self.id
    }

    /// Returns the audited task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the acting user, or `None` for system-initiated mutations.
    #[must_use]
    pub const fn actor_id(&self) -> Option<UserId> {
        self.actor_id
    }

    /// Returns the action tag.
    #[must_use]
    pub const fn action(&self) -> AuditAction {
        self.action
    }

    /// Returns the JSON-serialized previous value snapshot.
    #[must_use]
    pub const fn previous(&self) -> &serde_json::Value {
        &self.previous
    }

    /// Returns the JSON-serialized new value snapshot.
    #[must_use]
    pub const fn new_value(&self) -> &serde_json::Value {
        &self.new
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
