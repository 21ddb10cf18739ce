//! Task aggregate root and its creation/patch parameter objects.

use super::{DepartmentId, FieldChange, Priority, TaskDomainError, TaskId, TaskStatus, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;

/// Task aggregate root.
///
/// # Invariants
///
/// - `started_at` is set exactly once, on the first transition into
///   `in_progress`, and never changes afterwards.
/// - `completed_at` is set on entry to `done` and cleared on any exit
///   from `done`, so a later `done` entry sets it again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: String,
    description: String,
    department_id: DepartmentId,
    requester_id: UserId,
    owner_id: Option<UserId>,
    priority: Priority,
    status: TaskStatus,
    due_date: Option<DateTime<Utc>>,
    image_url: Option<String>,
    metadata: BTreeMap<String, serde_json::Value>,
    created_at: DateTime<Utc>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    updated_at: DateTime<Utc>,
}

/// Creation fields for a new task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDraft {
    title: String,
    description: String,
    department_id: DepartmentId,
    priority: Priority,
    owner_id: Option<UserId>,
    due_date: Option<DateTime<Utc>>,
    image_url: Option<String>,
    metadata: BTreeMap<String, serde_json::Value>,
}

impl TaskDraft {
    /// Creates a draft with the required fields.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        department_id: DepartmentId,
        priority: Priority,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            department_id,
            priority,
            owner_id: None,
            due_date: None,
            image_url: None,
            metadata: BTreeMap::new(),
        }
    }

    /// Sets the initial owner.
    #[must_use]
    pub const fn with_owner(mut self, owner_id: UserId) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets an opaque image URL inherited from the originating message.
    #[must_use]
    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    /// Adds a free-form metadata entry.
    #[must_use]
    pub fn with_metadata_entry(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// Field-level patch applied by task updates.
///
/// Unset fields are left untouched. Status, title, and description
/// changes are reported as [`FieldChange`] descriptors; other fields are
/// captured by audit snapshots only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    status: Option<TaskStatus>,
    title: Option<String>,
    description: Option<String>,
    priority: Option<Priority>,
    owner_id: Option<UserId>,
    due_date: Option<DateTime<Utc>>,
    image_url: Option<String>,
}

impl TaskPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the target status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets a new title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets a new description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets a new priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Assigns an owner.
    #[must_use]
    pub const fn with_owner(mut self, owner_id: UserId) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the image URL.
    #[must_use]
    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    /// Returns the target status, if the patch carries one.
    #[must_use]
    pub const fn status(&self) -> Option<TaskStatus> {
        self.status
    }
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: String,
    /// Persisted description.
    pub description: String,
    /// Persisted department reference.
    pub department_id: DepartmentId,
    /// Persisted requester reference.
    pub requester_id: UserId,
    /// Persisted owner reference, if any.
    pub owner_id: Option<UserId>,
    /// Persisted priority.
    pub priority: Priority,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted due date, if any.
    pub due_date: Option<DateTime<Utc>>,
    /// Persisted image URL, if any.
    pub image_url: Option<String>,
    /// Persisted free-form metadata.
    pub metadata: BTreeMap<String, serde_json::Value>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted first-start timestamp, if any.
    pub started_at: Option<DateTime<Utc>>,
    /// Persisted completion timestamp, if any.
    pub completed_at: Option<DateTime<Utc>>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new task in the `todo` status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the draft title is
    /// empty after trimming.
    pub fn new(
        draft: TaskDraft,
        requester_id: UserId,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let title = draft.title.trim().to_owned();
        if title.is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }
        let timestamp = clock.utc();

        Ok(Self {
            id: TaskId::new(),
            title,
            description: draft.description,
            department_id: draft.department_id,
            requester_id,
            owner_id: draft.owner_id,
            priority: draft.priority,
            status: TaskStatus::Todo,
            due_date: draft.due_date,
            image_url: draft.image_url,
            metadata: draft.metadata,
            created_at: timestamp,
            started_at: None,
            completed_at: None,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            department_id: data.department_id,
            requester_id: data.requester_id,
            owner_id: data.owner_id,
            priority: data.priority,
            status: data.status,
            due_date: data.due_date,
            image_url: data.image_url,
            metadata: data.metadata,
            created_at: data.created_at,
            started_at: data.started_at,
            completed_at: data.completed_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the department reference.
    #[must_use]
    pub const fn department_id(&self) -> DepartmentId {
        self.department_id
    }

    /// Returns the requester reference.
    #[must_use]
    pub const fn requester_id(&self) -> UserId {
        self.requester_id
    }

    /// Returns the owner reference, if assigned.
    #[must_use]
    pub const fn owner_id(&self) -> Option<UserId> {
        self.owner_id
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the due date, if set.
    #[must_use]
    pub const fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    /// Returns the image URL, if set.
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    /// Returns the free-form metadata map.
    #[must_use]
    pub const fn metadata(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.metadata
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the first-start timestamp, if work has ever started.
    #[must_use]
    pub const fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Returns the completion timestamp of the current done episode.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Applies a field-level patch and returns the observable changes.
    ///
    /// Status moves apply the timestamp rules: the first entry into
    /// `in_progress` sets `started_at`; entering `done` sets
    /// `completed_at`; leaving `done` for any other status clears it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the patch carries a
    /// title that is empty after trimming. The task is left unchanged.
    pub fn apply(
        &mut self,
        patch: &TaskPatch,
        clock: &impl Clock,
    ) -> Result<Vec<FieldChange>, TaskDomainError> {
        if let Some(title) = &patch.title
            && title.trim().is_empty()
        {
            return Err(TaskDomainError::EmptyTitle);
        }

        let timestamp = clock.utc();
        let mut changes = Vec::new();
        let mut touched = false;

        if let Some(target) = patch.status
            && target != self.status
        {
            let previous_status = self.status;
            self.move_status(target, timestamp);
            changes.push(FieldChange::status(previous_status, target));
            touched = true;
        }
        if let Some(title) = &patch.title {
            let trimmed = title.trim();
            if trimmed != self.title {
                changes.push(FieldChange::title(self.title.clone(), trimmed));
                self.title = trimmed.to_owned();
                touched = true;
            }
        }
        if let Some(description) = &patch.description
            && *description != self.description
        {
            changes.push(FieldChange::description(
                self.description.clone(),
                description.clone(),
            ));
            self.description = description.clone();
            touched = true;
        }
        if let Some(priority) = patch.priority
            && priority != self.priority
        {
            self.priority = priority;
            touched = true;
        }
        if let Some(owner_id) = patch.owner_id
            && Some(owner_id) != self.owner_id
        {
            self.owner_id = Some(owner_id);
            touched = true;
        }
        if let Some(due_date) = patch.due_date
            && Some(due_date) != self.due_date
        {
            self.due_date = Some(due_date);
            touched = true;
        }
        if let Some(image_url) = &patch.image_url
            && Some(image_url.as_str()) != self.image_url.as_deref()
        {
            self.image_url = Some(image_url.clone());
            touched = true;
        }

        if touched {
            self.updated_at = timestamp;
        }
        Ok(changes)
    }

    /// Serializes the observable field snapshot used by audit entries.
    #[must_use]
    pub fn snapshot(&self) -> serde_json::Value {
        json!({
            "status": self.status.as_str(),
            "title": self.title,
            "description": self.description,
            "priority": self.priority.as_str(),
            "owner_id": self.owner_id,
            "due_date": self.due_date,
        })
    }

    /// Moves the status and applies the timestamp causality rules.
    fn move_status(&mut self, target: TaskStatus, timestamp: DateTime<Utc>) {
        if self.status == TaskStatus::Done && target != TaskStatus::Done {
            self.completed_at = None;
        }
        match target {
            TaskStatus::InProgress if self.started_at.is_none() => {
                self.started_at = Some(timestamp);
            }
            TaskStatus::Done if self.completed_at.is_none() => {
                self.completed_at = Some(timestamp);
            }
            _ => {}
        }
        self.status = target;
    }
}
