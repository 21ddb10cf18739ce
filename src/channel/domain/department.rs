//! Department (work queue) entity.

use super::ChannelDomainError;
use crate::task::domain::DepartmentId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A work queue that tasks are routed to.
///
/// Departments are found-or-created lazily the first time a message in a
/// same-named channel produces a task; they remain independent entities
/// whose names are kept in correspondence with channel names by the
/// resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    id: DepartmentId,
    name: String,
    description: String,
    created_at: DateTime<Utc>,
}

impl Department {
    /// Creates a new department.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelDomainError::EmptyDepartmentName`] when the name
    /// is empty after trimming.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<Self, ChannelDomainError> {
        let normalized = name.into().trim().to_owned();
        if normalized.is_empty() {
            return Err(ChannelDomainError::EmptyDepartmentName);
        }
        Ok(Self {
            id: DepartmentId::new(),
            name: normalized,
            description: description.into(),
            created_at: clock.utc(),
        })
    }

    /// Returns the department identifier.
    #[must_use]
    pub const fn id(&self) -> DepartmentId {
        self.id
    }

    /// Returns the department name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the department description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
