//! Find-or-create mapping from channel names to departments.

use crate::channel::{
    domain::{ChannelDomainError, Department},
    ports::{DepartmentRepository, DepartmentRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for department resolution.
#[derive(Debug, Error)]
pub enum ResolverError {
    /// Domain validation failed (empty name).
    #[error(transparent)]
    Domain(#[from] ChannelDomainError),

    /// The losing side of an insert race could not re-read the winner.
    #[error("department '{0}' vanished after a name conflict")]
    ConflictReadback(String),

    /// Persistence-layer failure.
    #[error(transparent)]
    Repository(#[from] DepartmentRepositoryError),
}

/// Result type for resolver operations.
pub type ResolverResult<T> = Result<T, ResolverError>;

/// Lazily maps channel/group names to department work queues.
#[derive(Clone)]
pub struct DepartmentResolver<D, C>
where
    D: DepartmentRepository,
    C: Clock + Send + Sync,
{
    departments: Arc<D>,
    clock: Arc<C>,
}

impl<D, C> DepartmentResolver<D, C>
where
    D: DepartmentRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new resolver.
    #[must_use]
    pub const fn new(departments: Arc<D>, clock: Arc<C>) -> Self {
        Self { departments, clock }
    }

    /// Finds a department by exact name, creating it with a default
    /// description when absent.
    ///
    /// Safe under concurrent calls for the same name: insertion relies
    /// on the repository's unique name constraint, and a conflicting
    /// insert falls back to re-reading the winner's row rather than
    /// creating a duplicate.
    ///
    /// # Errors
    ///
    /// Returns [`ResolverError::Domain`] for an empty name or a
    /// persistence error.
    pub async fn find_or_create_by_name(&self, name: &str) -> ResolverResult<Department> {
        if let Some(existing) = self.departments.find_by_name(name).await? {
            return Ok(existing);
        }

        let department = Department::new(
            name,
            format!("Work queue for {name}"),
            &*self.clock,
        )?;
        match self.departments.insert(&department).await {
            Ok(()) => {
                tracing::info!(department = %name, "department created");
                Ok(department)
            }
            Err(DepartmentRepositoryError::DuplicateName(_)) => self
                .departments
                .find_by_name(name)
                .await?
                .ok_or_else(|| ResolverError::ConflictReadback(name.to_owned())),
            Err(other) => Err(other.into()),
        }
    }
}
