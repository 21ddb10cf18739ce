//! In-memory department repository with a unique name constraint.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::channel::{
    domain::Department,
    ports::{DepartmentRepository, DepartmentRepositoryError, DepartmentRepositoryResult},
};
use crate::task::domain::DepartmentId;

/// Thread-safe in-memory department repository.
///
/// The name index enforces the unique constraint the resolver's
/// insert-then-fallback semantics rely on: the second concurrent insert
/// for a name fails and the caller re-reads the winner's row.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDepartmentRepository {
    state: Arc<RwLock<InMemoryDepartmentState>>,
}

#[derive(Debug, Default)]
struct InMemoryDepartmentState {
    departments: HashMap<DepartmentId, Department>,
    name_index: HashMap<String, DepartmentId>,
}

impl InMemoryDepartmentRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> DepartmentRepositoryError {
    DepartmentRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl DepartmentRepository for InMemoryDepartmentRepository {
    async fn insert(&self, department: &Department) -> DepartmentRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.name_index.contains_key(department.name()) {
            return Err(DepartmentRepositoryError::DuplicateName(
                department.name().to_owned(),
            ));
        }
        state
            .name_index
            .insert(department.name().to_owned(), department.id());
        state.departments.insert(department.id(), department.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: DepartmentId,
    ) -> DepartmentRepositoryResult<Option<Department>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.departments.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> DepartmentRepositoryResult<Option<Department>> {
        let state = self.state.read().map_err(lock_error)?;
        let department = state
            .name_index
            .get(name)
            .and_then(|id| state.departments.get(id))
            .cloned();
        Ok(department)
    }
}
