//! Port trait definitions for the task subsystem.
//!
//! Ports define the abstract interfaces that the domain requires from
//! infrastructure. Adapters implement these ports to connect the domain
//! to storage backends.

pub mod repository;

pub use repository::{
    AuditLogRepository, AuditLogRepositoryError, AuditLogResult, RevisionRepository,
    RevisionRepositoryError, RevisionRepositoryResult, TaskFilter, TaskRepository,
    TaskRepositoryError, TaskRepositoryResult,
};
