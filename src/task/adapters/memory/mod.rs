//! In-memory adapter implementations.
//!
//! These adapters provide simple, thread-safe implementations suitable
//! for unit testing and single-process deployments without database
//! dependencies.

mod audit;
mod revision;
mod task;

pub use audit::InMemoryAuditLog;
pub use revision::InMemoryRevisionRepository;
pub use task::InMemoryTaskRepository;
