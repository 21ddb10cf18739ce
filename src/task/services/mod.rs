//! Orchestration services for the task subsystem.

mod lifecycle;
mod revision;

pub use lifecycle::{TaskLifecycleError, TaskLifecycleResult, TaskLifecycleService, TaskUpdateOutcome};
pub use revision::{
    RevisionOutcome, RevisionRequest, RevisionTracker, RevisionTrackerError, RevisionTrackerResult,
};
