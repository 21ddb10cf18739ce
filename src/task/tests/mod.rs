//! Unit tests for the task subsystem.
//!
//! Tests are organised by layer: domain invariants, lifecycle
//! orchestration, and the revision sub-workflow.

mod domain_tests;
