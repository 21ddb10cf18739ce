//! Task lifecycle management for Steward.
//!
//! This module implements the task state machine, the revision
//! sub-workflow, and the append-only audit log. Status moves apply the
//! timestamp causality rules (`started_at` set once, `completed_at`
//! cleared on any exit from `done`), and every mutation is recorded with
//! previous/new snapshots. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
