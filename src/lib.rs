//! Steward: task-lifecycle orchestration with chat-driven ingestion.
//!
//! This crate provides the core engine for moving work items through a
//! status state machine, recording audit trails and rework requests, and
//! turning free-text channel messages into structured tasks via an
//! external natural-language parser without blocking message delivery.
//!
//! # Architecture
//!
//! Steward follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (storage, parsers, etc.)
//!
//! # Modules
//!
//! - [`task`]: Task lifecycle state machine, revisions, and audit log
//! - [`channel`]: Channels, departments, message ingestion, and notifications
//! - [`worker`]: Bounded worker pool for background ingestion jobs

pub mod channel;
pub mod task;
pub mod worker;
