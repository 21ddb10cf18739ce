//! Channels, departments, and message ingestion for Steward.
//!
//! This module implements the chat-facing side of the engine: channel
//! and department records, immutable channel messages with a write-once
//! task back-link, the trigger grammar that activates task creation, the
//! ingestion pipeline that dispatches parsing to background workers, and
//! the notification fanout. The module follows hexagonal architecture:
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
