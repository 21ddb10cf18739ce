//! Adapter implementations for the task subsystem.

pub mod memory;
