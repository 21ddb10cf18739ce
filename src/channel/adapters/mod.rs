//! Adapter implementations for the channel subsystem.

pub mod memory;
