//! Unit tests for the channel subsystem.
//!
//! Tests are organised by concern: domain entities, the trigger grammar,
//! department resolution, notification fanout, and the ingestion
//! pipeline.

mod domain_tests;
