//! Port for the external natural-language command parser.

use crate::task::domain::Priority;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for parser operations.
pub type ParserResult<T> = Result<T, ParserError>;

/// Token/resource cost reported by the parser for one call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserUsage {
    /// Tokens consumed by the call.
    pub tokens: u64,
}

/// Structured job proposal returned by the parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobProposal {
    /// Proposed task title.
    pub title: String,
    /// Proposed task description.
    pub description: String,
    /// Parser-inferred priority; a manual bracket tag in the original
    /// message always wins over this value.
    pub priority: Priority,
    /// Parser confidence in the proposal, in `[0, 1]`.
    pub confidence: f64,
    /// Cost of the call, accumulated against the acting user.
    pub usage: ParserUsage,
}

/// Errors surfaced by command parser implementations.
///
/// Background ingestion converts every variant into a system error
/// message in the originating channel; parser failures never reach the
/// caller who posted the message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParserError {
    /// The parser service could not be reached or returned a failure.
    #[error("command parser unavailable: {0}")]
    Unavailable(String),

    /// The parser returned output that could not be interpreted.
    #[error("command parser returned malformed output: {0}")]
    Malformed(String),

    /// The bounded timeout elapsed before the parser answered.
    #[error("command parser timed out")]
    TimedOut,
}

/// External natural-language command parser.
///
/// Given free text, returns a structured job proposal plus a usage cost.
/// Calls may fail or time out; callers bound every invocation with a
/// timeout.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandParser: Send + Sync {
    /// Proposes a structured job for the given command text.
    async fn propose(&self, text: &str) -> ParserResult<JobProposal>;
}
