//! Trigger grammar for chat-driven task creation.
//!
//! The grammar is deliberately small and explicit: a prefix table for
//! task creation, one literal help trigger, and a single bracket-tag
//! pattern for manual priority overrides. It is a parsing contract, not
//! inline detection logic, so every rule here is directly testable.

use crate::task::domain::Priority;
use serde::{Deserialize, Serialize};

/// Ordered priority tags recognized anywhere in message text.
const PRIORITY_TAGS: [(&str, Priority); 3] = [
    ("[P1]", Priority::P1),
    ("[P2]", Priority::P2),
    ("[P3]", Priority::P3),
];

/// Trigger syntax configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerConfig {
    /// Literal prefixes that activate task creation.
    pub task_prefixes: Vec<String>,
    /// Literal content that short-circuits into a help reply.
    pub help_trigger: String,
    /// Minimum command length (in characters) after the prefix; shorter
    /// remainders silently no-op.
    pub min_command_length: usize,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            task_prefixes: vec!["!task".to_owned(), "/job".to_owned(), "@bot".to_owned()],
            help_trigger: "!help".to_owned(),
            min_command_length: 5,
        }
    }
}

/// A recognized trigger in message content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// The literal help trigger.
    Help,
    /// A task-creation prefix with the trimmed command remainder.
    CreateTask {
        /// Text after the prefix, trimmed; may still be below the
        /// configured minimum length.
        remainder: String,
    },
}

impl TriggerConfig {
    /// Tests message content against the trigger grammar.
    ///
    /// The help trigger matches the whole trimmed content literally and
    /// takes precedence; task prefixes match at the start of the trimmed
    /// content only.
    #[must_use]
    pub fn match_content(&self, content: &str) -> Option<Trigger> {
        let trimmed = content.trim();
        if trimmed == self.help_trigger {
            return Some(Trigger::Help);
        }
        for prefix in &self.task_prefixes {
            if let Some(rest) = trimmed.strip_prefix(prefix.as_str()) {
                return Some(Trigger::CreateTask {
                    remainder: rest.trim().to_owned(),
                });
            }
        }
        None
    }

    /// Returns whether a command remainder meets the minimum length.
    #[must_use]
    pub fn meets_minimum(&self, remainder: &str) -> bool {
        remainder.chars().count() >= self.min_command_length
    }
}

/// Extracts a manual priority override tag from message text.
///
/// Recognizes the first of `[P1]`, `[P2]`, `[P3]` (uppercase, exact)
/// anywhere in the text. Returns the override, if any, and the text with
/// the tag removed and whitespace re-normalized. A manual tag always
/// wins over the parser's own priority.
#[must_use]
pub fn extract_priority_override(text: &str) -> (Option<Priority>, String) {
    for (tag, priority) in PRIORITY_TAGS {
        if text.contains(tag) {
            let stripped = text.replacen(tag, " ", 1);
            let normalized = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
            return (Some(priority), normalized);
        }
    }
    (None, text.trim().to_owned())
}
