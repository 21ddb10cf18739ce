//! Task status vocabulary and priority levels.

use super::{ParsePriorityError, ParseTaskStatusError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status.
///
/// `Done`, `RevisionDone`, and `Rejected` are stable rest states but not
/// terminal: any status may be set from any other status by an authorized
/// actor. Moves outside the conventional progression are logged but never
/// rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task has been created but work has not started.
    Todo,
    /// Task is being worked on.
    InProgress,
    /// Task is blocked on something external.
    Blocked,
    /// Task has been completed.
    Done,
    /// A rework request has been raised and awaits pickup.
    RevisionPending,
    /// Rework is being carried out.
    RevisionInProgress,
    /// Rework has been completed.
    RevisionDone,
    /// Task has been rejected.
    Rejected,
}

impl TaskStatus {
    /// Returns the canonical wire/storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Blocked => "blocked",
            Self::Done => "done",
            Self::RevisionPending => "revision_pending",
            Self::RevisionInProgress => "revision_in_progress",
            Self::RevisionDone => "revision_done",
            Self::Rejected => "rejected",
        }
    }

    /// Returns whether a move from `self` to `target` follows the
    /// conventional progression.
    ///
    /// Unconventional moves (e.g. `revision_done` directly to `blocked`)
    /// are still applied; callers log them for later inspection.
    #[must_use]
    pub const fn is_conventional_move(self, target: Self) -> bool {
        match self {
            Self::Todo => matches!(target, Self::InProgress | Self::Blocked | Self::Rejected),
            Self::InProgress => matches!(target, Self::Blocked | Self::Done | Self::Rejected),
            Self::Blocked => matches!(target, Self::Todo | Self::InProgress | Self::Rejected),
            Self::Done => matches!(
                target,
                Self::Todo | Self::InProgress | Self::RevisionPending
            ),
            Self::RevisionPending => {
                matches!(target, Self::RevisionInProgress | Self::Rejected)
            }
            Self::RevisionInProgress => {
                matches!(target, Self::RevisionDone | Self::Rejected)
            }
            Self::RevisionDone => matches!(target, Self::Done | Self::RevisionPending),
            Self::Rejected => matches!(target, Self::Todo),
        }
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "todo" => Ok(Self::Todo),
            "in_progress" => Ok(Self::InProgress),
            "blocked" => Ok(Self::Blocked),
            "done" => Ok(Self::Done),
            "revision_pending" => Ok(Self::RevisionPending),
            "revision_in_progress" => Ok(Self::RevisionInProgress),
            "revision_done" => Ok(Self::RevisionDone),
            "rejected" => Ok(Self::Rejected),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task priority level, `P1` being the most urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    /// Most urgent.
    P1,
    /// Standard urgency.
    P2,
    /// Least urgent.
    P3,
}

impl Priority {
    /// Returns the canonical wire/storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::P1 => "P1",
            Self::P2 => "P2",
            Self::P3 => "P3",
        }
    }
}

impl TryFrom<&str> for Priority {
    type Error = ParsePriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "P1" => Ok(Self::P1),
            "P2" => Ok(Self::P2),
            "P3" => Ok(Self::P3),
            _ => Err(ParsePriorityError(value.to_owned())),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
