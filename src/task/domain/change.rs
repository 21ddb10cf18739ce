//! Change descriptors emitted by task updates.
//!
//! The state machine itself performs no notification side effects; it
//! returns a list of [`FieldChange`] values and leaves routing to the
//! caller.

use super::TaskStatus;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Observable task fields tracked in change descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangedField {
    /// Lifecycle status.
    Status,
    /// Task title.
    Title,
    /// Task description.
    Description,
}

impl ChangedField {
    /// Returns the canonical field name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Title => "title",
            Self::Description => "description",
        }
    }
}

impl fmt::Display for ChangedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Icon keyed by the kind of transition, used when composing
/// notification bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeIcon {
    /// Status moved into `done`.
    Success,
    /// Status moved into `in_progress`.
    Start,
    /// Any other observable edit.
    Edit,
}

impl ChangeIcon {
    /// Returns the display glyph for the icon.
    #[must_use]
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Success => "✅",
            Self::Start => "▶️",
            Self::Edit => "✏️",
        }
    }
}

/// A single observable field change produced by a task update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    /// The field that changed.
    pub field: ChangedField,
    /// Rendered previous value.
    pub previous: String,
    /// Rendered new value.
    pub new: String,
    /// Icon keyed by the transition type.
    pub icon: ChangeIcon,
}

impl FieldChange {
    /// Builds a status change descriptor with the transition-keyed icon.
    #[must_use]
    pub fn status(previous: TaskStatus, new: TaskStatus) -> Self {
        let icon = match new {
            TaskStatus::Done => ChangeIcon::Success,
            TaskStatus::InProgress => ChangeIcon::Start,
            _ => ChangeIcon::Edit,
        };
        Self {
            field: ChangedField::Status,
            previous: previous.as_str().to_owned(),
            new: new.as_str().to_owned(),
            icon,
        }
    }

    /// Builds a title change descriptor.
    #[must_use]
    pub fn title(previous: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            field: ChangedField::Title,
            previous: previous.into(),
            new: new.into(),
            icon: ChangeIcon::Edit,
        }
    }

    /// Builds a description change descriptor.
    #[must_use]
    pub fn description(previous: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            field: ChangedField::Description,
            previous: previous.into(),
            new: new.into(),
            icon: ChangeIcon::Edit,
        }
    }
}
