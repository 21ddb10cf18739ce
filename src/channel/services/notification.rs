//! Notification fanout for task-state changes and ingestion outcomes.

use crate::channel::{
    domain::{Channel, ChannelId, ChannelMessage},
    ports::{
        ChannelRepository, ChannelRepositoryError, DepartmentRepository,
        DepartmentRepositoryError, MessageRepository, MessageRepositoryError,
    },
};
use crate::task::domain::{FieldChange, Task};
use minijinja::Environment;
use mockable::Clock;
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;

/// Default fallback channel name when a task's department has no
/// same-named channel.
pub const DEFAULT_FALLBACK_CHANNEL: &str = "general";

const TASK_CHANGE_TEMPLATE: &str = "{{ icon }} Task {{ task_id }} ({{ title }}): \
{% for change in changes %}{{ change.field }} '{{ change.previous }}' to '{{ change.new }}'\
{% if not loop.last %}; {% endif %}{% endfor %}";

/// Service-level errors for notification fanout.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// Message persistence failed.
    #[error(transparent)]
    Message(#[from] MessageRepositoryError),

    /// Channel lookup failed.
    #[error(transparent)]
    Channel(#[from] ChannelRepositoryError),

    /// Department lookup failed.
    #[error(transparent)]
    Department(#[from] DepartmentRepositoryError),

    /// Notification body rendering failed.
    #[error("notification template render failed: {0}")]
    TemplateRender(String),
}

/// Result type for notification operations.
pub type NotificationResult<T> = Result<T, NotificationError>;

/// Composes and routes system messages describing task-state changes
/// and ingestion outcomes.
#[derive(Clone)]
pub struct NotificationFanout<M, Ch, D, C>
where
    M: MessageRepository,
    Ch: ChannelRepository,
    D: DepartmentRepository,
    C: Clock + Send + Sync,
{
    messages: Arc<M>,
    channels: Arc<Ch>,
    departments: Arc<D>,
    clock: Arc<C>,
    fallback_channel: String,
}

impl<M, Ch, D, C> NotificationFanout<M, Ch, D, C>
where
    M: MessageRepository,
    Ch: ChannelRepository,
    D: DepartmentRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new fanout with the given fallback channel name.
    #[must_use]
    pub fn new(
        messages: Arc<M>,
        channels: Arc<Ch>,
        departments: Arc<D>,
        clock: Arc<C>,
        fallback_channel: impl Into<String>,
    ) -> Self {
        Self {
            messages,
            channels,
            departments,
            clock,
            fallback_channel: fallback_channel.into(),
        }
    }

    /// Posts a system-authored message (no sender) to a channel.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError::Message`] when persistence fails.
    pub async fn send_system_message(
        &self,
        channel_id: ChannelId,
        text: &str,
    ) -> NotificationResult<ChannelMessage> {
        let message = ChannelMessage::system(channel_id, text, &*self.clock);
        self.messages.store(&message).await?;
        Ok(message)
    }

    /// Notifies a task's channel about observable changes.
    ///
    /// The target channel is the one named after the task's department,
    /// falling back to the configured general channel. When neither
    /// resolves, the notification is dropped with a WARN log; task
    /// mutation has already succeeded and remains the durable outcome.
    ///
    /// Returns the posted message, or `None` when the change list was
    /// empty or no channel resolved.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError`] when a lookup, render, or message
    /// store fails.
    pub async fn notify_task_change(
        &self,
        task: &Task,
        changes: &[FieldChange],
    ) -> NotificationResult<Option<ChannelMessage>> {
        if changes.is_empty() {
            return Ok(None);
        }

        let Some(channel) = self.resolve_target_channel(task).await? else {
            tracing::warn!(
                task_id = %task.id(),
                department_id = %task.department_id(),
                "no channel resolved for task change; notification dropped"
            );
            return Ok(None);
        };

        let body = render_task_change(task, changes)?;
        let message = self.send_system_message(channel.id(), &body).await?;
        Ok(Some(message))
    }

    async fn resolve_target_channel(&self, task: &Task) -> NotificationResult<Option<Channel>> {
        let department = self.departments.find_by_id(task.department_id()).await?;
        if let Some(dept) = department
            && let Some(channel) = self.channels.find_by_name(dept.name()).await?
        {
            return Ok(Some(channel));
        }
        Ok(self.channels.find_by_name(&self.fallback_channel).await?)
    }
}

/// Renders the notification body for a set of field changes.
///
/// The leading icon comes from the first change descriptor, which for
/// status moves carries the transition-keyed icon.
fn render_task_change(task: &Task, changes: &[FieldChange]) -> NotificationResult<String> {
    let icon = changes
        .first()
        .map_or("✏️", |change| change.icon.glyph());

    let mut context = Map::new();
    context.insert("icon".to_owned(), Value::String(icon.to_owned()));
    context.insert("task_id".to_owned(), Value::String(task.id().to_string()));
    context.insert("title".to_owned(), Value::String(task.title().to_owned()));
    context.insert(
        "changes".to_owned(),
        serde_json::to_value(changes)
            .map_err(|error| NotificationError::TemplateRender(error.to_string()))?,
    );

    let environment = Environment::new();
    environment
        .render_str(TASK_CHANGE_TEMPLATE, context)
        .map_err(|error| NotificationError::TemplateRender(error.to_string()))
}
