//! Command ingestion pipeline: synchronous message persistence plus
//! asynchronous task creation.
//!
//! The foreground path ([`IngestionService::post_message`]) persists the
//! raw message unconditionally and returns before any parsing happens;
//! message durability never depends on parser availability or latency.
//! The background path ([`IngestionProcessor::process`]) runs on the
//! worker pool and converts every failure into a system message in the
//! originating channel.

use crate::channel::{
    domain::{
        ChannelId, ChannelMessage, MediaAttachment, MessageId, Trigger, TriggerConfig,
        extract_priority_override,
    },
    ports::{
        ChannelRepository, ChannelRepositoryError, CommandParser, DepartmentRepository,
        MessageRepository, MessageRepositoryError, ParserError, UsageLedger, UsageLedgerError,
    },
    services::{DepartmentResolver, NotificationError, NotificationFanout, ResolverError},
};
use crate::task::{
    domain::{TaskDraft, UserId},
    ports::{AuditLogRepository, RevisionRepository, TaskRepository},
    services::{TaskLifecycleError, TaskLifecycleService},
};
use mockable::Clock;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;

/// Default bounded timeout for external parser calls.
pub const DEFAULT_PARSER_TIMEOUT: Duration = Duration::from_secs(20);

/// Default help text posted in reply to the literal help trigger.
pub const DEFAULT_HELP_TEXT: &str = "Available triggers: `!task <description>` creates a task \
(add [P1], [P2] or [P3] to override priority); `!help` shows this message.";

/// Configuration for the ingestion pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestionConfig {
    /// Trigger grammar.
    pub trigger: TriggerConfig,
    /// Bounded timeout for external parser calls; elapsing counts as a
    /// parser failure.
    pub parser_timeout: Duration,
    /// Static help reply for the help trigger.
    pub help_text: String,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            trigger: TriggerConfig::default(),
            parser_timeout: DEFAULT_PARSER_TIMEOUT,
            help_text: DEFAULT_HELP_TEXT.to_owned(),
        }
    }
}

/// A background ingestion job dispatched by the foreground path.
///
/// Jobs carry everything the background step needs so it never re-reads
/// the original message; once dispatched they run to completion or
/// failure, with no mid-flight cancellation and no automatic retries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestionJob {
    /// The originating message, target of the write-once back-link.
    pub message_id: MessageId,
    /// The channel the message was posted to.
    pub channel_id: ChannelId,
    /// The user who posted the message.
    pub requester_id: UserId,
    /// Trimmed command text after the trigger prefix, priority tag
    /// included.
    pub text: String,
    /// Image URL inherited from the originating message, if any.
    pub image_url: Option<String>,
}

/// Errors surfaced synchronously by the foreground posting path.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// The target channel does not exist.
    #[error("channel not found: {0}")]
    ChannelNotFound(ChannelId),

    /// Channel lookup failed.
    #[error(transparent)]
    Channel(#[from] ChannelRepositoryError),

    /// Message persistence failed.
    #[error(transparent)]
    Message(#[from] MessageRepositoryError),
}

/// Result type for foreground ingestion operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Foreground half of the ingestion pipeline.
#[derive(Clone)]
pub struct IngestionService<M, Ch, C>
where
    M: MessageRepository,
    Ch: ChannelRepository,
    C: Clock + Send + Sync,
{
    messages: Arc<M>,
    channels: Arc<Ch>,
    clock: Arc<C>,
    config: IngestionConfig,
    queue: mpsc::Sender<IngestionJob>,
}

impl<M, Ch, C> IngestionService<M, Ch, C>
where
    M: MessageRepository,
    Ch: ChannelRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new ingestion service feeding the given job queue.
    #[must_use]
    pub const fn new(
        messages: Arc<M>,
        channels: Arc<Ch>,
        clock: Arc<C>,
        config: IngestionConfig,
        queue: mpsc::Sender<IngestionJob>,
    ) -> Self {
        Self {
            messages,
            channels,
            clock,
            config,
            queue,
        }
    }

    /// Posts a message to a channel, persisting it synchronously and
    /// dispatching any recognized task-creation trigger to the
    /// background queue.
    ///
    /// The call returns as soon as the message (and, for the help
    /// trigger, the help reply) is durable; parsing and task creation
    /// happen asynchronously, so callers may observe the message before
    /// its linked task or error notice exists.
    ///
    /// # Errors
    ///
    /// Returns [`IngestionError::ChannelNotFound`] for an unknown
    /// channel or [`IngestionError::Message`] when persistence fails.
    pub async fn post_message(
        &self,
        channel_id: ChannelId,
        content: &str,
        sender_id: UserId,
        media: Option<MediaAttachment>,
    ) -> IngestionResult<ChannelMessage> {
        self.channels
            .find_by_id(channel_id)
            .await?
            .ok_or(IngestionError::ChannelNotFound(channel_id))?;

        let mut message = ChannelMessage::new(channel_id, content, sender_id, &*self.clock);
        if let Some(attachment) = media {
            message = message.with_media(attachment);
        }
        self.messages.store(&message).await?;

        match self.config.trigger.match_content(content) {
            Some(Trigger::Help) => {
                let help = ChannelMessage::system(channel_id, &self.config.help_text, &*self.clock);
                self.messages.store(&help).await?;
            }
            Some(Trigger::CreateTask { remainder }) => {
                if self.config.trigger.meets_minimum(&remainder) {
                    self.dispatch(&message, sender_id, remainder).await;
                } else {
                    tracing::debug!(
                        message_id = %message.id(),
                        "command remainder below minimum length; no task dispatched"
                    );
                }
            }
            None => {}
        }

        Ok(message)
    }

    /// Enqueues a background job. Queue closure (shutdown) is logged and
    /// swallowed: the message is already durable and stands alone.
    async fn dispatch(&self, message: &ChannelMessage, requester_id: UserId, text: String) {
        let job = IngestionJob {
            message_id: message.id(),
            channel_id: message.channel_id(),
            requester_id,
            text,
            image_url: message.image_url().map(str::to_owned),
        };
        if self.queue.send(job).await.is_err() {
            tracing::warn!(
                message_id = %message.id(),
                "ingestion queue closed; message persisted without task dispatch"
            );
        }
    }
}

/// Errors raised by the background processing step.
///
/// These never propagate past [`IngestionProcessor::process`]; they are
/// rendered into a system error message in the originating channel.
#[derive(Debug, Error)]
pub enum IngestionProcessError {
    /// The external parser failed or timed out.
    #[error(transparent)]
    Parser(#[from] ParserError),

    /// The originating channel vanished between posting and processing.
    #[error("channel not found: {0}")]
    ChannelNotFound(ChannelId),

    /// Channel lookup failed.
    #[error(transparent)]
    Channel(#[from] ChannelRepositoryError),

    /// Department resolution failed.
    #[error(transparent)]
    Resolver(#[from] ResolverError),

    /// Task creation failed.
    #[error(transparent)]
    Lifecycle(#[from] TaskLifecycleError),

    /// The message back-link write failed.
    #[error(transparent)]
    Message(#[from] MessageRepositoryError),

    /// Usage accounting failed.
    #[error(transparent)]
    Usage(#[from] UsageLedgerError),

    /// The confirmation message could not be posted.
    #[error(transparent)]
    Notification(#[from] NotificationError),
}

/// Background half of the ingestion pipeline.
///
/// One processor instance is shared by every worker in the pool.
pub struct IngestionProcessor<P, M, Ch, D, R, V, A, U, C>
where
    P: CommandParser,
    M: MessageRepository,
    Ch: ChannelRepository,
    D: DepartmentRepository,
    R: TaskRepository,
    V: RevisionRepository,
    A: AuditLogRepository,
    U: UsageLedger,
    C: Clock + Send + Sync,
{
    parser: Arc<P>,
    messages: Arc<M>,
    channels: Arc<Ch>,
    resolver: DepartmentResolver<D, C>,
    lifecycle: Arc<TaskLifecycleService<R, V, A, C>>,
    fanout: NotificationFanout<M, Ch, D, C>,
    usage: Arc<U>,
    config: IngestionConfig,
}

impl<P, M, Ch, D, R, V, A, U, C> IngestionProcessor<P, M, Ch, D, R, V, A, U, C>
where
    P: CommandParser,
    M: MessageRepository,
    Ch: ChannelRepository,
    D: DepartmentRepository,
    R: TaskRepository,
    V: RevisionRepository,
    A: AuditLogRepository,
    U: UsageLedger,
    C: Clock + Send + Sync,
{
    /// Creates a new background processor.
    #[expect(
        clippy::too_many_arguments,
        reason = "wiring point for the whole background collaborator graph"
    )]
    #[must_use]
    pub const fn new(
        parser: Arc<P>,
        messages: Arc<M>,
        channels: Arc<Ch>,
        resolver: DepartmentResolver<D, C>,
        lifecycle: Arc<TaskLifecycleService<R, V, A, C>>,
        fanout: NotificationFanout<M, Ch, D, C>,
        usage: Arc<U>,
        config: IngestionConfig,
    ) -> Self {
        Self {
            parser,
            messages,
            channels,
            resolver,
            lifecycle,
            fanout,
            usage,
            config,
        }
    }

    /// Runs one ingestion job to completion.
    ///
    /// Failures are isolated per job: they are logged, converted into a
    /// system error message in the originating channel, and never
    /// propagated. The original user message remains intact either way.
    pub async fn process(&self, job: IngestionJob) {
        let channel_id = job.channel_id;
        if let Err(err) = self.run(job).await {
            tracing::error!(channel_id = %channel_id, error = %err, "background ingestion failed");
            let notice = format!("⚠️ Could not create a task from your message: {err}");
            if let Err(post_err) = self.fanout.send_system_message(channel_id, &notice).await {
                tracing::error!(
                    channel_id = %channel_id,
                    error = %post_err,
                    "failed to post ingestion error notice"
                );
            }
        }
    }

    async fn run(&self, job: IngestionJob) -> Result<(), IngestionProcessError> {
        let (manual_priority, stripped) =
            extract_priority_override(&job.text);

        let proposal =
            match tokio::time::timeout(self.config.parser_timeout, self.parser.propose(&stripped))
                .await
            {
                Ok(result) => result?,
                Err(_elapsed) => return Err(ParserError::TimedOut.into()),
            };

        let channel = self
            .channels
            .find_by_id(job.channel_id)
            .await?
            .ok_or(IngestionProcessError::ChannelNotFound(job.channel_id))?;
        let department = self.resolver.find_or_create_by_name(channel.name()).await?;

        let priority = manual_priority.unwrap_or(proposal.priority);
        let mut draft = TaskDraft::new(
            proposal.title,
            proposal.description,
            department.id(),
            priority,
        );
        if let Some(url) = &job.image_url {
            draft = draft.with_image_url(url.clone());
        }
        let task = self.lifecycle.create(draft, job.requester_id).await?;

        // The back-link is write-once; losing that race means another
        // ingestion already linked this message, which is not an error.
        match self.messages.link_task(job.message_id, task.id()).await {
            Ok(()) => {}
            Err(MessageRepositoryError::TaskAlreadyLinked(message_id)) => {
                tracing::warn!(
                    message_id = %message_id,
                    task_id = %task.id(),
                    "message already linked; keeping the existing link"
                );
            }
            Err(other) => return Err(other.into()),
        }

        self.usage
            .record(job.requester_id, proposal.usage.tokens)
            .await?;

        let confirmation = format!(
            "🆕 Task {} created: \"{}\" routed to {}",
            task.id(),
            task.title(),
            department.name()
        );
        self.fanout
            .send_system_message(job.channel_id, &confirmation)
            .await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl<P, M, Ch, D, R, V, A, U, C> crate::worker::IngestionJobHandler
    for IngestionProcessor<P, M, Ch, D, R, V, A, U, C>
where
    P: CommandParser,
    M: MessageRepository,
    Ch: ChannelRepository,
    D: DepartmentRepository,
    R: TaskRepository,
    V: RevisionRepository,
    A: AuditLogRepository,
    U: UsageLedger,
    C: Clock + Send + Sync,
{
    async fn handle(&self, job: IngestionJob) {
        self.process(job).await;
    }
}
