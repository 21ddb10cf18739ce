//! Shared test helpers for end-to-end pipeline tests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mockable::DefaultClock;
use steward::channel::{
    adapters::memory::{
        InMemoryChannelRepository, InMemoryDepartmentRepository, InMemoryMessageRepository,
        InMemoryUsageLedger,
    },
    domain::{Channel, ChannelKind},
    ports::{
        ChannelRepository, CommandParser, JobProposal, ParserError, ParserResult, ParserUsage,
    },
    services::{
        DEFAULT_FALLBACK_CHANNEL, DepartmentResolver, IngestionConfig, IngestionJob,
        IngestionProcessor, IngestionService, NotificationFanout,
    },
};
use steward::task::{
    adapters::memory::{InMemoryAuditLog, InMemoryRevisionRepository, InMemoryTaskRepository},
    domain::Priority,
    services::{RevisionTracker, TaskLifecycleService},
};
use tokio::sync::mpsc;

/// Lifecycle service over the in-memory adapters.
pub type TestLifecycle = TaskLifecycleService<
    InMemoryTaskRepository,
    InMemoryRevisionRepository,
    InMemoryAuditLog,
    DefaultClock,
>;

/// Revision tracker over the in-memory adapters.
pub type TestTracker = RevisionTracker<
    InMemoryTaskRepository,
    InMemoryRevisionRepository,
    InMemoryAuditLog,
    DefaultClock,
>;

/// Notification fanout over the in-memory adapters.
pub type TestFanout = NotificationFanout<
    InMemoryMessageRepository,
    InMemoryChannelRepository,
    InMemoryDepartmentRepository,
    DefaultClock,
>;

/// Background processor over the in-memory adapters, generic in the
/// parser.
pub type TestProcessor<P> = IngestionProcessor<
    P,
    InMemoryMessageRepository,
    InMemoryChannelRepository,
    InMemoryDepartmentRepository,
    InMemoryTaskRepository,
    InMemoryRevisionRepository,
    InMemoryAuditLog,
    InMemoryUsageLedger,
    DefaultClock,
>;

/// A complete in-memory deployment of the engine.
pub struct World {
    /// Message store.
    pub messages: Arc<InMemoryMessageRepository>,
    /// Channel store.
    pub channels: Arc<InMemoryChannelRepository>,
    /// Department store.
    pub departments: Arc<InMemoryDepartmentRepository>,
    /// Parser usage ledger.
    pub usage: Arc<InMemoryUsageLedger>,
    /// Task lifecycle service.
    pub lifecycle: Arc<TestLifecycle>,
    /// Revision tracker.
    pub tracker: TestTracker,
    /// Shared clock.
    pub clock: Arc<DefaultClock>,
}

/// Installs the test log subscriber once per process.
///
/// Honours `RUST_LOG`; defaults to WARN so dropped notifications and
/// unconventional moves show up in failing test output.
pub fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .init();
    });
}

impl World {
    /// Builds a fresh world with empty stores.
    #[must_use]
    pub fn new() -> Self {
        init_tracing();
        let messages = Arc::new(InMemoryMessageRepository::new());
        let channels = Arc::new(InMemoryChannelRepository::new());
        let departments = Arc::new(InMemoryDepartmentRepository::new());
        let usage = Arc::new(InMemoryUsageLedger::new());
        let revisions = Arc::new(InMemoryRevisionRepository::new());
        let clock = Arc::new(DefaultClock);
        let lifecycle = Arc::new(TaskLifecycleService::new(
            Arc::new(InMemoryTaskRepository::new()),
            Arc::clone(&revisions),
            Arc::new(InMemoryAuditLog::new()),
            Arc::clone(&clock),
        ));
        let tracker = RevisionTracker::new(Arc::clone(&lifecycle), revisions, Arc::clone(&clock));
        Self {
            messages,
            channels,
            departments,
            usage,
            lifecycle,
            tracker,
            clock,
        }
    }

    /// Builds the foreground ingestion service feeding `queue`.
    #[must_use]
    pub fn ingestion(
        &self,
        config: IngestionConfig,
        queue: mpsc::Sender<IngestionJob>,
    ) -> IngestionService<InMemoryMessageRepository, InMemoryChannelRepository, DefaultClock> {
        IngestionService::new(
            Arc::clone(&self.messages),
            Arc::clone(&self.channels),
            Arc::clone(&self.clock),
            config,
            queue,
        )
    }

    /// Builds the notification fanout with the default fallback channel.
    #[must_use]
    pub fn fanout(&self) -> TestFanout {
        NotificationFanout::new(
            Arc::clone(&self.messages),
            Arc::clone(&self.channels),
            Arc::clone(&self.departments),
            Arc::clone(&self.clock),
            DEFAULT_FALLBACK_CHANNEL,
        )
    }

    /// Builds the background processor around `parser`.
    #[must_use]
    pub fn processor<P: CommandParser>(
        &self,
        parser: Arc<P>,
        config: IngestionConfig,
    ) -> TestProcessor<P> {
        let resolver =
            DepartmentResolver::new(Arc::clone(&self.departments), Arc::clone(&self.clock));
        IngestionProcessor::new(
            parser,
            Arc::clone(&self.messages),
            Arc::clone(&self.channels),
            resolver,
            Arc::clone(&self.lifecycle),
            self.fanout(),
            Arc::clone(&self.usage),
            config,
        )
    }

    /// Stores a channel and returns it.
    ///
    /// # Panics
    ///
    /// Panics when the name is invalid or already taken.
    pub async fn seed_channel(&self, name: &str, kind: ChannelKind) -> Channel {
        let channel = Channel::new(name, kind).expect("valid channel name");
        self.channels.store(&channel).await.expect("channel stored");
        channel
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Parser returning a fixed proposal for every call.
pub struct ScriptedParser {
    proposal: JobProposal,
}

impl ScriptedParser {
    /// Creates a parser that always proposes the given title/priority.
    #[must_use]
    pub fn new(title: &str, priority: Priority) -> Self {
        Self {
            proposal: JobProposal {
                title: title.to_owned(),
                description: "as requested in chat".to_owned(),
                priority,
                confidence: 0.9,
                usage: ParserUsage { tokens: 120 },
            },
        }
    }
}

#[async_trait]
impl CommandParser for ScriptedParser {
    async fn propose(&self, _text: &str) -> ParserResult<JobProposal> {
        Ok(self.proposal.clone())
    }
}

/// Parser that never answers within any reasonable deadline.
pub struct StalledParser;

#[async_trait]
impl CommandParser for StalledParser {
    async fn propose(&self, _text: &str) -> ParserResult<JobProposal> {
        tokio::time::sleep(Duration::from_secs(120)).await;
        Err(ParserError::Unavailable("unreachable".to_owned()))
    }
}
