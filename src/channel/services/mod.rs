//! Orchestration services for the channel subsystem.

mod ingestion;
mod notification;
mod resolver;

pub use ingestion::{
    DEFAULT_HELP_TEXT, DEFAULT_PARSER_TIMEOUT, IngestionConfig, IngestionError, IngestionJob,
    IngestionProcessError, IngestionProcessor, IngestionResult, IngestionService,
};
pub use notification::{
    DEFAULT_FALLBACK_CHANNEL, NotificationError, NotificationFanout, NotificationResult,
};
pub use resolver::{DepartmentResolver, ResolverError, ResolverResult};
