//! Port trait definitions for the channel subsystem.
//!
//! Ports define the abstract interfaces that the domain requires from
//! infrastructure: message/channel/department persistence, the external
//! natural-language command parser, and the per-user usage ledger.

pub mod parser;
pub mod repository;

pub use parser::{CommandParser, JobProposal, ParserError, ParserResult, ParserUsage};
pub use repository::{
    ChannelRepository, ChannelRepositoryError, ChannelRepositoryResult, DepartmentRepository,
    DepartmentRepositoryError, DepartmentRepositoryResult, MessageRepository,
    MessageRepositoryError, MessageRepositoryResult, UsageLedger, UsageLedgerError,
    UsageLedgerResult,
};
