//! In-memory adapter implementations.
//!
//! These adapters provide simple, thread-safe implementations suitable
//! for unit testing and single-process deployments without database
//! dependencies.

mod channel;
mod department;
mod message;
mod usage;

pub use channel::InMemoryChannelRepository;
pub use department::InMemoryDepartmentRepository;
pub use message::InMemoryMessageRepository;
pub use usage::InMemoryUsageLedger;
