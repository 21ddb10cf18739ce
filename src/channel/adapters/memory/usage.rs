//! In-memory per-user usage ledger.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::channel::ports::{UsageLedger, UsageLedgerError, UsageLedgerResult};
use crate::task::domain::UserId;

/// Thread-safe in-memory usage ledger.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUsageLedger {
    state: Arc<RwLock<HashMap<UserId, u64>>>,
}

impl InMemoryUsageLedger {
    /// Creates an empty in-memory ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> UsageLedgerError {
    UsageLedgerError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl UsageLedger for InMemoryUsageLedger {
    async fn record(&self, user_id: UserId, tokens: u64) -> UsageLedgerResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let total = state.entry(user_id).or_insert(0);
        *total = total.saturating_add(tokens);
        Ok(())
    }

    async fn total_for(&self, user_id: UserId) -> UsageLedgerResult<u64> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.get(&user_id).copied().unwrap_or(0))
    }
}
