mod repository;

pub use repository::*;

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::domain::{Transaction, TransactionId};

/// SQL migration for the initial schema
pub const MIGRATION_001_INITIAL: &str = include_str!("migrations/001_initial.sql");

/// Capability to persist and query transactions. The ledger service only
/// depends on this seam; the SQLite [`Repository`] is the production
/// implementation, tests substitute stubs.
pub trait TransactionStore {
    /// Persist a transaction, assigning its id. Ids are assigned exactly
    /// once and never reused; uniqueness is this store's responsibility.
    fn save(
        &self,
        transaction: &mut Transaction,
    ) -> impl Future<Output = Result<TransactionId>> + Send;

    /// Fetch transactions with `created_at` inside the half-open range
    /// `[start, end)`, ordered by `created_at` ascending. `None` bounds are
    /// unbounded.
    fn list_between(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> impl Future<Output = Result<Vec<Transaction>>> + Send;
}
