//! EntryStore port - the ordered store queues are persisted in.
//!
//! Implementations keep, per queue:
//! - a **ready index** keyed by [`OrderKey`] holding entries eligible now,
//! - a **waiting index** keyed by [`OrderKey`] holding entries whose
//!   not-before is still in the future,
//! - a **due index** keyed by `(not_before, OrderKey)` so promotion only
//!   touches entries whose time has come,
//! - a sequence counter.
//!
//! The queue layer owns the ranking and readiness decisions. The store only
//! has to make each primitive below atomic with respect to one queue.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::{Entry, OrderKey, QueueName, Sequence};

/// Failure at the storage boundary. Never used for "nothing found".
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store operation failed: {0}")]
    OperationFailed(String),
}

/// Ordered key-value backend for queue entries.
///
/// # Thread Safety
/// Shared as `Arc<dyn EntryStore>` between any number of concurrent callers.
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Reserve `count` consecutive sequence numbers for `queue`; returns the first.
    async fn allocate_sequences(
        &self,
        queue: &QueueName,
        count: u64,
    ) -> Result<Sequence, StoreError>;

    /// Insert a batch atomically. Entries not ready at `now` go to the
    /// waiting and due indexes, everything else to the ready index.
    ///
    /// A key that is already stored, or repeated within the batch, fails the
    /// whole call with `OperationFailed`; existing entries are never replaced.
    /// The queue's counter is raised past every inserted sequence.
    async fn insert(
        &self,
        queue: &QueueName,
        entries: Vec<Entry>,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Move every waiting entry whose not-before is at or before `now` into
    /// the ready index. Returns how many moved.
    async fn promote_due(&self, queue: &QueueName, now: DateTime<Utc>)
    -> Result<usize, StoreError>;

    /// Best-ranked ready entry strictly after `after` (or the overall best).
    async fn first_ready(
        &self,
        queue: &QueueName,
        after: Option<OrderKey>,
    ) -> Result<Option<Entry>, StoreError>;

    /// Remove and return the ready entry at `key` if it is still there.
    ///
    /// `None` means another caller took it first.
    async fn take(&self, queue: &QueueName, key: OrderKey) -> Result<Option<Entry>, StoreError>;

    /// Up to `limit` entries from both indexes, merged in key order, strictly
    /// after `after`.
    async fn scan(
        &self,
        queue: &QueueName,
        after: Option<OrderKey>,
        limit: usize,
    ) -> Result<Vec<Entry>, StoreError>;

    /// All stored entries of `queue`, ready or not.
    async fn count(&self, queue: &QueueName) -> Result<usize, StoreError>;

    /// Delete every entry of `queue`. The sequence counter is kept.
    async fn clear(&self, queue: &QueueName) -> Result<(), StoreError>;

    /// Names of queues holding at least one entry.
    async fn queue_names(&self) -> Result<Vec<QueueName>, StoreError>;

    /// Delete every entry of the named queues. Sequence counters are kept, so
    /// an insert that lands after the drop never shares a sequence with a
    /// later allocation.
    async fn drop_queues(&self, queues: &[QueueName]) -> Result<(), StoreError>;

    /// Delete every entry of every queue. Sequence counters are kept.
    async fn drop_all(&self) -> Result<(), StoreError>;
}
