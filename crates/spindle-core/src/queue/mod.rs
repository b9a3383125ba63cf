//! Queue - ordering and extraction over one named queue.
//!
//! Selection (shared by `remove` and `peek`) walks entries in [`OrderKey`]
//! order and returns the first one whose not-before has passed. Entries that
//! are not ready yet are skipped, never removed and never blocking. Instead of
//! rescanning them on every call, the store keeps them in a waiting index and
//! `promote_due` moves them to the ready index once their time comes, so the
//! first ready entry in key order is always the answer.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::domain::{AddOptions, Entry, Item, OrderKey, QueueName, Result, SpindleError};
use crate::ports::{Clock, EntryStore, StoreError};

/// Handle to one named queue.
///
/// Cheap to clone; every clone talks to the same store. Obtain one through
/// [`QueueRegistry::queue`](crate::registry::QueueRegistry::queue).
#[derive(Clone)]
pub struct Queue {
    name: QueueName,
    store: Arc<dyn EntryStore>,
    clock: Arc<dyn Clock>,
    config: Arc<EngineConfig>,
}

impl Queue {
    pub(crate) fn new(
        name: QueueName,
        store: Arc<dyn EntryStore>,
        clock: Arc<dyn Clock>,
        config: Arc<EngineConfig>,
    ) -> Self {
        Self {
            name,
            store,
            clock,
            config,
        }
    }

    pub fn name(&self) -> &QueueName {
        &self.name
    }

    /// Insert one value.
    ///
    /// Out-of-range priorities are coerced to 1, never rejected.
    pub async fn add(&self, value: impl Into<Vec<u8>>, options: AddOptions) -> Result<()> {
        let sequence = self.check("add", self.store.allocate_sequences(&self.name, 1).await)?;
        let entry = Entry::new(
            value.into(),
            options.normalized_priority(),
            options.not_before,
            sequence,
        );
        debug!(
            queue = %self.name,
            %sequence,
            priority = ?entry.priority().map(|p| p.get()),
            not_before = ?entry.not_before(),
            "adding entry"
        );
        let now = self.clock.now();
        self.check("add", self.store.insert(&self.name, vec![entry], now).await)
    }

    /// Insert values as one batch, without priority or delay.
    ///
    /// The batch gets a contiguous block of sequence numbers in input order
    /// and becomes visible atomically, so it reads exactly like one `add` per
    /// value in that order.
    pub async fn add_bulk<I, V>(&self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = V>,
        V: Into<Vec<u8>>,
    {
        let payloads: Vec<Vec<u8>> = values.into_iter().map(Into::into).collect();
        if payloads.is_empty() {
            return Ok(());
        }
        let count = payloads.len() as u64;
        let first = self.check(
            "add_bulk",
            self.store.allocate_sequences(&self.name, count).await,
        )?;
        let entries = payloads
            .into_iter()
            .zip(0u64..)
            .map(|(payload, offset)| Entry::new(payload, None, None, first.offset(offset)))
            .collect();

        debug!(queue = %self.name, count, first = %first, "adding batch");
        let now = self.clock.now();
        self.check(
            "add_bulk",
            self.store.insert(&self.name, entries, now).await,
        )
    }

    /// Take the best-ranked ready entry, or `None` when nothing is ready.
    ///
    /// Losing a take race to a concurrent caller moves on to the next
    /// candidate; it never fails the call and never returns an entry twice.
    pub async fn remove(&self) -> Result<Option<Item>> {
        self.promote().await?;

        let mut after: Option<OrderKey> = None;
        loop {
            let Some(candidate) =
                self.check("remove", self.store.first_ready(&self.name, after).await)?
            else {
                return Ok(None);
            };
            let key = candidate.key();
            if let Some(entry) = self.check("remove", self.store.take(&self.name, key).await)? {
                debug!(queue = %self.name, sequence = %key.sequence(), "removed entry");
                return Ok(Some(entry.into_item()));
            }
            debug!(
                queue = %self.name,
                sequence = %key.sequence(),
                "entry taken by another caller, trying next candidate"
            );
            after = Some(key);
        }
    }

    /// Same selection as [`Queue::remove`] without deleting.
    pub async fn peek(&self) -> Result<Option<Item>> {
        self.promote().await?;
        let head = self.check("peek", self.store.first_ready(&self.name, None).await)?;
        Ok(head.map(Entry::into_item))
    }

    /// Every stored entry, ready or not, in extraction order.
    pub async fn list(&self) -> Result<Vec<Item>> {
        let page_size = self.config.list_page_size.max(1);
        let mut items = Vec::new();
        let mut after = None;
        loop {
            let page = self.check(
                "list",
                self.store.scan(&self.name, after, page_size).await,
            )?;
            let exhausted = page.len() < page_size;
            after = page.last().map(Entry::key);
            items.extend(page.into_iter().map(Entry::into_item));
            if exhausted || after.is_none() {
                return Ok(items);
            }
        }
    }

    /// Number of stored entries, including ones not ready yet.
    pub async fn size(&self) -> Result<usize> {
        self.check("size", self.store.count(&self.name).await)
    }

    /// Delete every entry. The handle stays usable.
    pub async fn empty(&self) -> Result<()> {
        self.check("empty", self.store.clear(&self.name).await)?;
        info!(queue = %self.name, "queue emptied");
        Ok(())
    }

    async fn promote(&self) -> Result<()> {
        let now = self.clock.now();
        let promoted = self.check("promote", self.store.promote_due(&self.name, now).await)?;
        if promoted > 0 {
            debug!(queue = %self.name, promoted, "delayed entries became ready");
        }
        Ok(())
    }

    fn check<T>(&self, op: &'static str, result: Result<T, StoreError>) -> Result<T> {
        result.map_err(|error| {
            warn!(queue = %self.name, op, %error, "store operation failed");
            SpindleError::from(error)
        })
    }
}

impl std::fmt::Debug for Queue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Queue").field("name", &self.name).finish()
    }
}
