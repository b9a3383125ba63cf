//! InMemoryStore - reference `EntryStore` kept in process memory.
//!
//! # Layout
//! - `HashMap<QueueName, Shard>` behind one `RwLock`
//! - per shard: ready index, waiting index, due index, sequence counter
//!
//! Dropping a queue discards its entries but keeps the shard's counter, so an
//! add that reserved a sequence before the drop and inserts after it can
//! never collide with a sequence handed out later.
//!
//! Readers (`first_ready`, `scan`, `count`) share the lock; every mutating
//! primitive holds the write lock for its whole duration, which is what makes
//! `take` a true take-if-present and `insert` all-or-nothing.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::ops::Bound;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::{Entry, OrderKey, QueueName, Sequence};
use crate::ports::{EntryStore, StoreError};

#[derive(Debug, Default)]
struct Shard {
    /// Highest sequence handed out so far (0 = none).
    allocated: u64,

    ready: BTreeMap<OrderKey, Entry>,

    waiting: BTreeMap<OrderKey, Entry>,

    /// Earliest not-before first.
    due: BTreeSet<(DateTime<Utc>, OrderKey)>,
}

impl Shard {
    fn len(&self) -> usize {
        self.ready.len() + self.waiting.len()
    }

    fn is_empty(&self) -> bool {
        self.ready.is_empty() && self.waiting.is_empty()
    }

    fn allocate(&mut self, count: u64) -> Result<Sequence, StoreError> {
        let first = self.allocated + 1;
        self.allocated = self
            .allocated
            .checked_add(count)
            .ok_or_else(|| StoreError::OperationFailed("sequence space exhausted".to_string()))?;
        Ok(Sequence::new(first))
    }

    fn contains(&self, key: &OrderKey) -> bool {
        self.ready.contains_key(key) || self.waiting.contains_key(key)
    }

    /// Reject the whole batch if any key is already stored, then file it.
    fn insert_batch(&mut self, entries: Vec<Entry>, now: DateTime<Utc>) -> Result<(), StoreError> {
        let mut seen = BTreeSet::new();
        for entry in &entries {
            let key = entry.key();
            if self.contains(&key) || !seen.insert(key) {
                return Err(StoreError::OperationFailed(format!(
                    "sequence {} is already stored",
                    key.sequence()
                )));
            }
        }
        for entry in entries {
            self.allocated = self.allocated.max(entry.sequence().get());
            self.file(entry, now);
        }
        Ok(())
    }

    fn file(&mut self, entry: Entry, now: DateTime<Utc>) {
        let key = entry.key();
        match entry.not_before() {
            Some(at) if at > now => {
                self.due.insert((at, key));
                self.waiting.insert(key, entry);
            }
            _ => {
                self.ready.insert(key, entry);
            }
        }
    }

    fn has_due(&self, now: DateTime<Utc>) -> bool {
        self.due.first().is_some_and(|(at, _)| *at <= now)
    }

    fn promote_due(&mut self, now: DateTime<Utc>) -> usize {
        let mut promoted = 0;
        while let Some(&(at, key)) = self.due.first() {
            if at > now {
                break; // sorted by time, nothing later can be due
            }
            self.due.pop_first();
            if let Some(entry) = self.waiting.remove(&key) {
                self.ready.insert(key, entry);
                promoted += 1;
            }
        }
        promoted
    }

    fn scan(&self, after: Option<OrderKey>, limit: usize) -> Vec<Entry> {
        let lower = after.map_or(Bound::Unbounded, Bound::Excluded);
        let mut ready = self.ready.range((lower, Bound::Unbounded)).peekable();
        let mut waiting = self.waiting.range((lower, Bound::Unbounded)).peekable();

        let mut out = Vec::with_capacity(limit.min(self.len()));
        while out.len() < limit {
            let from_ready = match (ready.peek(), waiting.peek()) {
                (Some((r, _)), Some((w, _))) => r < w,
                (Some(_), None) => true,
                (None, Some(_)) => false,
                (None, None) => break,
            };
            let next = if from_ready {
                ready.next()
            } else {
                waiting.next()
            };
            if let Some((_, entry)) = next {
                out.push(entry.clone());
            }
        }
        out
    }

    fn clear(&mut self) {
        self.ready.clear();
        self.waiting.clear();
        self.due.clear();
    }
}

/// In-process store. Durable adapters implement the same port.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    shards: RwLock<HashMap<QueueName, Shard>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EntryStore for InMemoryStore {
    async fn allocate_sequences(
        &self,
        queue: &QueueName,
        count: u64,
    ) -> Result<Sequence, StoreError> {
        let mut shards = self.shards.write().await;
        shards.entry(queue.clone()).or_default().allocate(count)
    }

    async fn insert(
        &self,
        queue: &QueueName,
        entries: Vec<Entry>,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut shards = self.shards.write().await;
        shards
            .entry(queue.clone())
            .or_default()
            .insert_batch(entries, now)
    }

    async fn promote_due(
        &self,
        queue: &QueueName,
        now: DateTime<Utc>,
    ) -> Result<usize, StoreError> {
        // Cheap check first so the common case never takes the write lock.
        {
            let shards = self.shards.read().await;
            if !shards.get(queue).is_some_and(|shard| shard.has_due(now)) {
                return Ok(0);
            }
        }
        let mut shards = self.shards.write().await;
        Ok(shards
            .get_mut(queue)
            .map_or(0, |shard| shard.promote_due(now)))
    }

    async fn first_ready(
        &self,
        queue: &QueueName,
        after: Option<OrderKey>,
    ) -> Result<Option<Entry>, StoreError> {
        let shards = self.shards.read().await;
        let Some(shard) = shards.get(queue) else {
            return Ok(None);
        };
        let lower = after.map_or(Bound::Unbounded, Bound::Excluded);
        Ok(shard
            .ready
            .range((lower, Bound::Unbounded))
            .next()
            .map(|(_, entry)| entry.clone()))
    }

    async fn take(&self, queue: &QueueName, key: OrderKey) -> Result<Option<Entry>, StoreError> {
        let mut shards = self.shards.write().await;
        Ok(shards
            .get_mut(queue)
            .and_then(|shard| shard.ready.remove(&key)))
    }

    async fn scan(
        &self,
        queue: &QueueName,
        after: Option<OrderKey>,
        limit: usize,
    ) -> Result<Vec<Entry>, StoreError> {
        let shards = self.shards.read().await;
        Ok(shards
            .get(queue)
            .map(|shard| shard.scan(after, limit))
            .unwrap_or_default())
    }

    async fn count(&self, queue: &QueueName) -> Result<usize, StoreError> {
        let shards = self.shards.read().await;
        Ok(shards.get(queue).map_or(0, Shard::len))
    }

    async fn clear(&self, queue: &QueueName) -> Result<(), StoreError> {
        let mut shards = self.shards.write().await;
        if let Some(shard) = shards.get_mut(queue) {
            shard.clear();
        }
        Ok(())
    }

    async fn queue_names(&self) -> Result<Vec<QueueName>, StoreError> {
        let shards = self.shards.read().await;
        let mut names: Vec<QueueName> = shards
            .iter()
            .filter(|(_, shard)| !shard.is_empty())
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        Ok(names)
    }

    async fn drop_queues(&self, queues: &[QueueName]) -> Result<(), StoreError> {
        let mut shards = self.shards.write().await;
        for queue in queues {
            if let Some(shard) = shards.get_mut(queue) {
                shard.clear();
            }
        }
        Ok(())
    }

    async fn drop_all(&self) -> Result<(), StoreError> {
        for shard in self.shards.write().await.values_mut() {
            shard.clear();
        }
        Ok(())
    }
}
