//! QueueRegistry - multi-queue lifecycle.
//!
//! The registry only deals with whole queues: handing out [`Queue`] handles,
//! listing the queues that hold entries, and deleting queues. Every ordering
//! decision lives in [`Queue`].
//!
//! A registry is an ordinary owned value. Create one at startup, share it
//! (or clones of its queues) with whatever needs it, drop it at shutdown.

mod builder;

pub use builder::RegistryBuilder;

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::domain::{QueueName, Result, SpindleError};
use crate::ports::{Clock, EntryStore};
use crate::queue::Queue;

pub struct QueueRegistry {
    store: Arc<dyn EntryStore>,
    clock: Arc<dyn Clock>,
    config: Arc<EngineConfig>,
}

impl QueueRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Registry over a fresh in-memory store with default settings.
    pub fn in_memory() -> Self {
        Self {
            store: Arc::new(crate::impls::InMemoryStore::new()),
            clock: Arc::new(crate::ports::SystemClock),
            config: Arc::new(EngineConfig::default()),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Handle to the queue called `name`.
    ///
    /// Nothing is written until the first add; the queue materializes then.
    pub fn queue(&self, name: &str) -> Result<Queue> {
        Ok(Queue::new(
            self.parse_name(name)?,
            Arc::clone(&self.store),
            Arc::clone(&self.clock),
            Arc::clone(&self.config),
        ))
    }

    /// Queues currently holding at least one entry, sorted by name.
    pub async fn list_queues(&self) -> Result<Vec<QueueName>> {
        self.store.queue_names().await.map_err(|error| {
            warn!(%error, "listing queues failed");
            SpindleError::from(error)
        })
    }

    /// Delete one queue and everything in it. Missing queues are fine.
    pub async fn remove_queue(&self, name: &str) -> Result<()> {
        self.remove_queues([name]).await
    }

    /// Delete the named queues, or every queue when `names` is empty.
    pub async fn remove_queues<I, S>(&self, names: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = names
            .into_iter()
            .map(|name| self.parse_name(name.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        let result = if names.is_empty() {
            self.store.drop_all().await
        } else {
            self.store.drop_queues(&names).await
        };
        result.map_err(|error| {
            warn!(%error, "removing queues failed");
            SpindleError::from(error)
        })?;

        if names.is_empty() {
            info!("all queues removed");
        } else {
            info!(queues = ?names.iter().map(QueueName::as_str).collect::<Vec<_>>(), "queues removed");
        }
        Ok(())
    }

    fn parse_name(&self, name: &str) -> Result<QueueName> {
        QueueName::parse(name, self.config.max_queue_name_len)
    }
}
