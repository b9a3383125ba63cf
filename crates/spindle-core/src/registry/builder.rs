//! RegistryBuilder - wiring a registry from its collaborators.

use std::sync::Arc;

use crate::config::EngineConfig;
use crate::domain::Result;
use crate::impls::InMemoryStore;
use crate::ports::{Clock, EntryStore, SystemClock};

use super::QueueRegistry;

/// Builds a [`QueueRegistry`].
///
/// # Example
/// ```ignore
/// let registry = QueueRegistry::builder()
///     .store(Arc::new(InMemoryStore::new()))
///     .clock(SystemClock)
///     .config(EngineConfig::default())
///     .build()?;
/// ```
///
/// Anything not set falls back to an in-memory store, the system clock and
/// the default configuration. `build` validates the configuration up front.
pub struct RegistryBuilder {
    store: Option<Arc<dyn EntryStore>>,
    clock: Option<Arc<dyn Clock>>,
    config: EngineConfig,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self {
            store: None,
            clock: None,
            config: EngineConfig::default(),
        }
    }

    /// Backing store. Pass the same `Arc` to several builders to model
    /// independent service instances sharing one store.
    pub fn store(mut self, store: Arc<dyn EntryStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<QueueRegistry> {
        self.config.validate()?;
        Ok(QueueRegistry {
            store: self
                .store
                .unwrap_or_else(|| Arc::new(InMemoryStore::new())),
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            config: Arc::new(self.config),
        })
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SpindleError;

    #[test]
    fn build_with_defaults() {
        let registry = RegistryBuilder::new().build().unwrap();
        assert_eq!(registry.config(), &EngineConfig::default());
    }

    #[test]
    fn build_rejects_invalid_config() {
        let result = RegistryBuilder::new()
            .config(EngineConfig {
                list_page_size: 0,
                ..EngineConfig::default()
            })
            .build();
        assert!(matches!(result, Err(SpindleError::Config(_))));
    }
}
