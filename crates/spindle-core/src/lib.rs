//! spindle-core
//!
//! Multi-queue priority and delay extraction engine.
//!
//! # Modules
//! - **domain**: value types (Entry, Priority, OrderKey, AddOptions, Metadata, QueueName, errors)
//! - **ports**: seams to external collaborators (EntryStore, Clock)
//! - **impls**: port implementations (InMemoryStore)
//! - **queue**: ordering and extraction over one named queue
//! - **registry**: multi-queue lifecycle (QueueRegistry, RegistryBuilder)
//! - **config**: engine tunables
//! - **telemetry**: tracing subscriber setup for binaries
//!
//! ```ignore
//! let registry = QueueRegistry::in_memory();
//! let jobs = registry.queue("jobs")?;
//! jobs.add("resize:42", AddOptions::new().with_priority(5)).await?;
//! if let Some(item) = jobs.remove().await? {
//!     println!("{:?} {:?}", item.payload(), item.metadata());
//! }
//! ```

pub mod config;
pub mod domain;
pub mod impls;
pub mod ports;
pub mod queue;
pub mod registry;
pub mod telemetry;

pub use config::EngineConfig;
pub use domain::{AddOptions, Item, Metadata, QueueName, Result, SpindleError};
pub use impls::InMemoryStore;
pub use ports::{Clock, EntryStore, FixedClock, StoreError, SystemClock};
pub use queue::Queue;
pub use registry::{QueueRegistry, RegistryBuilder};
