//! Impls - port implementations.
//!
//! - **InMemoryStore**: in-process `EntryStore`, used by tests and the CLI

pub mod inmem_store;

pub use self::inmem_store::InMemoryStore;
