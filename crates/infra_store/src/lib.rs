//! Infrastructure Storage Layer
//!
//! This crate provides the adapters behind the kernel's `KeyValueStore` port.
//!
//! # Adapters
//!
//! - [`InMemoryStore`]: process-local map, used for tests and ephemeral runs
//! - [`JsonFileStore`]: one JSON file per key under a data directory, written
//!   atomically (temporary file + rename)
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_store::{StoreConfig, open_store};
//!
//! let store = open_store(&StoreConfig::file("./data")).await?;
//! let loans = LoanLedger::load(store.clone(), LoanStorageKeys::default()).await;
//! ```

pub mod config;
pub mod error;
pub mod memory;
pub mod file;

pub use config::{StoreConfig, StoreBackend, open_store};
pub use error::StoreError;
pub use memory::InMemoryStore;
pub use file::JsonFileStore;
