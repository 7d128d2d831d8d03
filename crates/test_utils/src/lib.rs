//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! ledger test suites.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built loans, dates and PnL snapshots
//! - `builders`: Builder patterns for test data construction
//! - `doubles`: Store doubles, including one that always fails
//! - `assertions`: Custom assertion helpers for domain types
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod doubles;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use doubles::*;
pub use assertions::*;
pub use generators::*;
