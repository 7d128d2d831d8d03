//! Core Kernel - Foundational types shared by the debt and recovery ledgers
//!
//! This crate provides the building blocks used across the domain crates:
//! - Amount parsing and display helpers on top of `rust_decimal`
//! - Calendar helpers (ISO dates, month keys, billing days, local "today")
//! - Loan identifiers
//! - The key-value store port that persistence adapters implement

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod ports;

pub use money::{
    parse_amount, read_number, sum_amounts, format_inr, format_signed, MoneyError,
    AMOUNT_PRECISION,
};
pub use temporal::{
    parse_iso_date, normalize_date, same_month, days_in_month, clamp_to_month,
    MonthKey, Timezone, TemporalError,
};
pub use identifiers::LoanId;
pub use ports::{
    KeyValueStore, KeyValueStoreExt, PortError, DomainPort,
    HealthCheckable, HealthCheckResult, AdapterHealth,
};
