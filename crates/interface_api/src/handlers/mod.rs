//! Request handlers

pub mod health;
pub mod loans;
pub mod pnl;
pub mod progress;
