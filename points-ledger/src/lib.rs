//! Points Ledger Core
//!
//! Multi-payer point balances with oldest-first spend allocation.
//!
//! # Architecture
//!
//! - **Balance Ledger**: Running signed balance per payer
//! - **Contribution Queue**: Min-heap of outstanding contributions by timestamp
//! - **Spend Allocator**: Consumes contributions oldest-first to satisfy a spend
//! - **Single Writer**: One actor task owns the allocator and serializes all operations
//!
//! # Invariants
//!
//! - Point conservation: Σ(balances) == Σ(outstanding contribution points)
//! - All-or-nothing spends: a rejected spend leaves every balance untouched
//! - Deterministic ordering: equal timestamps are consumed in insertion order

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod types;
pub mod balance;
pub mod queue;
pub mod allocator;
pub mod error;
pub mod actor;
pub mod ledger;
pub mod config;
pub mod metrics;

// Re-exports
pub use error::{Error, Result};
pub use types::{BalanceSnapshot, Contribution, PayerId, SpendAllocation};
pub use balance::BalanceLedger;
pub use queue::ContributionQueue;
pub use allocator::SpendAllocator;
pub use ledger::PointsLedger;
pub use config::Config;
