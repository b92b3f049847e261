//! Error types for the points ledger

use thiserror::Error;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ledger errors
#[derive(Error, Debug)]
pub enum Error {
    /// Spend amount is negative
    #[error("Invalid spend amount: {0}")]
    InvalidSpend(i64),

    /// Spend exceeds the total balance across all payers
    #[error("Insufficient points: requested {requested}, available {available}")]
    InsufficientPoints {
        /// Points requested by the spend
        requested: i64,
        /// Total points on record
        available: i64,
    },

    /// Contribution rejected before reaching the allocator
    #[error("Invalid contribution: {0}")]
    InvalidContribution(String),

    /// Result of point arithmetic does not fit in an `i64`
    #[error("Points out of range: {0}")]
    Overflow(String),

    /// Invariant violation (point conservation, queue exhausted mid-spend)
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Concurrency error (actor mailbox closed, etc.)
    #[error("Concurrency error: {0}")]
    Concurrency(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Metrics registration error
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the caller can fix the request and retry
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::InvalidSpend(_)
                | Error::InsufficientPoints { .. }
                | Error::InvalidContribution(_)
                | Error::Overflow(_)
        )
    }
}
