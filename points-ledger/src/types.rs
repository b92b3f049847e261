//! Core types for the points ledger
//!
//! All types are designed for:
//! - Deterministic serialization (ordered maps)
//! - Memory safety (no unsafe code)
//! - Exact arithmetic (integer points)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Payer identifier (partner brand, sponsor, etc.)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PayerId(String);

impl PayerId {
    /// Create new payer ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the identifier has no visible characters
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for PayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PayerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// One recorded inflow of points from a payer
///
/// Negative `points` are corrections against earlier contributions and are
/// ordered and consumed like any other entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    /// Payer the points belong to
    pub payer: PayerId,

    /// Remaining points (signed)
    pub points: i64,

    /// When the points were awarded; used only for ordering
    pub timestamp: DateTime<Utc>,
}

impl Contribution {
    /// Create new contribution
    pub fn new(payer: impl Into<PayerId>, points: i64, timestamp: DateTime<Utc>) -> Self {
        Self {
            payer: payer.into(),
            points,
            timestamp,
        }
    }
}

/// Result of a spend: payer -> points removed, expressed as a negative number
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpendAllocation(BTreeMap<PayerId, i64>);

impl SpendAllocation {
    /// Delta charged to a payer, if they took part in the spend
    pub fn get(&self, payer: &str) -> Option<i64> {
        self.0.get(&PayerId::new(payer)).copied()
    }

    /// Number of payers charged
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no payer was charged (zero-point spend)
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all deltas (equals the negated spend amount)
    pub fn total(&self) -> i64 {
        // Wrapping partial sums still land on the exact total whenever it fits
        self.0.values().fold(0i64, |acc, v| acc.wrapping_add(*v))
    }

    /// Iterate payer/delta pairs in payer order
    pub fn iter(&self) -> impl Iterator<Item = (&PayerId, &i64)> {
        self.0.iter()
    }
}

impl From<BTreeMap<PayerId, i64>> for SpendAllocation {
    fn from(deltas: BTreeMap<PayerId, i64>) -> Self {
        Self(deltas)
    }
}

/// Point-in-time copy of every payer's balance
///
/// An empty snapshot is a valid answer, not a failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BalanceSnapshot(BTreeMap<PayerId, i64>);

impl BalanceSnapshot {
    /// Balance for one payer
    pub fn get(&self, payer: &str) -> Option<i64> {
        self.0.get(&PayerId::new(payer)).copied()
    }

    /// Number of payers on record
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no payer has ever been credited
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all balances
    pub fn total(&self) -> i64 {
        // Wrapping partial sums still land on the exact total whenever it fits
        self.0.values().fold(0i64, |acc, v| acc.wrapping_add(*v))
    }

    /// Iterate payer/balance pairs in payer order
    pub fn iter(&self) -> impl Iterator<Item = (&PayerId, &i64)> {
        self.0.iter()
    }
}

impl From<BTreeMap<PayerId, i64>> for BalanceSnapshot {
    fn from(balances: BTreeMap<PayerId, i64>) -> Self {
        Self(balances)
    }
}
