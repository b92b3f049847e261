//! Per-payer running balances

use crate::types::{BalanceSnapshot, PayerId};
use crate::{Error, Result};
use std::collections::{BTreeMap, HashMap};

/// Running signed balance for every payer ever credited
///
/// The total is maintained alongside the map so the spend precheck stays O(1).
#[derive(Debug, Default, Clone)]
pub struct BalanceLedger {
    balances: HashMap<PayerId, i64>,
    total: i64,
}

impl BalanceLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` (any sign) to the payer's balance
    ///
    /// Nothing changes when the payer balance or the total would overflow.
    pub fn credit(&mut self, payer: &PayerId, amount: i64) -> Result<()> {
        let current = self.balance(payer).unwrap_or(0);
        let (Some(balance), Some(total)) =
            (current.checked_add(amount), self.total.checked_add(amount))
        else {
            return Err(Error::Overflow(format!(
                "crediting {} to payer '{}' (balance {}, total {})",
                amount, payer, current, self.total
            )));
        };

        self.balances.insert(payer.clone(), balance);
        self.total = total;
        Ok(())
    }

    /// Apply a set of per-payer deltas as one unit
    ///
    /// Every new balance is computed before any is written.
    pub fn apply(&mut self, deltas: &BTreeMap<PayerId, i64>) -> Result<()> {
        let mut updated = Vec::with_capacity(deltas.len());
        for (payer, delta) in deltas {
            let current = self.balance(payer).unwrap_or(0);
            let balance = current.checked_add(*delta).ok_or_else(|| {
                Error::Overflow(format!(
                    "applying {} to payer '{}' (balance {})",
                    delta, payer, current
                ))
            })?;
            updated.push((payer.clone(), balance));
        }

        let change: i128 = deltas.values().map(|delta| i128::from(*delta)).sum();
        let total = i64::try_from(i128::from(self.total) + change).map_err(|_| {
            Error::Overflow(format!("ledger total {} changed by {}", self.total, change))
        })?;

        self.balances.extend(updated);
        self.total = total;
        Ok(())
    }

    /// Balance for a single payer
    pub fn balance(&self, payer: &PayerId) -> Option<i64> {
        self.balances.get(payer).copied()
    }

    /// Copy of every balance
    pub fn snapshot(&self) -> BalanceSnapshot {
        self.balances
            .iter()
            .map(|(payer, balance)| (payer.clone(), *balance))
            .collect::<std::collections::BTreeMap<_, _>>()
            .into()
    }

    /// Sum of all balances
    pub fn total(&self) -> i64 {
        self.total
    }

    /// Number of payers on record
    pub fn len(&self) -> usize {
        self.balances.len()
    }

    /// True when no payer has been credited
    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }
}
