//! Oldest-first spend allocation
//!
//! The allocator owns the contribution queue and the balance ledger as one
//! unit. Recording a contribution touches both; a spend walks the queue from
//! the earliest timestamp, charging each contribution's payer until the
//! requested amount is covered.
//!
//! # Algorithm
//!
//! ```text
//! while amount > 0:
//!     head = queue.peek_min()
//!     if head.points >= amount:
//!         charge(head.payer, amount)
//!         head.points -= amount        (pop if it hits exactly zero)
//!         amount = 0
//!     else:
//!         charge(head.payer, head.points)
//!         amount -= head.points
//!         queue.pop_min()
//! ```
//!
//! Zero and negative contributions fall into the second branch, so a
//! correction at the head reduces its payer's charge and raises the amount
//! still owed.
//!
//! The walk runs on `i128` so a run of large corrections cannot overflow it.
//! If the resulting balances do not fit in `i64`, every contribution the walk
//! touched is put back and the spend fails.

use crate::{
    balance::BalanceLedger,
    queue::{ContributionQueue, QueuedContribution},
    types::{BalanceSnapshot, Contribution, PayerId, SpendAllocation},
    Error, Result,
};
use std::collections::BTreeMap;

/// Contribution queue and balance ledger kept in lockstep
#[derive(Debug, Default, Clone)]
pub struct SpendAllocator {
    queue: ContributionQueue,
    ledger: BalanceLedger,
}

impl SpendAllocator {
    /// Create an empty allocator
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a contribution and credit its payer
    ///
    /// The sign of `points` is not checked. A contribution that would push
    /// its payer's balance or the total out of range is rejected and leaves
    /// both the queue and the ledger untouched.
    pub fn record_contribution(&mut self, contribution: Contribution) -> Result<()> {
        tracing::debug!(
            payer = %contribution.payer,
            points = contribution.points,
            timestamp = %contribution.timestamp,
            "Recording contribution"
        );

        if let Err(e) = self.ledger.credit(&contribution.payer, contribution.points) {
            tracing::warn!(payer = %contribution.payer, "Contribution rejected: {}", e);
            return Err(Error::InvalidContribution(format!(
                "Points value: '{}' would take the balance of payer '{}' out of range.",
                contribution.points, contribution.payer
            )));
        }
        self.queue.push(contribution);
        Ok(())
    }

    /// Spend `amount` points, oldest contributions first
    ///
    /// Fails without touching any state when `amount` is negative or larger
    /// than the total balance.
    pub fn allocate_spend(&mut self, amount: i64) -> Result<SpendAllocation> {
        if amount < 0 {
            return Err(Error::InvalidSpend(amount));
        }

        let available = self.ledger.total();
        if available < amount {
            return Err(Error::InsufficientPoints {
                requested: amount,
                available,
            });
        }

        let mut remaining = i128::from(amount);
        let mut deductions: BTreeMap<PayerId, i128> = BTreeMap::new();
        let mut consumed: Vec<QueuedContribution> = Vec::new();
        let mut trimmed: Option<i64> = None;

        while remaining > 0 {
            let Some(head) = self.queue.peek_min() else {
                tracing::error!(
                    requested = amount,
                    remaining = %remaining,
                    ledger_total = self.ledger.total(),
                    "Contribution queue exhausted during spend"
                );
                self.undo_walk(consumed, trimmed);
                return Err(Error::InvariantViolation(format!(
                    "contribution queue exhausted with {} of {} points unallocated",
                    remaining, amount
                )));
            };

            let payer = head.payer.clone();
            let points = i128::from(head.points);

            if points >= remaining {
                *deductions.entry(payer).or_insert(0) += remaining;
                // 0 <= left < points, so it fits back into an i64
                let left = (points - remaining) as i64;
                if left == 0 {
                    consumed.extend(self.queue.pop_min_entry());
                } else {
                    trimmed = self.queue.replace_min_points(left);
                }
                remaining = 0;
            } else {
                *deductions.entry(payer).or_insert(0) += points;
                remaining -= points;
                consumed.extend(self.queue.pop_min_entry());
            }
        }

        let deltas = deductions
            .into_iter()
            .map(|(payer, deducted)| match i64::try_from(-deducted) {
                Ok(delta) => Ok((payer, delta)),
                Err(_) => Err(Error::Overflow(format!(
                    "payer '{}' charged {} points",
                    payer, deducted
                ))),
            })
            .collect::<Result<BTreeMap<PayerId, i64>>>()
            .and_then(|deltas| self.ledger.apply(&deltas).map(|()| deltas));

        let deltas = match deltas {
            Ok(deltas) => deltas,
            Err(e) => {
                tracing::warn!(amount, "Spend undone: {}", e);
                self.undo_walk(consumed, trimmed);
                return Err(e);
            }
        };

        tracing::debug!(amount, payers = deltas.len(), "Spend allocated");

        Ok(deltas.into())
    }

    /// Put the queue back the way it was before a spend walked it
    fn undo_walk(&mut self, consumed: Vec<QueuedContribution>, trimmed: Option<i64>) {
        // The trimmed contribution is still at the head until the popped ones return
        if let Some(points) = trimmed {
            self.queue.replace_min_points(points);
        }
        for queued in consumed {
            self.queue.restore(queued);
        }
    }

    /// Copy of every payer's balance
    pub fn balances(&self) -> BalanceSnapshot {
        self.ledger.snapshot()
    }

    /// Total balance across all payers
    pub fn total(&self) -> i64 {
        self.ledger.total()
    }

    /// Number of contributions not yet fully spent
    pub fn outstanding(&self) -> usize {
        self.queue.len()
    }

    /// Outstanding contributions in the order they will be spent
    pub fn pending_contributions(&self) -> Vec<Contribution> {
        self.queue.iter_ordered()
    }

    /// Verify that balances and outstanding contributions agree
    pub fn check_conservation(&self) -> Result<()> {
        let ledger_total = self.ledger.total();
        let queued_total = self.queue.total_points();
        if i128::from(ledger_total) != queued_total {
            return Err(Error::InvariantViolation(format!(
                "ledger total {} does not match outstanding contributions {}",
                ledger_total, queued_total
            )));
        }
        Ok(())
    }
}
