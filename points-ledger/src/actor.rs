//! Actor-based concurrency for the points ledger
//!
//! This module implements the single-writer pattern using Tokio actors:
//! - One task owns the allocator, so the balance ledger and contribution
//!   queue are only ever touched from one place
//! - A spend's precheck and mutation run inside one message, making it
//!   all-or-nothing with respect to every other request
//! - Bounded mailbox gives backpressure
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │              HTTP handlers (actix-web)                │
//! │             Many concurrent requests                  │
//! └─────────────────────┬────────────────────────────────┘
//!                       │
//!                       ▼
//! ┌──────────────────────────────────────────────────────┐
//! │               PointsHandle (Clone)                    │
//! │         Sends messages to actor mailbox              │
//! └─────────────────────┬────────────────────────────────┘
//!                       │
//!                       │ mpsc::channel (bounded)
//!                       ▼
//! ┌──────────────────────────────────────────────────────┐
//! │              PointsActor (Single Task)                │
//! │  ┌────────────────────────────────────────────────┐  │
//! │  │ SpendAllocator                                 │  │
//! │  │   ContributionQueue + BalanceLedger            │  │
//! │  └────────────────────────────────────────────────┘  │
//! └───────────────────────────────────────────────────────┘
//! ```

use crate::types::{BalanceSnapshot, Contribution, SpendAllocation};
use crate::{Error, Result, SpendAllocator};
use tokio::sync::{mpsc, oneshot};

/// Message sent to the points actor
#[derive(Debug)]
pub enum PointsMessage {
    /// Record a new contribution
    RecordContribution {
        contribution: Contribution,
        response: oneshot::Sender<Result<()>>,
    },

    /// Spend points oldest-first
    AllocateSpend {
        amount: i64,
        response: oneshot::Sender<Result<SpendAllocation>>,
    },

    /// Snapshot of all balances
    GetBalances {
        response: oneshot::Sender<BalanceSnapshot>,
    },

    /// Total balance across payers
    GetTotal {
        response: oneshot::Sender<i64>,
    },

    /// Number of outstanding contributions
    GetOutstanding {
        response: oneshot::Sender<usize>,
    },

    /// Verify balances match outstanding contributions
    CheckConservation {
        response: oneshot::Sender<Result<()>>,
    },

    /// Shutdown actor
    Shutdown,
}

/// Actor that owns the allocator
#[derive(Debug)]
pub struct PointsActor {
    /// Ledger state
    allocator: SpendAllocator,

    /// Mailbox for incoming messages
    mailbox: mpsc::Receiver<PointsMessage>,
}

impl PointsActor {
    /// Create new actor
    pub fn new(allocator: SpendAllocator, mailbox: mpsc::Receiver<PointsMessage>) -> Self {
        Self { allocator, mailbox }
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        while let Some(msg) = self.mailbox.recv().await {
            if let PointsMessage::Shutdown = msg {
                tracing::info!(
                    outstanding = self.allocator.outstanding(),
                    "Points actor shutting down"
                );
                break;
            }
            self.handle_message(msg);
        }
    }

    /// Handle a single message
    fn handle_message(&mut self, msg: PointsMessage) {
        match msg {
            PointsMessage::RecordContribution { contribution, response } => {
                let _ = response.send(self.allocator.record_contribution(contribution));
            }

            PointsMessage::AllocateSpend { amount, response } => {
                let result = self.allocator.allocate_spend(amount);
                if let Err(Error::InvariantViolation(ref reason)) = result {
                    tracing::error!("Allocator out of step with ledger: {}", reason);
                }
                let _ = response.send(result);
            }

            PointsMessage::GetBalances { response } => {
                let _ = response.send(self.allocator.balances());
            }

            PointsMessage::GetTotal { response } => {
                let _ = response.send(self.allocator.total());
            }

            PointsMessage::GetOutstanding { response } => {
                let _ = response.send(self.allocator.outstanding());
            }

            PointsMessage::CheckConservation { response } => {
                let _ = response.send(self.allocator.check_conservation());
            }

            PointsMessage::Shutdown => {
                // Handled in run loop
            }
        }
    }
}

/// Handle for sending messages to the actor
#[derive(Debug, Clone)]
pub struct PointsHandle {
    sender: mpsc::Sender<PointsMessage>,
}

impl PointsHandle {
    /// Create new handle
    pub fn new(sender: mpsc::Sender<PointsMessage>) -> Self {
        Self { sender }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> PointsMessage,
    ) -> Result<T> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(build(tx))
            .await
            .map_err(|_| Error::Concurrency("Actor mailbox closed".to_string()))?;

        rx.await
            .map_err(|_| Error::Concurrency("Response channel closed".to_string()))
    }

    /// Record a contribution
    pub async fn record_contribution(&self, contribution: Contribution) -> Result<()> {
        self.request(|response| PointsMessage::RecordContribution {
            contribution,
            response,
        })
        .await?
    }

    /// Spend points oldest-first
    pub async fn allocate_spend(&self, amount: i64) -> Result<SpendAllocation> {
        self.request(|response| PointsMessage::AllocateSpend { amount, response })
            .await?
    }

    /// Snapshot of all balances
    pub async fn balances(&self) -> Result<BalanceSnapshot> {
        self.request(|response| PointsMessage::GetBalances { response })
            .await
    }

    /// Total balance across payers
    pub async fn total(&self) -> Result<i64> {
        self.request(|response| PointsMessage::GetTotal { response })
            .await
    }

    /// Number of outstanding contributions
    pub async fn outstanding(&self) -> Result<usize> {
        self.request(|response| PointsMessage::GetOutstanding { response })
            .await
    }

    /// Verify balances match outstanding contributions
    pub async fn check_conservation(&self) -> Result<()> {
        self.request(|response| PointsMessage::CheckConservation { response })
            .await?
    }

    /// Shutdown actor
    pub async fn shutdown(&self) -> Result<()> {
        self.sender
            .send(PointsMessage::Shutdown)
            .await
            .map_err(|_| Error::Concurrency("Actor mailbox closed".to_string()))?;
        Ok(())
    }
}

/// Spawn the points actor
pub fn spawn_points_actor(allocator: SpendAllocator, mailbox_capacity: usize) -> PointsHandle {
    let (tx, rx) = mpsc::channel(mailbox_capacity.max(1)); // Bounded channel for backpressure
    let actor = PointsActor::new(allocator, rx);

    tokio::spawn(async move {
        actor.run().await;
    });

    PointsHandle::new(tx)
}
