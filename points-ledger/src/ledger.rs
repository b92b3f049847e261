//! Main ledger orchestration layer
//!
//! This module ties together the allocator, actor and metrics components
//! into a high-level API for recording and spending points.
//!
//! # Example
//!
//! ```no_run
//! use points_ledger::{Config, PointsLedger};
//!
//! #[tokio::main]
//! async fn main() -> points_ledger::Result<()> {
//!     let ledger = PointsLedger::open(Config::default())?;
//!
//!     let timestamp = "2020-11-02T14:00:00Z".parse().unwrap();
//!     ledger.record_contribution("DANNON", 1000, timestamp).await?;
//!     let spent = ledger.allocate_spend(500).await?;
//!     assert_eq!(spent.get("DANNON"), Some(-500));
//!
//!     ledger.shutdown().await
//! }
//! ```

use crate::{
    actor::{spawn_points_actor, PointsHandle},
    metrics::Metrics,
    types::{BalanceSnapshot, Contribution, PayerId, SpendAllocation},
    Config, Error, Result, SpendAllocator,
};
use chrono::{DateTime, Utc};
use std::time::Instant;

/// Main ledger interface
///
/// Cheap to clone; every clone talks to the same actor.
#[derive(Debug, Clone)]
pub struct PointsLedger {
    /// Actor handle for all state access
    handle: PointsHandle,

    /// Metrics (if enabled)
    metrics: Option<Metrics>,

    /// Configuration
    config: Config,
}

impl PointsLedger {
    /// Open an empty ledger with configuration
    ///
    /// Must be called from within a Tokio runtime.
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;

        let metrics = if config.metrics.enabled {
            Some(Metrics::new(&config.metrics.namespace)?)
        } else {
            None
        };

        let handle = spawn_points_actor(SpendAllocator::new(), config.actor.mailbox_capacity);

        tracing::info!(
            service = %config.service_name,
            mailbox_capacity = config.actor.mailbox_capacity,
            "Points ledger opened"
        );

        Ok(Self {
            handle,
            metrics,
            config,
        })
    }

    /// Record points awarded by a payer
    pub async fn record_contribution(
        &self,
        payer: impl Into<PayerId>,
        points: i64,
        timestamp: DateTime<Utc>,
    ) -> Result<()> {
        let payer = payer.into();
        if payer.is_blank() {
            return Err(Error::InvalidContribution(
                "Payer must be a non-empty identifier".to_string(),
            ));
        }

        self.handle
            .record_contribution(Contribution::new(payer, points, timestamp))
            .await?;

        if let Some(ref metrics) = self.metrics {
            metrics.record_contribution();
            self.refresh_outstanding(metrics).await;
        }

        Ok(())
    }

    /// Spend points, oldest contributions first
    pub async fn allocate_spend(&self, amount: i64) -> Result<SpendAllocation> {
        let started = Instant::now();
        let result = self.handle.allocate_spend(amount).await;

        match (&result, &self.metrics) {
            (Ok(_), Some(metrics)) => {
                metrics.record_spend(amount, started.elapsed().as_secs_f64());
                self.refresh_outstanding(metrics).await;
            }
            (Err(e), metrics) => {
                tracing::warn!(amount, "Spend rejected: {}", e);
                if let Some(metrics) = metrics {
                    metrics.record_spend_rejected();
                }
            }
            (Ok(_), None) => {}
        }

        result
    }

    /// Update the outstanding gauge; the change it reports has already landed
    async fn refresh_outstanding(&self, metrics: &Metrics) {
        match self.handle.outstanding().await {
            Ok(outstanding) => metrics.update_outstanding(outstanding),
            Err(e) => tracing::warn!("Failed to refresh outstanding gauge: {}", e),
        }
    }

    /// Current balance of every payer
    pub async fn balances(&self) -> Result<BalanceSnapshot> {
        self.handle.balances().await
    }

    /// Total balance across all payers
    pub async fn total(&self) -> Result<i64> {
        self.handle.total().await
    }

    /// Number of contributions with unspent points
    pub async fn outstanding(&self) -> Result<usize> {
        self.handle.outstanding().await
    }

    /// Check point conservation invariant
    ///
    /// Sum of balances must equal the points left on outstanding contributions.
    pub async fn check_conservation(&self) -> Result<()> {
        self.handle.check_conservation().await
    }

    /// Metrics collector, when enabled
    pub fn metrics(&self) -> Option<&Metrics> {
        self.metrics.as_ref()
    }

    /// Configuration the ledger was opened with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Shutdown ledger
    pub async fn shutdown(&self) -> Result<()> {
        self.handle.shutdown().await
    }
}
