//! Metrics collection for observability
//!
//! This module provides Prometheus metrics for monitoring the points ledger.
//! Each collector owns its registry, so several ledgers can live in one
//! process (tests, embedded use) without name clashes.
//!
//! # Metrics
//!
//! - `{ns}_contributions_total` - Contributions recorded
//! - `{ns}_spends_total` - Spends allocated successfully
//! - `{ns}_spends_rejected_total` - Spends refused (invalid or insufficient)
//! - `{ns}_points_spent_total` - Points removed by successful spends
//! - `{ns}_outstanding_contributions` - Contributions not yet fully spent
//! - `{ns}_allocation_duration_seconds` - Histogram of spend latencies

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntGauge, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

/// Metrics collector
#[derive(Clone)]
pub struct Metrics {
    /// Contributions recorded
    pub contributions_total: IntCounter,

    /// Successful spends
    pub spends_total: IntCounter,

    /// Rejected spends
    pub spends_rejected_total: IntCounter,

    /// Points spent
    pub points_spent_total: IntCounter,

    /// Outstanding contributions
    pub outstanding_contributions: IntGauge,

    /// Spend latency histogram
    pub allocation_duration: Histogram,

    /// Prometheus registry
    pub registry: Arc<Registry>,
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics")
            .field("contributions_total", &self.contributions_total.get())
            .field("spends_total", &self.spends_total.get())
            .finish_non_exhaustive()
    }
}

impl Metrics {
    /// Create new metrics collector with the given name prefix
    pub fn new(namespace: &str) -> prometheus::Result<Self> {
        let registry = Arc::new(Registry::new());

        let contributions_total = IntCounter::with_opts(
            Opts::new("contributions_total", "Total number of contributions recorded")
                .namespace(namespace),
        )?;
        registry.register(Box::new(contributions_total.clone()))?;

        let spends_total = IntCounter::with_opts(
            Opts::new("spends_total", "Total number of spends allocated").namespace(namespace),
        )?;
        registry.register(Box::new(spends_total.clone()))?;

        let spends_rejected_total = IntCounter::with_opts(
            Opts::new("spends_rejected_total", "Total number of spends rejected")
                .namespace(namespace),
        )?;
        registry.register(Box::new(spends_rejected_total.clone()))?;

        let points_spent_total = IntCounter::with_opts(
            Opts::new("points_spent_total", "Total points removed by spends").namespace(namespace),
        )?;
        registry.register(Box::new(points_spent_total.clone()))?;

        let outstanding_contributions = IntGauge::with_opts(
            Opts::new(
                "outstanding_contributions",
                "Contributions with unspent points",
            )
            .namespace(namespace),
        )?;
        registry.register(Box::new(outstanding_contributions.clone()))?;

        let allocation_duration = Histogram::with_opts(
            HistogramOpts::new(
                "allocation_duration_seconds",
                "Histogram of spend allocation latencies",
            )
            .namespace(namespace)
            .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.010, 0.050, 0.100, 0.500, 1.0]),
        )?;
        registry.register(Box::new(allocation_duration.clone()))?;

        Ok(Self {
            contributions_total,
            spends_total,
            spends_rejected_total,
            points_spent_total,
            outstanding_contributions,
            allocation_duration,
            registry,
        })
    }

    /// Record a contribution
    pub fn record_contribution(&self) {
        self.contributions_total.inc();
    }

    /// Record a successful spend
    pub fn record_spend(&self, points: i64, duration_seconds: f64) {
        self.spends_total.inc();
        self.points_spent_total.inc_by(points.max(0) as u64);
        self.allocation_duration.observe(duration_seconds);
    }

    /// Record a rejected spend
    pub fn record_spend_rejected(&self) {
        self.spends_rejected_total.inc();
    }

    /// Update outstanding contribution count
    pub fn update_outstanding(&self, outstanding: usize) {
        self.outstanding_contributions.set(outstanding as i64);
    }

    /// Get metrics registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Render all metrics in the Prometheus text format
    pub fn render(&self) -> prometheus::Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new("points").unwrap();
        assert_eq!(metrics.contributions_total.get(), 0);
        assert_eq!(metrics.spends_total.get(), 0);
    }

    #[test]
    fn test_independent_registries() {
        let first = Metrics::new("points").unwrap();
        let second = Metrics::new("points").unwrap();
        first.record_contribution();
        assert_eq!(first.contributions_total.get(), 1);
        assert_eq!(second.contributions_total.get(), 0);
    }

    #[test]
    fn test_record_spend() {
        let metrics = Metrics::new("points").unwrap();
        metrics.record_spend(5000, 0.0002);
        metrics.record_spend_rejected();
        assert_eq!(metrics.spends_total.get(), 1);
        assert_eq!(metrics.points_spent_total.get(), 5000);
        assert_eq!(metrics.spends_rejected_total.get(), 1);
    }

    #[test]
    fn test_render_text_format() {
        let metrics = Metrics::new("points").unwrap();
        metrics.update_outstanding(3);
        let body = metrics.render().unwrap();
        assert!(body.contains("points_outstanding_contributions 3"));
        assert!(body.contains("points_contributions_total 0"));
    }
}
