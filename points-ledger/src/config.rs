//! Configuration for the points ledger

use serde::{Deserialize, Serialize};

/// Ledger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Service name
    pub service_name: String,

    /// Service version
    pub service_version: String,

    /// Actor configuration
    pub actor: ActorConfig,

    /// Metrics configuration
    pub metrics: MetricsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "points-ledger".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            actor: ActorConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

/// Actor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorConfig {
    /// Mailbox capacity (pending requests before senders wait)
    pub mailbox_capacity: usize,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            mailbox_capacity: 1000,
        }
    }
}

/// Metrics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Record Prometheus metrics
    pub enabled: bool,

    /// Metric name prefix
    pub namespace: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            namespace: "points".to_string(),
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(capacity) = std::env::var("POINTS_LEDGER_MAILBOX_CAPACITY") {
            config.actor.mailbox_capacity = capacity.parse().map_err(|e| {
                crate::Error::Config(format!("Invalid POINTS_LEDGER_MAILBOX_CAPACITY: {}", e))
            })?;
        }

        if let Ok(enabled) = std::env::var("POINTS_LEDGER_METRICS_ENABLED") {
            config.metrics.enabled = enabled.parse().map_err(|e| {
                crate::Error::Config(format!("Invalid POINTS_LEDGER_METRICS_ENABLED: {}", e))
            })?;
        }

        if let Ok(namespace) = std::env::var("POINTS_LEDGER_METRICS_NAMESPACE") {
            config.metrics.namespace = namespace;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check values the ledger cannot run with
    pub fn validate(&self) -> crate::Result<()> {
        if self.actor.mailbox_capacity == 0 {
            return Err(crate::Error::Config(
                "Actor mailbox capacity cannot be 0".to_string(),
            ));
        }
        if self.metrics.enabled && self.metrics.namespace.is_empty() {
            return Err(crate::Error::Config(
                "Metrics namespace is required when metrics are enabled".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.service_name, "points-ledger");
        assert_eq!(config.actor.mailbox_capacity, 1000);
        assert!(config.metrics.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[actor]\nmailbox_capacity = 8").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.actor.mailbox_capacity, 8);
        assert_eq!(config.metrics.namespace, "points");
    }

    #[test]
    fn test_zero_mailbox_rejected() {
        let mut config = Config::default();
        config.actor.mailbox_capacity = 0;
        assert!(matches!(config.validate(), Err(crate::Error::Config(_))));
    }
}
