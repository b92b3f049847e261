use config::{ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub ledger: LedgerConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LedgerConfig {
    pub mailbox_capacity: usize,
    pub metrics_enabled: bool,
    pub metrics_namespace: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let mut builder = config::Config::builder()
            // Start with default configuration
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("server.workers", 4)?
            .set_default("ledger.mailbox_capacity", 1000)?
            .set_default("ledger.metrics_enabled", true)?
            .set_default("ledger.metrics_namespace", "points")?;

        // Add environment-specific config file if it exists
        if let Ok(config_file) = env::var("CONFIG_FILE") {
            builder = builder.add_source(File::with_name(&config_file).required(false));
        } else {
            builder = builder.add_source(
                File::with_name(&format!("config/{}", environment)).required(false),
            );
        }

        // Override with environment variables
        builder = builder.add_source(Environment::with_prefix("POINTS_ENGINE").separator("__"));

        if let Ok(port) = env::var("PORT") {
            builder = builder.set_override("server.port", port)?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("Server port cannot be 0".to_string());
        }

        if self.server.workers == 0 {
            return Err("At least one worker is required".to_string());
        }

        if self.ledger.mailbox_capacity == 0 {
            return Err("Ledger mailbox capacity cannot be 0".to_string());
        }

        Ok(())
    }

    /// Settings for the embedded points ledger
    pub fn ledger_config(&self) -> points_ledger::Config {
        let mut config = points_ledger::Config::default();
        config.service_name = "points-engine".to_string();
        config.actor.mailbox_capacity = self.ledger.mailbox_capacity;
        config.metrics.enabled = self.ledger.metrics_enabled;
        config.metrics.namespace = self.ledger.metrics_namespace.clone();
        config
    }
}
