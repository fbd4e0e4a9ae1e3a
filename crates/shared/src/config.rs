//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Consolidation scheduler configuration.
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    /// Rate solver configuration.
    #[serde(default)]
    pub solver: SolverConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Consolidation scheduler configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    /// IANA time zone the 8th/23rd cut days are evaluated in.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Seconds between scheduler ticks.
    #[serde(default = "default_tick_interval")]
    pub tick_interval_secs: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            tick_interval_secs: default_tick_interval(),
        }
    }
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_tick_interval() -> u64 {
    3600 // hourly; a cycle runs at most once per local day
}

/// Rate solver configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SolverConfig {
    /// Stop once the computed installment is closer than this to the target.
    #[serde(default = "default_tolerance")]
    pub tolerance: Decimal,
    /// Bisection step limit.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
    /// Upper bound of the searched rate, in percent.
    #[serde(default = "default_rate_ceiling")]
    pub rate_ceiling: Decimal,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            max_iterations: default_max_iterations(),
            rate_ceiling: default_rate_ceiling(),
        }
    }
}

fn default_tolerance() -> Decimal {
    Decimal::new(1, 2)
}

fn default_max_iterations() -> u32 {
    100
}

fn default_rate_ceiling() -> Decimal {
    Decimal::ONE_HUNDRED
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("LENDFUND").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
