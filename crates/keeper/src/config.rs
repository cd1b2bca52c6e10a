use std::fs;
use serde::{Deserialize, Serialize};
use synthpool_core::MarketHours;
use synthpool_types::{
    SynthPoolError, SynthPoolResult, MARKET_TIMEZONE,
};

use crate::error::KeeperResult;

/// Prefix for environment overrides, e.g. `SYNTHPOOL__SUBGRAPH_URL` or
/// `SYNTHPOOL__RETRY__MAX_RETRIES`
pub const ENV_PREFIX: &str = "SYNTHPOOL";

/// Keeper configuration loaded from TOML file
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct KeeperConfig {
    /// GraphQL endpoint of the protocol subgraph
    pub subgraph_url: String,

    /// Seconds between polling rounds
    pub poll_interval_secs: u64,

    /// HTTP timeout for a single subgraph query
    pub request_timeout_secs: u64,

    /// Reference market hours
    #[serde(default)]
    pub market: MarketHoursConfig,

    /// Retry configuration
    #[serde(default)]
    pub retry: RetryConfig,

    /// Logging configuration
    #[serde(default)]
    pub monitoring: MonitoringConfig,

    /// Pools to watch
    pub pools: Vec<PoolConfig>,
}

/// Configuration for an individual pool
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct PoolConfig {
    /// Pool name for logging
    pub name: String,

    /// Subgraph id of the pool (contract address)
    pub pool_id: String,

    /// User addresses whose requests are gated
    #[serde(default)]
    pub users: Vec<String>,

    /// LP addresses whose requests are gated
    #[serde(default)]
    pub lps: Vec<String>,

    /// Whether this pool is polled
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

/// Market hours as written in the config file
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct MarketHoursConfig {
    /// IANA timezone name
    pub timezone: String,

    /// Local session open, `HH:MM[:SS]`, inclusive
    pub open: String,

    /// Local session close, `HH:MM[:SS]`, exclusive
    pub close: String,
}

/// Retry configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of retries for failed queries
    pub max_retries: u32,

    /// Base delay between retries in milliseconds
    pub base_delay_ms: u64,

    /// Maximum delay between retries in milliseconds
    pub max_delay_ms: u64,

    /// Exponential backoff multiplier
    pub backoff_multiplier: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct MonitoringConfig {
    /// Default log level when `RUST_LOG` is unset
    pub log_level: String,

    /// Emit JSON log lines
    pub json_logs: bool,
}

fn default_enabled() -> bool {
    true
}

/// `SYNTHPOOL__<FIELD>` for top-level keys, `SYNTHPOOL__<TABLE>__<FIELD>` for nested ones
fn env_overrides() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

impl KeeperConfig {
    /// Load configuration from a TOML file, applying `SYNTHPOOL__*` environment overrides
    pub fn load(path: &str) -> KeeperResult<Self> {
        Self::load_with_env(path, env_overrides())
    }

    fn load_with_env(path: &str, env: config::Environment) -> KeeperResult<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).format(config::FileFormat::Toml))
            .add_source(env)
            .build()?;

        let config: KeeperConfig = settings.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save(&self, path: &str) -> KeeperResult<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SynthPoolResult<()> {
        match reqwest::Url::parse(&self.subgraph_url) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            _ => {
                return Err(SynthPoolError::invalid_parameter(
                    "subgraph_url",
                    &self.subgraph_url,
                    "an http(s) URL",
                ))
            }
        }

        if self.poll_interval_secs == 0 {
            return Err(SynthPoolError::invalid_parameter("poll_interval_secs", "0", "greater than 0"));
        }

        if self.request_timeout_secs == 0 {
            return Err(SynthPoolError::invalid_parameter("request_timeout_secs", "0", "greater than 0"));
        }

        if self.pools.is_empty() {
            return Err(SynthPoolError::invalid_parameter("pools", "empty", "at least one pool"));
        }

        for pool in &self.pools {
            pool.validate()?;
        }

        self.market.to_market_hours()?;
        self.retry.validate()?;

        Ok(())
    }

    /// Get enabled pools in config order
    pub fn enabled_pools(&self) -> Vec<&PoolConfig> {
        self.pools.iter().filter(|p| p.enabled).collect()
    }
}

impl PoolConfig {
    fn validate(&self) -> SynthPoolResult<()> {
        if self.name.is_empty() {
            return Err(SynthPoolError::invalid_parameter("pool_name", "empty", "non-empty string"));
        }

        if self.pool_id.is_empty() {
            return Err(SynthPoolError::invalid_parameter(
                "pool_id",
                "empty",
                &format!("subgraph id for pool '{}'", self.name),
            ));
        }

        if let Some(addr) = self.users.iter().chain(self.lps.iter()).find(|a| a.is_empty()) {
            return Err(SynthPoolError::invalid_parameter(
                "address",
                addr,
                &format!("non-empty address in pool '{}'", self.name),
            ));
        }

        Ok(())
    }
}

impl MarketHoursConfig {
    pub fn to_market_hours(&self) -> SynthPoolResult<MarketHours> {
        MarketHours::parse(&self.timezone, &self.open, &self.close)
    }
}

impl RetryConfig {
    fn validate(&self) -> SynthPoolResult<()> {
        if self.max_retries == 0 {
            return Err(SynthPoolError::invalid_parameter("max_retries", "0", "greater than 0"));
        }

        if self.base_delay_ms == 0 {
            return Err(SynthPoolError::invalid_parameter("base_delay_ms", "0", "greater than 0"));
        }

        if self.max_delay_ms < self.base_delay_ms {
            return Err(SynthPoolError::invalid_parameter(
                "max_delay_ms",
                &self.max_delay_ms.to_string(),
                &format!("greater than or equal to base_delay_ms ({})", self.base_delay_ms),
            ));
        }

        if self.backoff_multiplier <= 1.0 {
            return Err(SynthPoolError::invalid_parameter(
                "backoff_multiplier",
                &self.backoff_multiplier.to_string(),
                "greater than 1.0",
            ));
        }

        Ok(())
    }

    /// Calculate delay for retry attempt
    pub fn delay_for_attempt(&self, attempt: u32) -> u64 {
        if attempt == 0 {
            return self.base_delay_ms;
        }

        let exponential_delay = self.base_delay_ms as f64 * self.backoff_multiplier.powi(attempt as i32);
        (exponential_delay as u64).min(self.max_delay_ms)
    }
}

impl Default for KeeperConfig {
    fn default() -> Self {
        Self {
            subgraph_url: "http://localhost:8000/subgraphs/name/synthpool".to_string(),
            poll_interval_secs: 30,
            request_timeout_secs: 10,
            market: MarketHoursConfig::default(),
            retry: RetryConfig::default(),
            monitoring: MonitoringConfig::default(),
            pools: vec![],
        }
    }
}

impl Default for MarketHoursConfig {
    fn default() -> Self {
        Self {
            timezone: MARKET_TIMEZONE.to_string(),
            open: "09:30".to_string(),
            close: "16:00".to_string(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1000,
            max_delay_ms: 30_000,
            backoff_multiplier: 2.0,
        }
    }
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            name: "Default Pool".to_string(),
            pool_id: "0x0000000000000000000000000000000000000000".to_string(),
            users: vec![],
            lps: vec![],
            enabled: true,
        }
    }
}

/// Create example configuration file
pub fn create_example_config(path: &str) -> KeeperResult<()> {
    let example_config = KeeperConfig {
        subgraph_url: "https://api.studio.thegraph.com/query/0/synthpool/version/latest".to_string(),
        poll_interval_secs: 60,
        pools: vec![
            PoolConfig {
                name: "xAAPL".to_string(),
                pool_id: "0x1f1a4bd1cd8e3b2a3c1b0a3f8b1e9d2c7a6b5c4d".to_string(),
                users: vec!["0x9a8b7c6d5e4f3a2b1c0d9e8f7a6b5c4d3e2f1a0b".to_string()],
                lps: vec!["0x0b1a2f3e4d5c6b7a8f9e0d1c2b3a4f5e6d7c8b9a".to_string()],
                enabled: true,
            },
            PoolConfig {
                name: "xTSLA".to_string(),
                pool_id: "0x2e2b5ce2de9f4c3b4d2c1b4a9c2f0e3d8b7c6d5e".to_string(),
                users: vec![],
                lps: vec![],
                enabled: false,
            },
        ],
        ..KeeperConfig::default()
    };

    example_config.save(path)?;
    Ok(())
}
