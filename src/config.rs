//! Migration Configuration
//!
//! All values are fixed at process start, from the environment (with `.env`
//! support) or from a TOML file. Contract addresses have no defaults: a
//! run against the wrong deployment is worse than a run that refuses to
//! start. See `.env.example` for the mainnet values.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::audit::AuditSettings;
use crate::batch::MigrationContext;
use crate::discovery::{Blacklist, DiscoverySettings};
use crate::error::{MigrationError, Result};

pub const DEFAULT_RPC_URL: &str = "https://eth.llamarpc.com";
pub const DEFAULT_BATCH_SIZE: i64 = 25;
pub const DEFAULT_RPC_TIMEOUT_SECS: u64 = 30;

// ============================================
// MAIN CONFIGURATION
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // ========== Network Settings ==========
    pub rpc_url: String,

    /// Upper bound for a single eth_call
    pub rpc_timeout_secs: u64,

    /// Registry indices resolved at once during discovery
    pub discovery_concurrency: usize,

    // ========== Contracts ==========
    pub controller: Option<Address>,
    pub old_strategy: Option<Address>,
    pub new_strategy: Option<Address>,
    pub locker: Option<Address>,
    pub voter: Option<Address>,
    pub depositor: Option<Address>,
    pub reward_token: Option<Address>,

    /// Skipped by the reward audit (SDT on mainnet)
    pub governance_token: Option<Address>,

    // ========== Filters ==========
    /// Test depositors, kept as written; normalized by [`Blacklist::parse`]
    pub blacklist: Vec<String>,

    // ========== Output ==========
    /// Transactions per batch file. Signed so a negative value can be
    /// reported instead of wrapping.
    pub batch_size: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            rpc_timeout_secs: DEFAULT_RPC_TIMEOUT_SECS,
            discovery_concurrency: 1,
            controller: None,
            old_strategy: None,
            new_strategy: None,
            locker: None,
            voter: None,
            depositor: None,
            reward_token: None,
            governance_token: None,
            blacklist: Vec::new(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

fn env_address(key: &str) -> Result<Option<Address>> {
    match env::var(key) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => raw
            .trim()
            .to_lowercase()
            .parse()
            .map(Some)
            .map_err(|e| MigrationError::config(format!("{} is not an address ({}): {}", key, raw, e))),
        Err(_) => Ok(None),
    }
}

fn env_number<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| MigrationError::config(format!("{}={:?}: {}", key, raw, e))),
        Err(_) => Ok(default),
    }
}

fn require(name: &str, value: Option<Address>) -> Result<Address> {
    match value {
        Some(address) if address != Address::ZERO => Ok(address),
        Some(_) => Err(MigrationError::config(format!("{} is the zero address", name))),
        None => Err(MigrationError::config(format!("{} is not set", name))),
    }
}

impl Config {
    /// Load configuration from environment variables and .env file
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            rpc_url: env::var("RPC_URL").unwrap_or_else(|_| DEFAULT_RPC_URL.to_string()),
            rpc_timeout_secs: env_number("RPC_TIMEOUT_SECS", DEFAULT_RPC_TIMEOUT_SECS)?,
            discovery_concurrency: env_number("DISCOVERY_CONCURRENCY", 1)?,

            controller: env_address("CONTROLLER_ADDRESS")?,
            old_strategy: env_address("OLD_STRATEGY_ADDRESS")?,
            new_strategy: env_address("NEW_STRATEGY_ADDRESS")?,
            locker: env_address("LOCKER_ADDRESS")?,
            voter: env_address("VOTER_ADDRESS")?,
            depositor: env_address("DEPOSITOR_ADDRESS")?,
            reward_token: env_address("REWARD_TOKEN_ADDRESS")?,
            governance_token: env_address("GOVERNANCE_TOKEN_ADDRESS")?,

            blacklist: env::var("BLACKLIST")
                .map(|s| s.split(',').map(String::from).collect())
                .unwrap_or_default(),

            batch_size: env_number("BATCH_SIZE", DEFAULT_BATCH_SIZE)?,
        })
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| MigrationError::Artifact {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content)
            .map_err(|e| MigrationError::config(format!("{}: {}", path.display(), e)))
    }

    pub fn rpc_timeout(&self) -> Result<Duration> {
        if self.rpc_timeout_secs == 0 {
            return Err(MigrationError::config("RPC_TIMEOUT_SECS must be at least 1"));
        }
        Ok(Duration::from_secs(self.rpc_timeout_secs))
    }

    pub fn batch_size(&self) -> Result<usize> {
        if self.batch_size <= 0 {
            return Err(MigrationError::config(format!(
                "BATCH_SIZE must be positive (got {})",
                self.batch_size
            )));
        }
        usize::try_from(self.batch_size)
            .map_err(|_| MigrationError::config(format!("BATCH_SIZE {} too large", self.batch_size)))
    }

    pub fn discovery_settings(&self) -> Result<DiscoverySettings> {
        if self.discovery_concurrency == 0 {
            return Err(MigrationError::config("DISCOVERY_CONCURRENCY must be at least 1"));
        }
        Ok(DiscoverySettings {
            controller: require("CONTROLLER_ADDRESS", self.controller)?,
            strategy: require("OLD_STRATEGY_ADDRESS", self.old_strategy)?,
            blacklist: Blacklist::parse(&self.blacklist)?,
            concurrency: self.discovery_concurrency,
        })
    }

    pub fn migration_context(&self) -> Result<MigrationContext> {
        Ok(MigrationContext {
            new_strategy: require("NEW_STRATEGY_ADDRESS", self.new_strategy)?,
            old_strategy: require("OLD_STRATEGY_ADDRESS", self.old_strategy)?,
            locker: require("LOCKER_ADDRESS", self.locker)?,
            voter: require("VOTER_ADDRESS", self.voter)?,
            depositor: require("DEPOSITOR_ADDRESS", self.depositor)?,
            reward_token: require("REWARD_TOKEN_ADDRESS", self.reward_token)?,
        })
    }

    pub fn audit_settings(&self) -> Result<AuditSettings> {
        Ok(AuditSettings {
            controller: require("CONTROLLER_ADDRESS", self.controller)?,
            new_strategy: require("NEW_STRATEGY_ADDRESS", self.new_strategy)?,
            governance_token: self.governance_token,
        })
    }

    /// Check everything every command could need
    pub fn validate(&self) -> Result<()> {
        if self.rpc_url.trim().is_empty() {
            return Err(MigrationError::config("RPC_URL is empty"));
        }
        self.rpc_timeout()?;
        self.discovery_settings()?;
        self.migration_context()?;
        self.batch_size()?;
        Ok(())
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        let show = |a: Option<Address>| a.map(|a| a.to_string()).unwrap_or_else(|| "✗ Not Set".to_string());

        println!("╔══════════════════════════════════════════════════════════════╗");
        println!("║              STRATEGY MIGRATION - CONFIGURATION              ║");
        println!("╠══════════════════════════════════════════════════════════════╣");
        println!("║ Controller:    {:<45} ║", show(self.controller));
        println!("║ Old strategy:  {:<45} ║", show(self.old_strategy));
        println!("║ New strategy:  {:<45} ║", show(self.new_strategy));
        println!("║ Locker:        {:<45} ║", show(self.locker));
        println!("║ Voter:         {:<45} ║", show(self.voter));
        println!("║ Depositor:     {:<45} ║", show(self.depositor));
        println!("║ Reward token:  {:<45} ║", show(self.reward_token));
        println!("╠══════════════════════════════════════════════════════════════╣");
        println!("║ Blacklist:     {:<45} ║", format!("{} addresses", self.blacklist.len()));
        println!("║ Batch size:    {:<45} ║", self.batch_size);
        println!("║ Concurrency:   {:<45} ║", self.discovery_concurrency);
        println!("╚══════════════════════════════════════════════════════════════╝");
    }
}

// ============================================
// TESTS
// ============================================

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    fn mainnet() -> Config {
        Config {
            controller: Some(address!("2F50D538606Fa9EDD2B11E2446BEb18C9D5846bB")),
            old_strategy: Some(address!("20F1d4Fed24073a9b9d388AfA2735Ac91f079ED6")),
            new_strategy: Some(address!("69D61428d089C2F35Bf6a472F540D0F82D1EA2cd")),
            locker: Some(address!("52f541764E6e90eeBc5c21Ff570De0e2D63766B6")),
            voter: Some(address!("20b22019406Cf990F0569a6161cf30B8e6651dDa")),
            depositor: Some(address!("88C88Aa6a9cedc2aff9b4cA6820292F39cc64026")),
            reward_token: Some(address!("D533a949740bb3306d119CC777fa900bA034cd52")),
            blacklist: vec!["0x6ae7bf291028ccf52991bd020d2dc121b40bce2a".to_string()],
            ..Config::default()
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.batch_size, 25);
        assert_eq!(config.rpc_url, DEFAULT_RPC_URL);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_complete_config_validates() {
        mainnet().validate().unwrap();
    }

    #[test]
    fn test_non_positive_batch_size_rejected() {
        for size in [0, -1, -25] {
            let config = Config { batch_size: size, ..mainnet() };
            let err = config.batch_size().unwrap_err();
            assert_eq!(err.kind(), "ConfigurationError");
        }
        assert_eq!(Config { batch_size: 4, ..mainnet() }.batch_size().unwrap(), 4);
    }

    #[test]
    fn test_missing_address_named_in_error() {
        let config = Config { locker: None, ..mainnet() };
        let err = config.migration_context().unwrap_err();
        assert!(err.to_string().contains("LOCKER_ADDRESS"));

        // Discovery does not need the locker
        assert!(config.discovery_settings().is_ok());
    }

    #[test]
    fn test_zero_address_rejected() {
        let config = Config { controller: Some(Address::ZERO), ..mainnet() };
        assert!(config.discovery_settings().is_err());
    }

    #[test]
    fn test_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("migration.toml");
        fs::write(
            &path,
            r#"
                controller = "0x2F50D538606Fa9EDD2B11E2446BEb18C9D5846bB"
                old_strategy = "0x20f1d4fed24073a9b9d388afa2735ac91f079ed6"
                blacklist = ["0x6AE7BF291028CCF52991BD020D2DC121B40BCE2A"]
                batch_size = 150
            "#,
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.batch_size().unwrap(), 150);
        assert_eq!(config.rpc_url, DEFAULT_RPC_URL);

        let discovery = config.discovery_settings().unwrap();
        assert_eq!(discovery.blacklist.len(), 1);
        assert!(config.migration_context().is_err());
    }

    #[test]
    fn test_zero_rpc_timeout_rejected() {
        let config = Config { rpc_timeout_secs: 0, ..mainnet() };
        assert_eq!(config.rpc_timeout().unwrap_err().kind(), "ConfigurationError");
        assert!(config.validate().is_err());

        assert_eq!(mainnet().rpc_timeout().unwrap(), Duration::from_secs(30));
    }
}
