//! Endpoint and transaction-parameter configuration.

use std::env;
use std::time::Duration;

/// Default REST endpoint for the public testnet fullnode.
pub const TESTNET_NODE_URL: &str = "https://api.testnet.aptoslabs.com/v1";
/// Default faucet endpoint for the public testnet.
pub const TESTNET_FAUCET_URL: &str = "https://faucet.testnet.aptoslabs.com";
/// Default GraphQL indexer endpoint for the public testnet.
pub const TESTNET_INDEXER_URL: &str = "https://api.testnet.aptoslabs.com/v1/graphql";

const NODE_URL_ENV: &str = "APTOS_NODE_URL";
const FAUCET_URL_ENV: &str = "APTOS_FAUCET_URL";
const INDEXER_URL_ENV: &str = "APTOS_INDEXER_URL";

/// How long to wait for a submitted transaction to reach finality.
#[derive(Debug, Clone)]
pub struct WaitConfig {
    /// Maximum time to wait for confirmation before giving up.
    pub timeout: Duration,
    /// Delay between consecutive status polls.
    pub poll_interval: Duration,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(20),
            poll_interval: Duration::from_secs(1),
        }
    }
}

/// Everything a client pair needs: the three service endpoints plus the
/// gas and confirmation-wait parameters stamped into transactions.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub node_url: String,
    pub faucet_url: String,
    /// Carried for completeness; no operation queries the indexer yet.
    pub indexer_url: String,
    pub max_gas_amount: u64,
    pub gas_unit_price: u64,
    /// Transaction lifetime in seconds, measured from signing.
    pub expiration_secs: u64,
    pub wait: WaitConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            node_url: TESTNET_NODE_URL.to_string(),
            faucet_url: TESTNET_FAUCET_URL.to_string(),
            indexer_url: TESTNET_INDEXER_URL.to_string(),
            max_gas_amount: 100_000,
            gas_unit_price: 100,
            expiration_secs: 600,
            wait: WaitConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Testnet defaults, with each endpoint independently overridable from
    /// `APTOS_NODE_URL`, `APTOS_FAUCET_URL`, and `APTOS_INDEXER_URL`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = env::var(NODE_URL_ENV) {
            config.node_url = url;
        }
        if let Ok(url) = env::var(FAUCET_URL_ENV) {
            config.faucet_url = url;
        }
        if let Ok(url) = env::var(INDEXER_URL_ENV) {
            config.indexer_url = url;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_the_testnet_constants() {
        let config = ClientConfig::default();
        assert_eq!(config.node_url, TESTNET_NODE_URL);
        assert_eq!(config.faucet_url, TESTNET_FAUCET_URL);
        assert_eq!(config.indexer_url, TESTNET_INDEXER_URL);
        assert_eq!(config.max_gas_amount, 100_000);
        assert_eq!(config.gas_unit_price, 100);
        assert_eq!(config.expiration_secs, 600);
        assert_eq!(config.wait.timeout, Duration::from_secs(20));
        assert_eq!(config.wait.poll_interval, Duration::from_secs(1));
    }

    #[test]
    fn test_env_overrides_each_endpoint_independently() {
        env::set_var(NODE_URL_ENV, "http://localhost:8080/v1");
        env::set_var(FAUCET_URL_ENV, "http://localhost:8081");

        let config = ClientConfig::from_env();
        assert_eq!(config.node_url, "http://localhost:8080/v1");
        assert_eq!(config.faucet_url, "http://localhost:8081");
        // Untouched endpoint keeps its default.
        assert_eq!(config.indexer_url, TESTNET_INDEXER_URL);

        env::remove_var(NODE_URL_ENV);
        env::remove_var(FAUCET_URL_ENV);
    }
}
