use alloy_primitives::Address;
use config::{NetworkConfig, NetworkConfigBuilder, NetworkType};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level monitor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// L1 execution endpoint url
    pub l1_rpc_url: String,

    /// L2 execution (op-geth) endpoint url
    pub l2_rpc_url: String,

    /// L2 consensus (op-node) endpoint url
    pub l2_op_node_url: String,

    /// Network preset selecting contract addresses
    pub network: NetworkType,

    /// Override for the OptimismPortal2 proxy address (custom deployments)
    #[serde(default)]
    pub portal_address: Option<Address>,

    /// Blocks per scan window
    #[serde(default = "default_batch_size")]
    pub batch_size: u64,

    /// Seconds between monitoring passes
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Per-call RPC timeout in seconds
    #[serde(default = "default_rpc_timeout_secs")]
    pub rpc_timeout_secs: u64,

    /// Prometheus exporter port; 0 disables the exporter
    #[serde(default)]
    pub metrics_port: u16,

    /// Skip TLS verification for the L1 endpoint only
    #[serde(default)]
    pub l1_accept_invalid_certs: bool,

    /// Skip TLS verification for the L2 endpoint only
    #[serde(default)]
    pub l2_accept_invalid_certs: bool,

    /// Skip TLS verification for the op-node endpoint only
    #[serde(default)]
    pub op_node_accept_invalid_certs: bool,
}

const fn default_batch_size() -> u64 {
    scanner::DEFAULT_BATCH_SIZE
}

const fn default_poll_interval_secs() -> u64 {
    60
}

const fn default_rpc_timeout_secs() -> u64 {
    30
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;

        Ok(config)
    }

    /// Contract addresses for the configured network, with overrides applied.
    pub fn network_config(&self) -> NetworkConfig {
        let mut builder = NetworkConfigBuilder::new(self.network);
        if let Some(portal) = self.portal_address {
            builder = builder.portal(portal);
        }
        builder.build()
    }

    /// The OptimismPortal2 proxy to monitor.
    pub fn portal_address(&self) -> Address {
        self.network_config().l1.portal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str(
            r#"
            l1_rpc_url = "http://localhost:8545"
            l2_rpc_url = "http://localhost:9545"
            l2_op_node_url = "http://localhost:7545"
            network = "Mainnet"
            "#,
        )
        .unwrap();

        assert_eq!(config.batch_size, scanner::DEFAULT_BATCH_SIZE);
        assert_eq!(config.poll_interval_secs, 60);
        assert!(!config.l1_accept_invalid_certs);
        assert_eq!(config.portal_address(), config::NetworkConfig::mainnet().l1.portal);
    }

    #[test]
    fn test_portal_override() {
        let custom = address!("3333333333333333333333333333333333333333");
        let config: Config = toml::from_str(&format!(
            r#"
            l1_rpc_url = "http://localhost:8545"
            l2_rpc_url = "http://localhost:9545"
            l2_op_node_url = "http://localhost:7545"
            network = "Testnet"
            portal_address = "{custom}"
            batch_size = 250
            "#,
        ))
        .unwrap();

        assert_eq!(config.portal_address(), custom);
        assert_eq!(config.batch_size, 250);
    }
}
