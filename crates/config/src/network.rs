//! Network configuration for withdrawal monitoring.
//!
//! Provides chain-specific addresses and parameters for different networks
//! (mainnet, testnet, etc.).

use alloy_primitives::{address, Address};
use serde::{Deserialize, Serialize};

/// Network type (mainnet or testnet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetworkType {
    Mainnet,
    Testnet,
}

/// L1 (Ethereum) network configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct L1Config {
    /// Chain ID
    pub chain_id: u64,
    /// OptimismPortal2 proxy contract address
    pub portal: Address,
    /// Block time in seconds (12 for Ethereum mainnet)
    pub block_time_secs: u64,
}

impl L1Config {
    /// Ethereum mainnet configuration.
    pub const fn mainnet() -> Self {
        Self {
            chain_id: 1,
            // https://etherscan.io/address/0xbEb5Fc579115071764c7423A4f12eDde41f106Ed
            portal: address!("0xbEb5Fc579115071764c7423A4f12eDde41f106Ed"),
            block_time_secs: 12,
        }
    }

    /// Ethereum Sepolia testnet configuration.
    pub const fn sepolia() -> Self {
        Self {
            chain_id: 11155111,
            // https://sepolia.etherscan.io/address/0x16Fc5058F25648194471939df75CF27A2fdC48BC
            portal: address!("0x16Fc5058F25648194471939df75CF27A2fdC48BC"),
            block_time_secs: 12,
        }
    }
}

/// L2 (OP Stack) network configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct L2Config {
    /// Chain ID
    pub chain_id: u64,
    /// Block time in seconds (2 for OP Stack chains)
    pub block_time_secs: u64,
}

impl L2Config {
    /// OP Mainnet configuration.
    pub const fn mainnet() -> Self {
        Self {
            chain_id: 10,
            block_time_secs: 2,
        }
    }

    /// OP Sepolia testnet configuration.
    pub const fn sepolia() -> Self {
        Self {
            chain_id: 11155420,
            block_time_secs: 2,
        }
    }
}

/// Complete network configuration for withdrawal monitoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Network type (mainnet or testnet)
    pub network_type: NetworkType,
    /// Ethereum/L1 configuration
    pub l1: L1Config,
    /// OP Stack/L2 configuration
    pub l2: L2Config,
}

impl NetworkConfig {
    /// Create mainnet configuration.
    pub const fn mainnet() -> Self {
        Self {
            network_type: NetworkType::Mainnet,
            l1: L1Config::mainnet(),
            l2: L2Config::mainnet(),
        }
    }

    /// Create testnet (Sepolia) configuration.
    pub const fn sepolia() -> Self {
        Self {
            network_type: NetworkType::Testnet,
            l1: L1Config::sepolia(),
            l2: L2Config::sepolia(),
        }
    }

    /// Create configuration from network type.
    pub const fn from_network_type(network_type: NetworkType) -> Self {
        match network_type {
            NetworkType::Mainnet => Self::mainnet(),
            NetworkType::Testnet => Self::sepolia(),
        }
    }
}

/// Builder for custom network configurations.
#[derive(Debug, Clone)]
pub struct NetworkConfigBuilder {
    network_type: NetworkType,
    l1: L1Config,
    l2: L2Config,
}

impl NetworkConfigBuilder {
    /// Start from the defaults for a network type.
    pub const fn new(network_type: NetworkType) -> Self {
        let defaults = NetworkConfig::from_network_type(network_type);
        Self {
            network_type,
            l1: defaults.l1,
            l2: defaults.l2,
        }
    }

    /// Override the OptimismPortal2 proxy address.
    pub const fn portal(mut self, address: Address) -> Self {
        self.l1.portal = address;
        self
    }

    /// Override the L2 chain ID (custom OP Stack deployments).
    pub const fn l2_chain_id(mut self, chain_id: u64) -> Self {
        self.l2.chain_id = chain_id;
        self
    }

    /// Build the network configuration.
    pub const fn build(self) -> NetworkConfig {
        NetworkConfig {
            network_type: self.network_type,
            l1: self.l1,
            l2: self.l2,
        }
    }
}
