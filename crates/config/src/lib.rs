//! Configuration types for the withdrawal monitor.
//!
//! This crate provides:
//! - Network configurations (mainnet, testnet)
//! - Contract addresses for different chains

pub mod network;

pub use network::{L1Config, L2Config, NetworkConfig, NetworkConfigBuilder, NetworkType};
