//! Common test setup utilities shared across integration tests.
#![allow(dead_code)] // used in ignored tests

use alloy_provider::RootProvider;
use client::ChainClient;
use monitor::config::Config;

/// Load test configuration. Panics if not found or invalid.
///
/// Expects `tests/test-config.toml` next to this file; see
/// `tests/test-config.toml.example` for a template.
pub fn load_test_config() -> Config {
    Config::from_file("tests/test-config.toml").expect("Failed to load tests/test-config.toml.")
}

/// Common test setup: create a provider for a url.
pub fn setup_provider(url: &str) -> RootProvider {
    client::create_provider(url).expect("Failed to create provider")
}

/// Provider wrapped in a [`ChainClient`].
pub fn setup_client(url: &str) -> ChainClient<RootProvider> {
    ChainClient::new(setup_provider(url))
}
