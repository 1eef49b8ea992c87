//! Chain endpoint plumbing shared by the scanner and resolver.
//!
//! Provides HTTP provider construction (TLS verification on by default, with
//! an explicit per-endpoint opt-out) and [`ChainClient`], a thin wrapper over
//! one endpoint that applies a timeout to every call and maps transport
//! failures into [`ClientError`].

mod op_node;

pub use op_node::{OpNodeClient, OracleError};

use alloy_primitives::{Address, TxHash, B256};
use alloy_provider::{Provider, RootProvider};
use alloy_rpc_client::RpcClient;
use alloy_rpc_types_eth::{BlockNumberOrTag, Filter, Log, TransactionReceipt};
use alloy_transport_http::Http;
use std::{
    future::{Future, IntoFuture},
    time::Duration,
};
use thiserror::Error;
use tokio::time::timeout;
use tracing::debug;

/// Default per-call timeout applied by [`ChainClient`].
pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Debug)]
pub enum ClientError {
    /// Error parsing or validating URLs
    #[error("Invalid RPC URL: {0}")]
    InvalidUrl(String),

    /// Error reaching the RPC endpoint
    #[error("Connection error: {0}")]
    Connection(String),

    /// Transport or server fault, recoverable by the caller
    #[error("RPC error: {0}")]
    Rpc(String),

    /// No data at the requested key or range
    #[error("Not found: {0}")]
    NotFound(String),

    /// The endpoint returned data that could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),
}

/// Convenience function to create an ethereum rpc provider from url.
pub fn create_provider(rpc_url: &str) -> Result<RootProvider, ClientError> {
    let url = rpc_url
        .parse()
        .map_err(|e| ClientError::InvalidUrl(format!("{}", e)))?;

    Ok(RootProvider::new_http(url))
}

/// Create a provider that skips TLS certificate verification.
///
/// The opt-out is scoped to the one endpoint this provider talks to; every
/// other connection in the process keeps verifying certificates.
pub fn create_insecure_provider(rpc_url: &str) -> Result<RootProvider, ClientError> {
    let url = rpc_url
        .parse()
        .map_err(|e| ClientError::InvalidUrl(format!("{}", e)))?;

    let http_client = reqwest::Client::builder()
        .danger_accept_invalid_certs(true)
        .build()
        .map_err(|e| ClientError::Connection(format!("{}", e)))?;

    let transport = Http::with_client(http_client, url);
    Ok(RootProvider::new(RpcClient::new(transport, false)))
}

/// Thin wrapper over one chain endpoint.
///
/// Construction never touches the network; call [`ChainClient::health_check`]
/// to probe connectivity explicitly and decide fail-fast vs. degraded startup
/// at the call site.
#[derive(Debug, Clone)]
pub struct ChainClient<P> {
    provider: P,
    timeout: Duration,
}

impl<P> ChainClient<P>
where
    P: Provider + Clone,
{
    pub const fn new(provider: P) -> Self {
        Self {
            provider,
            timeout: DEFAULT_RPC_TIMEOUT,
        }
    }

    /// Override the per-call timeout.
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Probe the endpoint once, returning the current block height.
    pub async fn health_check(&self) -> Result<u64, ClientError> {
        match timeout(self.timeout, self.provider.get_block_number()).await {
            Ok(Ok(height)) => Ok(height),
            Ok(Err(e)) => Err(ClientError::Connection(e.to_string())),
            Err(_) => Err(ClientError::Connection(format!(
                "no response within {:?}",
                self.timeout
            ))),
        }
    }

    /// Latest known block height.
    pub async fn current_block_number(&self) -> Result<u64, ClientError> {
        self.rpc(self.provider.get_block_number()).await
    }

    /// Unix timestamp of the given block.
    pub async fn block_timestamp(&self, number: u64) -> Result<u64, ClientError> {
        let block = self
            .rpc(
                self.provider
                    .get_block_by_number(BlockNumberOrTag::Number(number))
                    .into_future(),
            )
            .await?
            .ok_or_else(|| ClientError::NotFound(format!("block {}", number)))?;

        Ok(block.header.timestamp)
    }

    /// Receipt of a known transaction.
    pub async fn transaction_receipt(
        &self,
        hash: TxHash,
    ) -> Result<TransactionReceipt, ClientError> {
        self.rpc(self.provider.get_transaction_receipt(hash))
            .await?
            .ok_or_else(|| ClientError::NotFound(format!("receipt {}", hash)))
    }

    /// Logs for one event signature emitted by `contract` in
    /// `[from_block, to_block]`.
    ///
    /// An empty vec means no matches; ordering follows the endpoint and is
    /// not guaranteed.
    pub async fn query_logs(
        &self,
        contract: Address,
        event_signature: B256,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<Log>, ClientError> {
        debug!(%contract, from_block, to_block, "querying logs");

        let filter = Filter::new()
            .address(contract)
            .event_signature(event_signature)
            .from_block(from_block)
            .to_block(to_block);

        self.rpc(self.provider.get_logs(&filter)).await
    }

    /// Apply the per-call timeout; an elapsed timeout is reported like any
    /// other transport fault.
    async fn rpc<T, E>(&self, fut: impl Future<Output = Result<T, E>>) -> Result<T, ClientError>
    where
        E: std::fmt::Display,
    {
        match timeout(self.timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(ClientError::Rpc(e.to_string())),
            Err(_) => Err(ClientError::Rpc(format!(
                "request timed out after {:?}",
                self.timeout
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_url() {
        let result = create_provider("not a url");
        assert!(matches!(result, Err(ClientError::InvalidUrl(_))));
    }

    #[test]
    fn test_insecure_invalid_url() {
        let result = create_insecure_provider("not a url");
        assert!(matches!(result, Err(ClientError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_timeout_maps_to_rpc_error() {
        let provider = create_provider("http://localhost:1").unwrap();
        let client = ChainClient::new(provider).with_timeout(Duration::from_millis(50));

        let result = client.current_block_number().await;
        assert!(matches!(result, Err(ClientError::Rpc(_))));
    }
}
