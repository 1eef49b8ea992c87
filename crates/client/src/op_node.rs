//! Output-root oracle client for the op-node.
//!
//! The op-node (consensus client) exposes a custom JSON-RPC method,
//! `optimism_outputAtBlock`, returning the canonical output root for a given
//! L2 block height. This client wraps that single call over HTTP.

use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OracleError {
    /// Transport-level failure reaching the op-node
    #[error("op-node request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("op-node returned {status}: {body}")]
    Status { status: u16, body: String },

    /// JSON-RPC error object in the response
    #[error("op-node JSON-RPC error {code}: {message}")]
    Rpc { code: i32, message: String },

    /// Response missing the expected outputRoot field
    #[error("op-node response missing output root")]
    MissingOutputRoot,

    /// outputRoot present but not a valid 32-byte hex string
    #[error("invalid output root {0:?}")]
    InvalidOutputRoot(String),
}

/// Client for the op-node's `optimism_outputAtBlock` RPC method.
///
/// TLS certificate verification is on by default; [`OpNodeClient::insecure`]
/// is the explicit, per-endpoint opt-out.
#[derive(Debug, Clone)]
pub struct OpNodeClient {
    client: reqwest::Client,
    endpoint: String,
}

impl OpNodeClient {
    /// Creates a new op-node client.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Creates a client that skips TLS certificate verification for this
    /// endpoint only.
    pub fn insecure(endpoint: impl Into<String>) -> Result<Self, OracleError> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(true)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Canonical output root at the given L2 block height.
    pub async fn output_at_block(&self, block_number: u64) -> Result<B256, OracleError> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method: "optimism_outputAtBlock",
            params: [format!("{:#x}", block_number)],
            id: 1,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown".to_string());
            return Err(OracleError::Status { status, body });
        }

        let rpc_response: JsonRpcResponse<OutputAtBlock> = response.json().await?;
        extract_output_root(rpc_response)
    }
}

fn extract_output_root(response: JsonRpcResponse<OutputAtBlock>) -> Result<B256, OracleError> {
    let result = match response.result {
        Some(result) => result,
        None => {
            let error = response.error.unwrap_or(JsonRpcError {
                code: -1,
                message: "unknown error".to_string(),
            });
            return Err(OracleError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
    };

    let root = result.output_root.ok_or(OracleError::MissingOutputRoot)?;
    root.parse()
        .map_err(|_| OracleError::InvalidOutputRoot(root))
}

#[derive(Debug, Serialize)]
struct JsonRpcRequest<T> {
    jsonrpc: &'static str,
    method: &'static str,
    params: T,
    id: u32,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

/// Result payload of `optimism_outputAtBlock`.
#[derive(Debug, Deserialize)]
struct OutputAtBlock {
    #[serde(rename = "outputRoot")]
    output_root: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::b256;

    fn response_from(value: serde_json::Value) -> JsonRpcResponse<OutputAtBlock> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_extract_output_root() {
        let response = response_from(serde_json::json!({
            "result": {
                "outputRoot": "0x16910dd86f5a70dbca2a1e1a49ea3bb7cbbb3392c894c4e099073bbbb593cbdd",
                "version": "0x0000000000000000000000000000000000000000000000000000000000000000",
            }
        }));

        let root = extract_output_root(response).unwrap();
        assert_eq!(
            root,
            b256!("16910dd86f5a70dbca2a1e1a49ea3bb7cbbb3392c894c4e099073bbbb593cbdd")
        );
    }

    #[test]
    fn test_missing_output_root() {
        let response = response_from(serde_json::json!({
            "result": { "version": "0x00" }
        }));

        let result = extract_output_root(response);
        assert!(matches!(result, Err(OracleError::MissingOutputRoot)));
    }

    #[test]
    fn test_json_rpc_error() {
        let response = response_from(serde_json::json!({
            "error": { "code": -32601, "message": "method not found" }
        }));

        match extract_output_root(response) {
            Err(OracleError::Rpc { code, message }) => {
                assert_eq!(code, -32601);
                assert_eq!(message, "method not found");
            }
            other => panic!("expected Rpc error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_output_root_hex() {
        let response = response_from(serde_json::json!({
            "result": { "outputRoot": "0xnothex" }
        }));

        let result = extract_output_root(response);
        assert!(matches!(result, Err(OracleError::InvalidOutputRoot(_))));
    }

    #[test]
    fn test_block_number_hex_encoding() {
        // optimism_outputAtBlock takes the height as a 0x-prefixed hex string
        assert_eq!(format!("{:#x}", 0u64), "0x0");
        assert_eq!(format!("{:#x}", 129_639_152u64), "0x7ba1cf0");
    }
}
