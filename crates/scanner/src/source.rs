//! Live [`LogSource`] over an L1 endpoint.

use crate::scan::{LogSource, ProvenEvent, ScanWindow};
use alloy_primitives::Address;
use alloy_provider::Provider;
use alloy_rpc_types_eth::{Log, TransactionReceipt};
use alloy_sol_types::SolEvent;
use binding::opstack::IOptimismPortal2::WithdrawalProvenExtension1;
use client::{ChainClient, ClientError};

/// Queries `WithdrawalProvenExtension1` logs from the OptimismPortal2
/// contract through a [`ChainClient`].
#[derive(Debug, Clone)]
pub struct PortalLogSource<P> {
    client: ChainClient<P>,
    portal: Address,
}

impl<P> PortalLogSource<P>
where
    P: Provider + Clone,
{
    pub const fn new(client: ChainClient<P>, portal: Address) -> Self {
        Self { client, portal }
    }
}

impl<P> LogSource for PortalLogSource<P>
where
    P: Provider + Clone,
{
    async fn chain_tip(&self) -> Result<u64, ClientError> {
        self.client.current_block_number().await
    }

    async fn proven_events(&self, window: ScanWindow) -> Result<Vec<ProvenEvent>, ClientError> {
        let logs = self
            .client
            .query_logs(
                self.portal,
                WithdrawalProvenExtension1::SIGNATURE_HASH,
                window.from_block,
                window.to_block,
            )
            .await?;

        logs.iter().map(decode_proven_event).collect()
    }

    async fn block_timestamp(&self, number: u64) -> Result<u64, ClientError> {
        self.client.block_timestamp(number).await
    }
}

/// Decode one raw log into a [`ProvenEvent`].
fn decode_proven_event(log: &Log) -> Result<ProvenEvent, ClientError> {
    let event = WithdrawalProvenExtension1::decode_log(&log.inner)
        .map_err(|e| ClientError::Decode(format!("WithdrawalProvenExtension1: {}", e)))?;

    Ok(ProvenEvent {
        block_number: log
            .block_number
            .ok_or_else(|| ClientError::Decode("log missing block number".to_string()))?,
        tx_hash: log
            .transaction_hash
            .ok_or_else(|| ClientError::Decode("log missing transaction hash".to_string()))?,
        contract: log.address(),
        withdrawal_hash: event.withdrawalHash,
        proof_submitter: event.proofSubmitter,
    })
}

/// Proven-withdrawal events contained in a transaction receipt.
///
/// Logs that are not `WithdrawalProvenExtension1` occurrences are skipped.
pub fn proven_events_in_receipt(receipt: &TransactionReceipt) -> Vec<ProvenEvent> {
    receipt
        .logs()
        .iter()
        .filter_map(|log| decode_proven_event(log).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, b256, B256};

    fn proven_log(block_number: u64, withdrawal_hash: B256, submitter: Address) -> Log {
        let inner = alloy_primitives::Log::new_unchecked(
            address!("beb5fc579115071764c7423a4f12edde41f106ed"),
            vec![
                WithdrawalProvenExtension1::SIGNATURE_HASH,
                withdrawal_hash,
                submitter.into_word(),
            ],
            Default::default(),
        );

        Log {
            inner,
            block_number: Some(block_number),
            transaction_hash: Some(B256::with_last_byte(0x42)),
            ..Default::default()
        }
    }

    #[test]
    fn test_decode_proven_event() {
        let hash = b256!("49c43b60ec99e99046b54aec4c90419ff194300e567de63423c3b974ae46bd28");
        let submitter = address!("000040d6c85a13a1aa74565fde87e499dc023c6f");

        let event = decode_proven_event(&proven_log(8_700, hash, submitter)).unwrap();
        assert_eq!(event.block_number, 8_700);
        assert_eq!(event.withdrawal_hash, hash);
        assert_eq!(event.proof_submitter, submitter);
    }

    #[test]
    fn test_decode_rejects_foreign_event() {
        let mut log = proven_log(1, B256::ZERO, Address::ZERO);
        log.inner = alloy_primitives::Log::new_unchecked(
            log.inner.address,
            vec![B256::with_last_byte(0x01)],
            Default::default(),
        );

        let result = decode_proven_event(&log);
        assert!(matches!(result, Err(ClientError::Decode(_))));
    }
}
