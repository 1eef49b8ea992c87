//! Library surface of the withdrawal monitor.
//!
//! Exposes the operations collaborators (alert scripts, CLI reporters)
//! consume: finding the latest proven-withdrawal event, resolving a
//! withdrawal into a validated record, block timestamp lookup, and
//! receipt-based event extraction. The binary's monitoring loop composes
//! these.

pub mod config;
pub mod metrics;

use alloy_primitives::{Address, TxHash};
use alloy_provider::Provider;
use binding::opstack::MESSAGE_PASSER_ADDRESS;
use client::{ChainClient, ClientError, OpNodeClient};
use resolver::{AlloyPortal, GameResolver, ResolveError, WithdrawalHash, WithdrawalRecord};
use scanner::{
    proven_events_in_receipt, BlockTimestamp, EventScanner, FoundEvent, PortalLogSource,
    ProvenEvent, ScanError,
};
use tokio_util::sync::CancellationToken;

/// Find the most recent `WithdrawalProvenExtension1` event emitted by the
/// portal, paging backwards from the chain tip.
pub async fn find_latest_withdrawal_event<P>(
    l1_client: &ChainClient<P>,
    portal: Address,
    batch_size: u64,
    cancel: CancellationToken,
) -> Result<FoundEvent, ScanError>
where
    P: Provider + Clone,
{
    let source = PortalLogSource::new(l1_client.clone(), portal);
    EventScanner::new(source)
        .with_batch_size(batch_size)
        .with_cancellation(cancel)
        .find_latest()
        .await
}

/// Resolve one proven withdrawal into a fully cross-checked record.
pub async fn resolve_withdrawal<P1, P2>(
    l1_provider: P1,
    l2_provider: P2,
    op_node: &OpNodeClient,
    portal: Address,
    hash: WithdrawalHash,
    proof_submitter: Address,
) -> Result<WithdrawalRecord, ResolveError>
where
    P1: Provider + Clone,
    P2: Provider + Clone,
{
    let reader = AlloyPortal::new(l1_provider, l2_provider, portal, MESSAGE_PASSER_ADDRESS);
    GameResolver::new(reader, op_node.clone())
        .resolve(hash, proof_submitter)
        .await
}

/// Timestamp of a block with derived formatted and relative forms.
pub async fn get_block_timestamp<P>(
    client: &ChainClient<P>,
    number: u64,
) -> eyre::Result<BlockTimestamp>
where
    P: Provider + Clone,
{
    let unix = client.block_timestamp(number).await?;
    Ok(BlockTimestamp::resolve(number, unix)?)
}

/// Proven-withdrawal events contained in a known transaction.
pub async fn proven_events_in_transaction<P>(
    client: &ChainClient<P>,
    tx_hash: TxHash,
) -> Result<Vec<ProvenEvent>, ClientError>
where
    P: Provider + Clone,
{
    let receipt = client.transaction_receipt(tx_hash).await?;
    Ok(proven_events_in_receipt(&receipt))
}
