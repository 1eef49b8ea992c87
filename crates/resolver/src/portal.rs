//! Alloy-backed [`PortalReader`] over live L1/L2 providers.

use crate::{PortalReader, ResolveError, WithdrawalHash};
use alloy_primitives::{Address, B256};
use alloy_provider::Provider;
use binding::opstack::{IFaultDisputeGame, IL2ToL1MessagePasser, IOptimismPortal2};
use std::{
    future::{Future, IntoFuture},
    time::Duration,
};
use tokio::time::timeout;

/// Default per-call timeout for contract reads.
const CONTRACT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Contract reads backing resolution: the portal and dispute games on L1,
/// the message passer on L2.
pub struct AlloyPortal<P1, P2> {
    l1_provider: P1,
    l2_provider: P2,
    portal_address: Address,
    message_passer_address: Address,
    timeout: Duration,
}

impl<P1, P2> AlloyPortal<P1, P2>
where
    P1: Provider + Clone,
    P2: Provider + Clone,
{
    pub const fn new(
        l1_provider: P1,
        l2_provider: P2,
        portal_address: Address,
        message_passer_address: Address,
    ) -> Self {
        Self {
            l1_provider,
            l2_provider,
            portal_address,
            message_passer_address,
            timeout: CONTRACT_CALL_TIMEOUT,
        }
    }

    /// Override the per-call timeout.
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Apply the call timeout and surface failures with the step name.
    async fn bounded<T, E>(
        &self,
        step: &'static str,
        fut: impl Future<Output = Result<T, E>>,
    ) -> Result<T, ResolveError>
    where
        E: std::fmt::Display,
    {
        match timeout(self.timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(ResolveError::Contract {
                step,
                message: e.to_string(),
            }),
            Err(_) => Err(ResolveError::Contract {
                step,
                message: format!("timed out after {:?}", self.timeout),
            }),
        }
    }
}

impl<P1, P2> PortalReader for AlloyPortal<P1, P2>
where
    P1: Provider + Clone,
    P2: Provider + Clone,
{
    async fn proven_withdrawal(
        &self,
        hash: WithdrawalHash,
        proof_submitter: Address,
    ) -> Result<(Address, u64), ResolveError> {
        let portal = IOptimismPortal2::new(self.portal_address, &self.l1_provider);
        let proven = self
            .bounded(
                "provenWithdrawals",
                portal.provenWithdrawals(hash, proof_submitter).call().into_future(),
            )
            .await?;

        Ok((proven.disputeGameProxy, proven.timestamp))
    }

    async fn game_claim(&self, game_proxy: Address) -> Result<(u64, B256), ResolveError> {
        let game = IFaultDisputeGame::new(game_proxy, &self.l1_provider);

        let l2_block = self
            .bounded("l2BlockNumber", game.l2BlockNumber().call().into_future())
            .await?;
        let root_claim = self.bounded("rootClaim", game.rootClaim().call().into_future()).await?;

        Ok((l2_block.to::<u64>(), root_claim))
    }

    async fn message_sent(&self, hash: WithdrawalHash) -> Result<bool, ResolveError> {
        let message_passer =
            IL2ToL1MessagePasser::new(self.message_passer_address, &self.l2_provider);
        let sent = self
            .bounded("sentMessages", message_passer.sentMessages(hash).call().into_future())
            .await?;

        Ok(sent)
    }
}
