//! Dispute-game resolution for proven withdrawals.
//!
//! Given a withdrawal hash and the address that submitted its proof, the
//! resolver walks the on-chain evidence: the OptimismPortal2 provenance
//! record, the dispute game's claim, the L2 message-passer mapping, and the
//! op-node's canonical output root. The assembled [`WithdrawalRecord`] is
//! all-or-nothing; any failing step aborts resolution.

pub mod portal;

pub use portal::AlloyPortal;

use alloy_primitives::{hex, Address, B256};
use client::{OpNodeClient, OracleError};
use std::future::Future;
use thiserror::Error;
use tracing::debug;

pub type WithdrawalHash = B256;

#[derive(Error, Debug)]
pub enum ResolveError {
    /// The portal has no dispute game for this hash/submitter pair.
    #[error("no game found for withdrawal {0}")]
    NoGame(WithdrawalHash),

    /// The provided withdrawal hash was not valid 32-byte hex.
    #[error("invalid withdrawal hash: {0}")]
    InvalidHash(#[from] hex::FromHexError),

    /// A contract read failed; `step` names the failing accessor.
    #[error("{step} query failed: {message}")]
    Contract {
        step: &'static str,
        message: String,
    },

    /// The output-root oracle failed.
    #[error("output oracle failed: {0}")]
    Oracle(#[from] OracleError),
}

/// Parse a withdrawal hash from hex, with or without the `0x` prefix.
pub fn parse_withdrawal_hash(s: &str) -> Result<WithdrawalHash, ResolveError> {
    Ok(s.parse::<B256>()?)
}

/// Render a digest as a `0x`-prefixed lowercase hex string.
pub fn encode_hex(bytes: impl AsRef<[u8]>) -> String {
    hex::encode_prefixed(bytes)
}

/// Fully resolved evidence for one proven withdrawal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawalRecord {
    pub withdrawal_hash: WithdrawalHash,
    pub proof_submitter: Address,
    /// The dispute game adjudicating this withdrawal's output root.
    pub game_proxy: Address,
    /// Unix timestamp the proof was recorded at.
    pub proven_at: u64,
    /// L2 block the game's claim commits to.
    pub l2_block_number: u64,
    /// Output root the dispute game claims for `l2_block_number`.
    pub root_claim: B256,
    /// Whether the L2 message passer recorded the withdrawal.
    pub message_sent: bool,
    /// Canonical output root reported by the op-node.
    pub oracle_output_root: B256,
}

impl WithdrawalRecord {
    /// The game's claim rendered for external consumers.
    pub fn root_claim_hex(&self) -> String {
        encode_hex(self.root_claim)
    }

    /// A record is consistent when the game's claim matches the canonical
    /// output root and the message passer saw the withdrawal.
    pub fn is_consistent(&self) -> bool {
        self.message_sent && self.root_claim == self.oracle_output_root
    }
}

/// Read access to the L1 portal/game contracts and the L2 message passer.
pub trait PortalReader: Send + Sync {
    /// `provenWithdrawals(hash, submitter)` → (game proxy, proven-at timestamp).
    fn proven_withdrawal(
        &self,
        hash: WithdrawalHash,
        proof_submitter: Address,
    ) -> impl Future<Output = Result<(Address, u64), ResolveError>> + Send;

    /// The dispute game's `(l2BlockNumber, rootClaim)` pair.
    fn game_claim(
        &self,
        game_proxy: Address,
    ) -> impl Future<Output = Result<(u64, B256), ResolveError>> + Send;

    /// `sentMessages(hash)` on the L2 message passer.
    fn message_sent(
        &self,
        hash: WithdrawalHash,
    ) -> impl Future<Output = Result<bool, ResolveError>> + Send;
}

/// Canonical output roots from the L2 consensus node.
pub trait OutputOracle: Send + Sync {
    fn output_at_block(
        &self,
        block_number: u64,
    ) -> impl Future<Output = Result<B256, OracleError>> + Send;
}

impl OutputOracle for OpNodeClient {
    async fn output_at_block(&self, block_number: u64) -> Result<B256, OracleError> {
        OpNodeClient::output_at_block(self, block_number).await
    }
}

/// Assembles [`WithdrawalRecord`]s from on-chain evidence.
pub struct GameResolver<P, O> {
    portal: P,
    oracle: O,
}

impl<P, O> GameResolver<P, O>
where
    P: PortalReader,
    O: OutputOracle,
{
    pub const fn new(portal: P, oracle: O) -> Self {
        Self { portal, oracle }
    }

    /// Resolve the full record for one proven withdrawal.
    ///
    /// All-or-nothing: no partial record is ever returned.
    pub async fn resolve(
        &self,
        hash: WithdrawalHash,
        proof_submitter: Address,
    ) -> Result<WithdrawalRecord, ResolveError> {
        let (game_proxy, proven_at) = self
            .portal
            .proven_withdrawal(hash, proof_submitter)
            .await?;
        if game_proxy == Address::ZERO {
            return Err(ResolveError::NoGame(hash));
        }
        debug!(%game_proxy, proven_at, "resolved dispute game");

        let (l2_block_number, root_claim) = self.portal.game_claim(game_proxy).await?;
        let message_sent = self.portal.message_sent(hash).await?;
        let oracle_output_root = self.oracle.output_at_block(l2_block_number).await?;

        Ok(WithdrawalRecord {
            withdrawal_hash: hash,
            proof_submitter,
            game_proxy,
            proven_at,
            l2_block_number,
            root_claim,
            message_sent,
            oracle_output_root,
        })
    }

    /// As [`GameResolver::resolve`], accepting the hash as a hex string.
    pub async fn resolve_hex(
        &self,
        hash: &str,
        proof_submitter: Address,
    ) -> Result<WithdrawalRecord, ResolveError> {
        let hash = parse_withdrawal_hash(hash)?;
        self.resolve(hash, proof_submitter).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, b256, hex};
    use std::sync::atomic::{AtomicUsize, Ordering};

    const GAME: Address = address!("1111111111111111111111111111111111111111");
    const SUBMITTER: Address = address!("2222222222222222222222222222222222222222");
    const HASH: B256 = b256!("49c43b60ec99e99046b54aec4c90419ff194300e567de63423c3b974ae46bd28");
    const ROOT: B256 = b256!("16910dd86f5a70dbca2a1e1a49ea3bb7cbbb3392c894c4e099073bbbb593cbdd");

    struct MockPortal {
        game_proxy: Address,
        proven_at: u64,
        l2_block: u64,
        root_claim: B256,
        message_sent: bool,
    }

    impl MockPortal {
        fn healthy() -> Self {
            Self {
                game_proxy: GAME,
                proven_at: 1_700_000_000,
                l2_block: 420,
                root_claim: ROOT,
                message_sent: true,
            }
        }
    }

    impl PortalReader for MockPortal {
        async fn proven_withdrawal(
            &self,
            _hash: WithdrawalHash,
            _proof_submitter: Address,
        ) -> Result<(Address, u64), ResolveError> {
            Ok((self.game_proxy, self.proven_at))
        }

        async fn game_claim(&self, _game_proxy: Address) -> Result<(u64, B256), ResolveError> {
            Ok((self.l2_block, self.root_claim))
        }

        async fn message_sent(&self, _hash: WithdrawalHash) -> Result<bool, ResolveError> {
            Ok(self.message_sent)
        }
    }

    /// Oracle returning a fixed root, or HTTP 500 when `root` is `None`.
    struct MockOracle {
        root: Option<B256>,
        calls: AtomicUsize,
    }

    impl MockOracle {
        fn returning(root: B256) -> Self {
            Self {
                root: Some(root),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                root: None,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl OutputOracle for &MockOracle {
        async fn output_at_block(&self, _block_number: u64) -> Result<B256, OracleError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.root.ok_or(OracleError::Status {
                status: 500,
                body: "internal error".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_resolves_full_record() {
        let oracle = MockOracle::returning(ROOT);
        let resolver = GameResolver::new(MockPortal::healthy(), &oracle);

        let record = resolver.resolve(HASH, SUBMITTER).await.unwrap();
        assert_eq!(record.withdrawal_hash, HASH);
        assert_eq!(record.game_proxy, GAME);
        assert_eq!(record.proven_at, 1_700_000_000);
        assert_eq!(record.l2_block_number, 420);
        assert_eq!(record.root_claim, ROOT);
        assert!(record.message_sent);
        assert!(record.is_consistent());
    }

    #[tokio::test]
    async fn test_zero_game_address_is_no_game() {
        let oracle = MockOracle::returning(ROOT);
        let portal = MockPortal {
            game_proxy: Address::ZERO,
            ..MockPortal::healthy()
        };
        let resolver = GameResolver::new(portal, &oracle);

        let result = resolver.resolve(HASH, SUBMITTER).await;
        assert!(matches!(result, Err(ResolveError::NoGame(h)) if h == HASH));
        assert_eq!(oracle.calls.load(Ordering::SeqCst), 0, "no oracle call for unproven hashes");
    }

    #[tokio::test]
    async fn test_oracle_failure_aborts_resolution() {
        let oracle = MockOracle::failing();
        let resolver = GameResolver::new(MockPortal::healthy(), &oracle);

        let result = resolver.resolve(HASH, SUBMITTER).await;
        assert!(matches!(
            result,
            Err(ResolveError::Oracle(OracleError::Status { status: 500, .. }))
        ));
    }

    #[tokio::test]
    async fn test_root_claim_mismatch_is_inconsistent() {
        let oracle = MockOracle::returning(B256::with_last_byte(0x99));
        let resolver = GameResolver::new(MockPortal::healthy(), &oracle);

        let record = resolver.resolve(HASH, SUBMITTER).await.unwrap();
        assert!(!record.is_consistent());
    }

    #[tokio::test]
    async fn test_unsent_message_is_inconsistent() {
        let oracle = MockOracle::returning(ROOT);
        let portal = MockPortal {
            message_sent: false,
            ..MockPortal::healthy()
        };
        let resolver = GameResolver::new(portal, &oracle);

        let record = resolver.resolve(HASH, SUBMITTER).await.unwrap();
        assert!(!record.is_consistent());
    }

    #[tokio::test]
    async fn test_resolve_hex_normalizes_input() {
        let oracle = MockOracle::returning(ROOT);
        let resolver = GameResolver::new(MockPortal::healthy(), &oracle);

        let prefixed = format!("{}", HASH);
        let bare = prefixed.trim_start_matches("0x").to_string();

        let a = resolver.resolve_hex(&prefixed, SUBMITTER).await.unwrap();
        let b = resolver.resolve_hex(&bare, SUBMITTER).await.unwrap();
        assert_eq!(a, b);

        let result = resolver.resolve_hex("0xabc", SUBMITTER).await;
        assert!(matches!(result, Err(ResolveError::InvalidHash(_))));
    }

    #[test]
    fn test_encode_hex_round_trip() {
        assert_eq!(encode_hex(hex!("deadbeef")), "0xdeadbeef");
    }

    #[test]
    fn test_root_claim_hex_rendering() {
        let record = WithdrawalRecord {
            withdrawal_hash: HASH,
            proof_submitter: SUBMITTER,
            game_proxy: GAME,
            proven_at: 0,
            l2_block_number: 0,
            root_claim: ROOT,
            message_sent: true,
            oracle_output_root: ROOT,
        };

        assert_eq!(
            record.root_claim_hex(),
            "0x16910dd86f5a70dbca2a1e1a49ea3bb7cbbb3392c894c4e099073bbbb593cbdd"
        );
    }
}
