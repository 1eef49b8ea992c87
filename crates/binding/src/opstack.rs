//! OP Stack contract bindings.
//!
//! Includes the contracts involved in validating proven L2→L1 withdrawals:
//! - OptimismPortal2 (L1 contract)
//! - FaultDisputeGame (L1 contract, resolved per withdrawal at runtime)
//! - L2ToL1MessagePasser (L2 predeploy)

use alloy_primitives::{address, Address};
use alloy_sol_types::sol;

/// L2ToL1MessagePasser predeploy address (same on all OP Stack chains).
pub const MESSAGE_PASSER_ADDRESS: Address =
    address!("0x4200000000000000000000000000000000000016");

sol! {
    /// OptimismPortal2 - Main L1 contract for withdrawal proving and finalization
    #[sol(rpc)]
    interface IOptimismPortal2 {
        /// Proven withdrawal data stored on L1
        #[derive(Debug)]
        struct ProvenWithdrawal {
            address disputeGameProxy;
            uint64 timestamp;
        }

        /// Emitted alongside WithdrawalProven, carrying the proof submitter
        event WithdrawalProvenExtension1(
            bytes32 indexed withdrawalHash,
            address indexed proofSubmitter
        );

        /// Query proven withdrawals by hash and proof submitter
        function provenWithdrawals(bytes32 withdrawalHash, address proofSubmitter)
            external view returns (ProvenWithdrawal memory);
    }

    /// IFaultDisputeGame - Standard interface for fault dispute games
    #[sol(rpc)]
    interface IFaultDisputeGame {
        /// Get the L2 block number this game is disputing
        function l2BlockNumber() external view returns (uint256);

        /// Get the root claim (output root)
        function rootClaim() external view returns (bytes32);
    }

    /// L2ToL1MessagePasser - L2 predeploy recording initiated withdrawals
    /// Address: 0x4200000000000000000000000000000000000016 (on all OP Stack chains)
    #[sol(rpc)]
    interface IL2ToL1MessagePasser {
        /// Check if a withdrawal message has been sent
        function sentMessages(bytes32) external view returns (bool);
    }
}
