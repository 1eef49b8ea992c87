//! Backward paginated search for the most recent proven-withdrawal event.
//!
//! The scan pages from the chain tip towards genesis in `batch_size`-block
//! windows. A window that fails to query is retried with backoff, then logged
//! and skipped; the search only gives up once the genesis window came up
//! empty. The window-to-window policy is an explicit state machine
//! ([`ScanState::advance`]) rather than a loop's error handler.

use crate::timestamp::{BlockTimestamp, TimestampError};
use alloy_primitives::{Address, TxHash, B256};
use client::ClientError;
use std::future::Future;
use thiserror::Error;
use tokio_retry::{strategy::ExponentialBackoff, Retry};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Default number of blocks queried per scan window.
pub const DEFAULT_BATCH_SIZE: u64 = 1_000;

/// Retries per window before the failure is absorbed and the scan moves on.
const BATCH_RETRIES: usize = 3;

#[derive(Error, Debug)]
pub enum ScanError {
    /// The whole range down to genesis was scanned without a match.
    #[error("no matching event found in the scanned range")]
    NoMatch,

    /// The scan was cancelled between windows.
    #[error("scan cancelled")]
    Cancelled,

    /// A non-recoverable query failed (chain tip or timestamp lookup).
    #[error("rpc query failed: {0}")]
    Rpc(#[source] ClientError),

    #[error(transparent)]
    Timestamp(#[from] TimestampError),
}

/// One decoded `WithdrawalProvenExtension1` occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvenEvent {
    pub block_number: u64,
    pub tx_hash: TxHash,
    /// The emitting contract (the OptimismPortal2 proxy).
    pub contract: Address,
    pub withdrawal_hash: B256,
    pub proof_submitter: Address,
}

/// A matched event together with its block timestamp.
#[derive(Debug, Clone)]
pub struct FoundEvent {
    pub log: ProvenEvent,
    pub timestamp: BlockTimestamp,
}

/// One batch of the backward scan.
///
/// `from_block = to_block - batch_size`, saturating at genesis. Windows share
/// their boundary block with the preceding window, so an event sitting
/// exactly on the boundary is found in the higher window first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanWindow {
    pub from_block: u64,
    pub to_block: u64,
}

impl ScanWindow {
    /// The window of `batch_size` blocks ending at `to_block`.
    pub const fn ending_at(to_block: u64, batch_size: u64) -> Self {
        Self {
            from_block: to_block.saturating_sub(batch_size),
            to_block,
        }
    }

    /// The next window down, or `None` once this window reached genesis.
    pub const fn preceding(&self, batch_size: u64) -> Option<Self> {
        if self.from_block == 0 {
            None
        } else {
            Some(Self::ending_at(self.from_block, batch_size))
        }
    }
}

/// Result of querying one window.
#[derive(Debug)]
pub enum BatchOutcome {
    /// The window was queried; zero or more matching logs.
    Logs(Vec<ProvenEvent>),
    /// The query failed after retries; the failure was logged and absorbed.
    Failed,
}

/// Explicit scan state.
#[derive(Debug)]
pub enum ScanState {
    /// Querying the contained window next.
    Scanning(ScanWindow),
    /// A match was found; scanning stopped.
    Found(ProvenEvent),
    /// Genesis was reached without a match.
    Exhausted,
    /// The scan cannot continue.
    Failed(ScanError),
}

impl ScanState {
    /// Advance the state machine with the outcome of the current window.
    ///
    /// | state       | outcome              | next                        |
    /// |-------------|----------------------|-----------------------------|
    /// | Scanning(w) | Logs(non-empty)      | Found(newest by block)      |
    /// | Scanning(w) | Logs(empty) / Failed | Scanning(next) or Exhausted |
    /// | terminal    | any                  | unchanged                   |
    pub fn advance(self, outcome: BatchOutcome, batch_size: u64) -> Self {
        let Self::Scanning(window) = self else {
            return self;
        };

        if let BatchOutcome::Logs(mut logs) = outcome {
            // Endpoint ordering is not trusted; sort before taking the
            // newest entry.
            logs.sort_by_key(|log| log.block_number);
            if let Some(newest) = logs.pop() {
                return Self::Found(newest);
            }
        }

        match window.preceding(batch_size) {
            Some(next) => Self::Scanning(next),
            None => Self::Exhausted,
        }
    }
}

/// Source of chain data for the scanner.
///
/// Implemented over a live endpoint by
/// [`PortalLogSource`](crate::source::PortalLogSource); the seam is also
/// where an adaptive batch-sizing layer would slot in.
pub trait LogSource: Send + Sync {
    /// Latest known block height.
    fn chain_tip(&self) -> impl Future<Output = Result<u64, ClientError>> + Send;

    /// Matching events in `window`, empty when none exist.
    fn proven_events(
        &self,
        window: ScanWindow,
    ) -> impl Future<Output = Result<Vec<ProvenEvent>, ClientError>> + Send;

    /// Unix timestamp of the given block.
    fn block_timestamp(&self, number: u64)
        -> impl Future<Output = Result<u64, ClientError>> + Send;
}

/// Backward paginated scanner over a [`LogSource`].
pub struct EventScanner<S> {
    source: S,
    batch_size: u64,
    cancel: CancellationToken,
}

impl<S> EventScanner<S>
where
    S: LogSource,
{
    pub fn new(source: S) -> Self {
        Self {
            source,
            batch_size: DEFAULT_BATCH_SIZE,
            cancel: CancellationToken::new(),
        }
    }

    /// Override the scan window size. Values below 1 are clamped to 1.
    pub fn with_batch_size(mut self, batch_size: u64) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Attach a cancellation token checked between windows.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Find the most recent matching event, paging backwards from the tip.
    ///
    /// Batch size only affects the number of round trips, never which event
    /// is returned.
    pub async fn find_latest(&self) -> Result<FoundEvent, ScanError> {
        let tip = self.source.chain_tip().await.map_err(ScanError::Rpc)?;
        let mut state = ScanState::Scanning(ScanWindow::ending_at(tip, self.batch_size));

        loop {
            let window = match state {
                ScanState::Scanning(window) => window,
                ScanState::Found(log) => return self.with_timestamp(log).await,
                ScanState::Exhausted => return Err(ScanError::NoMatch),
                ScanState::Failed(err) => return Err(err),
            };

            if self.cancel.is_cancelled() {
                state = ScanState::Failed(ScanError::Cancelled);
                continue;
            }

            let outcome = match self.query_window(window).await {
                Ok(logs) => BatchOutcome::Logs(logs),
                Err(err) => {
                    warn!(
                        from_block = window.from_block,
                        to_block = window.to_block,
                        error = %err,
                        "window query failed, continuing with the next window"
                    );
                    BatchOutcome::Failed
                }
            };

            state = ScanState::Scanning(window).advance(outcome, self.batch_size);
        }
    }

    async fn with_timestamp(&self, log: ProvenEvent) -> Result<FoundEvent, ScanError> {
        let unix = self
            .source
            .block_timestamp(log.block_number)
            .await
            .map_err(ScanError::Rpc)?;
        let timestamp = BlockTimestamp::resolve(log.block_number, unix)?;

        Ok(FoundEvent { log, timestamp })
    }

    /// Query one window, retrying transient failures with backoff before the
    /// failure is surfaced to the state machine.
    async fn query_window(&self, window: ScanWindow) -> Result<Vec<ProvenEvent>, ClientError> {
        let retry_strategy = ExponentialBackoff::from_millis(100).take(BATCH_RETRIES);

        Retry::spawn(retry_strategy, || async {
            self.source.proven_events(window).await.map_err(|err| {
                debug!(
                    from_block = window.from_block,
                    to_block = window.to_block,
                    error = %err,
                    "window query attempt failed"
                );
                err
            })
        })
        .await
    }
}
