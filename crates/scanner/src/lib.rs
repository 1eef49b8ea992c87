//! Backward event scanning for proven withdrawals.
//!
//! The scanner walks L1 log history backwards in bounded windows until it
//! finds the most recent `WithdrawalProvenExtension1` event, tolerating
//! per-window RPC faults. No indexer required.

pub mod scan;
pub mod source;
pub mod timestamp;

pub use scan::{
    BatchOutcome, EventScanner, FoundEvent, LogSource, ProvenEvent, ScanError, ScanState,
    ScanWindow, DEFAULT_BATCH_SIZE,
};
pub use source::{proven_events_in_receipt, PortalLogSource};
pub use timestamp::{BlockTimestamp, TimestampError};
