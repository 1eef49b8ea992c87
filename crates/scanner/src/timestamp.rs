//! Block timestamp formatting.

use chrono::{DateTime, TimeDelta, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TimestampError {
    /// The chain reported a timestamp outside the representable range.
    #[error("timestamp {0} is out of range")]
    OutOfRange(u64),
}

/// A block's timestamp with derived human-readable forms.
///
/// Always derived on demand, never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockTimestamp {
    pub block_number: u64,
    /// Unix timestamp in seconds.
    pub timestamp: u64,
    /// `YYYY-MM-DD HH:MM:SS` in UTC.
    pub formatted: String,
    /// Time elapsed between the block and now.
    pub relative: TimeDelta,
}

impl BlockTimestamp {
    /// Derive the formatted and relative forms for a block's unix timestamp.
    pub fn resolve(block_number: u64, timestamp: u64) -> Result<Self, TimestampError> {
        Self::resolve_at(block_number, timestamp, Utc::now())
    }

    /// As [`BlockTimestamp::resolve`], with an explicit "now".
    pub fn resolve_at(
        block_number: u64,
        timestamp: u64,
        now: DateTime<Utc>,
    ) -> Result<Self, TimestampError> {
        let seconds =
            i64::try_from(timestamp).map_err(|_| TimestampError::OutOfRange(timestamp))?;
        let moment = DateTime::<Utc>::from_timestamp(seconds, 0)
            .ok_or(TimestampError::OutOfRange(timestamp))?;

        Ok(Self {
            block_number,
            timestamp,
            formatted: moment.format("%Y-%m-%d %H:%M:%S").to_string(),
            relative: now.signed_duration_since(moment),
        })
    }

    /// Compact `1d 2h 3m 4s` rendering of [`BlockTimestamp::relative`].
    pub fn relative_display(&self) -> String {
        let total = self.relative.num_seconds().max(0);
        let (days, rem) = (total / 86_400, total % 86_400);
        let (hours, rem) = (rem / 3_600, rem % 3_600);
        let (minutes, seconds) = (rem / 60, rem % 60);

        if days > 0 {
            format!("{}d {}h {}m {}s", days, hours, minutes, seconds)
        } else if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(timestamp: i64) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(timestamp, 0).unwrap()
    }

    #[test]
    fn test_formatted_utc() {
        let ts = BlockTimestamp::resolve(123, 1_700_000_000).unwrap();
        assert_eq!(ts.block_number, 123);
        assert_eq!(ts.timestamp, 1_700_000_000);
        assert_eq!(ts.formatted, "2023-11-14 22:13:20");
    }

    #[test]
    fn test_relative_to_explicit_now() {
        let ts = BlockTimestamp::resolve_at(5, 1_000, utc(4_600)).unwrap();
        assert_eq!(ts.relative.num_seconds(), 3_600);
        assert_eq!(ts.relative_display(), "1h 0m 0s");
    }

    #[test]
    fn test_relative_display_units() {
        let base = 1_700_000_000;
        let cases = [
            (12, "12s"),
            (3 * 60 + 4, "3m 4s"),
            (26 * 3_600 + 3 * 60 + 4, "1d 2h 3m 4s"),
        ];

        for (elapsed, expected) in cases {
            let ts = BlockTimestamp::resolve_at(1, base, utc(base as i64 + elapsed)).unwrap();
            assert_eq!(ts.relative_display(), expected);
        }
    }

    #[test]
    fn test_out_of_range_timestamp() {
        let result = BlockTimestamp::resolve(1, u64::MAX);
        assert!(matches!(result, Err(TimestampError::OutOfRange(_))));
    }
}
