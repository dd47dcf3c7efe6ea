//! Usage
//!
//! Redemption semantics: whether a discount can be used at a point in time,
//! and the pure transition that records one use.

use jiff::Timestamp;
use thiserror::Error;

use crate::discounts::DiscountRecord;

/// Errors raised when recording a use.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsageError {
    /// The discount was not usable at the given time: disabled, tombstoned,
    /// outside its window, or out of redemptions.
    #[error("discount usage limit exceeded or discount not usable at {at}")]
    LimitExceeded {
        /// The time the use was attempted.
        at: Timestamp,
    },
}

/// Whether `record` can be redeemed at `now`.
///
/// Total: never fails, and an inverted window simply yields `false` (no
/// instant can fall inside it). Disabled and tombstoned records are never
/// usable, a `usage_limit` of zero means never usable, and an absent limit
/// means unlimited.
#[must_use]
pub fn is_usable(record: &DiscountRecord, now: Timestamp) -> bool {
    if record.is_disabled || record.is_deleted() {
        return false;
    }

    if now < record.starts_at {
        return false;
    }

    if record.ends_at.is_some_and(|ends_at| now > ends_at) {
        return false;
    }

    record
        .usage_limit
        .is_none_or(|limit| record.usage_count < limit)
}

/// Records one use as a pure state transition: given a snapshot that is
/// usable at `now`, returns an updated record with the counter advanced and
/// `updated_at` stamped. The snapshot is never mutated.
///
/// Callers racing over the same discount must serialize this transition per
/// discount id; see [`crate::store::DiscountStore::record_usage`].
///
/// # Errors
///
/// - [`UsageError::LimitExceeded`]: the record was not usable at `now`.
pub fn record_usage(record: &DiscountRecord, now: Timestamp) -> Result<DiscountRecord, UsageError> {
    if !is_usable(record, now) {
        return Err(UsageError::LimitExceeded { at: now });
    }

    let mut used = record.clone();
    // The counter saturates rather than wraps for unlimited discounts.
    used.usage_count = used.usage_count.saturating_add(1);
    used.updated_at = now;

    Ok(used)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::discounts::{DiscountId, NewDiscount};

    use super::*;

    const T0: i64 = 1_750_000_000;

    fn at(seconds_after_t0: i64) -> Result<Timestamp, jiff::Error> {
        Timestamp::from_second(T0 + seconds_after_t0)
    }

    fn window_record(
        usage_limit: Option<u32>,
        usage_count: u32,
    ) -> Result<DiscountRecord, jiff::Error> {
        let mut record = NewDiscount {
            code: "window".to_string(),
            starts_at: Some(at(0)?),
            ends_at: Some(at(86_400)?),
            usage_limit,
            ..NewDiscount::default()
        }
        .into_record(DiscountId::new(), at(0)?);

        record.usage_count = usage_count;

        Ok(record)
    }

    #[test]
    fn usable_inside_the_window() -> TestResult {
        let record = window_record(None, 0)?;

        assert!(is_usable(&record, at(3_600)?));
        assert!(is_usable(&record, at(0)?), "window start is inclusive");
        assert!(is_usable(&record, at(86_400)?), "window end is inclusive");

        Ok(())
    }

    #[test]
    fn unusable_outside_the_window() -> TestResult {
        let record = window_record(None, 0)?;

        assert!(!is_usable(&record, at(-1)?), "before the start");
        assert!(!is_usable(&record, at(86_401)?), "after the end");

        Ok(())
    }

    #[test]
    fn disabled_wins_over_everything() -> TestResult {
        let mut record = window_record(None, 0)?;
        record.is_disabled = true;

        assert!(!is_usable(&record, at(3_600)?));

        Ok(())
    }

    #[test]
    fn tombstoned_records_are_never_usable() -> TestResult {
        let mut record = window_record(None, 0)?;
        record.deleted_at = Some(at(10)?);

        assert!(!is_usable(&record, at(3_600)?));

        Ok(())
    }

    #[test]
    fn inverted_windows_yield_false_not_an_error() -> TestResult {
        let mut record = window_record(None, 0)?;
        record.ends_at = Some(at(-86_400)?);

        assert!(!is_usable(&record, at(3_600)?));

        Ok(())
    }

    #[test]
    fn zero_limit_is_never_usable() -> TestResult {
        let record = window_record(Some(0), 0)?;

        assert!(!is_usable(&record, at(3_600)?));

        Ok(())
    }

    #[test]
    fn exhausted_limit_blocks_use() -> TestResult {
        let record = window_record(Some(3), 3)?;
        let now = at(3_600)?;

        assert!(!is_usable(&record, now));
        assert_eq!(
            record_usage(&record, now),
            Err(UsageError::LimitExceeded { at: now })
        );

        Ok(())
    }

    #[test]
    fn recording_a_use_advances_the_counter() -> TestResult {
        let record = window_record(Some(3), 2)?;
        let now = at(3_600)?;

        let used = record_usage(&record, now)?;

        assert_eq!(used.usage_count, 3);
        assert_eq!(used.updated_at, now);
        assert_eq!(record.usage_count, 2, "the snapshot is untouched");
        assert!(!is_usable(&used, now), "the third use was the last");

        Ok(())
    }
}
