//! Merge-age threshold checks

use chrono::{DateTime, Utc};
use common::models::TimeThreshold;

/// Check if a PR merged at `merged_at` has been merged for at least `threshold`.
///
/// The boundary is inclusive. A deadline past the representable range is
/// never reached.
pub fn is_stale(merged_at: DateTime<Utc>, threshold: &TimeThreshold, now: DateTime<Utc>) -> bool {
    merged_at
        .checked_add_signed(threshold.duration())
        .is_some_and(|deadline| now >= deadline)
}
