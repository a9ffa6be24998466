//! Final ranking of scored slots.
//!
//! Sorts by overall score descending, breaks ties in favor of the earlier
//! slot, and truncates to the requested count. Ranking is stable under
//! repeated invocation; re-ranking an already-ranked list is a no-op.

use crate::slots::CandidateSlot;

/// Default number of slots proposed when the caller does not ask for more.
pub const DEFAULT_PROPOSAL_COUNT: usize = 3;

/// Return the top `desired_count` slots, best first.
///
/// Output length is `min(desired_count, slots.len())`; the result is never
/// padded.
pub fn rank(mut slots: Vec<CandidateSlot>, desired_count: usize) -> Vec<CandidateSlot> {
    slots.sort_by(|a, b| {
        b.overall_score
            .total_cmp(&a.overall_score)
            .then_with(|| a.start_utc.cmp(&b.start_utc))
    });
    slots.truncate(desired_count);
    slots
}
