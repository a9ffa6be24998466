//! Attendee availability filtering.
//!
//! Intersects generated slots with per-attendee busy intervals supplied by
//! the external busy-interval source. A slot survives only when no attendee
//! has a strictly overlapping busy interval; adjacency (a busy interval
//! ending exactly at the slot start) is not a conflict. Filtering is a pure
//! function of its inputs and performs no I/O.

use std::collections::BTreeMap;

use crate::slots::{BusyInterval, CandidateSlot, SlotConflict};

/// Busy intervals keyed by attendee email. An attendee with no entry or an
/// empty list is treated as fully available.
pub type BusyCalendars = BTreeMap<String, Vec<BusyInterval>>;

/// Drops slots that collide with attendee busy time.
pub struct AvailabilityFilter;

impl AvailabilityFilter {
    /// Annotate each slot with per-attendee availability and keep only the
    /// slots every attendee can make. A slot with zero attendees always
    /// passes (host-only meeting).
    pub fn apply(slots: Vec<CandidateSlot>, busy: &BusyCalendars) -> Vec<CandidateSlot> {
        slots
            .into_iter()
            .filter_map(|mut slot| Self::annotate(&mut slot, busy).then_some(slot))
            .collect()
    }

    /// Fill in `attendees_available` and `conflicts` for one slot, returning
    /// whether every attendee is free.
    fn annotate(slot: &mut CandidateSlot, busy: &BusyCalendars) -> bool {
        let mut all_available = true;

        for (email, intervals) in busy {
            let conflicts: Vec<&BusyInterval> = intervals
                .iter()
                .filter(|b| b.overlaps(slot.start_utc, slot.end_utc))
                .collect();

            let available = conflicts.is_empty();
            slot.attendees_available.insert(email.clone(), available);
            for conflict in conflicts {
                slot.conflicts.push(SlotConflict {
                    title: conflict.title.clone().unwrap_or_else(|| "busy".into()),
                    start: conflict.start,
                    end: conflict.end,
                });
            }
            all_available &= available;
        }

        all_available
    }
}
