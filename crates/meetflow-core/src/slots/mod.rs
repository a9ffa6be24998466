//! Candidate slot pipeline.
//!
//! This module provides the four pure stages of the proposal pipeline:
//! - `generator`: enumerate candidate slots from host availability
//! - `filter`: drop slots that collide with attendee busy intervals
//! - `scorer`: assign convenience/preference/overall scores
//! - `ranker`: sort, tie-break, and truncate to the requested count
//!
//! Stages run in strict sequential order within one proposal call; later
//! stages only ever see output already finalized by earlier stages.

mod filter;
mod generator;
mod ranker;
mod scorer;

pub use filter::{AvailabilityFilter, BusyCalendars};
pub use generator::{SlotGenerator, MAX_CANDIDATE_SLOTS};
pub use ranker::{rank, DEFAULT_PROPOSAL_COUNT};
pub use scorer::{convenience_score, preference_score, SlotScorer, NEUTRAL_PREFERENCE};

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// An inclusive calendar date range for slot generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Create a range, rejecting start > end.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ConfigurationError> {
        if start > end {
            return Err(ConfigurationError::DateRangeOrder { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Iterate every date in the range, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

/// An absolute busy interval from an attendee's calendar, `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Event title when the source exposes one.
    #[serde(default)]
    pub title: Option<String>,
}

impl BusyInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end,
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Strict overlap test against a half-open interval `[start, end)`.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start < end && start < self.end
    }
}

/// A busy interval that collided with a candidate slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotConflict {
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// A candidate meeting slot, enriched progressively by the pipeline.
///
/// Created by the generator with `host_available = true`, annotated with
/// attendee availability by the filter, scored by the scorer, and consumed
/// read-only by the ranker. Never shared across requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateSlot {
    pub id: String,
    pub start_utc: DateTime<Utc>,
    pub end_utc: DateTime<Utc>,
    /// IANA timezone the slot was generated in.
    pub timezone: String,
    pub host_available: bool,
    /// Attendee email -> availability, filled by the filter stage.
    #[serde(default)]
    pub attendees_available: BTreeMap<String, bool>,
    /// Busy intervals that collided with this slot, filled by the filter.
    #[serde(default)]
    pub conflicts: Vec<SlotConflict>,
    /// Time-of-day/day-of-week convenience, 0.0 to 1.0.
    #[serde(default)]
    pub convenience_score: f64,
    /// Match against stated time preferences, 0.0 to 1.0.
    #[serde(default)]
    pub preference_score: f64,
    /// Combined score used for ranking, 0.0 to 1.0.
    #[serde(default)]
    pub overall_score: f64,
}

impl CandidateSlot {
    /// Create a freshly generated slot with no attendee information yet.
    pub fn new(start_utc: DateTime<Utc>, end_utc: DateTime<Utc>, timezone: impl Into<String>) -> Self {
        Self {
            id: format!("slot-{}", uuid::Uuid::new_v4()),
            start_utc,
            end_utc,
            timezone: timezone.into(),
            host_available: true,
            attendees_available: BTreeMap::new(),
            conflicts: Vec::new(),
            convenience_score: 0.0,
            preference_score: 0.0,
            overall_score: 0.0,
        }
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end_utc - self.start_utc).num_minutes()
    }
}
