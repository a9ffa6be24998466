//! Meeting request lifecycle and the scheduled-meeting artifact.
//!
//! A `MeetingRequest` is created when intent extraction detects a scheduling
//! need and then moves through a small state machine:
//!
//! ```text
//! detected -> slots_proposed -> scheduled -> { rescheduled | cancelled | completed | no_show }
//!                                  rescheduled -> slots_proposed (new cycle)
//! ```
//!
//! `cancelled`, `completed` and `no_show` are terminal. A reschedule never
//! mutates the prior `ScheduledMeeting`'s times; a new selection produces a
//! new scheduled record and the old one is kept for audit.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::intent::{MeetingIntent, SenderInfo, UrgencyLevel};
use crate::slots::CandidateSlot;

/// Lifecycle state of a meeting request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetingStatus {
    Detected,
    SlotsProposed,
    Scheduled,
    Rescheduled,
    Cancelled,
    Completed,
    NoShow,
}

impl MeetingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingStatus::Detected => "detected",
            MeetingStatus::SlotsProposed => "slots_proposed",
            MeetingStatus::Scheduled => "scheduled",
            MeetingStatus::Rescheduled => "rescheduled",
            MeetingStatus::Cancelled => "cancelled",
            MeetingStatus::Completed => "completed",
            MeetingStatus::NoShow => "no_show",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "detected" => Some(MeetingStatus::Detected),
            "slots_proposed" => Some(MeetingStatus::SlotsProposed),
            "scheduled" => Some(MeetingStatus::Scheduled),
            "rescheduled" => Some(MeetingStatus::Rescheduled),
            "cancelled" => Some(MeetingStatus::Cancelled),
            "completed" => Some(MeetingStatus::Completed),
            "no_show" => Some(MeetingStatus::NoShow),
            _ => None,
        }
    }

    /// Whether no further transitions are allowed from this state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            MeetingStatus::Cancelled | MeetingStatus::Completed | MeetingStatus::NoShow
        )
    }

    /// Whether the state machine allows moving to `next`.
    pub fn can_transition_to(&self, next: &MeetingStatus) -> bool {
        match (self, next) {
            (MeetingStatus::Detected, MeetingStatus::SlotsProposed) => true,
            // Re-proposal with a wider range replaces the batch in place.
            (MeetingStatus::SlotsProposed, MeetingStatus::SlotsProposed) => true,
            (MeetingStatus::SlotsProposed, MeetingStatus::Scheduled) => true,
            (MeetingStatus::Scheduled, MeetingStatus::Rescheduled) => true,
            (MeetingStatus::Scheduled, MeetingStatus::Cancelled) => true,
            (MeetingStatus::Scheduled, MeetingStatus::Completed) => true,
            (MeetingStatus::Scheduled, MeetingStatus::NoShow) => true,
            (MeetingStatus::Rescheduled, MeetingStatus::SlotsProposed) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for MeetingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when an invalid status transition is attempted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusTransitionError {
    pub from: MeetingStatus,
    pub to: MeetingStatus,
}

impl std::fmt::Display for StatusTransitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Invalid status transition: {} → {}",
            self.from, self.to
        )
    }
}

impl std::error::Error for StatusTransitionError {}

/// Someone expected in the meeting besides the requester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl Participant {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
            role: None,
        }
    }
}

/// One detected or manually created scheduling need.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingRequest {
    pub id: String,
    pub requester_email: String,
    pub participants: Vec<Participant>,
    pub suggested_duration_minutes: u32,
    /// Free-text time preference hints from extraction.
    pub preferred_times: Vec<String>,
    pub earliest_date: Option<NaiveDate>,
    pub latest_date: Option<NaiveDate>,
    pub urgency: UrgencyLevel,
    pub status: MeetingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MeetingRequest {
    /// Create a new request in the `detected` state.
    pub fn new(requester_email: impl Into<String>, duration_minutes: u32) -> Self {
        let now = Utc::now();
        Self {
            id: format!("req-{}-{}", now.timestamp(), uuid::Uuid::new_v4()),
            requester_email: requester_email.into(),
            participants: Vec::new(),
            suggested_duration_minutes: duration_minutes,
            preferred_times: Vec::new(),
            earliest_date: None,
            latest_date: None,
            urgency: UrgencyLevel::Medium,
            status: MeetingStatus::Detected,
            created_at: now,
            updated_at: now,
        }
    }

    /// Build a request from an extracted intent. The sender becomes both the
    /// requester and the first participant.
    pub fn from_intent(sender: &SenderInfo, intent: &MeetingIntent, default_duration: u32) -> Self {
        let mut request = Self::new(
            sender.email.clone(),
            intent.duration_minutes.unwrap_or(default_duration),
        );
        let mut participant = Participant::new(sender.email.clone());
        participant.name = sender.name.clone();
        request.participants.push(participant);
        request.preferred_times = intent.preferred_times.clone();
        request.earliest_date = intent.earliest_date;
        request.latest_date = intent.latest_date;
        request.urgency = intent.urgency;
        request
    }

    /// Transition to a new status.
    ///
    /// Returns an error if the transition is invalid; the request is left
    /// unchanged in that case.
    pub fn transition_to(&mut self, next: MeetingStatus) -> Result<(), StatusTransitionError> {
        if !self.status.can_transition_to(&next) {
            return Err(StatusTransitionError {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// The finalized artifact once a candidate slot has been selected.
///
/// Start and end are immutable after creation; rescheduling supersedes this
/// record with a new one rather than rewriting the time fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledMeeting {
    pub id: String,
    pub request_id: String,
    pub start_utc: DateTime<Utc>,
    pub end_utc: DateTime<Utc>,
    pub timezone: String,
    pub attendees: Vec<Participant>,
    pub status: MeetingStatus,
    pub created_at: DateTime<Utc>,
}

impl ScheduledMeeting {
    /// Materialize a meeting from a selected candidate slot.
    pub fn from_slot(request: &MeetingRequest, slot: &CandidateSlot) -> Self {
        Self {
            id: format!("mtg-{}", uuid::Uuid::new_v4()),
            request_id: request.id.clone(),
            start_utc: slot.start_utc,
            end_utc: slot.end_utc,
            timezone: slot.timezone.clone(),
            attendees: request.participants.clone(),
            status: MeetingStatus::Scheduled,
            created_at: Utc::now(),
        }
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end_utc - self.start_utc).num_minutes()
    }
}
