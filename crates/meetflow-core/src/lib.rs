//! # Meetflow Core Library
//!
//! This library provides the meeting slot proposal and scoring engine for
//! the Meetflow scheduler service. Given a detected meeting intent, it
//! enumerates candidate time slots across a host's recurring weekly
//! availability, filters them against attendee busy time, scores them by
//! convenience and urgency, and hands back a ranked, bounded candidate set
//! for human selection.
//!
//! ## Architecture
//!
//! - **Availability**: recurring weekly windows, notice/buffer rules, and
//!   blocked date ranges, resolved against an IANA timezone
//! - **Slot pipeline**: generate → filter → score → rank, all pure and
//!   synchronous, bounded by a hard generation cap
//! - **Coordinator**: owns the request state machine and the async seams to
//!   external collaborators (extraction, storage, busy calendars, invites)
//!
//! ## Key Components
//!
//! - [`AvailabilityModel`]: validated, timezone-resolved host availability
//! - [`SlotGenerator`]: candidate enumeration with notice and buffer rules
//! - [`SlotScorer`]: convenience/preference/urgency scoring
//! - [`MeetingRequestCoordinator`]: detect → propose → schedule lifecycle

pub mod availability;
pub mod coordinator;
pub mod error;
pub mod intent;
pub mod request;
pub mod slots;

pub use availability::{AvailabilityModel, AvailabilityWindow, BlockedRange, WeeklyAvailability};
pub use coordinator::{
    AvailabilityStore, BusySource, CoordinatorConfig, IntentExtractor, InviteNotifier,
    MeetingRequestCoordinator, ProposalStore, ProposeOptions,
};
pub use error::{
    AccessKind, Collaborator, CollaboratorError, ConfigurationError, SchedulerError,
};
pub use intent::{MeetingIntent, SenderInfo, UrgencyLevel};
pub use request::{
    MeetingRequest, MeetingStatus, Participant, ScheduledMeeting, StatusTransitionError,
};
pub use slots::{
    rank, AvailabilityFilter, BusyCalendars, BusyInterval, CandidateSlot, DateRange, SlotConflict,
    SlotGenerator, SlotScorer, DEFAULT_PROPOSAL_COUNT, MAX_CANDIDATE_SLOTS,
};
