//! Core error types for meetflow-core.
//!
//! The scheduling pipeline itself (generation, filtering, scoring, ranking)
//! only ever fails on bad configuration. Everything else in this hierarchy
//! belongs to the coordinator: missing records, empty proposal runs, and
//! failures of the external collaborators it talks to.

use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

use crate::request::StatusTransitionError;

/// Top-level error type for the scheduling core.
#[derive(Error, Debug)]
pub enum SchedulerError {
    /// Malformed availability or request configuration. Deterministic and
    /// caller-correctable; never retried.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigurationError),

    /// Generation and filtering produced zero candidates. Retryable with a
    /// wider date range or fewer attendees.
    #[error("No candidate slots available for the requested range")]
    NoAvailableSlots,

    /// The selected slot is not in the persisted proposal batch (stale id
    /// or expired batch). The caller must re-propose.
    #[error("Proposed slot '{slot_id}' not found or no longer valid")]
    SlotNotFound { slot_id: String },

    /// Unknown meeting request identifier.
    #[error("Meeting request '{request_id}' not found")]
    RequestNotFound { request_id: String },

    /// A state transition that the request's state machine does not allow.
    #[error(transparent)]
    InvalidTransition(#[from] StatusTransitionError),

    /// A failure reported by one of the external collaborators.
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
}

/// Configuration errors surfaced when building an availability model or a
/// generation run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// Timezone string is not a known IANA identifier.
    #[error("Unknown timezone identifier: {0}")]
    UnknownTimezone(String),

    /// An availability window with start >= end.
    #[error("Availability window must start before it ends ({start}..{end})")]
    WindowOrder { start: NaiveTime, end: NaiveTime },

    /// A window bound carrying seconds or finer. Slot enumeration works in
    /// whole minutes, so finer bounds would silently shift.
    #[error("Availability window bounds must be whole minutes ({time})")]
    SubMinuteWindowBound { time: NaiveTime },

    /// Wall-clock components that do not form a valid time of day.
    #[error("Invalid time of day: {hour:02}:{minute:02}")]
    InvalidTime { hour: u32, minute: u32 },

    /// A date range with start after end.
    #[error("Date range start {start} is after end {end}")]
    DateRangeOrder { start: NaiveDate, end: NaiveDate },

    /// Meeting duration of zero minutes.
    #[error("Meeting duration must be greater than zero")]
    ZeroDuration,
}

/// The external collaborator a failure originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collaborator {
    IntentExtraction,
    AvailabilityStore,
    BusyIntervals,
    Persistence,
    Notification,
}

impl Collaborator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collaborator::IntentExtraction => "intent extraction",
            Collaborator::AvailabilityStore => "availability store",
            Collaborator::BusyIntervals => "busy-interval source",
            Collaborator::Persistence => "persistence",
            Collaborator::Notification => "notification",
        }
    }
}

impl std::fmt::Display for Collaborator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether the failing call was a read or a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    Read,
    Write,
}

impl std::fmt::Display for AccessKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccessKind::Read => write!(f, "read"),
            AccessKind::Write => write!(f, "write"),
        }
    }
}

/// Failure of an external collaborator call.
///
/// The core does not interpret provider-specific errors; it records which
/// collaborator failed, whether the call was a read or a write, and keeps
/// the underlying error as a source when one exists.
#[derive(Error, Debug)]
#[error("{collaborator} {access} failed: {message}")]
pub struct CollaboratorError {
    pub collaborator: Collaborator,
    pub access: AccessKind,
    pub message: String,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl CollaboratorError {
    /// A read failure with no underlying source error.
    pub fn read(collaborator: Collaborator, message: impl Into<String>) -> Self {
        Self {
            collaborator,
            access: AccessKind::Read,
            message: message.into(),
            source: None,
        }
    }

    /// A write failure with no underlying source error.
    pub fn write(collaborator: Collaborator, message: impl Into<String>) -> Self {
        Self {
            collaborator,
            access: AccessKind::Write,
            message: message.into(),
            source: None,
        }
    }

    /// Attach the underlying provider error.
    pub fn with_source(
        mut self,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}
