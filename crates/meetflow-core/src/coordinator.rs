//! End-to-end orchestration of the meeting request lifecycle.
//!
//! The coordinator owns the state machine (`detected` → `slots_proposed` →
//! `scheduled` and the branches off `scheduled`) and delegates all numeric
//! work to the pure slot pipeline. External collaborators -- intent
//! extraction, the availability store, the busy-interval source,
//! persistence, and invite dispatch -- are injected as trait handles per
//! coordinator instance; there are no shared client singletons.
//!
//! A status transition is persisted only after every required side effect
//! for that transition has succeeded. The one deliberately non-blocking
//! failure is invite dispatch after a successful schedule: the meeting
//! exists even if the courtesy notification does not go out.

#![allow(async_fn_in_trait)]

use chrono::{DateTime, Duration, NaiveTime, Utc};

use crate::availability::{AvailabilityModel, WeeklyAvailability};
use crate::error::{CollaboratorError, SchedulerError};
use crate::intent::{MeetingIntent, SenderInfo};
use crate::request::{MeetingRequest, MeetingStatus, ScheduledMeeting};
use crate::slots::{
    rank, AvailabilityFilter, BusyInterval, CandidateSlot, DateRange, SlotGenerator, SlotScorer,
    DEFAULT_PROPOSAL_COUNT,
};

/// Opaque text-understanding call returning structured meeting intent.
pub trait IntentExtractor {
    /// `context` carries optional conversation history or CRM notes.
    async fn analyze(
        &self,
        message: &str,
        sender: &SenderInfo,
        context: Option<&str>,
    ) -> Result<MeetingIntent, CollaboratorError>;
}

/// Read access to per-user recurring availability.
pub trait AvailabilityStore {
    /// `None` when the user has no stored record; the coordinator falls
    /// back to [`WeeklyAvailability::default`].
    async fn availability(
        &self,
        user_email: &str,
    ) -> Result<Option<WeeklyAvailability>, CollaboratorError>;
}

/// Per-attendee busy intervals from external calendars.
pub trait BusySource {
    /// An empty list means "fully available", not an error.
    async fn busy_intervals(
        &self,
        email: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<BusyInterval>, CollaboratorError>;
}

/// Simple create/read/update persistence for requests, proposal batches,
/// and scheduled meetings.
pub trait ProposalStore {
    async fn create_request(&self, request: &MeetingRequest) -> Result<(), CollaboratorError>;
    async fn request(&self, request_id: &str)
        -> Result<Option<MeetingRequest>, CollaboratorError>;
    async fn update_request_status(
        &self,
        request_id: &str,
        status: MeetingStatus,
    ) -> Result<(), CollaboratorError>;
    /// Replaces any prior batch for the request wholesale.
    async fn save_proposed_slots(
        &self,
        request_id: &str,
        slots: &[CandidateSlot],
    ) -> Result<(), CollaboratorError>;
    async fn proposed_slots(
        &self,
        request_id: &str,
    ) -> Result<Option<Vec<CandidateSlot>>, CollaboratorError>;
    async fn save_scheduled_meeting(
        &self,
        meeting: &ScheduledMeeting,
    ) -> Result<(), CollaboratorError>;
}

/// Calendar-invite dispatch. Fire-and-forget from the core's perspective.
pub trait InviteNotifier {
    async fn send_invites(&self, meeting: &ScheduledMeeting) -> Result<(), CollaboratorError>;
}

/// Tunables for the coordinator.
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Minimum extraction confidence to open a request.
    pub confidence_threshold: f64,
    /// Meeting length used when extraction does not state one.
    pub default_duration_minutes: u32,
    /// Proposal window when the request has no earliest/latest dates.
    pub default_range_days: i64,
    /// Slots returned per proposal run.
    pub proposal_count: usize,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.6,
            default_duration_minutes: 30,
            default_range_days: 14,
            proposal_count: DEFAULT_PROPOSAL_COUNT,
        }
    }
}

/// Per-call overrides for a proposal run.
#[derive(Debug, Clone, Default)]
pub struct ProposeOptions {
    /// Override the date range derived from the request.
    pub date_range: Option<DateRange>,
    /// Override the configured proposal count.
    pub desired_count: Option<usize>,
    /// Reference instant for notice/urgency checks. Defaults to the wall
    /// clock; tests inject a fixed value.
    pub now: Option<DateTime<Utc>>,
}

/// Orchestrates detect → propose → schedule for meeting requests.
pub struct MeetingRequestCoordinator<X, A, B, P, N> {
    extractor: X,
    availability: A,
    busy_source: B,
    store: P,
    notifier: N,
    config: CoordinatorConfig,
}

impl<X, A, B, P, N> MeetingRequestCoordinator<X, A, B, P, N>
where
    X: IntentExtractor,
    A: AvailabilityStore,
    B: BusySource,
    P: ProposalStore,
    N: InviteNotifier,
{
    pub fn new(extractor: X, availability: A, busy_source: B, store: P, notifier: N) -> Self {
        Self::with_config(
            extractor,
            availability,
            busy_source,
            store,
            notifier,
            CoordinatorConfig::default(),
        )
    }

    pub fn with_config(
        extractor: X,
        availability: A,
        busy_source: B,
        store: P,
        notifier: N,
        config: CoordinatorConfig,
    ) -> Self {
        Self {
            extractor,
            availability,
            busy_source,
            store,
            notifier,
            config,
        }
    }

    /// Access the injected persistence handle.
    pub fn store(&self) -> &P {
        &self.store
    }

    /// Analyze a message and open a request when it asks for a meeting with
    /// enough confidence. Returns `None` for non-meeting messages.
    pub async fn detect(
        &self,
        message: &str,
        sender: &SenderInfo,
        context: Option<&str>,
    ) -> Result<Option<MeetingRequest>, SchedulerError> {
        let intent = self.extractor.analyze(message, sender, context).await?;
        if !intent.is_meeting_request || intent.confidence < self.config.confidence_threshold {
            return Ok(None);
        }

        let request =
            MeetingRequest::from_intent(sender, &intent, self.config.default_duration_minutes);
        self.store.create_request(&request).await?;
        tracing::debug!(
            request_id = %request.id,
            confidence = intent.confidence,
            "meeting intent detected"
        );
        Ok(Some(request))
    }

    /// Run the slot pipeline for a request and persist the ranked batch.
    ///
    /// Fails with [`SchedulerError::NoAvailableSlots`] when nothing survives
    /// filtering; the request keeps its prior status in that case and the
    /// caller may retry with a wider range. Calling this on a `scheduled`
    /// request supersedes the prior meeting (audit record kept), writes the
    /// intermediate `rescheduled` status, and starts a new proposal cycle.
    pub async fn propose(
        &self,
        request_id: &str,
        options: ProposeOptions,
    ) -> Result<Vec<CandidateSlot>, SchedulerError> {
        let now = options.now.unwrap_or_else(Utc::now);
        let request = self.load_request(request_id).await?;

        // Validate the full transition chain up front; status writes
        // happen only after every side effect has succeeded.
        let mut staged = request.clone();
        let rescheduling = staged.status == MeetingStatus::Scheduled;
        if rescheduling {
            staged.transition_to(MeetingStatus::Rescheduled)?;
        }
        staged.transition_to(MeetingStatus::SlotsProposed)?;

        let weekly = self
            .availability
            .availability(&request.requester_email)
            .await?
            .unwrap_or_default();
        let model = AvailabilityModel::new(weekly)?;
        let range = self.resolve_range(&request, &model, now, options.date_range)?;

        let generated =
            SlotGenerator::new(&model).generate(request.suggested_duration_minutes, range, now)?;

        let busy_from = range.start().and_time(NaiveTime::MIN).and_utc() - Duration::days(1);
        let busy_to = range.end().and_time(NaiveTime::MIN).and_utc() + Duration::days(2);
        let mut busy = std::collections::BTreeMap::new();
        for participant in &request.participants {
            let intervals = self
                .busy_source
                .busy_intervals(&participant.email, busy_from, busy_to)
                .await?;
            busy.insert(participant.email.clone(), intervals);
        }

        let mut open = AvailabilityFilter::apply(generated, &busy);
        SlotScorer::new(request.urgency, now).score(
            &mut open,
            model.timezone(),
            &request.preferred_times,
        );
        let ranked = rank(
            open,
            options.desired_count.unwrap_or(self.config.proposal_count),
        );
        if ranked.is_empty() {
            return Err(SchedulerError::NoAvailableSlots);
        }

        self.store.save_proposed_slots(&request.id, &ranked).await?;
        // Stored history walks the same chain the state machine does, so a
        // superseded meeting leaves a `rescheduled` entry behind.
        if rescheduling {
            self.store
                .update_request_status(&request.id, MeetingStatus::Rescheduled)
                .await?;
        }
        self.store
            .update_request_status(&request.id, staged.status)
            .await?;
        tracing::debug!(
            request_id = %request.id,
            slots = ranked.len(),
            "slot proposal persisted"
        );
        Ok(ranked)
    }

    /// Finalize a meeting from a previously proposed slot.
    ///
    /// Invite dispatch failure is logged and swallowed: the scheduled
    /// meeting stands once persistence has succeeded.
    pub async fn schedule(
        &self,
        request_id: &str,
        slot_id: &str,
    ) -> Result<ScheduledMeeting, SchedulerError> {
        let mut request = self.load_request(request_id).await?;
        let batch = self
            .store
            .proposed_slots(request_id)
            .await?
            .ok_or_else(|| SchedulerError::SlotNotFound {
                slot_id: slot_id.to_string(),
            })?;
        let slot = batch
            .into_iter()
            .find(|s| s.id == slot_id)
            .ok_or_else(|| SchedulerError::SlotNotFound {
                slot_id: slot_id.to_string(),
            })?;

        request.transition_to(MeetingStatus::Scheduled)?;
        let meeting = ScheduledMeeting::from_slot(&request, &slot);
        self.store.save_scheduled_meeting(&meeting).await?;
        self.store
            .update_request_status(&request.id, request.status)
            .await?;

        if let Err(err) = self.notifier.send_invites(&meeting).await {
            tracing::warn!(
                meeting_id = %meeting.id,
                request_id = %request.id,
                error = %err,
                "invite dispatch failed after scheduling"
            );
        }
        Ok(meeting)
    }

    /// Externally triggered terminal transition: the meeting was called off.
    pub async fn cancel(&self, request_id: &str) -> Result<MeetingRequest, SchedulerError> {
        self.finalize(request_id, MeetingStatus::Cancelled).await
    }

    /// Externally triggered terminal transition: the meeting happened.
    pub async fn complete(&self, request_id: &str) -> Result<MeetingRequest, SchedulerError> {
        self.finalize(request_id, MeetingStatus::Completed).await
    }

    /// Externally triggered terminal transition: nobody showed up.
    pub async fn mark_no_show(&self, request_id: &str) -> Result<MeetingRequest, SchedulerError> {
        self.finalize(request_id, MeetingStatus::NoShow).await
    }

    async fn finalize(
        &self,
        request_id: &str,
        status: MeetingStatus,
    ) -> Result<MeetingRequest, SchedulerError> {
        let mut request = self.load_request(request_id).await?;
        request.transition_to(status)?;
        self.store
            .update_request_status(&request.id, request.status)
            .await?;
        Ok(request)
    }

    async fn load_request(&self, request_id: &str) -> Result<MeetingRequest, SchedulerError> {
        self.store
            .request(request_id)
            .await?
            .ok_or_else(|| SchedulerError::RequestNotFound {
                request_id: request_id.to_string(),
            })
    }

    fn resolve_range(
        &self,
        request: &MeetingRequest,
        model: &AvailabilityModel,
        now: DateTime<Utc>,
        range_override: Option<DateRange>,
    ) -> Result<DateRange, SchedulerError> {
        if let Some(range) = range_override {
            return Ok(range);
        }
        let today = now.with_timezone(&model.timezone()).date_naive();
        let start = request.earliest_date.unwrap_or(today).max(today);
        let end = request
            .latest_date
            .unwrap_or(start + Duration::days(self.config.default_range_days));
        Ok(DateRange::new(start, end)?)
    }
}
