//! Structured output of the external intent-extraction service.
//!
//! The core treats the text-understanding call as an opaque collaborator
//! returning this already-validated shape. Intent parsing itself is never
//! reimplemented here.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Urgency of a detected scheduling need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyLevel {
    Low,
    #[default]
    Medium,
    High,
    Asap,
}

impl UrgencyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            UrgencyLevel::Low => "low",
            UrgencyLevel::Medium => "medium",
            UrgencyLevel::High => "high",
            UrgencyLevel::Asap => "asap",
        }
    }
}

impl std::fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Who sent the message that was analyzed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SenderInfo {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl SenderInfo {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Structured meeting intent extracted from free text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingIntent {
    /// Whether the message asks for a meeting at all.
    pub is_meeting_request: bool,
    /// Extraction confidence, 0.0 to 1.0.
    pub confidence: f64,
    /// Short description of what the meeting is about.
    pub intent: String,
    /// Suggested duration when the message states one.
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    /// Free-text time preference hints (e.g. "tuesday afternoon").
    #[serde(default)]
    pub preferred_times: Vec<String>,
    #[serde(default)]
    pub earliest_date: Option<NaiveDate>,
    #[serde(default)]
    pub latest_date: Option<NaiveDate>,
    #[serde(default)]
    pub urgency: UrgencyLevel,
}
