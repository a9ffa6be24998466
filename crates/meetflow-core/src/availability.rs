//! Recurring weekly availability for a meeting host.
//!
//! This module provides:
//! - `WeeklyAvailability`: the persisted shape of a host's bookable hours
//! - `AvailabilityModel`: validated, timezone-resolved view used by the
//!   slot generator
//! - Blocked date ranges (holidays) and the notice/buffer booking rules

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Timelike, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// A bookable interval within one calendar day. Invariants: start < end,
/// both bounds on whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl AvailabilityWindow {
    /// Create a window, rejecting start >= end and sub-minute bounds.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, ConfigurationError> {
        for bound in [start, end] {
            if bound.second() != 0 || bound.nanosecond() != 0 {
                return Err(ConfigurationError::SubMinuteWindowBound { time: bound });
            }
        }
        if start >= end {
            return Err(ConfigurationError::WindowOrder { start, end });
        }
        Ok(Self { start, end })
    }

    /// Create a window from wall-clock hour/minute pairs.
    pub fn from_hm(
        start_hour: u32,
        start_minute: u32,
        end_hour: u32,
        end_minute: u32,
    ) -> Result<Self, ConfigurationError> {
        let start = NaiveTime::from_hms_opt(start_hour, start_minute, 0).ok_or(
            ConfigurationError::InvalidTime {
                hour: start_hour,
                minute: start_minute,
            },
        )?;
        let end = NaiveTime::from_hms_opt(end_hour, end_minute, 0).ok_or(
            ConfigurationError::InvalidTime {
                hour: end_hour,
                minute: end_minute,
            },
        )?;
        Self::new(start, end)
    }

    /// Window length in minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// An absolute blocked date interval (e.g. a holiday). Inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl BlockedRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Whether a date falls inside this range.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// A host's recurring weekly bookable hours and booking rules.
///
/// This is the shape persisted by the availability store. It is loaded once
/// per proposal run and validated into an [`AvailabilityModel`]; windows
/// within a day are expected not to overlap (caller's responsibility).
///
/// `windows` is indexed Monday = 0 .. Sunday = 6.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyAvailability {
    /// IANA timezone identifier the windows are expressed in.
    pub timezone: String,
    /// Minimum lead time between "now" and a bookable slot start.
    pub min_notice_hours: u32,
    /// Idle time inserted between consecutive proposed meetings.
    pub buffer_minutes: u32,
    /// Per-weekday bookable windows, Monday first.
    pub windows: [Vec<AvailabilityWindow>; 7],
    /// Absolute date intervals with no availability at all.
    #[serde(default)]
    pub blocked_ranges: Vec<BlockedRange>,
    /// Optional cap on proposed slots per calendar day.
    #[serde(default)]
    pub max_bookings_per_day: Option<u32>,
}

impl WeeklyAvailability {
    /// Windows configured for a weekday, in insertion order.
    pub fn windows_on(&self, weekday: Weekday) -> &[AvailabilityWindow] {
        &self.windows[weekday.num_days_from_monday() as usize]
    }

    /// Replace the windows for a weekday.
    pub fn set_windows(&mut self, weekday: Weekday, windows: Vec<AvailabilityWindow>) {
        self.windows[weekday.num_days_from_monday() as usize] = windows;
    }
}

impl Default for WeeklyAvailability {
    /// The documented store fallback: weekdays 09:00-17:00, 24h notice,
    /// 15 minute buffer, no blocked dates.
    fn default() -> Self {
        let workday = vec![AvailabilityWindow {
            start: hm(9, 0),
            end: hm(17, 0),
        }];
        Self {
            timezone: "UTC".into(),
            min_notice_hours: 24,
            buffer_minutes: 15,
            windows: [
                workday.clone(),
                workday.clone(),
                workday.clone(),
                workday.clone(),
                workday,
                Vec::new(),
                Vec::new(),
            ],
            blocked_ranges: Vec::new(),
            max_bookings_per_day: None,
        }
    }
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).expect("literal time")
}

/// Validated, timezone-resolved availability used by the slot generator.
///
/// Construction fails fast on an unknown timezone or a window with
/// start >= end; all query methods are pure functions over immutable state.
#[derive(Debug, Clone)]
pub struct AvailabilityModel {
    weekly: WeeklyAvailability,
    tz: Tz,
}

impl AvailabilityModel {
    pub fn new(weekly: WeeklyAvailability) -> Result<Self, ConfigurationError> {
        let tz: Tz = weekly
            .timezone
            .parse()
            .map_err(|_| ConfigurationError::UnknownTimezone(weekly.timezone.clone()))?;

        // Deserialized windows bypass the validating constructor, so every
        // window re-runs it here.
        for day in &weekly.windows {
            for window in day {
                AvailabilityWindow::new(window.start, window.end)?;
            }
        }

        Ok(Self { weekly, tz })
    }

    /// The resolved IANA timezone.
    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub fn min_notice_hours(&self) -> u32 {
        self.weekly.min_notice_hours
    }

    pub fn buffer_minutes(&self) -> u32 {
        self.weekly.buffer_minutes
    }

    pub fn max_bookings_per_day(&self) -> Option<u32> {
        self.weekly.max_bookings_per_day
    }

    /// The day's windows; empty when the date is blocked or the weekday has
    /// no configured windows.
    pub fn windows_for(&self, date: NaiveDate) -> &[AvailabilityWindow] {
        if self.weekly.blocked_ranges.iter().any(|r| r.contains(date)) {
            return &[];
        }
        self.weekly.windows_on(date.weekday())
    }

    /// Whether a candidate start respects the minimum notice from `now`.
    pub fn is_notice_satisfied(&self, candidate_start: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        candidate_start - now >= Duration::hours(i64::from(self.weekly.min_notice_hours))
    }
}
