//! Slot desirability scoring.
//!
//! Three independent sub-scores per slot:
//! - convenience: a fixed lookup over local hour-of-day and weekday
//! - preference: match against the request's stated time hints
//! - overall: their average, with an urgency boost for near-term slots on
//!   `asap` requests
//!
//! Scoring is a pure function of the slot plus the request's urgency and
//! the reference `now`; identical inputs always produce identical scores.

use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc, Weekday};
use chrono_tz::Tz;

use crate::intent::UrgencyLevel;
use crate::slots::CandidateSlot;

/// Neutral preference score used when no hint matches are engaged.
pub const NEUTRAL_PREFERENCE: f64 = 0.5;

/// Flat bonus applied to near-term slots on `asap` requests.
const URGENCY_BOOST: f64 = 0.2;

/// How many calendar days out a slot's date may be and still qualify for
/// the urgency boost.
const URGENCY_HORIZON_DAYS: i64 = 2;

/// Convenience of a local start time, 0.0 to 1.0.
///
/// The table is exhaustive over every weekday/hour combination:
/// mid-morning is ideal, early afternoon nearly so, lunch and the edges of
/// the workday are tolerable, weekends are a last resort.
pub fn convenience_score(weekday: Weekday, hour: u32) -> f64 {
    if matches!(weekday, Weekday::Sat | Weekday::Sun) {
        return 0.3;
    }
    match hour {
        9 | 10 => 1.0,
        14 | 15 => 0.9,
        12 => 0.7,
        8 => 0.6,
        17 => 0.5,
        _ => 0.4,
    }
}

/// Match a slot against the request's free-text time hints.
///
/// Extension point: hint matching is not implemented yet, so every slot
/// scores the neutral [`NEUTRAL_PREFERENCE`]. Callers should not rely on
/// this staying constant once hint parsing lands.
pub fn preference_score(_hints: &[String]) -> f64 {
    NEUTRAL_PREFERENCE
}

/// Scores surviving slots for one meeting request.
pub struct SlotScorer {
    urgency: UrgencyLevel,
    now: DateTime<Utc>,
}

impl SlotScorer {
    pub fn new(urgency: UrgencyLevel, now: DateTime<Utc>) -> Self {
        Self { urgency, now }
    }

    /// Populate the three score fields on every slot.
    pub fn score(&self, slots: &mut [CandidateSlot], tz: Tz, hints: &[String]) {
        let today = self.now.with_timezone(&tz).date_naive();
        for slot in slots {
            let local = slot.start_utc.with_timezone(&tz);
            slot.convenience_score = convenience_score(local.weekday(), local.hour());
            slot.preference_score = preference_score(hints);

            let mut overall = (slot.convenience_score + slot.preference_score) / 2.0;
            if self.qualifies_for_boost(local.date_naive(), today) {
                overall = (overall + URGENCY_BOOST).min(1.0);
            }
            slot.overall_score = overall;
        }
    }

    /// The horizon counts calendar days in the host's zone, not elapsed
    /// hours: a Wednesday slot is two days out from any time on Monday.
    fn qualifies_for_boost(&self, slot_date: NaiveDate, today: NaiveDate) -> bool {
        self.urgency == UrgencyLevel::Asap
            && (slot_date - today).num_days() <= URGENCY_HORIZON_DAYS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn slot_at(start: DateTime<Utc>) -> CandidateSlot {
        CandidateSlot::new(start, start + Duration::minutes(30), "UTC")
    }

    // 2026-09-07 is a Monday; 2026-09-09 a Wednesday.
    fn monday_morning() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 9, 7, 8, 0, 0).unwrap()
    }

    #[test]
    fn urgency_boost_applies_within_two_days() {
        // Wednesday 10:00, two days out: avg(0.5, 1.0) = 0.75, +0.2 for asap.
        let wednesday = Utc.with_ymd_and_hms(2026, 9, 9, 10, 0, 0).unwrap();

        let mut boosted = vec![slot_at(wednesday)];
        SlotScorer::new(UrgencyLevel::Asap, monday_morning()).score(
            &mut boosted,
            chrono_tz::UTC,
            &[],
        );
        assert!((boosted[0].overall_score - 0.95).abs() < 1e-9);

        let mut plain = vec![slot_at(wednesday)];
        SlotScorer::new(UrgencyLevel::Medium, monday_morning()).score(
            &mut plain,
            chrono_tz::UTC,
            &[],
        );
        assert!((plain[0].overall_score - 0.75).abs() < 1e-9);
    }

    #[test]
    fn boost_window_counts_calendar_days_not_hours() {
        // Wednesday 16:00 is 56 hours after Monday 08:00, but still only
        // two calendar days out: avg(0.4, 0.5) = 0.45, boosted to 0.65.
        let wednesday_late = Utc.with_ymd_and_hms(2026, 9, 9, 16, 0, 0).unwrap();
        let mut slots = vec![slot_at(wednesday_late)];
        SlotScorer::new(UrgencyLevel::Asap, monday_morning()).score(
            &mut slots,
            chrono_tz::UTC,
            &[],
        );
        assert!((slots[0].overall_score - 0.65).abs() < 1e-9);

        // Thursday morning is three days out: no boost even though it is
        // barely an hour past the Wednesday slot's elapsed time.
        let thursday = Utc.with_ymd_and_hms(2026, 9, 10, 9, 0, 0).unwrap();
        let mut slots = vec![slot_at(thursday)];
        SlotScorer::new(UrgencyLevel::Asap, monday_morning()).score(
            &mut slots,
            chrono_tz::UTC,
            &[],
        );
        assert!((slots[0].overall_score - 0.75).abs() < 1e-9);
    }

    #[test]
    fn urgency_boost_skips_far_slots() {
        // Asap request, but the slot is five days out.
        let next_week = Utc.with_ymd_and_hms(2026, 9, 14, 10, 0, 0).unwrap();
        let mut slots = vec![slot_at(next_week)];
        SlotScorer::new(UrgencyLevel::Asap, monday_morning()).score(
            &mut slots,
            chrono_tz::UTC,
            &[],
        );
        assert!((slots[0].overall_score - 0.75).abs() < 1e-9);
    }

    #[test]
    fn overall_score_is_capped_at_one() {
        // Convenience 1.0 + neutral preference + boost would exceed 1.0
        // only if convenience and preference both maxed; verify the cap
        // with a hand-built slot.
        let tuesday = Utc.with_ymd_and_hms(2026, 9, 8, 9, 0, 0).unwrap();
        let mut slots = vec![slot_at(tuesday)];
        let scorer = SlotScorer::new(UrgencyLevel::Asap, monday_morning());
        scorer.score(&mut slots, chrono_tz::UTC, &[]);
        assert!(slots[0].overall_score <= 1.0);
    }

    #[test]
    fn convenience_table_values() {
        assert_eq!(convenience_score(Weekday::Mon, 9), 1.0);
        assert_eq!(convenience_score(Weekday::Fri, 10), 1.0);
        assert_eq!(convenience_score(Weekday::Tue, 14), 0.9);
        assert_eq!(convenience_score(Weekday::Tue, 15), 0.9);
        assert_eq!(convenience_score(Weekday::Wed, 12), 0.7);
        assert_eq!(convenience_score(Weekday::Thu, 8), 0.6);
        assert_eq!(convenience_score(Weekday::Fri, 17), 0.5);
        assert_eq!(convenience_score(Weekday::Mon, 6), 0.4);
        assert_eq!(convenience_score(Weekday::Mon, 22), 0.4);
        assert_eq!(convenience_score(Weekday::Sat, 10), 0.3);
        assert_eq!(convenience_score(Weekday::Sun, 3), 0.3);
    }

    #[test]
    fn convenience_table_is_exhaustive() {
        for weekday in [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ] {
            for hour in 0..24 {
                let score = convenience_score(weekday, hour);
                assert!((0.0..=1.0).contains(&score));
            }
        }
    }

    #[test]
    fn scoring_uses_local_time() {
        // 13:00 UTC is 09:00 in New York: prime time there, lunch in UTC.
        let start = Utc.with_ymd_and_hms(2026, 9, 8, 13, 0, 0).unwrap();
        let mut slots = vec![slot_at(start)];
        SlotScorer::new(UrgencyLevel::Medium, monday_morning()).score(
            &mut slots,
            chrono_tz::America::New_York,
            &[],
        );
        assert_eq!(slots[0].convenience_score, 1.0);
    }

    #[test]
    fn scoring_is_deterministic() {
        let start = Utc.with_ymd_and_hms(2026, 9, 8, 9, 0, 0).unwrap();
        let scorer = SlotScorer::new(UrgencyLevel::Asap, monday_morning());

        let mut first = vec![slot_at(start)];
        let mut second = first.clone();
        scorer.score(&mut first, chrono_tz::UTC, &[]);
        scorer.score(&mut second, chrono_tz::UTC, &[]);
        assert_eq!(first[0].overall_score, second[0].overall_score);
        assert_eq!(first[0].convenience_score, second[0].convenience_score);
    }

    #[test]
    fn preference_defaults_to_neutral() {
        assert_eq!(preference_score(&[]), NEUTRAL_PREFERENCE);
        assert_eq!(
            preference_score(&["tuesday afternoon".into()]),
            NEUTRAL_PREFERENCE
        );
    }
}
