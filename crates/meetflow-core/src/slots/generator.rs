//! Candidate slot enumeration over a host's weekly availability.
//!
//! Walks every date in the requested range, steps through each bookable
//! window in `duration + buffer` increments, and converts the resulting
//! local wall-clock times to UTC instants. Slots that violate the minimum
//! notice are discarded. Generation is capped at [`MAX_CANDIDATE_SLOTS`]
//! so a wide date range never turns into unbounded work.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};

use crate::availability::AvailabilityModel;
use crate::error::{ConfigurationError, SchedulerError};
use crate::slots::{CandidateSlot, DateRange};

/// Hard cap on candidate slots produced by a single generation run.
pub const MAX_CANDIDATE_SLOTS: usize = 20;

/// Enumerates candidate slots for one availability model.
pub struct SlotGenerator<'a> {
    model: &'a AvailabilityModel,
}

impl<'a> SlotGenerator<'a> {
    pub fn new(model: &'a AvailabilityModel) -> Self {
        Self { model }
    }

    /// Generate a chronological, deduplicated sequence of candidate slots.
    ///
    /// # Arguments
    /// * `duration_minutes` - Meeting length; must be greater than zero
    /// * `range` - Inclusive calendar date range to enumerate
    /// * `now` - Reference instant for the minimum-notice check
    ///
    /// Generation halts once [`MAX_CANDIDATE_SLOTS`] slots exist or the
    /// range is exhausted, whichever comes first. A trailing partial
    /// increment that cannot fit a full duration is dropped.
    pub fn generate(
        &self,
        duration_minutes: u32,
        range: DateRange,
        now: DateTime<Utc>,
    ) -> Result<Vec<CandidateSlot>, SchedulerError> {
        if duration_minutes == 0 {
            return Err(ConfigurationError::ZeroDuration.into());
        }

        let step_minutes = i64::from(duration_minutes + self.model.buffer_minutes());
        let duration = i64::from(duration_minutes);
        let tz_name = self.model.timezone().name().to_string();

        let mut slots: Vec<CandidateSlot> = Vec::new();
        for date in range.days() {
            if slots.len() >= MAX_CANDIDATE_SLOTS {
                break;
            }

            let mut windows = self.model.windows_for(date).to_vec();
            windows.sort_by_key(|w| w.start);

            let mut day_slots: Vec<CandidateSlot> = Vec::new();
            for window in &windows {
                let window_start = minutes_from_midnight(window.start);
                let window_end = minutes_from_midnight(window.end);

                let mut cursor = window_start;
                while cursor + duration <= window_end {
                    let slot = self.slot_at(date, cursor, duration, &tz_name);
                    cursor += step_minutes;

                    let Some(slot) = slot else {
                        // Local start does not exist in this zone
                        // (DST spring-forward gap).
                        continue;
                    };
                    if !self.model.is_notice_satisfied(slot.start_utc, now) {
                        continue;
                    }
                    if day_slots.iter().any(|s| s.start_utc == slot.start_utc) {
                        continue;
                    }
                    day_slots.push(slot);
                }
            }

            day_slots.sort_by_key(|s| s.start_utc);
            if let Some(cap) = self.model.max_bookings_per_day() {
                day_slots.truncate(cap as usize);
            }

            for slot in day_slots {
                if slots.len() >= MAX_CANDIDATE_SLOTS {
                    break;
                }
                slots.push(slot);
            }
        }

        Ok(slots)
    }

    /// Build the slot starting `start_minutes` after local midnight, or
    /// `None` when the start has no UTC mapping in the zone. An end that
    /// falls inside a DST gap keeps the nominal duration instead.
    fn slot_at(
        &self,
        date: NaiveDate,
        start_minutes: i64,
        duration: i64,
        tz_name: &str,
    ) -> Option<CandidateSlot> {
        let start_utc = self.to_utc(date, start_minutes)?;
        let end_utc = self
            .to_utc(date, start_minutes + duration)
            .unwrap_or(start_utc + Duration::minutes(duration));
        Some(CandidateSlot::new(start_utc, end_utc, tz_name))
    }

    fn to_utc(&self, date: NaiveDate, minutes: i64) -> Option<DateTime<Utc>> {
        let time = NaiveTime::from_hms_opt((minutes / 60) as u32, (minutes % 60) as u32, 0)?;
        self.model
            .timezone()
            .from_local_datetime(&date.and_time(time))
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

// Window bounds are validated to whole minutes, so this loses nothing.
fn minutes_from_midnight(time: NaiveTime) -> i64 {
    i64::from(time.num_seconds_from_midnight()) / 60
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::{AvailabilityWindow, BlockedRange, WeeklyAvailability};
    use chrono::{TimeZone, Weekday};

    fn utc_model(weekly: WeeklyAvailability) -> AvailabilityModel {
        AvailabilityModel::new(weekly).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // 2026-09-07 is a Monday.
    fn monday_morning() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 9, 7, 8, 0, 0).unwrap()
    }

    #[test]
    fn first_slots_respect_notice_and_buffer() {
        // Weekday 09:00-17:00, 30 min meetings, 15 min buffer, 24h notice.
        // From a Monday 08:00 `now`, Monday itself is inside the notice
        // period, so the first slot lands on Tuesday 09:00, then 09:45.
        let model = utc_model(WeeklyAvailability::default());
        let range = DateRange::new(date(2026, 9, 7), date(2026, 9, 9)).unwrap();

        let slots = SlotGenerator::new(&model)
            .generate(30, range, monday_morning())
            .unwrap();

        assert_eq!(
            slots[0].start_utc,
            Utc.with_ymd_and_hms(2026, 9, 8, 9, 0, 0).unwrap()
        );
        assert_eq!(
            slots[0].end_utc,
            Utc.with_ymd_and_hms(2026, 9, 8, 9, 30, 0).unwrap()
        );
        assert_eq!(
            slots[1].start_utc,
            Utc.with_ymd_and_hms(2026, 9, 8, 9, 45, 0).unwrap()
        );
        assert!(slots.iter().all(|s| s.host_available));
        assert!(slots.iter().all(|s| s.attendees_available.is_empty()));
    }

    #[test]
    fn generation_is_capped() {
        let model = utc_model(WeeklyAvailability::default());
        // A month of weekdays would produce far more than the cap.
        let range = DateRange::new(date(2026, 9, 7), date(2026, 10, 7)).unwrap();

        let slots = SlotGenerator::new(&model)
            .generate(30, range, monday_morning())
            .unwrap();

        assert_eq!(slots.len(), MAX_CANDIDATE_SLOTS);
    }

    #[test]
    fn slots_are_chronological_and_non_overlapping() {
        let model = utc_model(WeeklyAvailability::default());
        let range = DateRange::new(date(2026, 9, 8), date(2026, 9, 10)).unwrap();

        let slots = SlotGenerator::new(&model)
            .generate(30, range, monday_morning())
            .unwrap();

        for pair in slots.windows(2) {
            assert!(pair[0].start_utc < pair[1].start_utc);
            assert!(pair[0].end_utc <= pair[1].start_utc);
        }
    }

    #[test]
    fn trailing_partial_increment_is_dropped() {
        let mut weekly = WeeklyAvailability::default();
        weekly.min_notice_hours = 0;
        weekly.buffer_minutes = 15;
        weekly.set_windows(
            Weekday::Tue,
            vec![AvailabilityWindow::from_hm(9, 0, 10, 0).unwrap()],
        );
        let model = utc_model(weekly);
        let range = DateRange::new(date(2026, 9, 8), date(2026, 9, 8)).unwrap();

        // 45 min meeting in a 60 min window: only 09:00-09:45 fits; the
        // next increment would start at 10:00 which cannot hold 45 min.
        let slots = SlotGenerator::new(&model)
            .generate(45, range, monday_morning())
            .unwrap();

        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].duration_minutes(), 45);
    }

    #[test]
    fn blocked_dates_produce_nothing() {
        let mut weekly = WeeklyAvailability::default();
        weekly
            .blocked_ranges
            .push(BlockedRange::new(date(2026, 9, 7), date(2026, 9, 11)));
        let model = utc_model(weekly);
        let range = DateRange::new(date(2026, 9, 7), date(2026, 9, 11)).unwrap();

        let slots = SlotGenerator::new(&model)
            .generate(30, range, monday_morning())
            .unwrap();
        assert!(slots.is_empty());
    }

    #[test]
    fn zero_duration_is_rejected() {
        let model = utc_model(WeeklyAvailability::default());
        let range = DateRange::new(date(2026, 9, 8), date(2026, 9, 8)).unwrap();

        let err = SlotGenerator::new(&model)
            .generate(0, range, monday_morning())
            .unwrap_err();
        assert!(matches!(err, SchedulerError::InvalidConfiguration(_)));
    }

    #[test]
    fn per_day_booking_cap_applies() {
        let mut weekly = WeeklyAvailability::default();
        weekly.max_bookings_per_day = Some(2);
        let model = utc_model(weekly);
        let range = DateRange::new(date(2026, 9, 8), date(2026, 9, 9)).unwrap();

        let slots = SlotGenerator::new(&model)
            .generate(30, range, monday_morning())
            .unwrap();

        assert_eq!(slots.len(), 4); // 2 per day across 2 days
        let tuesday: Vec<_> = slots
            .iter()
            .filter(|s| s.start_utc.date_naive() == date(2026, 9, 8))
            .collect();
        assert_eq!(tuesday.len(), 2);
    }

    #[test]
    fn dst_gap_start_is_skipped() {
        // US spring-forward on 2026-03-08: local 02:00-02:59 does not exist.
        let mut weekly = WeeklyAvailability::default();
        weekly.timezone = "America/New_York".into();
        weekly.min_notice_hours = 0;
        weekly.buffer_minutes = 0;
        weekly.set_windows(
            Weekday::Sun,
            vec![AvailabilityWindow::from_hm(1, 0, 5, 0).unwrap()],
        );
        let model = utc_model(weekly);
        let range = DateRange::new(date(2026, 3, 8), date(2026, 3, 8)).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 3, 7, 0, 0, 0).unwrap();

        let slots = SlotGenerator::new(&model).generate(60, range, now).unwrap();

        // 01:00, 03:00 and 04:00 survive; the 02:00 start never existed.
        assert_eq!(slots.len(), 3);
        let local_hours: Vec<u32> = slots
            .iter()
            .map(|s| {
                s.start_utc
                    .with_timezone(&chrono_tz::America::New_York)
                    .hour()
            })
            .collect();
        assert_eq!(local_hours, vec![1, 3, 4]);
    }

    #[test]
    fn overlapping_windows_do_not_duplicate_starts() {
        let mut weekly = WeeklyAvailability::default();
        weekly.min_notice_hours = 0;
        weekly.set_windows(
            Weekday::Tue,
            vec![
                AvailabilityWindow::from_hm(9, 0, 12, 0).unwrap(),
                AvailabilityWindow::from_hm(9, 0, 12, 0).unwrap(),
            ],
        );
        let model = utc_model(weekly);
        let range = DateRange::new(date(2026, 9, 8), date(2026, 9, 8)).unwrap();

        let slots = SlotGenerator::new(&model)
            .generate(30, range, monday_morning())
            .unwrap();

        let mut starts: Vec<_> = slots.iter().map(|s| s.start_utc).collect();
        starts.dedup();
        assert_eq!(starts.len(), slots.len());
    }
}
