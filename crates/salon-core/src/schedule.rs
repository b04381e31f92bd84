//! # Scheduling Plan
//!
//! The storage-free half of booking a reservation: validate the candidate,
//! then make sure the hairdresser is free.
//!
//! ```text
//! ReservationCandidate
//!      │
//!      ▼
//! ReservationValidator::validate ── errors ──► CoreError::Validation
//!      │
//!      ▼
//! check_no_conflict(existing) ───── overlap ─► CoreError::SlotTaken
//!      │
//!      ▼
//! NormalizedReservation (ready to persist)
//! ```
//!
//! `salon-db`'s `Scheduler` runs this inside a transaction after loading
//! the reference data and the hairdresser's agenda.

use crate::conflict::check_no_conflict;
use crate::error::CoreResult;
use crate::types::{Hairdresser, NormalizedReservation, Reservation, ReservationCandidate, Service};
use crate::validation::ReservationValidator;

/// Validates `candidate` and checks it against `existing`.
///
/// `existing` may hold other hairdressers' reservations; they are ignored.
/// Conflicts are only looked for once validation passed, since an invalid
/// candidate has no trustworthy slot.
pub fn plan(
    validator: &ReservationValidator,
    candidate: &ReservationCandidate,
    hairdresser: Option<&Hairdresser>,
    service: Option<&Service>,
    existing: &[Reservation],
) -> CoreResult<NormalizedReservation> {
    let normalized = validator.validate(candidate, hairdresser, service)?;
    check_no_conflict(&normalized, existing)?;
    Ok(normalized)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, Field};
    use crate::types::Specialization;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use std::collections::BTreeSet;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, h, m, 0).unwrap()
    }

    fn fixtures() -> (Hairdresser, Service) {
        let now = Utc::now();
        let hairdresser = Hairdresser {
            id: "h1".to_string(),
            name: "Testowy Fryzjer".to_string(),
            specializations: BTreeSet::from([Specialization::MensCut]),
            created_at: now,
            updated_at: now,
        };
        let service = Service {
            id: "s1".to_string(),
            name: "Cut".to_string(),
            specializations: BTreeSet::from([Specialization::MensCut, Specialization::WomensCut]),
            duration_minutes: 60,
            cost_cents: 10_000,
            created_at: now,
            updated_at: now,
        };
        (hairdresser, service)
    }

    fn stored(id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Reservation {
        Reservation {
            id: id.to_string(),
            hairdresser_id: "h1".to_string(),
            service_id: Some("s1".to_string()),
            start,
            end,
            created_at: start,
            updated_at: start,
        }
    }

    #[test]
    fn test_plan_accepts_free_slot() {
        let (h, s) = fixtures();
        let validator = ReservationValidator::default();
        let candidate = ReservationCandidate::new("h1", "s1", at(10, 0));

        let planned = plan(&validator, &candidate, Some(&h), Some(&s), &[]).unwrap();
        assert_eq!(planned.end, at(10, 0) + Duration::minutes(60));
    }

    #[test]
    fn test_plan_rejects_overlap() {
        let (h, s) = fixtures();
        let validator = ReservationValidator::default();
        let existing = vec![stored("r1", at(10, 0), at(11, 0))];
        let candidate = ReservationCandidate::new("h1", "s1", at(10, 30));

        let err = plan(&validator, &candidate, Some(&h), Some(&s), &existing).unwrap_err();
        assert!(matches!(err, CoreError::SlotTaken { ref conflicts } if conflicts.len() == 1));
    }

    #[test]
    fn test_plan_reports_validation_before_conflicts() {
        let (h, s) = fixtures();
        let validator = ReservationValidator::default();
        let existing = vec![stored("r1", at(10, 0), at(11, 0))];
        let candidate = ReservationCandidate::new("h1", "s1", at(10, 30)).with_end(at(10, 0));

        match plan(&validator, &candidate, Some(&h), Some(&s), &existing).unwrap_err() {
            CoreError::Validation(errors) => assert!(errors.contains(Field::End)),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_plan_allows_moving_own_reservation() {
        let (h, s) = fixtures();
        let validator = ReservationValidator::default();
        let existing = vec![stored("r1", at(10, 0), at(11, 0))];
        let candidate = ReservationCandidate::new("h1", "s1", at(10, 30)).for_reservation("r1");

        let planned = plan(&validator, &candidate, Some(&h), Some(&s), &existing).unwrap();
        assert_eq!(planned.id.as_deref(), Some("r1"));
        assert_eq!(planned.start, at(10, 30));
    }
}
