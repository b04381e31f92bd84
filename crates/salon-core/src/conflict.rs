//! # Conflict Detection
//!
//! Finds existing reservations that would collide with a new one.
//!
//! Two reservations conflict when they share a hairdresser and their
//! half-open slots intersect:
//!
//! ```text
//! existing   [10:00 ─────── 11:00)
//! candidate            [10:30 ─────── 11:30)   → conflict
//! candidate                   [11:00 ── 12:00)  → ok (touching)
//! ```
//!
//! Only the hairdresser is exclusive. Two reservations for the same
//! service with different hairdressers never conflict.

use crate::error::{CoreError, CoreResult};
use crate::types::{NormalizedReservation, Reservation};

/// Returns every reservation in `existing` that collides with `candidate`.
///
/// `exclude_id` skips the candidate's own stored row when editing, so a
/// reservation never conflicts with itself.
pub fn find_conflicts(
    candidate: &NormalizedReservation,
    existing: &[Reservation],
    exclude_id: Option<&str>,
) -> Vec<Reservation> {
    let slot = candidate.slot();

    existing
        .iter()
        .filter(|r| r.hairdresser_id == candidate.hairdresser_id)
        .filter(|r| Some(r.id.as_str()) != exclude_id)
        .filter(|r| r.start < slot.end && slot.start < r.end)
        .cloned()
        .collect()
}

/// Fails with [`CoreError::SlotTaken`] if `candidate` collides with anything
/// other than its own stored row.
pub fn check_no_conflict(
    candidate: &NormalizedReservation,
    existing: &[Reservation],
) -> CoreResult<()> {
    let conflicts = find_conflicts(candidate, existing, candidate.id.as_deref());

    if conflicts.is_empty() {
        Ok(())
    } else {
        Err(CoreError::SlotTaken { conflicts })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, h, m, 0).unwrap()
    }

    fn stored(id: &str, hairdresser: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Reservation {
        Reservation {
            id: id.to_string(),
            hairdresser_id: hairdresser.to_string(),
            service_id: Some("s1".to_string()),
            start,
            end,
            created_at: start,
            updated_at: start,
        }
    }

    fn candidate(hairdresser: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> NormalizedReservation {
        NormalizedReservation {
            id: None,
            hairdresser_id: hairdresser.to_string(),
            service_id: "s1".to_string(),
            start,
            end,
        }
    }

    #[test]
    fn test_partial_overlap_conflicts() {
        let existing = vec![stored("r1", "h1", at(10, 0), at(11, 0))];
        let conflicts = find_conflicts(&candidate("h1", at(10, 30), at(11, 30)), &existing, None);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].id, "r1");
    }

    #[test]
    fn test_touching_slots_do_not_conflict() {
        let existing = vec![stored("r1", "h1", at(10, 0), at(11, 0))];
        assert!(find_conflicts(&candidate("h1", at(11, 0), at(12, 0)), &existing, None).is_empty());
        assert!(find_conflicts(&candidate("h1", at(9, 0), at(10, 0)), &existing, None).is_empty());
    }

    #[test]
    fn test_one_minute_overlap_conflicts() {
        let existing = vec![stored("r1", "h1", at(10, 0), at(11, 0))];
        assert_eq!(
            find_conflicts(&candidate("h1", at(10, 59), at(12, 0)), &existing, None).len(),
            1
        );
    }

    #[test]
    fn test_containment_conflicts_both_ways() {
        let existing = vec![stored("r1", "h1", at(10, 0), at(12, 0))];
        assert_eq!(find_conflicts(&candidate("h1", at(10, 30), at(11, 0)), &existing, None).len(), 1);

        let existing = vec![stored("r1", "h1", at(10, 30), at(11, 0))];
        assert_eq!(find_conflicts(&candidate("h1", at(10, 0), at(12, 0)), &existing, None).len(), 1);
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let pairs = [
            ((10, 0), (11, 0), (10, 30), (11, 30)),
            ((10, 0), (11, 0), (11, 0), (12, 0)),
            ((9, 0), (9, 15), (9, 15), (9, 30)),
            ((8, 0), (12, 0), (9, 0), (10, 0)),
        ];
        for (a_start, a_end, b_start, b_end) in pairs {
            let a = (at(a_start.0, a_start.1), at(a_end.0, a_end.1));
            let b = (at(b_start.0, b_start.1), at(b_end.0, b_end.1));

            let a_vs_b = find_conflicts(&candidate("h1", a.0, a.1), &[stored("b", "h1", b.0, b.1)], None).len();
            let b_vs_a = find_conflicts(&candidate("h1", b.0, b.1), &[stored("a", "h1", a.0, a.1)], None).len();
            assert_eq!(a_vs_b, b_vs_a);
        }
    }

    #[test]
    fn test_exclude_id_skips_matching_row() {
        let existing = vec![stored("r1", "h1", at(10, 0), at(11, 0))];
        let slot = candidate("h1", at(10, 0), at(11, 0));
        assert_eq!(find_conflicts(&slot, &existing, None).len(), 1);
        assert!(find_conflicts(&slot, &existing, Some("r1")).is_empty());
    }

    #[test]
    fn test_other_hairdressers_are_ignored() {
        let existing = vec![stored("r1", "h2", at(10, 0), at(11, 0))];
        assert!(check_no_conflict(&candidate("h1", at(10, 0), at(11, 0)), &existing).is_ok());
    }

    #[test]
    fn test_edit_excludes_own_row() {
        let existing = vec![
            stored("r1", "h1", at(10, 0), at(11, 0)),
            stored("r2", "h1", at(12, 0), at(13, 0)),
        ];
        let mut edit = candidate("h1", at(10, 15), at(11, 15));
        edit.id = Some("r1".to_string());
        assert!(check_no_conflict(&edit, &existing).is_ok());

        edit.end = at(12, 30);
        let err = check_no_conflict(&edit, &existing).unwrap_err();
        match err {
            CoreError::SlotTaken { conflicts } => {
                assert_eq!(conflicts.len(), 1);
                assert_eq!(conflicts[0].id, "r2");
            }
            other => panic!("expected SlotTaken, got {other:?}"),
        }
    }
}
