//! # Scheduler
//!
//! The single write path for reservations.
//!
//! ## One Scheduling Attempt
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  schedule(candidate)                                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  write_lock.lock()            ← one attempt at a time per Database     │
//! │  BEGIN IMMEDIATE              ← SQLite write lock, across processes    │
//! │       │                                                                 │
//! │       ├── load hairdresser (+ specializations)                         │
//! │       ├── load service (+ specializations)                             │
//! │       ├── editing? reservation must exist ─────────► NotFound          │
//! │       ├── load hairdresser's agenda                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  salon_core::schedule::plan                                            │
//! │       ├── validator ────────────────────────────────► ValidationFailed │
//! │       └── conflict check ───────────────────────────► SlotTaken        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  INSERT / UPDATE                                                       │
//! │  COMMIT                       ← any error before this rolls back       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The agenda read and the write share one transaction and the lock, so two
//! concurrent requests for the same slot cannot both pass the overlap check.

use std::sync::Arc;

use sqlx::SqlitePool;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::SchedulingError;
use crate::repository::hairdresser::fetch_hairdresser;
use crate::repository::reservation::{fetch_for_hairdresser, fetch_reservation, remove, save};
use crate::repository::service::fetch_service;
use salon_core::schedule::plan;
use salon_core::{Reservation, ReservationCandidate, ReservationValidator};

/// Validates, checks and stores reservations atomically.
///
/// Created with [`Database::scheduler`](crate::Database::scheduler).
#[derive(Debug, Clone)]
pub struct Scheduler {
    pool: SqlitePool,
    write_lock: Arc<Mutex<()>>,
    validator: ReservationValidator,
}

impl Scheduler {
    pub(crate) fn new(
        pool: SqlitePool,
        write_lock: Arc<Mutex<()>>,
        validator: ReservationValidator,
    ) -> Self {
        Scheduler {
            pool,
            write_lock,
            validator,
        }
    }

    pub fn validator(&self) -> &ReservationValidator {
        &self.validator
    }

    /// Books or moves a reservation.
    ///
    /// A candidate without an id creates a reservation; one with an id
    /// replaces that reservation's hairdresser, service and slot.
    ///
    /// ## Returns
    /// * `Ok(Reservation)` - The stored reservation, end time filled in
    /// * `Err(ValidationFailed)` - Field errors, nothing written
    /// * `Err(SlotTaken)` - Overlaps another reservation, nothing written
    /// * `Err(NotFound)` - Editing a reservation that doesn't exist
    pub async fn schedule(
        &self,
        candidate: &ReservationCandidate,
    ) -> Result<Reservation, SchedulingError> {
        let _guard = self.write_lock.lock().await;

        let result = self.schedule_locked(candidate).await;

        match &result {
            Ok(reservation) => info!(
                id = %reservation.id,
                hairdresser_id = %reservation.hairdresser_id,
                start = %reservation.start,
                end = %reservation.end,
                "Reservation committed"
            ),
            Err(SchedulingError::Persistence(err)) => {
                warn!(error = %err, "Scheduling failed in the database")
            }
            Err(err) => warn!(error = %err, "Scheduling rejected"),
        }

        result
    }

    async fn schedule_locked(
        &self,
        candidate: &ReservationCandidate,
    ) -> Result<Reservation, SchedulingError> {
        // Take SQLite's write lock up front so other processes on the same
        // file wait on the busy timeout instead of failing mid-transaction.
        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;

        let hairdresser = match candidate.hairdresser_id.as_deref() {
            Some(id) => fetch_hairdresser(&mut *tx, id.trim()).await?,
            None => None,
        };
        let service = match candidate.service_id.as_deref() {
            Some(id) => fetch_service(&mut *tx, id.trim()).await?,
            None => None,
        };

        if let Some(id) = candidate.id.as_deref() {
            if fetch_reservation(&mut *tx, id).await?.is_none() {
                return Err(SchedulingError::NotFound(id.to_string()));
            }
        }

        let existing = match &hairdresser {
            Some(h) => fetch_for_hairdresser(&mut *tx, &h.id).await?,
            None => Vec::new(),
        };

        debug!(existing = existing.len(), "Loaded hairdresser agenda");

        let normalized = plan(
            &self.validator,
            candidate,
            hairdresser.as_ref(),
            service.as_ref(),
            &existing,
        )?;

        let stored = save(&mut tx, &normalized).await?;

        tx.commit().await?;

        Ok(stored)
    }

    /// Deletes a reservation on an operator's request.
    pub async fn cancel(&self, id: &str) -> Result<(), SchedulingError> {
        let _guard = self.write_lock.lock().await;

        debug!(id = %id, "Cancelling reservation");

        if !remove(&self.pool, id).await? {
            return Err(SchedulingError::NotFound(id.to_string()));
        }

        info!(id = %id, "Reservation cancelled");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
    use salon_core::{
        Field, Hairdresser, NewHairdresser, NewService, Service, Specialization, TimeInput,
        ValidationError,
    };
    use std::collections::BTreeSet;
    use Specialization::*;

    struct Fixture {
        db: Database,
        scheduler: Scheduler,
        hairdresser: Hairdresser,
        service: Service,
    }

    async fn fixture() -> Fixture {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let hairdresser = db
            .hairdressers()
            .create(&NewHairdresser {
                name: "Testowy Fryzjer".to_string(),
                specializations: BTreeSet::from([MensCut]),
            })
            .await
            .unwrap();
        let service = db
            .services()
            .create(&NewService {
                name: "Cut".to_string(),
                specializations: BTreeSet::from([MensCut, WomensCut]),
                duration_minutes: 60,
                cost_cents: 10_000,
            })
            .await
            .unwrap();

        let scheduler = db.scheduler(ReservationValidator::new(chrono_tz::UTC));

        Fixture {
            db,
            scheduler,
            hairdresser,
            service,
        }
    }

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 1, 1, h, m, 0).unwrap()
    }

    impl Fixture {
        fn candidate(&self, start: impl Into<TimeInput>) -> ReservationCandidate {
            ReservationCandidate::new(&self.hairdresser.id, &self.service.id, start)
        }
    }

    #[tokio::test]
    async fn test_book_then_overlap_is_rejected() {
        let f = fixture().await;

        let first = f.scheduler.schedule(&f.candidate(at(10, 0))).await.unwrap();
        assert_eq!(first.start, at(10, 0));
        assert_eq!(first.end, at(11, 0));
        assert_eq!(first.service_id.as_deref(), Some(f.service.id.as_str()));

        let err = f.scheduler.schedule(&f.candidate(at(10, 30))).await.unwrap_err();
        match err {
            SchedulingError::SlotTaken { conflicts } => {
                assert_eq!(conflicts.len(), 1);
                assert_eq!(conflicts[0].id, first.id);
            }
            other => panic!("expected SlotTaken, got {other:?}"),
        }

        assert_eq!(f.db.reservations().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_back_to_back_bookings_are_allowed() {
        let f = fixture().await;

        f.scheduler.schedule(&f.candidate(at(10, 0))).await.unwrap();
        f.scheduler.schedule(&f.candidate(at(11, 0))).await.unwrap();

        let agenda = f
            .db
            .reservations()
            .list_for_hairdresser(&f.hairdresser.id)
            .await
            .unwrap();
        assert_eq!(agenda.len(), 2);
        assert!(agenda[0].start < agenda[1].start);
    }

    #[tokio::test]
    async fn test_one_minute_overlap_is_rejected() {
        let f = fixture().await;

        f.scheduler.schedule(&f.candidate(at(10, 0))).await.unwrap();
        let err = f.scheduler.schedule(&f.candidate(at(10, 59))).await.unwrap_err();
        assert!(matches!(err, SchedulingError::SlotTaken { .. }));
    }

    #[tokio::test]
    async fn test_other_hairdresser_can_take_same_slot() {
        let f = fixture().await;
        let other = f
            .db
            .hairdressers()
            .create(&NewHairdresser {
                name: "Druga Fryzjerka".to_string(),
                specializations: BTreeSet::from([WomensCut]),
            })
            .await
            .unwrap();

        f.scheduler.schedule(&f.candidate(at(10, 0))).await.unwrap();
        let candidate = ReservationCandidate::new(&other.id, &f.service.id, at(10, 0));
        assert!(f.scheduler.schedule(&candidate).await.is_ok());
    }

    #[tokio::test]
    async fn test_unqualified_hairdresser_is_rejected() {
        let f = fixture().await;
        let stylist = f
            .db
            .hairdressers()
            .create(&NewHairdresser {
                name: "Stylistka".to_string(),
                specializations: BTreeSet::from([Stylist]),
            })
            .await
            .unwrap();

        let candidate = ReservationCandidate::new(&stylist.id, &f.service.id, at(10, 0));
        match f.scheduler.schedule(&candidate).await.unwrap_err() {
            SchedulingError::ValidationFailed(errors) => {
                assert!(matches!(
                    errors.get(Field::Hairdresser),
                    [ValidationError::UnqualifiedHairdresser { .. }]
                ));
            }
            other => panic!("expected ValidationFailed, got {other:?}"),
        }
        assert_eq!(f.db.reservations().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_references_are_field_errors() {
        let f = fixture().await;
        let candidate = ReservationCandidate::new("ghost", "nothing", at(10, 0));

        match f.scheduler.schedule(&candidate).await.unwrap_err() {
            SchedulingError::ValidationFailed(errors) => {
                assert!(errors.contains(Field::Hairdresser));
                assert!(errors.contains(Field::Service));
            }
            other => panic!("expected ValidationFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_errors_serialize_as_field_map() {
        let f = fixture().await;
        let candidate = ReservationCandidate {
            hairdresser_id: Some(f.hairdresser.id.clone()),
            ..Default::default()
        };

        let SchedulingError::ValidationFailed(errors) =
            f.scheduler.schedule(&candidate).await.unwrap_err()
        else {
            panic!("expected ValidationFailed");
        };

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["service"][0]["code"], "required");
        assert_eq!(json["start"][0]["code"], "required");
        assert!(json.get("hairdresser").is_none());

        let messages = errors.messages();
        assert_eq!(messages[&Field::Service], vec!["service is required".to_string()]);
        assert_eq!(messages[&Field::Start], vec!["start is required".to_string()]);
        assert!(!messages.contains_key(&Field::Hairdresser));
    }

    #[tokio::test]
    async fn test_naive_start_uses_validator_zone() {
        let f = fixture().await;

        let warsaw = f.db.scheduler(ReservationValidator::new(chrono_tz::Europe::Warsaw));
        let local = NaiveDate::from_ymd_opt(2023, 1, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();

        let stored = warsaw
            .schedule(&f.candidate(TimeInput::Local(local)))
            .await
            .unwrap();
        assert_eq!(stored.start, at(9, 0));
        assert_eq!(stored.end, at(10, 0));
    }

    #[tokio::test]
    async fn test_moving_a_reservation() {
        let f = fixture().await;
        let first = f.scheduler.schedule(&f.candidate(at(10, 0))).await.unwrap();
        let second = f.scheduler.schedule(&f.candidate(at(12, 0))).await.unwrap();
        let stored_first = f.db.reservations().get_by_id(&first.id).await.unwrap().unwrap();

        // Overlapping its own old slot is fine.
        let moved = f
            .scheduler
            .schedule(&f.candidate(at(10, 30)).for_reservation(&first.id))
            .await
            .unwrap();
        assert_eq!(moved.id, first.id);
        assert_eq!(moved.start, at(10, 30));
        assert_eq!(moved.end, at(11, 30));
        assert_eq!(moved.created_at, stored_first.created_at);

        // Overlapping someone else's is not.
        let err = f
            .scheduler
            .schedule(&f.candidate(at(11, 0)).for_reservation(&second.id))
            .await
            .unwrap_err();
        assert!(matches!(err, SchedulingError::SlotTaken { .. }));

        let err = f
            .scheduler
            .schedule(&f.candidate(at(15, 0)).for_reservation("missing"))
            .await
            .unwrap_err();
        assert!(matches!(err, SchedulingError::NotFound(ref id) if id == "missing"));
    }

    #[tokio::test]
    async fn test_explicit_end_is_stored() {
        let f = fixture().await;
        let stored = f
            .scheduler
            .schedule(&f.candidate(at(10, 0)).with_end(at(10, 0) + Duration::minutes(45)))
            .await
            .unwrap();
        assert_eq!(stored.end, at(10, 45));

        let err = f
            .scheduler
            .schedule(&f.candidate(at(14, 0)).with_end(at(13, 0)))
            .await
            .unwrap_err();
        assert!(matches!(err, SchedulingError::ValidationFailed(ref e) if e.contains(Field::End)));
    }

    #[tokio::test]
    async fn test_concurrent_requests_for_one_slot() {
        let f = fixture().await;
        let a = f.scheduler.clone();
        let b = f.db.scheduler(ReservationValidator::new(chrono_tz::UTC));
        let candidate = f.candidate(at(10, 0));

        let (first, second) = tokio::join!(a.schedule(&candidate), b.schedule(&candidate));

        assert_eq!(
            [first.is_ok(), second.is_ok()].iter().filter(|ok| **ok).count(),
            1
        );
        assert_eq!(f.db.reservations().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_separate_handles_on_one_file_do_not_double_book() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("salon.db");

        let one = Database::new(DbConfig::new(&path)).await.unwrap();
        let two = Database::new(DbConfig::new(&path)).await.unwrap();

        let hairdresser = one
            .hairdressers()
            .create(&NewHairdresser {
                name: "Anna".to_string(),
                specializations: BTreeSet::from([MensCut]),
            })
            .await
            .unwrap();
        let service = one
            .services()
            .create(&NewService {
                name: "Cut".to_string(),
                specializations: BTreeSet::from([MensCut]),
                duration_minutes: 60,
                cost_cents: 10_000,
            })
            .await
            .unwrap();
        let candidate = ReservationCandidate::new(&hairdresser.id, &service.id, at(10, 0));

        let a = one.scheduler(ReservationValidator::new(chrono_tz::UTC));
        let b = two.scheduler(ReservationValidator::new(chrono_tz::UTC));
        let (first, second) = tokio::join!(a.schedule(&candidate), b.schedule(&candidate));

        let (ok, rejected) = match (first, second) {
            (Ok(stored), Err(err)) | (Err(err), Ok(stored)) => (stored, err),
            other => panic!("expected exactly one booking, got {other:?}"),
        };
        assert_eq!(ok.start, at(10, 0));
        assert!(matches!(rejected, SchedulingError::SlotTaken { .. }));
        assert_eq!(two.reservations().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_cancel() {
        let f = fixture().await;
        let booked = f.scheduler.schedule(&f.candidate(at(10, 0))).await.unwrap();

        f.scheduler.cancel(&booked.id).await.unwrap();
        assert!(f.db.reservations().get_by_id(&booked.id).await.unwrap().is_none());

        // The slot is free again.
        assert!(f.scheduler.schedule(&f.candidate(at(10, 0))).await.is_ok());

        assert!(matches!(
            f.scheduler.cancel(&booked.id).await.unwrap_err(),
            SchedulingError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_deleting_service_keeps_reservation() {
        let f = fixture().await;
        let booked = f.scheduler.schedule(&f.candidate(at(10, 0))).await.unwrap();

        f.db.services().delete(&f.service.id).await.unwrap();

        let kept = f.db.reservations().get_by_id(&booked.id).await.unwrap().unwrap();
        assert_eq!(kept.service_id, None);
        assert_eq!(kept.start, booked.start);
    }

    #[tokio::test]
    async fn test_deleting_hairdresser_cascades() {
        let f = fixture().await;
        f.scheduler.schedule(&f.candidate(at(10, 0))).await.unwrap();

        f.db.hairdressers().delete(&f.hairdresser.id).await.unwrap();
        assert_eq!(f.db.reservations().count().await.unwrap(), 0);
    }
}
