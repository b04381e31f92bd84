//! # Reservation Repository
//!
//! Read access to reservations, plus the crate-private write helpers the
//! [`Scheduler`](crate::Scheduler) uses inside its transaction.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Presentation ──► Scheduler::schedule ──► save()   (pub(crate))         │
//! │                                                                         │
//! │  ReservationRepository exposes NO insert/update. Every write goes      │
//! │  through validation and the overlap check first.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite, SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::generate_id;
use salon_core::{NormalizedReservation, Reservation};

const SELECT_RESERVATION: &str = r#"
    SELECT id, hairdresser_id, service_id, start_at, end_at, created_at, updated_at
    FROM reservations
"#;

pub(crate) async fn fetch_reservation<'e, E>(executor: E, id: &str) -> DbResult<Option<Reservation>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("{SELECT_RESERVATION} WHERE id = ?1");

    let reservation = sqlx::query_as::<_, Reservation>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;

    Ok(reservation)
}

/// A hairdresser's whole agenda, earliest first.
pub(crate) async fn fetch_for_hairdresser<'e, E>(
    executor: E,
    hairdresser_id: &str,
) -> DbResult<Vec<Reservation>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("{SELECT_RESERVATION} WHERE hairdresser_id = ?1 ORDER BY start_at");

    let reservations = sqlx::query_as::<_, Reservation>(&sql)
        .bind(hairdresser_id)
        .fetch_all(executor)
        .await?;

    Ok(reservations)
}

/// Inserts a new reservation or updates the one named by `reservation.id`.
pub(crate) async fn save(
    conn: &mut SqliteConnection,
    reservation: &NormalizedReservation,
) -> DbResult<Reservation> {
    let now = Utc::now();

    let Some(id) = reservation.id.as_deref() else {
        let stored = Reservation {
            id: generate_id(),
            hairdresser_id: reservation.hairdresser_id.clone(),
            service_id: Some(reservation.service_id.clone()),
            start: reservation.start,
            end: reservation.end,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %stored.id, hairdresser_id = %stored.hairdresser_id, "Inserting reservation");

        sqlx::query(
            r#"
            INSERT INTO reservations (
                id, hairdresser_id, service_id, start_at, end_at, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&stored.id)
        .bind(&stored.hairdresser_id)
        .bind(&stored.service_id)
        .bind(stored.start)
        .bind(stored.end)
        .bind(stored.created_at)
        .bind(stored.updated_at)
        .execute(&mut *conn)
        .await?;

        return Ok(stored);
    };

    debug!(id = %id, "Updating reservation");

    let result = sqlx::query(
        r#"
        UPDATE reservations SET
            hairdresser_id = ?2,
            service_id = ?3,
            start_at = ?4,
            end_at = ?5,
            updated_at = ?6
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .bind(&reservation.hairdresser_id)
    .bind(&reservation.service_id)
    .bind(reservation.start)
    .bind(reservation.end)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("Reservation", id));
    }

    fetch_reservation(&mut *conn, id)
        .await?
        .ok_or_else(|| DbError::not_found("Reservation", id))
}

/// Deletes a reservation. Returns false if it did not exist.
pub(crate) async fn remove<'e, E>(executor: E, id: &str) -> DbResult<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM reservations WHERE id = ?1")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Repository for reading reservations.
#[derive(Debug, Clone)]
pub struct ReservationRepository {
    pool: SqlitePool,
}

impl ReservationRepository {
    /// Creates a new ReservationRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReservationRepository { pool }
    }

    /// Gets a reservation by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Reservation>> {
        fetch_reservation(&self.pool, id).await
    }

    /// Lists every reservation, earliest first.
    pub async fn list(&self) -> DbResult<Vec<Reservation>> {
        let sql = format!("{SELECT_RESERVATION} ORDER BY start_at");

        let reservations = sqlx::query_as::<_, Reservation>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(reservations)
    }

    /// Lists one hairdresser's reservations, earliest first.
    pub async fn list_for_hairdresser(&self, hairdresser_id: &str) -> DbResult<Vec<Reservation>> {
        debug!(hairdresser_id = %hairdresser_id, "Listing reservations");
        fetch_for_hairdresser(&self.pool, hairdresser_id).await
    }

    /// One hairdresser's reservations that intersect `[from, to)`.
    ///
    /// Filtering happens on decoded instants, so the text form of the stored
    /// timestamps does not matter.
    pub async fn agenda(
        &self,
        hairdresser_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DbResult<Vec<Reservation>> {
        Ok(self
            .list_for_hairdresser(hairdresser_id)
            .await?
            .into_iter()
            .filter(|r| r.start < to && from < r.end)
            .collect())
    }

    /// Counts reservations (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reservations")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
