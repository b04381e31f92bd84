//! # Hairdresser Repository
//!
//! Database operations for hairdressers and their specializations.
//!
//! ## Storage Shape
//! ```text
//! hairdressers                 hairdresser_specializations
//! ┌──────┬────────┐           ┌────────────────┬──────┐
//! │ id   │ name   │           │ hairdresser_id │ code │
//! ├──────┼────────┤           ├────────────────┼──────┤
//! │ h1   │ Anna   │◄──────────│ h1             │ M    │
//! │      │        │◄──────────│ h1             │ F    │
//! └──────┴────────┘           └────────────────┴──────┘
//!
//! SELECT ... GROUP_CONCAT(code) → "M,F" → {MensCut, WomensCut}
//! ```

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite, SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::generate_id;
use crate::repository::specialization::parse_codes;
use salon_core::qualification::qualified_for;
use salon_core::validation::{validate_name, validate_new_hairdresser};
use salon_core::{Hairdresser, NewHairdresser, Service, Specialization};

const SELECT_HAIRDRESSER: &str = r#"
    SELECT
        h.id,
        h.name,
        GROUP_CONCAT(hs.specialization_code) AS codes,
        h.created_at,
        h.updated_at
    FROM hairdressers h
    LEFT JOIN hairdresser_specializations hs ON hs.hairdresser_id = h.id
"#;

#[derive(Debug, sqlx::FromRow)]
struct HairdresserRow {
    id: String,
    name: String,
    codes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl HairdresserRow {
    fn into_hairdresser(self) -> DbResult<Hairdresser> {
        Ok(Hairdresser {
            specializations: parse_codes(self.codes.as_deref())?,
            id: self.id,
            name: self.name,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Loads one hairdresser with specializations on any executor, so the
/// scheduler can read inside its transaction.
pub(crate) async fn fetch_hairdresser<'e, E>(executor: E, id: &str) -> DbResult<Option<Hairdresser>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("{SELECT_HAIRDRESSER} WHERE h.id = ?1 GROUP BY h.id");

    let row: Option<HairdresserRow> = sqlx::query_as(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;

    row.map(HairdresserRow::into_hairdresser).transpose()
}

/// Escapes `LIKE` wildcards so user input matches literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

async fn replace_specializations(
    conn: &mut SqliteConnection,
    hairdresser_id: &str,
    specializations: &BTreeSet<Specialization>,
) -> DbResult<()> {
    sqlx::query("DELETE FROM hairdresser_specializations WHERE hairdresser_id = ?1")
        .bind(hairdresser_id)
        .execute(&mut *conn)
        .await?;

    for specialization in specializations {
        sqlx::query(
            "INSERT INTO hairdresser_specializations (hairdresser_id, specialization_code) VALUES (?1, ?2)",
        )
        .bind(hairdresser_id)
        .bind(specialization)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

/// Repository for hairdresser database operations.
///
/// ## Usage
/// ```rust,ignore
/// let anna = db.hairdressers().create(&NewHairdresser {
///     name: "Anna".into(),
///     specializations: BTreeSet::from([Specialization::WomensCut]),
/// }).await?;
///
/// let found = db.hairdressers().search("ann").await?;
/// ```
#[derive(Debug, Clone)]
pub struct HairdresserRepository {
    pool: SqlitePool,
}

impl HairdresserRepository {
    /// Creates a new HairdresserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        HairdresserRepository { pool }
    }

    /// Gets a hairdresser by ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Hairdresser))` - Hairdresser found
    /// * `Ok(None)` - Hairdresser not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Hairdresser>> {
        debug!(id = %id, "Fetching hairdresser");
        fetch_hairdresser(&self.pool, id).await
    }

    /// Lists all hairdressers ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Hairdresser>> {
        let sql = format!("{SELECT_HAIRDRESSER} GROUP BY h.id ORDER BY h.name");

        let rows: Vec<HairdresserRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        rows.into_iter().map(HairdresserRow::into_hairdresser).collect()
    }

    /// Finds hairdressers whose name contains `query`.
    ///
    /// An empty query lists everyone.
    pub async fn search(&self, query: &str) -> DbResult<Vec<Hairdresser>> {
        let query = query.trim();

        debug!(query = %query, "Searching hairdressers");

        if query.is_empty() {
            return self.list().await;
        }

        let sql = format!(
            "{SELECT_HAIRDRESSER} WHERE h.name LIKE ?1 ESCAPE '\\' GROUP BY h.id ORDER BY h.name"
        );

        let rows: Vec<HairdresserRow> = sqlx::query_as(&sql)
            .bind(format!("%{}%", escape_like(query)))
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "Search returned hairdressers");
        rows.into_iter().map(HairdresserRow::into_hairdresser).collect()
    }

    /// Hairdressers who can perform `service`.
    pub async fn qualified_for(&self, service: &Service) -> DbResult<Vec<Hairdresser>> {
        let staff = self.list().await?;
        Ok(qualified_for(&staff, service).cloned().collect())
    }

    /// Inserts a new hairdresser with their specializations.
    ///
    /// ## Returns
    /// * `Ok(Hairdresser)` - Inserted hairdresser with generated id
    /// * `Err(DbError::InvalidInput)` - Name empty or too long
    pub async fn create(&self, input: &NewHairdresser) -> DbResult<Hairdresser> {
        validate_new_hairdresser(input)?;

        let now = Utc::now();
        let hairdresser = Hairdresser {
            id: generate_id(),
            name: input.name.trim().to_string(),
            specializations: input.specializations.clone(),
            created_at: now,
            updated_at: now,
        };

        debug!(id = %hairdresser.id, name = %hairdresser.name, "Inserting hairdresser");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO hairdressers (id, name, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&hairdresser.id)
        .bind(&hairdresser.name)
        .bind(hairdresser.created_at)
        .bind(hairdresser.updated_at)
        .execute(&mut *tx)
        .await?;

        replace_specializations(&mut tx, &hairdresser.id, &hairdresser.specializations).await?;

        tx.commit().await?;

        Ok(hairdresser)
    }

    /// Renames a hairdresser.
    pub async fn rename(&self, id: &str, name: &str) -> DbResult<()> {
        validate_name(name)?;

        debug!(id = %id, "Renaming hairdresser");

        let result = sqlx::query("UPDATE hairdressers SET name = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(name.trim())
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Hairdresser", id));
        }

        Ok(())
    }

    /// Replaces the hairdresser's specializations with `specializations`.
    ///
    /// Existing reservations are left alone even if the hairdresser no
    /// longer qualifies for them.
    pub async fn set_specializations(
        &self,
        id: &str,
        specializations: &BTreeSet<Specialization>,
    ) -> DbResult<Hairdresser> {
        debug!(id = %id, count = specializations.len(), "Setting specializations");

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("UPDATE hairdressers SET updated_at = ?2 WHERE id = ?1")
            .bind(id)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Hairdresser", id));
        }

        replace_specializations(&mut tx, id, specializations).await?;

        let hairdresser = fetch_hairdresser(&mut *tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("Hairdresser", id))?;

        tx.commit().await?;

        Ok(hairdresser)
    }

    /// Deletes a hairdresser. Their reservations are deleted with them.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting hairdresser");

        let result = sqlx::query("DELETE FROM hairdressers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Hairdresser", id));
        }

        Ok(())
    }

    /// Counts hairdressers (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM hairdressers")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
