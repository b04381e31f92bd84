//! # Service Repository
//!
//! Database operations for the service catalogue.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::generate_id;
use crate::repository::specialization::parse_codes;
use salon_core::validation::validate_new_service;
use salon_core::{NewService, Service, Specialization};

const SELECT_SERVICE: &str = r#"
    SELECT
        s.id,
        s.name,
        GROUP_CONCAT(ss.specialization_code) AS codes,
        s.duration_minutes,
        s.cost_cents,
        s.created_at,
        s.updated_at
    FROM services s
    LEFT JOIN service_specializations ss ON ss.service_id = s.id
"#;

#[derive(Debug, sqlx::FromRow)]
struct ServiceRow {
    id: String,
    name: String,
    codes: Option<String>,
    duration_minutes: i64,
    cost_cents: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ServiceRow {
    fn into_service(self) -> DbResult<Service> {
        Ok(Service {
            specializations: parse_codes(self.codes.as_deref())?,
            id: self.id,
            name: self.name,
            duration_minutes: self.duration_minutes,
            cost_cents: self.cost_cents,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

pub(crate) async fn fetch_service<'e, E>(executor: E, id: &str) -> DbResult<Option<Service>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("{SELECT_SERVICE} WHERE s.id = ?1 GROUP BY s.id");

    let row: Option<ServiceRow> = sqlx::query_as(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;

    row.map(ServiceRow::into_service).transpose()
}

/// Repository for service database operations.
#[derive(Debug, Clone)]
pub struct ServiceRepository {
    pool: SqlitePool,
}

impl ServiceRepository {
    /// Creates a new ServiceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ServiceRepository { pool }
    }

    /// Gets a service by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Service>> {
        debug!(id = %id, "Fetching service");
        fetch_service(&self.pool, id).await
    }

    /// Lists all services ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Service>> {
        let sql = format!("{SELECT_SERVICE} GROUP BY s.id ORDER BY s.name");

        let rows: Vec<ServiceRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        rows.into_iter().map(ServiceRow::into_service).collect()
    }

    /// Inserts a new service.
    ///
    /// ## Returns
    /// * `Ok(Service)` - Inserted service with generated id
    /// * `Err(DbError::InvalidInput)` - Empty name, no specializations,
    ///   non-positive duration or cost outside 0..=999.99
    pub async fn create(&self, input: &NewService) -> DbResult<Service> {
        validate_new_service(input)?;

        let now = Utc::now();
        let service = Service {
            id: generate_id(),
            name: input.name.trim().to_string(),
            specializations: input.specializations.clone(),
            duration_minutes: input.duration_minutes,
            cost_cents: input.cost_cents,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %service.id, name = %service.name, "Inserting service");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO services (
                id, name, duration_minutes, cost_cents, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&service.id)
        .bind(&service.name)
        .bind(service.duration_minutes)
        .bind(service.cost_cents)
        .bind(service.created_at)
        .bind(service.updated_at)
        .execute(&mut *tx)
        .await?;

        for specialization in &service.specializations {
            sqlx::query(
                "INSERT INTO service_specializations (service_id, specialization_code) VALUES (?1, ?2)",
            )
            .bind(&service.id)
            .bind(specialization)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(service)
    }

    /// Deletes a service.
    ///
    /// Reservations that used it keep their slot with `service_id = NULL`.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting service");

        let result = sqlx::query("DELETE FROM services WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Service", id));
        }

        Ok(())
    }

    /// Specializations required by at least one service in the catalogue.
    pub async fn offered_specializations(&self) -> DbResult<BTreeSet<Specialization>> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .flat_map(|s| s.specializations)
            .collect())
    }

    /// Counts services (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM services")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use salon_core::{Field, Specialization::*, ValidationError};

    fn cut() -> NewService {
        NewService {
            name: "Strzyżenie".to_string(),
            specializations: BTreeSet::from([MensCut, WomensCut]),
            duration_minutes: 60,
            cost_cents: 10_000,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.services();

        let created = repo.create(&cut()).await.unwrap();
        let loaded = repo.get_by_id(&created.id).await.unwrap().unwrap();

        assert_eq!(loaded.name, "Strzyżenie");
        assert_eq!(loaded.duration_minutes, 60);
        assert_eq!(loaded.cost().to_string(), "100.00");
        assert_eq!(loaded.specializations, BTreeSet::from([MensCut, WomensCut]));
    }

    #[tokio::test]
    async fn test_create_validates_input() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.services();

        let err = repo
            .create(&NewService {
                specializations: BTreeSet::new(),
                ..cut()
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::InvalidInput(ValidationError::Required {
                field: Field::Specializations
            })
        ));

        let err = repo
            .create(&NewService {
                cost_cents: 100_000,
                ..cut()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::InvalidInput(ValidationError::OutOfRange { .. })));

        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_and_delete() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.services();
        let a = repo.create(&cut()).await.unwrap();
        repo.create(&NewService {
            name: "Modelowanie".to_string(),
            specializations: BTreeSet::from([Stylist]),
            duration_minutes: 30,
            cost_cents: 4_500,
        })
        .await
        .unwrap();

        assert_eq!(repo.list().await.unwrap().len(), 2);
        assert_eq!(
            repo.offered_specializations().await.unwrap(),
            BTreeSet::from([MensCut, WomensCut, Stylist])
        );

        repo.delete(&a.id).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 1);
        assert!(matches!(repo.delete(&a.id).await.unwrap_err(), DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_schema_caps_duration_at_one_day() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let insert = |id: &'static str, minutes: i64| {
            sqlx::query(
                r#"
                INSERT INTO services (id, name, duration_minutes, cost_cents, created_at, updated_at)
                VALUES (?1, 'Raw', ?2, 0, '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z')
                "#,
            )
            .bind(id)
            .bind(minutes)
        };

        insert("day", 1440).execute(db.pool()).await.unwrap();
        assert!(insert("longer", 1441).execute(db.pool()).await.is_err());
        assert!(insert("huge", i64::MAX).execute(db.pool()).await.is_err());
    }
}
