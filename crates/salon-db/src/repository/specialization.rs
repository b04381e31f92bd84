//! # Specialization Repository
//!
//! Read access to the specialization catalogue. The rows are seeded by the
//! initial migration and never change at runtime.

use std::collections::BTreeSet;

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use salon_core::Specialization;

/// Repository for the specialization catalogue.
#[derive(Debug, Clone)]
pub struct SpecializationRepository {
    pool: SqlitePool,
}

impl SpecializationRepository {
    /// Creates a new SpecializationRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SpecializationRepository { pool }
    }

    /// Lists the catalogue in code order.
    pub async fn list(&self) -> DbResult<Vec<Specialization>> {
        debug!("Listing specializations");

        let codes: Vec<Specialization> =
            sqlx::query_scalar("SELECT code FROM specializations ORDER BY code")
                .fetch_all(&self.pool)
                .await?;

        Ok(codes)
    }

    /// Stored label of one specialization.
    pub async fn label(&self, specialization: Specialization) -> DbResult<Option<String>> {
        let label = sqlx::query_scalar("SELECT label FROM specializations WHERE code = ?1")
            .bind(specialization)
            .fetch_optional(&self.pool)
            .await?;

        Ok(label)
    }
}

/// Parses a `GROUP_CONCAT` of specialization codes.
///
/// `None` (no joined rows) is the empty set.
pub(crate) fn parse_codes(codes: Option<&str>) -> DbResult<BTreeSet<Specialization>> {
    let Some(codes) = codes else {
        return Ok(BTreeSet::new());
    };

    codes
        .split(',')
        .filter(|code| !code.is_empty())
        .map(|code| {
            Specialization::from_code(code)
                .ok_or_else(|| DbError::Internal(format!("unknown specialization code '{code}'")))
        })
        .collect()
}
