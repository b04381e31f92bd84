//! # Database Error Types
//!
//! Error types for database operations and the scheduling transaction.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SchedulingError::Persistence   ◄── also ValidationFailed / SlotTaken  │
//! │       │                             from salon-core's CoreError        │
//! │       ▼                                                                 │
//! │  Presentation layer renders field errors or "slot taken"               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use salon_core::{CoreError, Field, Reservation, ValidationError, ValidationErrors};
use thiserror::Error;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    ///
    /// ## When This Occurs
    /// - Updating or deleting an id that doesn't exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Foreign key constraint violation.
    ///
    /// ## When This Occurs
    /// - Assigning a specialization code missing from the catalogue
    /// - Referencing a hairdresser or service that was deleted meanwhile
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Catalogue input rejected before it reached SQLite.
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file doesn't exist and can't be created
    /// - File permissions issue
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a UniqueViolation error.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // "UNIQUE constraint failed: <table>.<column>"
                // "FOREIGN KEY constraint failed"
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::duplicate(field, "unknown")
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Scheduling Error
// =============================================================================

/// Why `Scheduler::schedule` did not store a reservation.
///
/// Nothing is written when any of these is returned.
#[derive(Debug, Error)]
pub enum SchedulingError {
    /// The candidate failed validation. Errors are keyed by field.
    #[error("validation failed: {0}")]
    ValidationFailed(ValidationErrors),

    /// The hairdresser already has overlapping reservations.
    #[error("slot taken: overlaps {} existing reservation(s)", .conflicts.len())]
    SlotTaken { conflicts: Vec<Reservation> },

    /// The reservation being edited or cancelled does not exist.
    #[error("reservation not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Persistence(#[from] DbError),
}

impl From<CoreError> for SchedulingError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(errors) => SchedulingError::ValidationFailed(errors),
            CoreError::SlotTaken { conflicts } => SchedulingError::SlotTaken { conflicts },
            // Only end-time arithmetic fails outside the validator.
            CoreError::Time(reason) => SchedulingError::ValidationFailed(
                ValidationError::InvalidTime {
                    field: Field::End,
                    reason,
                }
                .into(),
            ),
        }
    }
}

impl From<sqlx::Error> for SchedulingError {
    fn from(err: sqlx::Error) -> Self {
        SchedulingError::Persistence(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_map_to_scheduling_errors() {
        let errors: ValidationErrors = ValidationError::Required {
            field: Field::Start,
        }
        .into();
        let mapped = SchedulingError::from(CoreError::Validation(errors));
        assert!(matches!(mapped, SchedulingError::ValidationFailed(ref e) if e.contains(Field::Start)));

        let mapped = SchedulingError::from(CoreError::SlotTaken { conflicts: vec![] });
        assert!(matches!(mapped, SchedulingError::SlotTaken { .. }));
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(
            DbError::not_found("Hairdresser", "h1").to_string(),
            "Hairdresser not found: h1"
        );
        assert_eq!(
            SchedulingError::NotFound("r1".to_string()).to_string(),
            "reservation not found: r1"
        );
    }
}
