//! # Error Types
//!
//! Domain-specific error types for salon-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  salon-core errors (this file)                                         │
//! │  ├── CoreError         - Rejections of the scheduling plan             │
//! │  ├── ValidationErrors  - Field-keyed set of ValidationError            │
//! │  └── ValidationError   - One problem with one field                    │
//! │                                                                         │
//! │  salon-core errors (time.rs)                                           │
//! │  └── TimeError         - Naive input, DST gaps/folds, overflow         │
//! │                                                                         │
//! │  salon-db errors (separate crate)                                      │
//! │  ├── DbError           - Database operation failures                   │
//! │  └── SchedulingError   - What Scheduler::schedule() returns            │
//! │                                                                         │
//! │  Flow: ValidationError → ValidationErrors → CoreError → SchedulingError│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Validation problems are collected, not raised one at a time, so a form
//!    can show every problem at once
//! 3. Errors are enum variants, never String

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::time::TimeError;
use crate::types::Reservation;

// =============================================================================
// Core Error
// =============================================================================

/// Reasons the scheduling plan rejects a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// One or more fields failed validation.
    #[error("invalid reservation: {0}")]
    Validation(#[from] ValidationErrors),

    /// The hairdresser is already booked for part of the requested slot.
    ///
    /// ## User Workflow
    /// ```text
    /// Book Anna 10:30-11:30
    ///      │
    ///      ▼
    /// Existing: Anna 10:00-11:00
    ///      │
    ///      ▼
    /// SlotTaken { conflicts: [10:00-11:00] }
    ///      │
    ///      ▼
    /// UI shows: "Anna is busy until 11:00"
    /// ```
    #[error("slot taken: overlaps {} existing reservation(s)", .conflicts.len())]
    SlotTaken { conflicts: Vec<Reservation> },

    /// Time arithmetic failed outside of validation.
    #[error("time error: {0}")]
    Time(#[from] TimeError),
}

// =============================================================================
// Fields
// =============================================================================

/// Input fields that validation errors are keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Hairdresser,
    Service,
    Start,
    End,
    Name,
    Specializations,
    Duration,
    Cost,
}

impl Field {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Field::Hairdresser => "hairdresser",
            Field::Service => "service",
            Field::Start => "start",
            Field::End => "end",
            Field::Name => "name",
            Field::Specializations => "specializations",
            Field::Duration => "duration",
            Field::Cost => "cost",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// One problem with one input field.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: Field },

    /// The field names a record that does not exist.
    #[error("{field} '{id}' does not exist")]
    UnknownReference { field: Field, id: String },

    /// The end time is not after the start time.
    #[error("end {end} must be after start {start}")]
    EndBeforeStart {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// The hairdresser holds none of the specializations the service requires.
    #[error("hairdresser {hairdresser_id} is not qualified for service {service_id}")]
    UnqualifiedHairdresser {
        hairdresser_id: String,
        service_id: String,
    },

    /// The time could not be turned into an instant.
    #[error("{field}: {reason}")]
    InvalidTime {
        field: Field,
        #[serde(serialize_with = "serialize_display")]
        reason: TimeError,
    },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: Field },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: Field, min: i64, max: i64 },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: Field, max: usize },
}

fn serialize_display<T: fmt::Display, S: serde::Serializer>(
    value: &T,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Every validation problem found in one pass, keyed by field.
///
/// ## Serialized Shape
/// ```json
/// {
///   "hairdresser": [{ "code": "required", "field": "hairdresser" }],
///   "end": [{ "code": "end_before_start", "start": "...", "end": "..." }]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<Field, Vec<ValidationError>>);

impl ValidationErrors {
    pub fn new() -> Self {
        ValidationErrors::default()
    }

    /// Records a problem with `field`.
    pub fn add(&mut self, field: Field, error: ValidationError) {
        self.0.entry(field).or_default().push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of problems across all fields.
    pub fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    /// Problems recorded for `field`, empty if none.
    pub fn get(&self, field: Field) -> &[ValidationError] {
        self.0.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &ValidationError)> + '_ {
        self.0
            .iter()
            .flat_map(|(field, errors)| errors.iter().map(move |e| (*field, e)))
    }

    /// Human-readable messages per field, for rendering next to form inputs.
    pub fn messages(&self) -> BTreeMap<Field, Vec<String>> {
        self.0
            .iter()
            .map(|(field, errors)| (*field, errors.iter().map(ToString::to_string).collect()))
            .collect()
    }

    /// `Ok(value)` if nothing was recorded, otherwise `Err(self)`.
    pub fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (_, error) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        let field = match &error {
            ValidationError::Required { field }
            | ValidationError::UnknownReference { field, .. }
            | ValidationError::InvalidTime { field, .. }
            | ValidationError::MustBePositive { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::TooLong { field, .. } => *field,
            ValidationError::EndBeforeStart { .. } => Field::End,
            ValidationError::UnqualifiedHairdresser { .. } => Field::Hairdresser,
        };
        let mut errors = ValidationErrors::new();
        errors.add(field, error);
        errors
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
