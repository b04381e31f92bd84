//! # Validation Module
//!
//! Reservation validation and catalogue input checks.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Reservation Validation                             │
//! │                                                                         │
//! │  ReservationCandidate (raw form input)                                 │
//! │       │                                                                 │
//! │       ├── 1. hairdresser present?         → Required / UnknownReference│
//! │       ├── 2. service present?             → Required / UnknownReference│
//! │       ├── 3. start present, localizable?  → Required / InvalidTime     │
//! │       ├── 4. end: derive or check > start → EndBeforeStart             │
//! │       └── 5. hairdresser qualified?       → UnqualifiedHairdresser     │
//! │       │                                                                 │
//! │       ▼   (every check runs; errors are collected per field)            │
//! │  NormalizedReservation  or  ValidationErrors                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The validator never touches storage. The caller looks up the hairdresser
//! and service and hands them in; overlap checks live in [`crate::conflict`].
//!
//! Catalogue validators (`validate_new_service`, ...) stop at the first
//! problem, like the rest of the admin input checks.

use chrono_tz::Tz;

use crate::error::{Field, ValidationError, ValidationErrors};
use crate::qualification::can_perform;
use crate::time::{end_after, TimeError};
use crate::types::{
    Hairdresser, NewHairdresser, NewService, NormalizedReservation, ReservationCandidate, Service,
};
use crate::{DEFAULT_TIMEZONE, MAX_NAME_LEN, MAX_SERVICE_COST_CENTS, MAX_SERVICE_DURATION_MINUTES};

/// Result type for catalogue validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Reservation Validator
// =============================================================================

/// Validates reservation candidates.
///
/// ## Usage
/// ```rust
/// use chrono::NaiveDate;
/// use salon_core::time::TimeInput;
/// use salon_core::validation::ReservationValidator;
/// use salon_core::{Field, ReservationCandidate};
///
/// let validator = ReservationValidator::new(chrono_tz::Europe::Warsaw);
/// let candidate = ReservationCandidate {
///     start: Some(TimeInput::Local(
///         NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(10, 0, 0).unwrap(),
///     )),
///     ..Default::default()
/// };
///
/// let errors = validator.validate(&candidate, None, None).unwrap_err();
/// assert!(errors.contains(Field::Hairdresser));
/// assert!(errors.contains(Field::Service));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservationValidator {
    default_timezone: Tz,
}

impl Default for ReservationValidator {
    fn default() -> Self {
        ReservationValidator::new(DEFAULT_TIMEZONE)
    }
}

impl ReservationValidator {
    /// Creates a validator that localizes naive input in `default_timezone`.
    pub fn new(default_timezone: Tz) -> Self {
        ReservationValidator { default_timezone }
    }

    pub fn default_timezone(&self) -> Tz {
        self.default_timezone
    }

    /// Runs every reservation check against `candidate`.
    ///
    /// `hairdresser` and `service` are the records the caller found for the
    /// candidate's ids, `None` if the lookup came back empty.
    pub fn validate(
        &self,
        candidate: &ReservationCandidate,
        hairdresser: Option<&Hairdresser>,
        service: Option<&Service>,
    ) -> Result<NormalizedReservation, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let hairdresser = resolve(
            Field::Hairdresser,
            candidate.hairdresser_id.as_deref(),
            hairdresser.map(|h| (h.id.as_str(), h)),
            &mut errors,
        );
        let service = resolve(
            Field::Service,
            candidate.service_id.as_deref(),
            service.map(|s| (s.id.as_str(), s)),
            &mut errors,
        );

        let start = match &candidate.start {
            None => {
                errors.add(Field::Start, ValidationError::Required { field: Field::Start });
                None
            }
            Some(input) => match input.normalize(self.default_timezone) {
                Ok(start) => Some(start),
                Err(reason) => {
                    errors.add(
                        Field::Start,
                        ValidationError::InvalidTime {
                            field: Field::Start,
                            reason,
                        },
                    );
                    None
                }
            },
        };

        let end = match (&candidate.end, start) {
            (Some(input), _) => match input.normalize(self.default_timezone) {
                Ok(end) => Some(end),
                Err(reason) => {
                    errors.add(
                        Field::End,
                        ValidationError::InvalidTime {
                            field: Field::End,
                            reason,
                        },
                    );
                    None
                }
            },
            (None, Some(start)) => match service.map(|s| {
                s.duration()
                    .ok_or(TimeError::OutOfRange)
                    .and_then(|duration| end_after(start, duration))
            }) {
                Some(Ok(end)) => Some(end),
                Some(Err(reason)) => {
                    errors.add(
                        Field::End,
                        ValidationError::InvalidTime {
                            field: Field::End,
                            reason,
                        },
                    );
                    None
                }
                // Nothing to derive from; the service error is already recorded.
                None => None,
            },
            (None, None) => None,
        };

        if let (Some(start), Some(end)) = (start, end) {
            if end <= start {
                errors.add(Field::End, ValidationError::EndBeforeStart { start, end });
            }
        }

        if let (Some(hairdresser), Some(service)) = (hairdresser, service) {
            if !can_perform(hairdresser, service) {
                errors.add(
                    Field::Hairdresser,
                    ValidationError::UnqualifiedHairdresser {
                        hairdresser_id: hairdresser.id.clone(),
                        service_id: service.id.clone(),
                    },
                );
            }
        }

        match (hairdresser, service, start, end) {
            (Some(hairdresser), Some(service), Some(start), Some(end)) if errors.is_empty() => {
                Ok(NormalizedReservation {
                    id: candidate.id.clone(),
                    hairdresser_id: hairdresser.id.clone(),
                    service_id: service.id.clone(),
                    start,
                    end,
                })
            }
            _ => Err(errors),
        }
    }
}

/// Matches a requested id against the record the caller found for it.
fn resolve<'a, T>(
    field: Field,
    requested: Option<&str>,
    found: Option<(&str, &'a T)>,
    errors: &mut ValidationErrors,
) -> Option<&'a T> {
    let requested = match requested.map(str::trim) {
        Some(id) if !id.is_empty() => id,
        _ => {
            errors.add(field, ValidationError::Required { field });
            return None;
        }
    };

    match found {
        Some((id, record)) if id == requested => Some(record),
        _ => {
            errors.add(
                field,
                ValidationError::UnknownReference {
                    field,
                    id: requested.to_string(),
                },
            );
            None
        }
    }
}

// =============================================================================
// Catalogue Validators
// =============================================================================

/// Validates a display name (hairdresser or service).
///
/// ## Rules
/// - Must not be empty
/// - At most 100 characters
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required { field: Field::Name });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: Field::Name,
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a service duration in minutes.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must fit in one day
pub fn validate_duration_minutes(minutes: i64) -> ValidationResult<()> {
    if minutes <= 0 {
        return Err(ValidationError::MustBePositive {
            field: Field::Duration,
        });
    }

    if minutes > MAX_SERVICE_DURATION_MINUTES {
        return Err(ValidationError::OutOfRange {
            field: Field::Duration,
            min: 1,
            max: MAX_SERVICE_DURATION_MINUTES,
        });
    }

    Ok(())
}

/// Validates a service cost in cents.
///
/// ## Rules
/// - Zero is allowed (free consultation)
/// - At most 999.99
///
/// ## Example
/// ```rust
/// use salon_core::validation::validate_cost_cents;
///
/// assert!(validate_cost_cents(0).is_ok());
/// assert!(validate_cost_cents(99_999).is_ok());
/// assert!(validate_cost_cents(-1).is_err());
/// assert!(validate_cost_cents(100_000).is_err());
/// ```
pub fn validate_cost_cents(cents: i64) -> ValidationResult<()> {
    if !(0..=MAX_SERVICE_COST_CENTS).contains(&cents) {
        return Err(ValidationError::OutOfRange {
            field: Field::Cost,
            min: 0,
            max: MAX_SERVICE_COST_CENTS,
        });
    }

    Ok(())
}

/// Validates a hairdresser before insert. Specializations may be empty.
pub fn validate_new_hairdresser(input: &NewHairdresser) -> ValidationResult<()> {
    validate_name(&input.name)
}

/// Validates a service before insert.
///
/// A service must require at least one specialization, otherwise no
/// hairdresser could ever be booked for it.
pub fn validate_new_service(input: &NewService) -> ValidationResult<()> {
    validate_name(&input.name)?;

    if input.specializations.is_empty() {
        return Err(ValidationError::Required {
            field: Field::Specializations,
        });
    }

    validate_duration_minutes(input.duration_minutes)?;
    validate_cost_cents(input.cost_cents)?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
