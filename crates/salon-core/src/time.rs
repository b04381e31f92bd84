//! # Time Module
//!
//! Pure duration/time arithmetic for reservations.
//!
//! ## From Form Input to Stored Instant
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Reservation Time Pipeline                            │
//! │                                                                         │
//! │  Form: date=2024-01-01  time=10:00       (no zone → TimeInput::Local)   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  localize(naive, Europe/Warsaw) ─── DST gap/fold? → TimeError           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  2024-01-01T10:00:00+01:00               (zone-aware)                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  end_after(start, duration)              (+60 min)                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  TimeSlot [09:00Z, 10:00Z)               (UTC, half-open)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Naive wall-clock values are never stored. Everything that leaves this
//! module as an instant carries a zone.

use chrono::{
    DateTime, Duration, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
    Utc,
};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// Errors
// =============================================================================

/// Failures of the pure time arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeError {
    /// The instant has no timezone attached.
    ///
    /// ## When This Occurs
    /// `compute_end` was handed raw form input. Localize it first.
    #[error("time {0} has no timezone information")]
    NaiveTime(NaiveDateTime),

    /// The wall-clock time does not exist in the zone (spring-forward gap).
    #[error("{local} does not exist in {zone}")]
    NonexistentLocalTime { local: NaiveDateTime, zone: String },

    /// The wall-clock time happens twice in the zone (fall-back fold).
    #[error("{local} is ambiguous in {zone}")]
    AmbiguousLocalTime { local: NaiveDateTime, zone: String },

    /// Adding the duration overflowed the representable range.
    #[error("end time out of range")]
    OutOfRange,
}

// =============================================================================
// Time Input
// =============================================================================

/// A start or end time as supplied by a caller.
///
/// Forms hand us date and time separately and without a zone; API callers
/// may already send an offset. Both end up as a UTC instant after
/// [`TimeInput::normalize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeInput {
    /// Carries an explicit UTC offset.
    Zoned(DateTime<FixedOffset>),
    /// Wall-clock time in the salon's default zone.
    Local(NaiveDateTime),
}

impl TimeInput {
    /// Combines the separate date and time fields of a booking form.
    pub fn from_date_and_time(date: NaiveDate, time: NaiveTime) -> Self {
        TimeInput::Local(date.and_time(time))
    }

    /// Wraps an already zone-aware instant.
    pub fn zoned<Z: TimeZone>(instant: DateTime<Z>) -> Self {
        TimeInput::Zoned(instant.fixed_offset())
    }

    /// Returns true if the input still needs localizing.
    pub fn is_naive(&self) -> bool {
        matches!(self, TimeInput::Local(_))
    }

    /// Resolves the input to a UTC instant, localizing naive input in `zone`.
    pub fn normalize(&self, zone: Tz) -> Result<DateTime<Utc>, TimeError> {
        match self {
            TimeInput::Zoned(instant) => Ok(instant.with_timezone(&Utc)),
            TimeInput::Local(naive) => Ok(localize(*naive, zone)?.with_timezone(&Utc)),
        }
    }
}

impl From<DateTime<Utc>> for TimeInput {
    fn from(instant: DateTime<Utc>) -> Self {
        TimeInput::zoned(instant)
    }
}

impl From<DateTime<FixedOffset>> for TimeInput {
    fn from(instant: DateTime<FixedOffset>) -> Self {
        TimeInput::Zoned(instant)
    }
}

// =============================================================================
// Arithmetic
// =============================================================================

/// Attaches `zone` to a wall-clock time.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use salon_core::time::{localize, TimeError};
///
/// let warsaw = chrono_tz::Europe::Warsaw;
///
/// let ten = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(10, 0, 0).unwrap();
/// assert!(localize(ten, warsaw).is_ok());
///
/// // 02:30 on the last Sunday of March does not exist in Warsaw.
/// let gap = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap().and_hms_opt(2, 30, 0).unwrap();
/// assert!(matches!(localize(gap, warsaw), Err(TimeError::NonexistentLocalTime { .. })));
/// ```
pub fn localize(naive: NaiveDateTime, zone: Tz) -> Result<DateTime<Tz>, TimeError> {
    match zone.from_local_datetime(&naive) {
        LocalResult::Single(instant) => Ok(instant),
        LocalResult::Ambiguous(_, _) => Err(TimeError::AmbiguousLocalTime {
            local: naive,
            zone: zone.name().to_string(),
        }),
        LocalResult::None => Err(TimeError::NonexistentLocalTime {
            local: naive,
            zone: zone.name().to_string(),
        }),
    }
}

/// Returns `start + duration` in the zone of `start`.
///
/// ## Example
/// ```rust
/// use chrono::{Duration, TimeZone, Utc};
/// use salon_core::time::end_after;
///
/// let start = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
/// let end = end_after(start, Duration::minutes(60)).unwrap();
/// assert_eq!(end, Utc.with_ymd_and_hms(2024, 1, 1, 11, 0, 0).unwrap());
/// ```
pub fn end_after<Z: TimeZone>(start: DateTime<Z>, duration: Duration) -> Result<DateTime<Z>, TimeError> {
    start.checked_add_signed(duration).ok_or(TimeError::OutOfRange)
}

/// Computes the end instant of an appointment from caller input.
///
/// Rejects naive input with [`TimeError::NaiveTime`]; callers normalize
/// with [`localize`] or [`TimeInput::normalize`] first.
pub fn compute_end(start: &TimeInput, duration: Duration) -> Result<DateTime<FixedOffset>, TimeError> {
    match start {
        TimeInput::Zoned(instant) => end_after(*instant, duration),
        TimeInput::Local(naive) => Err(TimeError::NaiveTime(*naive)),
    }
}

// =============================================================================
// Time Slot
// =============================================================================

/// Half-open interval `[start, end)` occupied by an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeSlot {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        debug_assert!(start < end, "TimeSlot start must be before end");
        TimeSlot { start, end }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// An appointment ending exactly when another starts does not overlap it.
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
