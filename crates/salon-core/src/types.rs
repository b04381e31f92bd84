//! # Domain Types
//!
//! Core domain types used throughout the salon.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  Hairdresser    │   │    Service      │   │  Reservation    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  name           │   │  name           │   │  hairdresser_id │       │
//! │  │  specializations│   │  specializations│   │  service_id?    │       │
//! │  └────────┬────────┘   │  duration_min   │   │  start / end    │       │
//! │           │            │  cost_cents     │   └─────────────────┘       │
//! │           │            └────────┬────────┘                              │
//! │           │  ┌─────────────────┐│                                       │
//! │           └─►│ Specialization  │◄┘  qualified ⇔ sets intersect         │
//! │              │  M  Men's cut   │                                        │
//! │              │  F  Women's cut │                                        │
//! │              │  S  Stylist     │                                        │
//! │              └─────────────────┘                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Reference vs Owned Data
//! Hairdressers and services are reference data managed on their own.
//! A reservation only *references* them by id; it owns its start and end.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::time::{TimeInput, TimeSlot};

// =============================================================================
// Specialization
// =============================================================================

/// A skill category a hairdresser may hold and a service may require.
///
/// The closed set mirrors the salon's catalogue. The one-letter code is the
/// persisted form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[ts(export)]
pub enum Specialization {
    #[serde(rename = "M")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "M"))]
    MensCut,
    #[serde(rename = "F")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "F"))]
    WomensCut,
    #[serde(rename = "S")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "S"))]
    Stylist,
}

impl Specialization {
    /// Every specialization, in catalogue order.
    pub const ALL: [Specialization; 3] = [
        Specialization::MensCut,
        Specialization::WomensCut,
        Specialization::Stylist,
    ];

    /// Stored code.
    pub const fn code(&self) -> &'static str {
        match self {
            Specialization::MensCut => "M",
            Specialization::WomensCut => "F",
            Specialization::Stylist => "S",
        }
    }

    /// Human-readable label for admin screens.
    pub const fn label(&self) -> &'static str {
        match self {
            Specialization::MensCut => "Men's cut",
            Specialization::WomensCut => "Women's cut",
            Specialization::Stylist => "Stylist",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Specialization::ALL
            .into_iter()
            .find(|s| s.code() == code.trim())
    }
}

impl fmt::Display for Specialization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Specialization {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Specialization::from_code(s).ok_or_else(|| format!("unknown specialization code: {s}"))
    }
}

// =============================================================================
// Hairdresser
// =============================================================================

/// A hairdresser who can be booked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Hairdresser {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Skills held. May be empty.
    pub specializations: BTreeSet<Specialization>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl fmt::Display for Hairdresser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Input for creating a hairdresser.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewHairdresser {
    pub name: String,
    pub specializations: BTreeSet<Specialization>,
}

// =============================================================================
// Service
// =============================================================================

/// A bookable service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Service {
    /// Unique identifier (UUID v4).
    pub id: String,

    pub name: String,

    /// Skills needed to perform the service. A hairdresser needs at least one.
    pub specializations: BTreeSet<Specialization>,

    /// Length of one appointment, in whole minutes. Always positive.
    pub duration_minutes: i64,

    /// Price in cents. Never negative.
    pub cost_cents: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Service {
    /// Returns the appointment length, `None` if it exceeds what
    /// `chrono::Duration` can hold.
    #[inline]
    pub fn duration(&self) -> Option<Duration> {
        Duration::try_minutes(self.duration_minutes)
    }

    /// Returns the cost as a Money type.
    #[inline]
    pub fn cost(&self) -> Money {
        Money::from_cents(self.cost_cents)
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Input for creating a service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewService {
    pub name: String,
    pub specializations: BTreeSet<Specialization>,
    pub duration_minutes: i64,
    pub cost_cents: i64,
}

// =============================================================================
// Reservation
// =============================================================================

/// A stored reservation.
///
/// `service_id` becomes `None` when the service is deleted. Such a row is
/// kept for history but no longer passes validation if edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Reservation {
    pub id: String,
    pub hairdresser_id: String,
    pub service_id: Option<String>,

    #[ts(as = "String")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "start_at"))]
    pub start: DateTime<Utc>,

    #[ts(as = "String")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "end_at"))]
    pub end: DateTime<Utc>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    /// The interval this reservation blocks.
    #[inline]
    pub fn slot(&self) -> TimeSlot {
        TimeSlot::new(self.start, self.end)
    }

    /// Display form used in listings, e.g. "Anna reservation on 2024-01-01 10:00 UTC".
    pub fn describe(&self, hairdresser: &Hairdresser) -> String {
        format!(
            "{} reservation on {}",
            hairdresser.name,
            self.start.format("%Y-%m-%d %H:%M UTC")
        )
    }
}

// =============================================================================
// Candidate & Normalized Reservation
// =============================================================================

/// An unvalidated reservation request as built by a form or API call.
///
/// Every field is optional so that missing input is reported as a
/// field error instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationCandidate {
    /// Set when editing an existing reservation.
    pub id: Option<String>,
    pub hairdresser_id: Option<String>,
    pub service_id: Option<String>,
    pub start: Option<TimeInput>,
    /// Derived from the service duration when absent.
    pub end: Option<TimeInput>,
}

impl ReservationCandidate {
    /// A new booking with the end left to the service duration.
    pub fn new(
        hairdresser_id: impl Into<String>,
        service_id: impl Into<String>,
        start: impl Into<TimeInput>,
    ) -> Self {
        ReservationCandidate {
            id: None,
            hairdresser_id: Some(hairdresser_id.into()),
            service_id: Some(service_id.into()),
            start: Some(start.into()),
            end: None,
        }
    }

    pub fn with_end(mut self, end: impl Into<TimeInput>) -> Self {
        self.end = Some(end.into());
        self
    }

    /// Turns the request into an edit of an existing reservation.
    pub fn for_reservation(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// A candidate after successful validation, with every derived field filled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedReservation {
    pub id: Option<String>,
    pub hairdresser_id: String,
    pub service_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl NormalizedReservation {
    #[inline]
    pub fn slot(&self) -> TimeSlot {
        TimeSlot::new(self.start, self.end)
    }
}

impl From<&NormalizedReservation> for ReservationCandidate {
    fn from(normalized: &NormalizedReservation) -> Self {
        ReservationCandidate {
            id: normalized.id.clone(),
            hairdresser_id: Some(normalized.hairdresser_id.clone()),
            service_id: Some(normalized.service_id.clone()),
            start: Some(normalized.start.into()),
            end: Some(normalized.end.into()),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_specialization_codes_roundtrip() {
        for spec in Specialization::ALL {
            assert_eq!(Specialization::from_code(spec.code()), Some(spec));
        }
        assert_eq!(Specialization::from_code("X"), None);
        assert_eq!("F".parse::<Specialization>(), Ok(Specialization::WomensCut));
        assert!("women".parse::<Specialization>().is_err());
    }

    #[test]
    fn test_specialization_serializes_as_code() {
        let json = serde_json::to_string(&Specialization::Stylist).unwrap();
        assert_eq!(json, "\"S\"");
        assert_eq!(Specialization::MensCut.to_string(), "Men's cut");
    }

    #[test]
    fn test_service_duration_and_cost() {
        let now = Utc::now();
        let service = Service {
            id: "svc".to_string(),
            name: "Cut".to_string(),
            specializations: BTreeSet::from([Specialization::MensCut]),
            duration_minutes: 60,
            cost_cents: 10_000,
            created_at: now,
            updated_at: now,
        };
        assert_eq!(service.duration(), Some(Duration::hours(1)));
        assert_eq!(service.cost().cents(), 10_000);
        assert_eq!(service.to_string(), "Cut");
    }

    #[test]
    fn test_reservation_describe() {
        let now = Utc::now();
        let hairdresser = Hairdresser {
            id: "h1".to_string(),
            name: "Anna".to_string(),
            specializations: BTreeSet::new(),
            created_at: now,
            updated_at: now,
        };
        let reservation = Reservation {
            id: "r1".to_string(),
            hairdresser_id: "h1".to_string(),
            service_id: None,
            start: Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 1, 1, 11, 0, 0).unwrap(),
            created_at: now,
            updated_at: now,
        };
        assert_eq!(
            reservation.describe(&hairdresser),
            "Anna reservation on 2024-01-01 10:00 UTC"
        );
        assert_eq!(reservation.slot().duration(), Duration::hours(1));
    }

    #[test]
    fn test_candidate_builders() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let candidate = ReservationCandidate::new("h1", "s1", start)
            .with_end(start + Duration::minutes(30))
            .for_reservation("r1");

        assert_eq!(candidate.id.as_deref(), Some("r1"));
        assert_eq!(candidate.hairdresser_id.as_deref(), Some("h1"));
        assert_eq!(candidate.start, Some(TimeInput::from(start)));
        assert!(candidate.end.is_some());
    }
}
