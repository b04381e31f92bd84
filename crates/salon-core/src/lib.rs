//! # salon-core: Pure Scheduling Logic for the Salon
//!
//! This crate holds every booking rule of the salon as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Salon Booking Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Presentation (forms, admin screens)             │   │
//! │  │      builds ReservationCandidate, renders ValidationErrors      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            salon-db Scheduler (transaction + write lock)        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ salon-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────────┐ ┌────────────┐ ┌──────────┐   │   │
//! │  │   │   time   │ │qualification │ │ validation │ │ conflict │   │   │
//! │  │   │ end_after│ │ is_qualified │ │ Validator  │ │ overlaps │   │   │
//! │  │   └──────────┘ └──────────────┘ └────────────┘ └──────────┘   │   │
//! │  │                         schedule::plan                         │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    salon-db (Database Layer)                    │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Hairdresser, Service, Reservation, ...)
//! - [`time`] - Localizing form input and computing end times
//! - [`qualification`] - Specialization matching
//! - [`validation`] - Reservation validator and catalogue checks
//! - [`conflict`] - Overlap detection
//! - [`schedule`] - Validate-then-check plan
//! - [`admin`] - Back-office list/search descriptors
//! - [`money`] - Integer money for service prices
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input, same output
//! 2. **No I/O**: lookups happen in salon-db and are passed in
//! 3. **Zone-aware Instants**: naive times are localized before use
//! 4. **Explicit Errors**: all errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use salon_core::schedule::plan;
//! use salon_core::validation::ReservationValidator;
//! use salon_core::{Hairdresser, ReservationCandidate, Service, Specialization};
//! use std::collections::BTreeSet;
//!
//! let now = Utc::now();
//! let anna = Hairdresser {
//!     id: "h1".into(),
//!     name: "Anna".into(),
//!     specializations: BTreeSet::from([Specialization::MensCut]),
//!     created_at: now,
//!     updated_at: now,
//! };
//! let cut = Service {
//!     id: "s1".into(),
//!     name: "Cut".into(),
//!     specializations: BTreeSet::from([Specialization::MensCut, Specialization::WomensCut]),
//!     duration_minutes: 60,
//!     cost_cents: 10_000,
//!     created_at: now,
//!     updated_at: now,
//! };
//!
//! let start = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
//! let candidate = ReservationCandidate::new("h1", "s1", start);
//! let planned = plan(&ReservationValidator::default(), &candidate, Some(&anna), Some(&cut), &[]).unwrap();
//!
//! assert_eq!(planned.end, Utc.with_ymd_and_hms(2024, 1, 1, 11, 0, 0).unwrap());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod admin;
pub mod conflict;
pub mod error;
pub mod money;
pub mod qualification;
pub mod schedule;
pub mod time;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, Field, ValidationError, ValidationErrors};
pub use money::Money;
pub use time::{TimeError, TimeInput, TimeSlot};
pub use types::*;
pub use validation::ReservationValidator;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Zone used to localize naive form input when nothing else is configured.
pub const DEFAULT_TIMEZONE: chrono_tz::Tz = chrono_tz::Europe::Warsaw;

/// Maximum length of hairdresser and service names.
pub const MAX_NAME_LEN: usize = 100;

/// Largest service price, 999.99.
pub const MAX_SERVICE_COST_CENTS: i64 = 99_999;

/// Longest bookable service, one full day.
pub const MAX_SERVICE_DURATION_MINUTES: i64 = 24 * 60;
