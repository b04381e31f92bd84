//! # Repository Module
//!
//! Database repository implementations for the salon.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Layout                                    │
//! │                                                                         │
//! │  Database                                                              │
//! │  ├── specializations()  → SpecializationRepository  (read-only)        │
//! │  ├── hairdressers()     → HairdresserRepository     (CRUD, search)     │
//! │  ├── services()         → ServiceRepository         (CRUD)             │
//! │  ├── reservations()     → ReservationRepository     (read-only)        │
//! │  └── scheduler(..)      → Scheduler  (the only reservation writer)     │
//! │                                                                         │
//! │  Each repository also exposes crate-private `fetch_*` helpers that     │
//! │  accept any sqlx Executor, so the Scheduler can run the same queries   │
//! │  on its open transaction.                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`SpecializationRepository`](specialization::SpecializationRepository)
//! - [`HairdresserRepository`](hairdresser::HairdresserRepository)
//! - [`ServiceRepository`](service::ServiceRepository)
//! - [`ReservationRepository`](reservation::ReservationRepository)

use uuid::Uuid;

pub mod hairdresser;
pub mod reservation;
pub mod service;
pub mod specialization;

/// Generates a new primary key (UUID v4).
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}
