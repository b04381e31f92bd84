//! # salon-db: Database Layer for the Salon
//!
//! This crate provides database access for salon bookings.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Salon Data Flow                                  │
//! │                                                                         │
//! │  Booking form / admin screen                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     salon-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ Hairdresser   │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ Service       │    │ 001_init.sql │  │   │
//! │  │   │ write_lock    │    │ Reservation   │    │              │  │   │
//! │  │   └───────┬───────┘    └───────────────┘    └──────────────┘  │   │
//! │  │           │                                                    │   │
//! │  │   ┌───────▼───────┐                                            │   │
//! │  │   │   Scheduler   │ ← salon_core::schedule::plan in one tx     │   │
//! │  │   └───────────────┘                                            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │            $SALON_DB_PATH or <data dir>/salon.db                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`config`] - Environment configuration
//! - [`error`] - Database and scheduling error types
//! - [`repository`] - Repository implementations
//! - [`scheduler`] - The transactional reservation write path
//!
//! ## Usage
//!
//! ```rust,ignore
//! use salon_db::{Database, SalonConfig};
//!
//! let config = SalonConfig::from_env()?;
//! let db = Database::new(config.db_config()).await?;
//!
//! let scheduler = db.scheduler(config.validator());
//! let reservation = scheduler.schedule(&candidate).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod scheduler;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{ConfigError, SalonConfig};
pub use error::{DbError, DbResult, SchedulingError};
pub use pool::{Database, DbConfig};
pub use scheduler::Scheduler;

// Repository re-exports for convenience
pub use repository::hairdresser::HairdresserRepository;
pub use repository::reservation::ReservationRepository;
pub use repository::service::ServiceRepository;
pub use repository::specialization::SpecializationRepository;

/// Installs the `tracing` subscriber used by the binaries.
///
/// `RUST_LOG` overrides the default `info,salon=debug,sqlx=warn`.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,salon=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
