//! # Seed Data Generator
//!
//! Populates a development database with staff, services and a few days of
//! bookings. Bookings go through the Scheduler, so the seeded data obeys
//! the same rules as real bookings.
//!
//! ## Usage
//! ```bash
//! # Seed the default database with 5 days of bookings
//! cargo run -p salon-db --bin seed
//!
//! # Custom amount of days
//! cargo run -p salon-db --bin seed -- --days 14
//!
//! # Specify database path
//! cargo run -p salon-db --bin seed -- --db ./data/salon.db
//! ```
//!
//! `SALON_TIMEZONE` picks the zone the opening hours are in.

use std::collections::BTreeSet;
use std::env;

use chrono::{Duration, NaiveTime, Utc};
use salon_core::admin::AdminListing;
use salon_core::{NewHairdresser, NewService, ReservationCandidate, Specialization, TimeInput};
use salon_db::{init_tracing, Database, DbConfig, SalonConfig, SchedulingError};
use tracing::{info, warn};

use Specialization::*;

const STAFF: &[(&str, &[Specialization])] = &[
    ("Anna Nowak", &[WomensCut, Stylist]),
    ("Jan Kowalski", &[MensCut]),
    ("Ewa Wiśniewska", &[MensCut, WomensCut]),
    ("Ola Zielińska", &[Stylist]),
];

/// (name, required specializations, minutes, cost in cents)
const SERVICES: &[(&str, &[Specialization], i64, i64)] = &[
    ("Strzyżenie męskie", &[MensCut], 30, 6_000),
    ("Strzyżenie damskie", &[WomensCut], 60, 12_000),
    ("Koloryzacja", &[WomensCut, Stylist], 120, 35_000),
    ("Modelowanie", &[Stylist], 45, 8_000),
];

/// First and last bookable hour of the day, local time.
const OPENING_HOUR: u32 = 9;
const CLOSING_HOUR: u32 = 17;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = SalonConfig::from_env()?;

    let args: Vec<String> = env::args().collect();

    let mut days: i64 = 5;
    let mut db_path = config.database_path.clone();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--days" | "-n" => {
                if i + 1 < args.len() {
                    days = args[i + 1].parse().unwrap_or(days);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone().into();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Salon Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -n, --days <N>     Days of bookings to generate (default: 5)");
                println!("  -d, --db <PATH>    Database file path (default: $SALON_DB_PATH)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    info!(path = %db_path.display(), days, timezone = %config.timezone, "Seeding database");

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db = Database::new(DbConfig::new(&db_path)).await?;

    if db.hairdressers().count().await? > 0 {
        warn!("Database already has hairdressers, skipping seed. Delete the file to regenerate.");
        return Ok(());
    }

    let mut staff = Vec::new();
    for (name, specializations) in STAFF {
        let hairdresser = db
            .hairdressers()
            .create(&NewHairdresser {
                name: name.to_string(),
                specializations: specializations.iter().copied().collect::<BTreeSet<_>>(),
            })
            .await?;
        info!(row = ?hairdresser.row(), "Hairdresser created");
        staff.push(hairdresser);
    }

    let mut services = Vec::new();
    for (name, specializations, minutes, cents) in SERVICES {
        let service = db
            .services()
            .create(&NewService {
                name: name.to_string(),
                specializations: specializations.iter().copied().collect(),
                duration_minutes: *minutes,
                cost_cents: *cents,
            })
            .await?;
        info!(row = ?service.row(), "Service created");
        services.push(service);
    }

    let scheduler = db.scheduler(config.validator());
    let today = Utc::now().with_timezone(&config.timezone).date_naive();

    let mut booked = 0;
    let mut rejected = 0;

    for day in 1..=days {
        let date = today + Duration::days(day);

        for (staff_idx, hairdresser) in staff.iter().enumerate() {
            let mut hour = OPENING_HOUR;
            let mut attempt = staff_idx + day as usize;

            while hour < CLOSING_HOUR {
                // Rotate through services; unqualified picks are rejected
                // by the scheduler and simply counted.
                let service = &services[attempt % services.len()];
                attempt += 1;

                let Some(time) = NaiveTime::from_hms_opt(hour, 0, 0) else {
                    break;
                };
                let candidate = ReservationCandidate::new(
                    &hairdresser.id,
                    &service.id,
                    TimeInput::from_date_and_time(date, time),
                );

                match scheduler.schedule(&candidate).await {
                    Ok(_) => booked += 1,
                    Err(SchedulingError::Persistence(err)) => return Err(err.into()),
                    Err(_) => rejected += 1,
                }

                hour += 2;
            }
        }
    }

    info!(
        booked,
        rejected,
        total = db.reservations().count().await?,
        "Seed complete"
    );

    Ok(())
}
