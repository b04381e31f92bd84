//! Salon configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable          | Default                               |
//! |-------------------|---------------------------------------|
//! | `SALON_DB_PATH`   | `<platform data dir>/salon.db`        |
//! | `SALON_TIMEZONE`  | `Europe/Warsaw`                       |

use std::env;
use std::path::PathBuf;

use chrono_tz::Tz;
use directories::ProjectDirs;
use salon_core::{ReservationValidator, DEFAULT_TIMEZONE};

use crate::pool::DbConfig;

pub const DB_PATH_VAR: &str = "SALON_DB_PATH";
pub const TIMEZONE_VAR: &str = "SALON_TIMEZONE";

/// Runtime configuration of the salon backend.
#[derive(Debug, Clone, PartialEq)]
pub struct SalonConfig {
    /// SQLite database file.
    pub database_path: PathBuf,

    /// Zone used to localize naive form input.
    pub timezone: Tz,
}

impl SalonConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_path = match env::var(DB_PATH_VAR) {
            Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
            _ => default_database_path()?,
        };

        let timezone = match env::var(TIMEZONE_VAR) {
            Ok(name) => parse_timezone(&name)?,
            Err(_) => DEFAULT_TIMEZONE,
        };

        Ok(SalonConfig {
            database_path,
            timezone,
        })
    }

    /// Database settings for [`crate::Database::new`].
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path)
    }

    /// Validator localizing naive input in the configured zone.
    pub fn validator(&self) -> ReservationValidator {
        ReservationValidator::new(self.timezone)
    }
}

/// Parses an IANA zone name such as `Europe/Warsaw`.
pub fn parse_timezone(name: &str) -> Result<Tz, ConfigError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| ConfigError::InvalidValue(TIMEZONE_VAR.to_string()))
}

/// `salon.db` inside the platform's data directory.
///
/// The directory is not created here; `Database::new` creates the file.
pub fn default_database_path() -> Result<PathBuf, ConfigError> {
    let dirs = ProjectDirs::from("com", "salon", "booking").ok_or(ConfigError::NoDataDir)?;
    Ok(dirs.data_dir().join("salon.db"))
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Could not determine app data directory")]
    NoDataDir,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timezone() {
        assert_eq!(parse_timezone("Europe/Warsaw").unwrap(), chrono_tz::Europe::Warsaw);
        assert_eq!(parse_timezone(" UTC ").unwrap(), chrono_tz::UTC);
        assert!(matches!(
            parse_timezone("Mars/Olympus_Mons"),
            Err(ConfigError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_validator_uses_configured_zone() {
        let config = SalonConfig {
            database_path: PathBuf::from("/tmp/salon.db"),
            timezone: chrono_tz::America::New_York,
        };
        assert_eq!(config.validator().default_timezone(), chrono_tz::America::New_York);
        assert_eq!(config.db_config().database_path, PathBuf::from("/tmp/salon.db"));
    }
}
