//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! optional TOML files and `TUTORHUB__`-prefixed environment variables.
//! Every section carries serde defaults, so an empty source set yields a
//! runnable combined-mode configuration.

pub mod app;
pub mod availability;
pub mod booking;
pub mod coordination;
pub mod logging;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig, ServiceRole};
pub use self::availability::AvailabilityConfig;
pub use self::booking::BookingConfig;
pub use self::coordination::CoordinationConfig;
pub use self::logging::LoggingConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Default tutor availability policy.
    #[serde(default)]
    pub availability: AvailabilityConfig,
    /// Booking ledger policy.
    #[serde(default)]
    pub booking: BookingConfig,
    /// Cross-service coordination settings.
    #[serde(default)]
    pub coordination: CoordinationConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration.
    ///
    /// Merges `config/default`, the environment-specific overlay
    /// `config/{env}`, and environment variables prefixed with `TUTORHUB__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("TUTORHUB")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Check cross-section constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.server.role == ServiceRole::Bookings
            && self.coordination.sessions_base_url.is_none()
        {
            return Err(AppError::configuration(
                "coordination.sessions_base_url is required when server.role = \"bookings\"",
            ));
        }

        let policy = &self.availability;
        if policy.allowed_hours_start >= policy.allowed_hours_end || policy.allowed_hours_end > 24 {
            return Err(AppError::configuration(format!(
                "Invalid allowed hours window {}..{}",
                policy.allowed_hours_start, policy.allowed_hours_end
            )));
        }

        if self.coordination.max_attempts == 0 {
            return Err(AppError::configuration(
                "coordination.max_attempts must be at least 1",
            ));
        }

        Ok(())
    }
}
