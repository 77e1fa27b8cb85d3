//! Application configuration
//!
//! Loads configuration from environment variables with the
//! `DOORSTEP_MARKET__` prefix, using `__` as the section separator.
//! A local `.env` file is honored in development.

mod billing;
mod database;
mod error;
mod pricing;
mod server;

pub use billing::BillingConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use pricing::PricingConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Top-level application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub billing: BillingConfig,

    #[serde(default)]
    pub pricing: PricingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Example: `DOORSTEP_MARKET__DATABASE__URL=postgres://...` maps to
    /// `database.url`.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development convenience)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("DOORSTEP_MARKET")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let app_config: AppConfig = config.try_deserialize()?;
        app_config.validate()?;

        Ok(app_config)
    }

    /// Validate the complete configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.billing.validate()?;
        self.pricing.validate()?;
        Ok(())
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
