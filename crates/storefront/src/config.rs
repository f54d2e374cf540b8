//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `DELIZIO_HOST` - Bind address (default: 127.0.0.1)
//! - `DELIZIO_PORT` - Listen port (default: 3000)
//! - `DELIZIO_DATA_DIR` - Directory for the saved cart and user (default: ./data)
//! - `DELIZIO_DELIVERY_FEE` - Fee on delivery orders below the threshold (default: 5.99)
//! - `DELIZIO_FREE_DELIVERY_THRESHOLD` - Subtotal for free delivery (default: 50.00)
//! - `DELIZIO_PLACEMENT_DELAY_MS` - Simulated payment delay (default: 2000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate, 0.0 to 1.0

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use delizio_core::Money;

use crate::pricing::PricingConfig;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Where the cart and user records are stored
    pub data_dir: PathBuf,
    /// Delivery fee and free-delivery threshold
    pub pricing: PricingConfig,
    /// How long the mock payment processor takes to approve
    pub placement_delay: Duration,
    /// Sentry error tracking
    pub sentry: SentryConfig,
}

/// Sentry settings. Sentry stays disabled without a DSN.
#[derive(Debug, Clone, Default)]
pub struct SentryConfig {
    pub dsn: Option<String>,
    pub environment: Option<String>,
    pub sample_rate: Option<f32>,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if a variable cannot be parsed or
    /// a fee or threshold is negative.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`Self::from_env`].
    pub fn from_source(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Source(lookup);

        let host = env
            .or_default("DELIZIO_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| invalid("DELIZIO_HOST", e))?;
        let port = env
            .or_default("DELIZIO_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| invalid("DELIZIO_PORT", e))?;
        let data_dir = PathBuf::from(env.or_default("DELIZIO_DATA_DIR", "./data"));

        let defaults = PricingConfig::default();
        let pricing = PricingConfig {
            delivery_fee: env.money("DELIZIO_DELIVERY_FEE", defaults.delivery_fee)?,
            free_delivery_threshold: env.money(
                "DELIZIO_FREE_DELIVERY_THRESHOLD",
                defaults.free_delivery_threshold,
            )?,
        };

        let delay_ms = env
            .or_default("DELIZIO_PLACEMENT_DELAY_MS", "2000")
            .parse::<u64>()
            .map_err(|e| invalid("DELIZIO_PLACEMENT_DELAY_MS", e))?;

        let sample_rate = env
            .optional("SENTRY_SAMPLE_RATE")
            .map(|raw| parse_sample_rate(&raw))
            .transpose()?;
        let sentry = SentryConfig {
            dsn: env.optional("SENTRY_DSN"),
            environment: env.optional("SENTRY_ENVIRONMENT"),
            sample_rate,
        };

        Ok(Self {
            host,
            port,
            data_dir,
            pricing,
            placement_delay: Duration::from_millis(delay_ms),
            sentry,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

struct Source<F>(F);

impl<F: Fn(&str) -> Option<String>> Source<F> {
    /// Set and non-blank values only.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    fn money(&self, key: &str, default: Money) -> Result<Money, ConfigError> {
        let Some(raw) = self.optional(key) else {
            return Ok(default);
        };
        let amount = Money::parse(&raw).map_err(|e| invalid(key, e))?;
        if amount.is_negative() {
            return Err(invalid(key, "must not be negative"));
        }
        Ok(amount)
    }
}

fn parse_sample_rate(raw: &str) -> Result<f32, ConfigError> {
    let rate = raw
        .trim()
        .parse::<f32>()
        .map_err(|e| invalid("SENTRY_SAMPLE_RATE", e))?;
    if (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(invalid("SENTRY_SAMPLE_RATE", "must be between 0.0 and 1.0"))
    }
}

fn invalid(key: &str, reason: impl ToString) -> ConfigError {
    ConfigError::InvalidEnvVar(key.to_string(), reason.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_source(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.pricing, PricingConfig::default());
        assert_eq!(config.placement_delay, Duration::from_secs(2));
        assert!(config.sentry.dsn.is_none());
    }

    #[test]
    fn test_pricing_overrides() {
        let config = load(&[
            ("DELIZIO_DELIVERY_FEE", "$3.50"),
            ("DELIZIO_FREE_DELIVERY_THRESHOLD", "40"),
        ])
        .unwrap();
        assert_eq!(config.pricing.delivery_fee, Money::from_cents(350));
        assert_eq!(config.pricing.free_delivery_threshold, Money::from_dollars(40));
    }

    #[test]
    fn test_negative_fee_rejected() {
        let err = load(&[("DELIZIO_DELIVERY_FEE", "-1.00")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "DELIZIO_DELIVERY_FEE"));
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[("DELIZIO_PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().starts_with("Invalid environment variable DELIZIO_PORT"));
    }

    #[test]
    fn test_sample_rate_range() {
        assert!(load(&[("SENTRY_SAMPLE_RATE", "1.5")]).is_err());
        let config = load(&[("SENTRY_SAMPLE_RATE", "0.25")]).unwrap();
        assert_eq!(config.sentry.sample_rate, Some(0.25));
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = load(&[("DELIZIO_HOST", "  "), ("SENTRY_DSN", "")]).unwrap();
        assert_eq!(config.host.to_string(), "127.0.0.1");
        assert!(config.sentry.dsn.is_none());
    }
}
