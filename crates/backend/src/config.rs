//! Backend configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `VITRINE_SIMULATE_LATENCY` - Sleep before answering, like a remote API (default: true)
//! - `VITRINE_LOGIN_MAX_ATTEMPTS` - Failed logins before lockout (default: 5)
//! - `VITRINE_LOGIN_LOCKOUT_SECS` - Lockout window after the last failure (default: 300)
//! - `VITRINE_RECOVERY_TTL_SECS` - Lifetime of a recovery code (default: 600)
//! - `VITRINE_RECENT_ORDERS` - Orders included in admin stats (default: 10)
//! - `VITRINE_CURRENCY` - Currency used when formatting money in messages (default: BRL)
//! - `VITRINE_ADMIN_ALERT_PHONE` - Phone that receives new-sale alerts
//! - `VITRINE_ADMIN_ALERT_EMAIL` - Email that receives new-sale alerts

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use vitrine_core::{CurrencyCode, Email};

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Backend configuration.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Artificial per-operation delays
    pub latency: LatencyProfile,
    /// Login brute-force protection
    pub login: LoginThrottleConfig,
    /// Lifetime of a password recovery code
    pub recovery_ttl: Duration,
    /// Number of orders returned by the admin stats query
    pub recent_orders: usize,
    /// Currency used to present amounts in notifications
    pub currency: CurrencyCode,
    /// Fixed recipients of new-sale alerts
    pub admin_alerts: AdminAlertConfig,
    /// Password hashing cost
    pub password_hashing: PasswordHashing,
}

/// Login throttle limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginThrottleConfig {
    /// Consecutive failures that trigger the lockout.
    pub max_attempts: u32,
    /// How long after the last failure the lockout holds.
    pub lockout: Duration,
}

impl Default for LoginThrottleConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            lockout: Duration::from_secs(5 * 60),
        }
    }
}

/// Store-owner contacts that receive a copy of every new sale.
///
/// Each alert is skipped when its recipient is unset.
#[derive(Debug, Clone, Default)]
pub struct AdminAlertConfig {
    pub phone: Option<String>,
    pub email: Option<Email>,
}

/// Argon2id cost preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PasswordHashing {
    /// Library defaults (OWASP recommended parameters).
    #[default]
    Standard,
    /// Minimum parameters, for tests and scripted demos only.
    Minimal,
}

/// Simulated network latency for each kind of operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencyProfile {
    pub auth: Duration,
    pub product_list: Duration,
    pub product_read: Duration,
    pub order_create: Duration,
    pub order_list: Duration,
    pub order_read: Duration,
    pub order_update: Duration,
    pub admin_stats: Duration,
}

impl LatencyProfile {
    /// No artificial delay anywhere.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            auth: Duration::ZERO,
            product_list: Duration::ZERO,
            product_read: Duration::ZERO,
            order_create: Duration::ZERO,
            order_list: Duration::ZERO,
            order_read: Duration::ZERO,
            order_update: Duration::ZERO,
            admin_stats: Duration::ZERO,
        }
    }
}

impl Default for LatencyProfile {
    fn default() -> Self {
        Self {
            auth: Duration::from_millis(800),
            product_list: Duration::from_millis(300),
            product_read: Duration::from_millis(200),
            order_create: Duration::from_millis(1000),
            order_list: Duration::from_millis(500),
            order_read: Duration::from_millis(200),
            order_update: Duration::from_millis(800),
            admin_stats: Duration::from_millis(400),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            latency: LatencyProfile::default(),
            login: LoginThrottleConfig::default(),
            recovery_ttl: Duration::from_secs(10 * 60),
            recent_orders: 10,
            currency: CurrencyCode::default(),
            admin_alerts: AdminAlertConfig::default(),
            password_hashing: PasswordHashing::default(),
        }
    }
}

impl BackendConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let defaults = Self::default();

        let latency = if parse_env_or("VITRINE_SIMULATE_LATENCY", true)? {
            defaults.latency
        } else {
            LatencyProfile::none()
        };

        let login = LoginThrottleConfig {
            max_attempts: parse_env_or("VITRINE_LOGIN_MAX_ATTEMPTS", defaults.login.max_attempts)?,
            lockout: Duration::from_secs(parse_env_or(
                "VITRINE_LOGIN_LOCKOUT_SECS",
                defaults.login.lockout.as_secs(),
            )?),
        };

        let recovery_ttl = Duration::from_secs(parse_env_or(
            "VITRINE_RECOVERY_TTL_SECS",
            defaults.recovery_ttl.as_secs(),
        )?);

        let admin_alerts = AdminAlertConfig {
            phone: get_optional_env("VITRINE_ADMIN_ALERT_PHONE"),
            email: get_optional_env("VITRINE_ADMIN_ALERT_EMAIL")
                .map(|raw| {
                    Email::parse(&raw).map_err(|e| {
                        ConfigError::InvalidEnvVar(
                            "VITRINE_ADMIN_ALERT_EMAIL".to_string(),
                            e.to_string(),
                        )
                    })
                })
                .transpose()?,
        };

        Ok(Self {
            latency,
            login,
            recovery_ttl,
            recent_orders: parse_env_or("VITRINE_RECENT_ORDERS", defaults.recent_orders)?,
            currency: parse_env_or("VITRINE_CURRENCY", defaults.currency)?,
            admin_alerts,
            password_hashing: PasswordHashing::Standard,
        })
    }

    /// Configuration for tests: no latency and the cheapest password hashing.
    #[must_use]
    pub fn for_tests() -> Self {
        Self {
            latency: LatencyProfile::none(),
            password_hashing: PasswordHashing::Minimal,
            ..Self::default()
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parse an optional environment variable, falling back to a default.
fn parse_env_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key).map_or(Ok(default), |raw| parse_value(key, &raw))
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BackendConfig::default();
        assert_eq!(config.login.max_attempts, 5);
        assert_eq!(config.login.lockout, Duration::from_secs(300));
        assert_eq!(config.recovery_ttl, Duration::from_secs(600));
        assert_eq!(config.recent_orders, 10);
        assert_eq!(config.latency.auth, Duration::from_millis(800));
        assert_eq!(config.latency.order_create, Duration::from_millis(1000));
        assert_eq!(config.currency, CurrencyCode::BRL);
    }

    #[test]
    fn test_for_tests_disables_latency() {
        let config = BackendConfig::for_tests();
        assert_eq!(config.latency, LatencyProfile::none());
        assert_eq!(config.password_hashing, PasswordHashing::Minimal);
    }

    #[test]
    fn test_parse_value_reports_key() {
        let err = parse_value::<u32>("VITRINE_LOGIN_MAX_ATTEMPTS", "five").unwrap_err();
        assert!(err.to_string().contains("VITRINE_LOGIN_MAX_ATTEMPTS"));
    }

    #[test]
    fn test_parse_value_trims() {
        let value: bool = parse_value("VITRINE_SIMULATE_LATENCY", " false ").unwrap();
        assert!(!value);
        let currency: CurrencyCode = parse_value("VITRINE_CURRENCY", "usd").unwrap();
        assert_eq!(currency, CurrencyCode::USD);
    }
}
