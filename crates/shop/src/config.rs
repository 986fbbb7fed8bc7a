//! Shop configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `SHOP_CATALOG_PAGE_SIZE` - Products per catalog page (default: 5)
//! - `SHOP_SESSION_TTL_SECS` - Idle seconds before a session's cart
//!   expires (default: 1800)
//! - `SHOP_CHECKOUT_MAX_ATTEMPTS` - Total checkout attempts when commits
//!   keep losing optimistic races (default: 3)

use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable was set but could not be parsed.
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Shop configuration.
#[derive(Debug, Clone)]
pub struct ShopConfig {
    /// Products per catalog page.
    pub catalog_page_size: u32,
    /// How long an idle session keeps its cart.
    pub session_ttl: Duration,
    /// Total checkout attempts when commits keep losing optimistic races.
    pub checkout_max_attempts: u32,
}

impl ShopConfig {
    /// Default products per catalog page.
    pub const DEFAULT_PAGE_SIZE: u32 = 5;
    /// Default idle session TTL.
    pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);
    /// Default checkout attempt budget.
    pub const DEFAULT_CHECKOUT_MAX_ATTEMPTS: u32 = 3;

    /// Load configuration from the environment, falling back to defaults
    /// for unset variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if a set variable fails to
    /// parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            catalog_page_size: parse_var("SHOP_CATALOG_PAGE_SIZE", Self::DEFAULT_PAGE_SIZE)?,
            session_ttl: Duration::from_secs(parse_var(
                "SHOP_SESSION_TTL_SECS",
                Self::DEFAULT_SESSION_TTL.as_secs(),
            )?),
            checkout_max_attempts: parse_var(
                "SHOP_CHECKOUT_MAX_ATTEMPTS",
                Self::DEFAULT_CHECKOUT_MAX_ATTEMPTS,
            )?,
        })
    }
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            catalog_page_size: Self::DEFAULT_PAGE_SIZE,
            session_ttl: Self::DEFAULT_SESSION_TTL,
            checkout_max_attempts: Self::DEFAULT_CHECKOUT_MAX_ATTEMPTS,
        }
    }
}

/// Read and parse an environment variable, or return `default` when unset.
fn parse_var<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

/// Parse a raw variable value, reporting the variable name on failure.
fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.parse()
        .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_owned(), e.to_string()))
}
