//! Service configuration.
//!
//! Configuration is loaded from `CAFE_*` environment variables with fallback
//! to defaults.
//!
//! | variable                   | default                      |
//! |----------------------------|------------------------------|
//! | `CAFE_DATABASE_PATH`       | `cafe.db`                    |
//! | `CAFE_DB_MAX_CONNECTIONS`  | `5`                          |
//! | `CAFE_JWT_SECRET`          | development secret           |
//! | `CAFE_JWT_LIFETIME_SECS`   | `86400` (24 hours), max 1 year |
//! | `CAFE_DEFAULT_TAX_PERCENT` | `5.0`                        |
//! | `CAFE_DEFAULT_CURRENCY`    | `EUR`                        |
//! | `CAFE_ACCESS_POLICY`       | unset (built-in table)       |

use std::env;
use std::path::PathBuf;

use cafe_core::validation::validate_tax_percent;
use cafe_core::Percent;
use cafe_db::DbConfig;

use crate::policy::AccessPolicy;

/// Longest access token lifetime accepted (one year).
pub const MAX_JWT_LIFETIME_SECS: i64 = 366 * 24 * 60 * 60;

/// Service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// SQLite database file
    pub database_path: PathBuf,

    /// Pool size
    pub db_max_connections: u32,

    /// HS256 signing key
    pub jwt_secret: String,

    /// Access token lifetime in seconds
    pub jwt_lifetime_secs: i64,

    /// Tax applied when a bill request omits `tax_percent`
    pub default_tax: Percent,

    /// Currency stamped on bills that omit one
    pub default_currency: String,

    pub access_policy: AccessPolicy,
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = ServiceConfig {
            database_path: lookup("CAFE_DATABASE_PATH")
                .unwrap_or_else(|| "cafe.db".to_string())
                .into(),

            db_max_connections: lookup("CAFE_DB_MAX_CONNECTIONS")
                .unwrap_or_else(|| "5".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("CAFE_DB_MAX_CONNECTIONS".to_string()))?,

            jwt_secret: lookup("CAFE_JWT_SECRET").unwrap_or_else(|| {
                // In production, this MUST be set via environment variable
                "cafe-dev-secret-change-in-production".to_string()
            }),

            jwt_lifetime_secs: lookup("CAFE_JWT_LIFETIME_SECS")
                .unwrap_or_else(|| "86400".to_string()) // 24 hours
                .parse()
                .map_err(|_| ConfigError::InvalidValue("CAFE_JWT_LIFETIME_SECS".to_string()))?,

            default_tax: lookup("CAFE_DEFAULT_TAX_PERCENT")
                .unwrap_or_else(|| "5.0".to_string())
                .parse::<f64>()
                .ok()
                .and_then(|pct| validate_tax_percent(pct).ok())
                .ok_or_else(|| ConfigError::InvalidValue("CAFE_DEFAULT_TAX_PERCENT".to_string()))?,

            default_currency: lookup("CAFE_DEFAULT_CURRENCY").unwrap_or_else(|| "EUR".to_string()),

            access_policy: match lookup("CAFE_ACCESS_POLICY") {
                Some(json) => AccessPolicy::from_overrides_json(&json)
                    .map_err(|e| ConfigError::InvalidPolicy(e.to_string()))?,
                None => AccessPolicy::defaults(),
            },
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("CAFE_DB_MAX_CONNECTIONS".to_string()));
        }
        if !(1..=MAX_JWT_LIFETIME_SECS).contains(&config.jwt_lifetime_secs) {
            return Err(ConfigError::InvalidValue("CAFE_JWT_LIFETIME_SECS".to_string()));
        }
        if config.jwt_secret.is_empty() {
            return Err(ConfigError::MissingRequired("CAFE_JWT_SECRET".to_string()));
        }

        Ok(config)
    }

    /// Pool settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.database_path.clone()).max_connections(self.db_max_connections)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Invalid access policy: {0}")]
    InvalidPolicy(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{Operation, Requirement};
    use cafe_core::Role;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ServiceConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServiceConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.database_path, PathBuf::from("cafe.db"));
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.jwt_lifetime_secs, 86_400);
        assert_eq!(config.default_tax, Percent::from_bps(500));
        assert_eq!(config.default_currency, "EUR");
        assert_eq!(config.access_policy, AccessPolicy::defaults());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("CAFE_DATABASE_PATH", "/var/lib/cafe/pos.db"),
            ("CAFE_DEFAULT_TAX_PERCENT", "23"),
            ("CAFE_DEFAULT_CURRENCY", "USD"),
            ("CAFE_ACCESS_POLICY", r#"{"adjust_stock": {"role": "manager"}}"#),
        ])
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/var/lib/cafe/pos.db"));
        assert_eq!(config.default_tax, Percent::from_bps(2300));
        assert_eq!(config.default_currency, "USD");
        assert_eq!(
            config.access_policy.requirement(Operation::AdjustStock),
            Requirement::Role(Role::Manager)
        );
    }

    #[test]
    fn test_lifetime_bounds() {
        let longest = MAX_JWT_LIFETIME_SECS.to_string();
        assert_eq!(
            load(&[("CAFE_JWT_LIFETIME_SECS", longest.as_str())]).unwrap().jwt_lifetime_secs,
            MAX_JWT_LIFETIME_SECS
        );

        let too_long = (MAX_JWT_LIFETIME_SECS + 1).to_string();
        assert!(matches!(
            load(&[("CAFE_JWT_LIFETIME_SECS", too_long.as_str())]),
            Err(ConfigError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            load(&[("CAFE_JWT_LIFETIME_SECS", "soon")]),
            Err(ConfigError::InvalidValue(_))
        ));
        assert!(matches!(
            load(&[("CAFE_JWT_LIFETIME_SECS", "0")]),
            Err(ConfigError::InvalidValue(_))
        ));
        assert!(matches!(
            load(&[("CAFE_JWT_LIFETIME_SECS", "9223372036854775807")]),
            Err(ConfigError::InvalidValue(_))
        ));
        assert!(matches!(
            load(&[("CAFE_DEFAULT_TAX_PERCENT", "-1")]),
            Err(ConfigError::InvalidValue(_))
        ));
        assert!(matches!(
            load(&[("CAFE_ACCESS_POLICY", "not json")]),
            Err(ConfigError::InvalidPolicy(_))
        ));
        assert!(matches!(
            load(&[("CAFE_JWT_SECRET", "")]),
            Err(ConfigError::MissingRequired(_))
        ));
    }
}
