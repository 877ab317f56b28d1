use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::{defaults, envconfig::EnvConfig, validate};

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub logging: LoggingConfig,
    pub database: DatabaseConfig,
    pub listing: ListingConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        <Self as EnvConfig>::from_env()
    }
}

impl EnvConfig for AppConfig {
    fn validate(&self) -> Result<()> {
        validate::validate(self)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneralConfig {
    pub host: String,
    pub port: u16,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            host: defaults::DEFAULT_HOST.to_string(),
            port: defaults::DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub rust_log: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            rust_log: defaults::DEFAULT_RUST_LOG.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Store URL. The scheme selects the backend: `scylla://`, `cassandra://`,
    /// `postgres://`, `postgresql://` or `sqlite:`.
    pub url: String,
    pub consistency: ConsistencyLevel,
    pub connect_timeout_secs: u64,
    pub max_connections: u32,
    pub min_idle: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: defaults::DEFAULT_DATABASE_URL.to_string(),
            consistency: ConsistencyLevel::default(),
            connect_timeout_secs: defaults::DEFAULT_CONNECT_TIMEOUT_SECS,
            max_connections: defaults::DEFAULT_DB_MAX_CONNECTIONS,
            min_idle: defaults::DEFAULT_DB_MIN_IDLE,
        }
    }
}

/// CQL consistency applied to every statement of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsistencyLevel {
    Any,
    One,
    Two,
    Three,
    #[default]
    Quorum,
    All,
    LocalQuorum,
    EachQuorum,
    LocalOne,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ListingConfig {
    pub policy: ListPolicy,
    pub default_page_size: u64,
    pub max_page_size: u64,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            policy: ListPolicy::default(),
            default_page_size: defaults::DEFAULT_PAGE_SIZE,
            max_page_size: defaults::DEFAULT_MAX_PAGE_SIZE,
        }
    }
}

/// Pagination contract served by `GET /todos`. One policy per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListPolicy {
    /// Opaque continuation token, no totals.
    #[default]
    Cursor,
    /// Page number with total count and next/previous page numbers.
    Offset,
}

#[cfg(test)]
mod tests {
    use ::config as config_rs;

    use super::{AppConfig, ConsistencyLevel, ListPolicy};
    use crate::config::EnvConfig;

    fn vars(entries: &[(&str, &str)]) -> Option<config_rs::Map<String, String>> {
        Some(
            entries
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
        )
    }

    #[test]
    fn defaults_apply_when_no_variables_are_set() {
        let cfg = AppConfig::from_vars(vars(&[])).expect("defaults should load");

        assert_eq!(cfg.general.port, 8080);
        assert_eq!(cfg.database.url, "scylla://scylla:9042/todo");
        assert_eq!(cfg.database.consistency, ConsistencyLevel::Quorum);
        assert_eq!(cfg.listing.policy, ListPolicy::Cursor);
        assert_eq!(cfg.listing.default_page_size, 10);
    }

    #[test]
    fn nested_variables_override_defaults() {
        let cfg = AppConfig::from_vars(vars(&[
            ("APP_GENERAL__PORT", "9000"),
            ("APP_DATABASE__URL", "sqlite::memory:"),
            ("APP_DATABASE__CONSISTENCY", "local_quorum"),
            ("APP_LISTING__POLICY", "offset"),
            ("APP_LISTING__MAX_PAGE_SIZE", "50"),
        ]))
        .expect("overrides should load");

        assert_eq!(cfg.general.port, 9000);
        assert_eq!(cfg.database.url, "sqlite::memory:");
        assert_eq!(cfg.database.consistency, ConsistencyLevel::LocalQuorum);
        assert_eq!(cfg.listing.policy, ListPolicy::Offset);
        assert_eq!(cfg.listing.max_page_size, 50);
    }

    #[test]
    fn unknown_policy_is_rejected() {
        let err = AppConfig::from_vars(vars(&[("APP_LISTING__POLICY", "keyset")]))
            .expect_err("unknown policy should fail");

        assert!(err.to_string().contains("deserialize"));
    }

    #[test]
    fn invalid_page_sizes_fail_validation() {
        let err = AppConfig::from_vars(vars(&[
            ("APP_LISTING__DEFAULT_PAGE_SIZE", "200"),
            ("APP_LISTING__MAX_PAGE_SIZE", "100"),
        ]))
        .expect_err("default above max should fail");

        assert!(err.to_string().contains("listing.default_page_size"));
    }
}
