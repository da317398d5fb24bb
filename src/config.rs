// Server configuration from POTLUCK_* environment variables

use crate::entities::CategoryRegistry;
use crate::store::DEFAULT_LOCK_TIMEOUT;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_DATA_FILE: &str = "potluck_data.csv";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
pub const DEFAULT_BIND: &str = "0.0.0.0:8000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name}: expected {expected}, got {value:?}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub data_file: PathBuf,
    pub admin_password: String,
    /// True when no password was configured and the built-in one is in use
    pub default_password: bool,
    pub bind: SocketAddr,
    pub categories: CategoryRegistry,
    pub lock_timeout: Duration,
    pub log_json: bool,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; blank values count as unset, except
    /// for the admin password, which must not be blank when set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let data_file = get("POTLUCK_DATA_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));

        // Unset falls back to the default; set-but-blank is a mistake, not a request for it
        let (admin_password, default_password) = match lookup("POTLUCK_ADMIN_PASSWORD") {
            Some(password) if password.trim().is_empty() => {
                return Err(ConfigError::Invalid {
                    name: "POTLUCK_ADMIN_PASSWORD",
                    expected: "non-empty secret",
                    value: password,
                })
            }
            Some(password) => (password, false),
            None => (DEFAULT_ADMIN_PASSWORD.to_string(), true),
        };

        let bind_raw = get("POTLUCK_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind: SocketAddr = bind_raw.trim().parse().map_err(|_| ConfigError::Invalid {
            name: "POTLUCK_BIND",
            expected: "socket address",
            value: bind_raw.clone(),
        })?;

        let categories = categories_from(get("POTLUCK_CATEGORIES").as_deref());

        let lock_timeout = match get("POTLUCK_LOCK_TIMEOUT_MS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| ConfigError::Invalid {
                    name: "POTLUCK_LOCK_TIMEOUT_MS",
                    expected: "milliseconds",
                    value: raw,
                })?,
            None => DEFAULT_LOCK_TIMEOUT,
        };

        let log_json = match get("POTLUCK_LOG_JSON") {
            Some(raw) => parse_bool(&raw).ok_or(ConfigError::Invalid {
                name: "POTLUCK_LOG_JSON",
                expected: "boolean",
                value: raw,
            })?,
            None => false,
        };

        Ok(ServerConfig {
            data_file,
            admin_password,
            default_password,
            bind,
            categories,
            lock_timeout,
            log_json,
        })
    }
}

/// Comma-separated labels, or the default set when unset or empty.
pub fn categories_from(raw: Option<&str>) -> CategoryRegistry {
    let registry = raw
        .map(|raw| CategoryRegistry::new(raw.split(',')))
        .unwrap_or_default();
    if registry.is_empty() {
        CategoryRegistry::with_defaults()
    } else {
        registry
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim() {
        "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
        "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[]).unwrap();

        assert_eq!(cfg.data_file, PathBuf::from("potluck_data.csv"));
        assert_eq!(cfg.admin_password, "admin123");
        assert!(cfg.default_password);
        assert_eq!(cfg.bind.port(), 8000);
        assert_eq!(cfg.categories, CategoryRegistry::with_defaults());
        assert_eq!(cfg.lock_timeout, Duration::from_secs(5));
        assert!(!cfg.log_json);
    }

    #[test]
    fn test_overrides() {
        let cfg = config(&[
            ("POTLUCK_DATA_FILE", "/srv/potluck/entries.csv"),
            ("POTLUCK_ADMIN_PASSWORD", " s3cret "),
            ("POTLUCK_BIND", "127.0.0.1:9000"),
            ("POTLUCK_CATEGORIES", "Soup, Salad ,Dessert"),
            ("POTLUCK_LOCK_TIMEOUT_MS", "250"),
            ("POTLUCK_LOG_JSON", "yes"),
        ])
        .unwrap();

        assert_eq!(cfg.data_file, PathBuf::from("/srv/potluck/entries.csv"));
        // Passwords are taken verbatim
        assert_eq!(cfg.admin_password, " s3cret ");
        assert!(!cfg.default_password);
        assert_eq!(cfg.bind.to_string(), "127.0.0.1:9000");
        assert_eq!(cfg.categories.labels(), &["Soup", "Salad", "Dessert"]);
        assert_eq!(cfg.lock_timeout, Duration::from_millis(250));
        assert!(cfg.log_json);
    }

    #[test]
    fn test_invalid_values_are_reported() {
        assert!(matches!(
            config(&[("POTLUCK_BIND", "nowhere")]),
            Err(ConfigError::Invalid { name: "POTLUCK_BIND", .. })
        ));
        assert!(matches!(
            config(&[("POTLUCK_LOCK_TIMEOUT_MS", "-5")]),
            Err(ConfigError::Invalid { name: "POTLUCK_LOCK_TIMEOUT_MS", .. })
        ));
        assert!(matches!(
            config(&[("POTLUCK_LOG_JSON", "maybe")]),
            Err(ConfigError::Invalid { name: "POTLUCK_LOG_JSON", .. })
        ));
    }

    #[test]
    fn test_blank_admin_password_is_rejected() {
        for blank in ["", "   "] {
            assert!(matches!(
                config(&[("POTLUCK_ADMIN_PASSWORD", blank)]),
                Err(ConfigError::Invalid { name: "POTLUCK_ADMIN_PASSWORD", .. })
            ));
        }
    }

    #[test]
    fn test_blank_category_list_falls_back_to_defaults() {
        assert_eq!(categories_from(Some(" , ,")), CategoryRegistry::with_defaults());
        assert_eq!(categories_from(None), CategoryRegistry::with_defaults());
    }
}
