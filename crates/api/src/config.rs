use axum::http::HeaderValue;
use voyage_store::config::tables;
use voyage_store::{StoreConfig, TableMap};

use crate::auth::jwt::JwtConfig;
use crate::auth::password::AdminCredentials;

/// Table ids of the hosted workspace, used when `*_TABLE_ID` is unset.
const DEFAULT_TABLE_IDS: &[(&str, &str, &str)] = &[
    (tables::ACCOUNTS, "ACCOUNTS_TABLE_ID", "mad8fvjhd0ba1bk"),
    (tables::LOCATIONS, "LOCATIONS_TABLE_ID", "mfz84cb0t9a84jt"),
    (tables::FESTIVALS, "FESTIVALS_TABLE_ID", "mktzgff8mpu2c32"),
    (tables::ITEMS, "ITEMS_TABLE_ID", "mj77cy6909ll2wc"),
    (tables::OBJECTS, "OBJECTS_TABLE_ID", "mj77cy6909ll2wc"),
    (tables::TRANSACTIONS, "TRANSACTIONS_TABLE_ID", "md6twc3losjv4j3"),
];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set in the environment")]
    Missing(&'static str),

    #[error("{name} must be a valid {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3001`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `ALLOWED_ORIGINS`.
    /// Each one is a valid header value.
    pub cors_origins: Vec<String>,
    /// Inbound request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub jwt: JwtConfig,
    /// The single operator account allowed to log in.
    pub admin: AdminCredentials,
    /// Connection settings for the record store.
    pub store: StoreConfig,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                | Default                        |
    /// |------------------------|--------------------------------|
    /// | `HOST`                 | `0.0.0.0`                      |
    /// | `PORT`                 | `3001`                         |
    /// | `ALLOWED_ORIGINS`      | `http://localhost:5173`        |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                           |
    /// | `JWT_SECRET`           | required                       |
    /// | `JWT_EXPIRY_HOURS`     | `8`                            |
    /// | `ADMIN_EMAIL`          | `admin@travel.com`             |
    /// | `ADMIN_PASSWORD_HASH`  | empty (login always fails)     |
    /// | `PASSWORD_SALT`        | `TravelApp_Secret_Salt_2025`   |
    /// | `NOCODB_BASE_URL`      | `https://app.nocodb.com`       |
    /// | `NOCODB_API_TOKEN`     | empty                          |
    /// | `<TABLE>_TABLE_ID`     | hosted workspace ids           |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let host = var("HOST", "0.0.0.0");
        let port = parse_var(&lookup, "PORT", 3001u16, "u16")?;

        let cors_origins: Vec<String> = var("ALLOWED_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if let Some(bad) = cors_origins.iter().find(|o| HeaderValue::from_str(o).is_err()) {
            return Err(ConfigError::Invalid {
                name: "ALLOWED_ORIGINS",
                expected: "list of origins",
                value: bad.clone(),
            });
        }

        let request_timeout_secs = parse_var(&lookup, "REQUEST_TIMEOUT_SECS", 30u64, "u64")?;

        let secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;
        let jwt = JwtConfig {
            secret,
            expiry_hours: parse_var(&lookup, "JWT_EXPIRY_HOURS", JwtConfig::DEFAULT_EXPIRY_HOURS, "i64")?,
        };

        let admin = AdminCredentials {
            email: var("ADMIN_EMAIL", "admin@travel.com"),
            password_hash: var("ADMIN_PASSWORD_HASH", ""),
            salt: var("PASSWORD_SALT", "TravelApp_Secret_Salt_2025"),
        };

        let table_map: TableMap = DEFAULT_TABLE_IDS
            .iter()
            .map(|&(name, env, default)| (name, var(env, default)))
            .collect();
        let store = StoreConfig::new(
            var("NOCODB_BASE_URL", "https://app.nocodb.com"),
            var("NOCODB_API_TOKEN", ""),
            table_map,
        );

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt,
            admin,
            store,
        })
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
    expected: &'static str,
) -> Result<T, ConfigError> {
    match lookup(name) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            expected,
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| env.get(name).cloned())
    }

    #[test]
    fn defaults_apply_with_only_the_secret() {
        let config = load(&[("JWT_SECRET", "s3cret")]).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3001);
        assert_eq!(config.cors_origins, vec!["http://localhost:5173"]);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.jwt.expiry_hours, 8);
        assert_eq!(config.admin.email, "admin@travel.com");
        assert_eq!(config.store.base_url, "https://app.nocodb.com");
        assert_eq!(
            config.store.tables.resolve(tables::LOCATIONS).unwrap(),
            "mfz84cb0t9a84jt"
        );
    }

    #[test]
    fn missing_secret_is_an_error() {
        assert_matches!(load(&[]), Err(ConfigError::Missing("JWT_SECRET")));
        assert_matches!(
            load(&[("JWT_SECRET", "")]),
            Err(ConfigError::Missing("JWT_SECRET"))
        );
    }

    #[test]
    fn invalid_port_is_an_error() {
        assert_matches!(
            load(&[("JWT_SECRET", "s"), ("PORT", "eighty")]),
            Err(ConfigError::Invalid { name: "PORT", .. })
        );
    }

    #[test]
    fn overrides_are_read() {
        let config = load(&[
            ("JWT_SECRET", "s"),
            ("ALLOWED_ORIGINS", "https://a.example, https://b.example,"),
            ("FESTIVALS_TABLE_ID", "custom"),
            ("JWT_EXPIRY_HOURS", "1"),
        ])
        .unwrap();
        assert_eq!(
            config.cors_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(config.store.tables.resolve(tables::FESTIVALS).unwrap(), "custom");
        assert_eq!(config.jwt.expiry_hours, 1);
    }
}
