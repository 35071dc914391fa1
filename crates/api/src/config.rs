use std::str::FromStr;

use axum::http::HeaderValue;

/// Failure to read a configuration value from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got '{value}'")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// SQLite connection URL; the file is created if missing.
    pub database_url: String,
    /// Allowed CORS origins.
    pub cors_origins: CorsOrigins,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Period of the background paste sweep; `0` disables it.
    pub paste_sweep_interval_secs: u64,
    /// Base used to build absolute paste URLs. When unset, the request's
    /// `Host` header is used instead.
    pub public_base_url: Option<String>,
    /// Mount `POST /crash`. Never on unless asked for.
    pub enable_crash_endpoint: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                          |
    /// |-----------------------------|----------------------------------|
    /// | `HOST`                      | `0.0.0.0`                        |
    /// | `PORT`                      | `5000`                           |
    /// | `DATABASE_URL`              | `sqlite://instance/database.db`  |
    /// | `CORS_ORIGINS`              | `*`                              |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                             |
    /// | `PASTE_SWEEP_INTERVAL_SECS` | `3600`                           |
    /// | `PUBLIC_BASE_URL`           | unset                            |
    /// | `ENABLE_CRASH_ENDPOINT`     | `false`                          |
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = parse_var("PORT", 5000u16, "a valid port number")?;

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://instance/database.db".into());

        let cors_origins = match std::env::var("CORS_ORIGINS") {
            Ok(raw) => CorsOrigins::parse(&raw)?,
            Err(_) => CorsOrigins::Any,
        };

        let request_timeout_secs =
            parse_var("REQUEST_TIMEOUT_SECS", 30u64, "a whole number of seconds")?;
        let paste_sweep_interval_secs =
            parse_var("PASTE_SWEEP_INTERVAL_SECS", 3600u64, "a whole number of seconds")?;

        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .ok()
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty());

        let enable_crash_endpoint = parse_var("ENABLE_CRASH_ENDPOINT", false, "true or false")?;

        Ok(Self {
            host,
            port,
            database_url,
            cors_origins,
            request_timeout_secs,
            paste_sweep_interval_secs,
            public_base_url,
            enable_crash_endpoint,
        })
    }
}

/// Origins accepted by the CORS layer.
#[derive(Debug, Clone, PartialEq)]
pub enum CorsOrigins {
    /// `*`: any origin, without credentials.
    Any,
    /// An explicit allow-list; credentials are allowed.
    List(Vec<HeaderValue>),
}

impl CorsOrigins {
    /// Parse a comma-separated `CORS_ORIGINS` value. An empty value or any
    /// `*` entry means [`CorsOrigins::Any`].
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let entries: Vec<&str> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if entries.is_empty() || entries.contains(&"*") {
            return Ok(Self::Any);
        }

        entries
            .into_iter()
            .map(|origin| {
                HeaderValue::from_str(origin).map_err(|_| ConfigError::Invalid {
                    var: "CORS_ORIGINS",
                    expected: "a comma-separated list of origins",
                    value: origin.to_string(),
                })
            })
            .collect::<Result<_, _>>()
            .map(Self::List)
    }
}

fn parse_var<T: FromStr>(
    var: &'static str,
    default: T,
    expected: &'static str,
) -> Result<T, ConfigError> {
    match std::env::var(var) {
        Ok(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            var,
            expected,
            value,
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn wildcard_or_blank_origins_allow_any() {
        assert_eq!(CorsOrigins::parse("*").unwrap(), CorsOrigins::Any);
        assert_eq!(CorsOrigins::parse(" , ").unwrap(), CorsOrigins::Any);
        assert_eq!(
            CorsOrigins::parse("http://a.example,*").unwrap(),
            CorsOrigins::Any
        );
    }

    #[test]
    fn explicit_origins_are_trimmed() {
        let origins = CorsOrigins::parse(" http://a.example , http://b.example:8080 ").unwrap();
        assert_eq!(
            origins,
            CorsOrigins::List(vec![
                HeaderValue::from_static("http://a.example"),
                HeaderValue::from_static("http://b.example:8080"),
            ])
        );
    }

    #[test]
    fn invalid_origin_is_a_config_error() {
        let result = CorsOrigins::parse("http://a.example,http://b\nexample");
        assert_matches!(
            result,
            Err(ConfigError::Invalid { var: "CORS_ORIGINS", value, .. }) if value == "http://b\nexample"
        );
    }
}
