//! Server configuration, read from environment variables.

use std::net::SocketAddr;
use std::time::Duration;

/// Default upstream endpoint for facility status.
pub const DEFAULT_SOURCE_URL: &str =
    "https://accessibility-cloud.freetls.fastly.net/equipment-infos.json";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Errors from reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Runtime configuration for the server and its upstream poller.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP server listens on.
    pub bind_addr: SocketAddr,

    /// Upstream equipment status endpoint.
    pub source_url: String,

    /// accessibility.cloud app token. Empty means unauthenticated.
    pub app_token: String,

    /// Delay between upstream polls.
    pub poll_interval: Duration,

    /// Upstream request timeout.
    pub fetch_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            source_url: DEFAULT_SOURCE_URL.to_string(),
            app_token: String::new(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        }
    }
}

impl ServerConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup. Unset or empty values take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                key: "BIND_ADDR",
                message: e.to_string(),
            })?;

        let poll_interval = parse_secs(get("POLL_INTERVAL_SECS"), "POLL_INTERVAL_SECS")?
            .unwrap_or(DEFAULT_POLL_INTERVAL_SECS);
        if poll_interval == 0 {
            return Err(ConfigError::Invalid {
                key: "POLL_INTERVAL_SECS",
                message: "must be greater than zero".to_string(),
            });
        }

        let fetch_timeout = parse_secs(get("FETCH_TIMEOUT_SECS"), "FETCH_TIMEOUT_SECS")?
            .unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS);

        Ok(Self {
            bind_addr,
            source_url: get("ACCESSIBILITY_CLOUD_URL")
                .unwrap_or_else(|| DEFAULT_SOURCE_URL.to_string()),
            app_token: get("ACCESSIBILITY_CLOUD_TOKEN").unwrap_or_default(),
            poll_interval: Duration::from_secs(poll_interval),
            fetch_timeout: Duration::from_secs(fetch_timeout),
        })
    }

    /// Set the listen address.
    pub fn with_bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Set a custom upstream URL (for testing).
    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = url.into();
        self
    }

    /// Set the poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

fn parse_secs(value: Option<String>, key: &'static str) -> Result<Option<u64>, ConfigError> {
    value
        .map(|v| {
            v.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                key,
                message: format!("{v:?}: {e}"),
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_addr, SocketAddr::from(([127, 0, 0, 1], 3000)));
        assert_eq!(config.source_url, DEFAULT_SOURCE_URL);
        assert!(config.app_token.is_empty());
        assert_eq!(config.poll_interval, Duration::from_secs(60));
        assert_eq!(config.fetch_timeout, Duration::from_secs(30));
    }

    #[test]
    fn reads_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("BIND_ADDR", "0.0.0.0:8080"),
            ("ACCESSIBILITY_CLOUD_TOKEN", "secret"),
            ("POLL_INTERVAL_SECS", "15"),
            ("FETCH_TIMEOUT_SECS", " 5 "),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr, SocketAddr::from(([0, 0, 0, 0], 8080)));
        assert_eq!(config.app_token, "secret");
        assert_eq!(config.poll_interval, Duration::from_secs(15));
        assert_eq!(config.fetch_timeout, Duration::from_secs(5));
    }

    #[test]
    fn rejects_bad_values() {
        let err = ServerConfig::from_lookup(lookup(&[("POLL_INTERVAL_SECS", "soon")])).unwrap_err();
        assert!(err.to_string().starts_with("invalid POLL_INTERVAL_SECS"));

        let err = ServerConfig::from_lookup(lookup(&[("POLL_INTERVAL_SECS", "0")])).unwrap_err();
        assert!(err.to_string().contains("greater than zero"));

        assert!(ServerConfig::from_lookup(lookup(&[("BIND_ADDR", "nowhere")])).is_err());
    }

    #[test]
    fn empty_values_take_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[("BIND_ADDR", "")])).unwrap();
        assert_eq!(config.bind_addr.port(), 3000);
    }
}
