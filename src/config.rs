use std::{env, time::Duration};
use tracing::warn;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000/api";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base of the REST API, e.g. `http://host:5000/api`.
    pub base_url: String,
    pub request_timeout: Duration,
    /// How long a transient notification stays visible.
    pub notification_ttl: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            request_timeout: DEFAULT_TIMEOUT,
            notification_ttl: DEFAULT_NOTIFICATION_TTL,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = env::var("SHOPPING_LIST_API_URL") {
            if !url.trim().is_empty() {
                config.base_url = url.trim().to_string();
            }
        }
        if let Some(secs) = read_u64("SHOPPING_LIST_TIMEOUT_SECS") {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(millis) = read_u64("SHOPPING_LIST_NOTIFY_MS") {
            config.notification_ttl = Duration::from_millis(millis);
        }

        config
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_notification_ttl(mut self, ttl: Duration) -> Self {
        self.notification_ttl = ttl;
        self
    }
}

fn read_u64(key: &str) -> Option<u64> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse::<u64>() {
        Ok(value) if value > 0 => Some(value),
        _ => {
            warn!("ignoring invalid {key}={raw:?}, using default");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let config = ClientConfig::default()
            .with_base_url("http://localhost:8080/api")
            .with_request_timeout(Duration::from_secs(5))
            .with_notification_ttl(Duration::from_millis(500));
        assert_eq!(config.base_url, "http://localhost:8080/api");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.notification_ttl, Duration::from_millis(500));
    }

    #[test]
    fn defaults_point_at_local_backend() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_API_URL);
        assert_eq!(config.notification_ttl, Duration::from_secs(3));
    }
}
