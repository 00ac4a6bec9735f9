use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::errors::ConfigError;
use super::tls::TlsOptions;

/// Upper bound on the number of DoH endpoints in one pool.
pub const MAX_UPSTREAMS: usize = 15;

/// Upstream pool: the DoH endpoints and how queries are spread over them.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// Endpoint URLs. Entries without a scheme are treated as `https://`.
    pub urls: Vec<String>,

    #[serde(default)]
    pub policy: UpstreamPolicy,

    /// Attempts per query before giving up. Defaults to the pool size and is
    /// clamped to it.
    #[serde(default)]
    pub max_fails: Option<usize>,

    /// Timeout of a single attempt, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default)]
    pub tls: Option<TlsOptions>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            urls: vec![
                "https://cloudflare-dns.com/dns-query".to_string(),
                "https://dns.google/dns-query".to_string(),
            ],
            policy: UpstreamPolicy::default(),
            max_fails: None,
            timeout_ms: default_timeout_ms(),
            tls: None,
        }
    }
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Endpoint URLs with the `https://` scheme applied where it was omitted.
    pub fn endpoint_urls(&self) -> Vec<String> {
        self.urls.iter().map(|u| normalize_url(u)).collect()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.urls.is_empty() {
            return Err(ConfigError::Validation(
                "No upstream URLs configured".to_string(),
            ));
        }
        if self.urls.len() > MAX_UPSTREAMS {
            return Err(ConfigError::Validation(format!(
                "More than {} upstreams configured: {}",
                MAX_UPSTREAMS,
                self.urls.len()
            )));
        }

        for endpoint in self.endpoint_urls() {
            let parsed = url::Url::parse(&endpoint).map_err(|e| {
                ConfigError::Validation(format!("Invalid upstream URL '{}': {}", endpoint, e))
            })?;
            if !matches!(parsed.scheme(), "https" | "http") || !parsed.has_host() {
                return Err(ConfigError::Validation(format!(
                    "Upstream URL '{}' must be an absolute http(s) URL",
                    endpoint
                )));
            }
        }

        if self.max_fails == Some(0) {
            return Err(ConfigError::Validation(
                "max_fails must be at least 1".to_string(),
            ));
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "timeout_ms must be greater than 0".to_string(),
            ));
        }

        if let Some(tls) = &self.tls {
            tls.validate()?;
        }
        Ok(())
    }
}

/// Order in which upstreams are attempted for one query.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum UpstreamPolicy {
    #[default]
    Random,

    RoundRobin,

    Sequential,
}

impl UpstreamPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::RoundRobin => "round_robin",
            Self::Sequential => "sequential",
        }
    }
}

impl std::str::FromStr for UpstreamPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random" => Ok(Self::Random),
            "round_robin" => Ok(Self::RoundRobin),
            "sequential" => Ok(Self::Sequential),
            other => Err(ConfigError::Validation(format!(
                "Unknown policy '{}'",
                other
            ))),
        }
    }
}

fn normalize_url(raw: &str) -> String {
    if raw.starts_with("https://") || raw.starts_with("http://") {
        raw.to_string()
    } else {
        format!("https://{}", raw)
    }
}

fn default_timeout_ms() -> u64 {
    2000
}
