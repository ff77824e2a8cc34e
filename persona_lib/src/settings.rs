//! Runtime settings read from the environment.

use std::time::Duration;

use persona_api::Client;

use crate::directory::{RemoteDirectory, RetryConfig};
use crate::model::DEFAULT_PAGE_SIZE;

pub const DEFAULT_API_URL: &str = "https://localhost:7144";

/// Connection, retry and paging settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_url: String,
    pub timeout: Duration,
    pub insecure_tls: bool,
    pub retry: RetryConfig,
    pub page_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(30),
            insecure_tls: false,
            retry: RetryConfig::default(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Settings {
    /// Reads `PERSONAS_*` variables, falling back to defaults for anything
    /// missing or unparsable.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let retry = RetryConfig {
            max_retries: parse_or(&lookup, "PERSONAS_RETRY_MAX", defaults.retry.max_retries),
            base_delay: Duration::from_millis(parse_or(
                &lookup,
                "PERSONAS_RETRY_BASE_MS",
                defaults.retry.base_delay.as_millis() as u64,
            )),
            max_delay: Duration::from_millis(parse_or(
                &lookup,
                "PERSONAS_RETRY_MAX_MS",
                defaults.retry.max_delay.as_millis() as u64,
            )),
        };
        Self {
            api_url: lookup("PERSONAS_API_URL")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.api_url),
            timeout: Duration::from_secs(parse_or(
                &lookup,
                "PERSONAS_TIMEOUT_SECS",
                defaults.timeout.as_secs(),
            )),
            insecure_tls: lookup("PERSONAS_INSECURE_TLS")
                .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(defaults.insecure_tls),
            retry,
            page_size: parse_or(&lookup, "PERSONAS_PAGE_SIZE", defaults.page_size).max(1),
        }
    }

    /// Overrides the base URL when `url` is given.
    pub fn with_api_url(mut self, url: Option<&str>) -> Self {
        if let Some(url) = url {
            self.api_url = url.to_string();
        }
        self
    }

    pub fn client(&self) -> Client {
        Client::with_base_url(&self.api_url)
            .with_timeout(self.timeout)
            .with_insecure_tls(self.insecure_tls)
    }

    pub fn directory(&self) -> RemoteDirectory {
        RemoteDirectory::new(self.client(), self.retry)
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    match lookup(key) {
        Some(val) => val.trim().parse::<T>().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid value {:?} for {}", val, key);
            default
        }),
        None => default,
    }
}
