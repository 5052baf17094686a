use std::collections::BTreeMap;
use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use log::debug;
use reqwest::Url;

/// Base address used when `API_BASE` is not set.
pub const DEFAULT_API_BASE: &str = "http://localhost:3000/api";

/// Environment variable holding the base address.
pub const API_BASE_ENV: &str = "API_BASE";

/// Per-request timeout applied unless a call overrides it.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Settings fixed when the client is constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Prefix for every relative request path.
    pub base_url: String,
    pub timeout: Duration,
    /// Send and keep cookies on every request.
    pub with_credentials: bool,
    pub default_headers: BTreeMap<String, String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut default_headers = BTreeMap::new();
        default_headers.insert("Content-Type".to_string(), "application/json".to_string());

        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            with_credentials: true,
            default_headers,
        }
    }

    /// Reads the base address from `API_BASE`, falling back to the default.
    pub fn from_env() -> Self {
        match env::var(API_BASE_ENV) {
            Ok(base) if !base.trim().is_empty() => {
                debug!("Using {} from environment: {}", API_BASE_ENV, base);
                Self::new(base.trim())
            }
            _ => Self::default(),
        }
    }

    /// Checks that the base address is an absolute `http` or `https` URL.
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.base_url)
            .with_context(|| format!("Invalid API base URL {:?}", self.base_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!(
                "Invalid API base URL {:?}: expected an http:// or https:// address",
                self.base_url
            );
        }
        Ok(())
    }

    /// Resolves a request path against the base address.
    ///
    /// Absolute `http(s)://` paths pass through untouched.
    pub fn resolve_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            base.to_string()
        } else {
            format!("{}/{}", base, path)
        }
    }
}
