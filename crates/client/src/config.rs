use catalog_core::paging::{validate_page_size, DEFAULT_PAGE_SIZE};

use crate::error::ConfigError;

/// Client configuration loaded from environment variables.
///
/// All fields have defaults suitable for a local backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the collection service, without a trailing slash.
    pub api_url: String,
    /// Per-request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Initial page size of the product list (default: `10`).
    pub page_size: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:3000/api".to_string(),
            request_timeout_secs: 30,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                        | Default                     |
    /// |--------------------------------|-----------------------------|
    /// | `CATALOG_API_URL`              | `http://localhost:3000/api` |
    /// | `CATALOG_REQUEST_TIMEOUT_SECS` | `30`                        |
    /// | `CATALOG_PAGE_SIZE`            | `10`                        |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_url = lookup("CATALOG_API_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or(defaults.api_url);

        let request_timeout_secs = match lookup("CATALOG_REQUEST_TIMEOUT_SECS") {
            Some(raw) => parse_positive(&raw, "CATALOG_REQUEST_TIMEOUT_SECS")?,
            None => defaults.request_timeout_secs,
        };

        let page_size = match lookup("CATALOG_PAGE_SIZE") {
            Some(raw) => {
                let size = parse_positive(&raw, "CATALOG_PAGE_SIZE")?;
                u32::try_from(size).map_err(|_| ConfigError::Invalid {
                    var: "CATALOG_PAGE_SIZE",
                    expected: "a valid page size",
                    value: raw.clone(),
                })?
            }
            None => defaults.page_size,
        };
        validate_page_size(page_size)?;

        Ok(Self {
            api_url,
            request_timeout_secs,
            page_size,
        })
    }
}

fn parse_positive(raw: &str, var: &'static str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|v| *v > 0)
        .ok_or_else(|| ConfigError::Invalid {
            var,
            expected: "a positive integer",
            value: raw.to_string(),
        })
}
