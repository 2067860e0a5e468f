use std::time::Duration;

use reqwest::Url;

use crate::error::AppError;

const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;
const DEFAULT_FETCH_MAX_RETRIES: u32 = 2;
const DEFAULT_FEED_CACHE_TTL_SECS: u64 = 86_400;

/// Shell configuration loaded explicitly from environment variables.
///
/// Redis is optional; without it the shell has no fallback copy of the feed.
#[derive(Debug, Clone)]
pub struct Config {
    /// Published CSV export of the job sheet.
    pub feed_url: Url,
    /// Pass-through proxy; the feed URL is sent as its `url` query parameter.
    pub proxy_url: Option<Url>,
    /// Redis connection URL (e.g. "redis://127.0.0.1:6379"). `None` disables caching.
    pub redis_url: Option<String>,
    /// Quiet period after the last search keystroke before re-querying.
    pub search_debounce: Duration,
    pub fetch_timeout: Duration,
    pub fetch_max_retries: u32,
    pub fetch_initial_backoff: Duration,
    pub fetch_max_backoff: Duration,
    pub feed_cache_ttl_secs: u64,
}

impl Config {
    /// Required:
    /// - `JOBBOARD_FEED_URL`
    ///
    /// Optional:
    /// - `JOBBOARD_PROXY_URL`
    /// - `REDIS_URL`
    /// - `JOBBOARD_SEARCH_DEBOUNCE_MS` (default: 300)
    /// - `JOBBOARD_FETCH_TIMEOUT_SECS` (default: 30)
    /// - `JOBBOARD_FETCH_MAX_RETRIES` (default: 2)
    /// - `JOBBOARD_FEED_CACHE_TTL_SECS` (default: 86400)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let feed_url = lookup("JOBBOARD_FEED_URL").ok_or_else(|| {
            AppError::Config("JOBBOARD_FEED_URL environment variable is required".to_string())
        })?;
        let feed_url = parse_url("JOBBOARD_FEED_URL", &feed_url)?;

        let proxy_url = lookup("JOBBOARD_PROXY_URL")
            .filter(|s| !s.trim().is_empty())
            .map(|s| parse_url("JOBBOARD_PROXY_URL", &s))
            .transpose()?;

        let search_debounce = Duration::from_millis(parse_number(
            &lookup,
            "JOBBOARD_SEARCH_DEBOUNCE_MS",
            DEFAULT_SEARCH_DEBOUNCE_MS,
        )?);
        let fetch_timeout = Duration::from_secs(parse_number(
            &lookup,
            "JOBBOARD_FETCH_TIMEOUT_SECS",
            DEFAULT_FETCH_TIMEOUT_SECS,
        )?);
        let fetch_max_retries =
            parse_number(&lookup, "JOBBOARD_FETCH_MAX_RETRIES", DEFAULT_FETCH_MAX_RETRIES)?;
        let feed_cache_ttl_secs = parse_number(
            &lookup,
            "JOBBOARD_FEED_CACHE_TTL_SECS",
            DEFAULT_FEED_CACHE_TTL_SECS,
        )?;

        Ok(Self {
            feed_url,
            proxy_url,
            redis_url: lookup("REDIS_URL").filter(|s| !s.trim().is_empty()),
            search_debounce,
            fetch_timeout,
            fetch_max_retries,
            fetch_initial_backoff: Duration::from_millis(200),
            fetch_max_backoff: Duration::from_millis(5_000),
            feed_cache_ttl_secs,
        })
    }
}

fn parse_url(key: &str, value: &str) -> Result<Url, AppError> {
    Url::parse(value.trim()).map_err(|e| AppError::Config(format!("invalid {key}: {e}")))
}

fn parse_number<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, AppError>
where
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| AppError::Config(format!("invalid {key} {raw:?}: {e}"))),
    }
}
