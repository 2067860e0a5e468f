//! Feed transport: fetches the CSV export over HTTP, optionally through a
//! pass-through proxy, retrying transient failures with capped exponential backoff.

use std::time::Duration;

use reqwest::{StatusCode, Url};
use tracing::{info, warn};

use crate::cache::FeedCache;
use crate::config::Config;

const MAX_ERROR_BODY_CHARS: usize = 512;

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("feed returned error: status={status} body={body}")]
    Upstream { status: StatusCode, body: String },

    #[error("feed is empty")]
    Empty,
}

#[derive(Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    request_url: Url,
    feed_url: Url,
    timeout: Duration,
    max_retries: u32,
    initial_backoff: Duration,
    max_backoff: Duration,
}

impl FeedClient {
    pub fn new(config: &Config) -> Result<Self, FeedError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("jobboard/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            request_url: request_url(&config.feed_url, config.proxy_url.as_ref()),
            feed_url: config.feed_url.clone(),
            timeout: config.fetch_timeout,
            max_retries: config.fetch_max_retries,
            initial_backoff: config.fetch_initial_backoff,
            max_backoff: config.fetch_max_backoff,
        })
    }

    /// The feed's own URL, independent of any proxy. Used as the cache identity.
    pub fn feed_url(&self) -> &Url {
        &self.feed_url
    }

    pub async fn fetch(&self) -> Result<String, FeedError> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.fetch_once().await {
                Ok(text) => return Ok(text),
                Err(e) => {
                    if attempt > self.max_retries || !should_retry(&e) {
                        return Err(e);
                    }
                    let delay = backoff_delay(self.initial_backoff, self.max_backoff, attempt - 1);
                    warn!(
                        attempt,
                        delay_ms = delay.as_millis(),
                        error = %e,
                        "feed request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    async fn fetch_once(&self) -> Result<String, FeedError> {
        let resp = self
            .http
            .get(self.request_url.clone())
            .timeout(self.timeout)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let body: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
            return Err(FeedError::Upstream { status, body });
        }

        let text = resp.text().await?;
        if text.trim().is_empty() {
            return Err(FeedError::Empty);
        }
        Ok(text)
    }
}

/// Fetch the feed, refreshing the cached copy on success and falling back to it when
/// the fetch fails. The fetch error is returned only when no cached copy exists.
pub async fn load_feed(client: &FeedClient, cache: &FeedCache) -> Result<String, FeedError> {
    let url = client.feed_url().as_str();
    match client.fetch().await {
        Ok(text) => {
            info!(bytes = text.len(), "feed fetched");
            cache.store(url, &text).await;
            Ok(text)
        }
        Err(e) => match cache.load(url).await {
            Some(text) => {
                warn!(error = %e, bytes = text.len(), "feed fetch failed, using cached copy");
                Ok(text)
            }
            None => Err(e),
        },
    }
}

fn request_url(feed_url: &Url, proxy_url: Option<&Url>) -> Url {
    match proxy_url {
        Some(proxy) => {
            let mut url = proxy.clone();
            url.query_pairs_mut().append_pair("url", feed_url.as_str());
            url
        }
        None => feed_url.clone(),
    }
}

fn should_retry(err: &FeedError) -> bool {
    match err {
        FeedError::Request(e) => e.is_timeout() || e.is_connect() || e.is_request() || e.is_body(),
        FeedError::Upstream { status, .. } => {
            *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
        }
        FeedError::Empty => false,
    }
}

fn backoff_delay(initial: Duration, max: Duration, exponent: u32) -> Duration {
    let mult = 1u32.checked_shl(exponent).unwrap_or(u32::MAX);
    initial.saturating_mul(mult).min(max)
}
