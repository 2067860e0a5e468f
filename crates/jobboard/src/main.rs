mod cache;
mod config;
mod debounce;
mod error;
mod feed;
mod session;

use chrono::Local;
use jobboard_core::JobBoard;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cache::FeedCache;
use config::Config;
use feed::FeedClient;
use session::Session;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the JSON line protocol
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting jobboard");

    let config = Config::from_env()?;
    info!(
        feed_url = %config.feed_url,
        proxy = config.proxy_url.is_some(),
        redis = config.redis_url.is_some(),
        "configuration loaded"
    );

    let cache = FeedCache::new(config.redis_url.as_deref(), config.feed_cache_ttl_secs);
    if cache.is_available().await {
        info!("redis connected");
    } else {
        info!("redis unavailable, running without feed cache");
    }

    let client = FeedClient::new(&config).map_err(error::AppError::from)?;
    let text = feed::load_feed(&client, &cache)
        .await
        .map_err(error::AppError::from)?;

    let board = JobBoard::from_csv(&text, Local::now().naive_local());
    info!(jobs = board.len(), "feed parsed");

    session::run(
        Session::new(board),
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        config.search_debounce,
        || Local::now().naive_local(),
    )
    .await?;

    info!("input closed, shutting down");
    Ok(())
}
