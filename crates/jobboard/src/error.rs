use crate::feed::FeedError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("unable to load opportunities: {0}")]
    Feed(#[from] FeedError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("output encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}
