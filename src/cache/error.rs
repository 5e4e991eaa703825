use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("document parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("upstream source unavailable: {0}")]
    UpstreamUnavailable(String),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
