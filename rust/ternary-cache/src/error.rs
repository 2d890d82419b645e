use thiserror::Error;

/// The common error type used by this crate
#[derive(Error, Debug)]
pub enum TernaryCacheError {
    /// An error that occurs while encoding a cache entry
    #[error("Failed to encode a cache entry: {0}")]
    EncodeFailed(String),

    /// An error that occurs while decoding a cache entry
    #[error("Failed to decode a cache entry: {0}")]
    DecodeFailed(String),

    /// An error that occurs when working with a cache adapter
    #[error("Cache adapter error: {0}")]
    CacheAdapter(String),
}
