use ternary_cache::TernaryCacheError;
use thiserror::Error;

/// The common error type used by this crate
#[derive(Error, Debug)]
pub enum TernaryTreeError {
    /// The key (or build input) cannot be stored in a tree
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A mutation was attempted on a tree that was loaded from the cache
    #[error("Tree is read-only")]
    ReadOnly,

    /// A node the tree links to is missing from the cache, most likely because
    /// it was evicted
    #[error("Key not found in cache, tree should be rebuilt: {0}")]
    KeyNotFound(String),

    /// A node was found missing while answering a query; partial results
    /// cannot be trusted and the tree should be rebuilt
    #[error("Tree corrupt, rebuild required (missing {0})")]
    TreeCorrupt(String),

    /// A cached node did not match the link that pointed at it
    #[error("Tree did not match expected shape: {0}")]
    UnexpectedTreeShape(String),

    /// There was a problem when accessing the cache
    #[error("Cache error: {0}")]
    Cache(TernaryCacheError),
}

impl TernaryTreeError {
    /// Whether the error is an expected, locally recoverable rejection of the
    /// caller's request (bad input or a read-only tree) rather than a failure
    /// of the tree or its cache.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            TernaryTreeError::InvalidInput(_) | TernaryTreeError::ReadOnly
        )
    }

    /// Re-signal a missing node as structural damage.
    pub(crate) fn into_corrupt(self) -> Self {
        match self {
            TernaryTreeError::KeyNotFound(key) => TernaryTreeError::TreeCorrupt(key),
            other => other,
        }
    }
}

impl From<TernaryCacheError> for TernaryTreeError {
    fn from(value: TernaryCacheError) -> Self {
        TernaryTreeError::Cache(value)
    }
}
