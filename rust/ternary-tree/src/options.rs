use serde::{Deserialize, Serialize};

/// Construction-time settings of a [`Tree`](crate::Tree).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeOptions {
    /// Persist nodes to the cache when the tree is built.
    pub caching: bool,
    /// Reject every mutation. Trees loaded from the cache are always
    /// read-only.
    pub read_only: bool,
}

impl TreeOptions {
    /// Set whether the tree persists its nodes to the cache.
    pub fn caching(mut self, caching: bool) -> Self {
        self.caching = caching;
        self
    }

    /// Set whether the tree rejects mutations.
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }
}
