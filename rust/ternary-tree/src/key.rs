use std::fmt::Display;

use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// The cache key under which the root of a freshly built tree is stored.
pub const ROOT_NODE_KEY: &str = "TernaryNode|id|0";

const NODE_KEY_PREFIX: &str = "TernaryNode|id|";

/// The identity of a [`Node`](crate::Node), assigned at creation in
/// insertion order. It doubles as the suffix of the node's cache key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u64);

impl NodeId {
    /// The id given to the first node created in an empty tree.
    pub const ROOT: NodeId = NodeId(0);

    /// Wrap a raw id.
    pub fn new(id: u64) -> Self {
        NodeId(id)
    }

    /// The raw id.
    pub fn get(&self) -> u64 {
        self.0
    }

    /// The cache key that this node is stored under.
    pub fn key(&self) -> String {
        node_key(*self)
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for NodeId {
    fn from(value: u64) -> Self {
        NodeId(value)
    }
}

/// Formats the cache key for a node, e.g. `TernaryNode|id|42`.
pub fn node_key(id: NodeId) -> String {
    format!("{NODE_KEY_PREFIX}{id}")
}

/// A value that may be stored within a [Tree](crate::Tree)
pub trait ValueType:
    std::fmt::Debug + Clone + Send + Sync + Serialize + DeserializeOwned + 'static
{
}

impl<T> ValueType for T where
    T: std::fmt::Debug + Clone + Send + Sync + Serialize + DeserializeOwned + 'static
{
}
