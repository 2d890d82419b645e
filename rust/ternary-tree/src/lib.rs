#![warn(missing_docs)]

//! This crate provides a ternary search tree: a string-keyed map that supports
//! exact lookups and prefix search, and that can publish itself to an external
//! key-value cache one node per entry. A tree read back from the cache is
//! loaded lazily, so only the nodes a query actually touches are fetched.
//!
//! In order to use it, first construct a [`ternary_cache::Cache`] and then
//! initialize a [`Tree`] with it:
//!
//! ```rust
//! # tokio_test::block_on(async {
//! use ternary_cache::{Cache, CborEncoder, MemoryCacheAdapter};
//! use ternary_tree::{Tree, TreeOptions};
//!
//! let cache = Cache::new(CborEncoder, MemoryCacheAdapter::default());
//!
//! // Build and publish a tree
//! let mut tree = Tree::new(cache.clone(), TreeOptions::default().caching(true));
//! tree.build([("cat", 1), ("car", 2), ("cart", 3), ("dog", 4)])
//!     .await
//!     .unwrap();
//!
//! // Elsewhere, read it back; nodes are fetched as the search reaches them
//! let mut published = Tree::<i32, _>::get_cached_tree(cache)
//!     .await
//!     .unwrap()
//!     .unwrap();
//! let found = published.prefix_search("ca").await.unwrap().unwrap();
//!
//! assert_eq!(found.len(), 3);
//! assert!(published.is_read_only());
//! # });
//! ```

mod error;
pub use error::*;

mod key;
pub use key::*;

mod node;
pub use node::*;

mod options;
pub use options::*;

mod tree;
pub use tree::*;

mod search;

mod traverse;
pub use traverse::*;

mod persist;
