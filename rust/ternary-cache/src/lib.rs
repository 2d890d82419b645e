#![warn(missing_docs)]

//! This crate contains a generalized API for persisting structured values in
//! an external key-value cache (memcached, redis, or an in-process map).
//!
//! In order to use it, first select or implement an [Encoder], and then select
//! or implement a [CacheAdapter]. When you have selected these things, you
//! can construct a [Cache]:
//!
//! ```rust
//! use ternary_cache::{Cache, CborEncoder, MemoryCacheAdapter};
//!
//! let cache = Cache {
//!     encoder: CborEncoder,
//!     adapter: MemoryCacheAdapter::default(),
//! };
//! ```
//!
//! The prepared `cache` will automatically implement [TypedCache] for
//! bounds-matching encoders and adapters.

mod adapter;
pub use adapter::*;

mod cache;
pub use cache::*;

mod encoder;
pub use encoder::*;

mod error;
pub use error::*;

#[cfg(any(test, feature = "helpers"))]
mod helpers;
#[cfg(any(test, feature = "helpers"))]
pub use helpers::*;
