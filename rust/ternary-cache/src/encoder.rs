use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

use crate::TernaryCacheError;

mod cbor;
pub use cbor::*;

/// An [Encoder] converts cache entries to and from bytes
#[async_trait]
pub trait Encoder: Clone {
    /// The error type produced by this [Encoder]
    type Error: Into<TernaryCacheError>;

    /// Encode a serializable item into its bytes.
    async fn encode<T>(&self, block: &T) -> Result<Vec<u8>, Self::Error>
    where
        T: Serialize + Send + Sync + std::fmt::Debug;

    /// Decode bytes into some deserializable type.
    async fn decode<T>(&self, bytes: &[u8]) -> Result<T, Self::Error>
    where
        T: DeserializeOwned + Send + Sync;
}
