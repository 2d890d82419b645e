use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

use crate::{CacheAdapter, Encoder, TernaryCacheError};

/// A universal envelope for all compatible combinations of [Encoder] and
/// [CacheAdapter] implementations.
///
/// The prepared [Cache] automatically implements [TypedCache].
#[derive(Clone, Debug)]
pub struct Cache<Encoder, Adapter>
where
    Encoder: crate::Encoder,
    Adapter: CacheAdapter,
{
    /// The [Encoder] used by the [Cache]
    pub encoder: Encoder,
    /// The [CacheAdapter] used by the [Cache]
    pub adapter: Adapter,
}

impl<Encoder, Adapter> Cache<Encoder, Adapter>
where
    Encoder: crate::Encoder,
    Adapter: CacheAdapter,
{
    /// Combine an [Encoder] and a [CacheAdapter]
    pub fn new(encoder: Encoder, adapter: Adapter) -> Self {
        Self { encoder, adapter }
    }
}

#[async_trait]
impl<Encoder, Adapter> crate::Encoder for Cache<Encoder, Adapter>
where
    Encoder: crate::Encoder + Send + Sync,
    Adapter: CacheAdapter + Send + Sync,
{
    type Error = Encoder::Error;

    async fn encode<T>(&self, block: &T) -> Result<Vec<u8>, Self::Error>
    where
        T: Serialize + Send + Sync + std::fmt::Debug,
    {
        self.encoder.encode(block).await
    }

    async fn decode<T>(&self, bytes: &[u8]) -> Result<T, Self::Error>
    where
        T: DeserializeOwned + Send + Sync,
    {
        self.encoder.decode(bytes).await
    }
}

#[async_trait]
impl<Encoder, Adapter> CacheAdapter for Cache<Encoder, Adapter>
where
    Encoder: crate::Encoder + Send + Sync,
    Adapter: CacheAdapter + Send + Sync,
{
    type Error = Adapter::Error;

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Self::Error> {
        self.adapter.get(key).await
    }

    async fn set(&mut self, key: String, value: Vec<u8>) -> Result<(), Self::Error> {
        self.adapter.set(key, value).await
    }

    async fn delete(&mut self, key: &str) -> Result<(), Self::Error> {
        self.adapter.delete(key).await
    }
}

/// A [TypedCache] stores and retrieves structured values - called blocks -
/// under caller-chosen string keys.
///
/// A blanket implementation is provided for all types that also implement
/// [Encoder] and [CacheAdapter].
#[async_trait]
pub trait TypedCache: Send + Sync + 'static {
    /// Retrieve and decode the block stored under `key`, if any
    async fn read<T>(&self, key: &str) -> Result<Option<T>, TernaryCacheError>
    where
        T: DeserializeOwned + Send + Sync;

    /// Encode and store a block under `key`, replacing any previous entry
    async fn write<T>(&mut self, key: String, block: &T) -> Result<(), TernaryCacheError>
    where
        T: Serialize + Send + Sync + std::fmt::Debug;

    /// Remove the entry stored under `key`; a missing entry is not an error
    async fn remove(&mut self, key: &str) -> Result<(), TernaryCacheError>;

    /// Whether an entry is currently stored under `key`
    async fn contains(&self, key: &str) -> Result<bool, TernaryCacheError>;
}

#[async_trait]
impl<EncoderError, AdapterError, U> TypedCache for U
where
    EncoderError: Into<TernaryCacheError>,
    AdapterError: Into<TernaryCacheError>,
    U: Encoder<Error = EncoderError>
        + CacheAdapter<Error = AdapterError>
        + Send
        + Sync
        + 'static,
{
    async fn read<T>(&self, key: &str) -> Result<Option<T>, TernaryCacheError>
    where
        T: DeserializeOwned + Send + Sync,
    {
        let Some(encoded_bytes) = self.get(key).await.map_err(|error| error.into())? else {
            tracing::trace!(key, "cache miss");
            return Ok(None);
        };

        tracing::trace!(key, bytes = encoded_bytes.len(), "cache hit");

        Ok(Some(
            self.decode(encoded_bytes.as_ref())
                .await
                .map_err(|error| error.into())?,
        ))
    }

    async fn write<T>(&mut self, key: String, block: &T) -> Result<(), TernaryCacheError>
    where
        T: Serialize + Send + Sync + std::fmt::Debug,
    {
        let encoded_bytes = self.encode(block).await.map_err(|error| error.into())?;

        tracing::trace!(key = %key, bytes = encoded_bytes.len(), "cache write");

        self.set(key, encoded_bytes)
            .await
            .map_err(|error| error.into())
    }

    async fn remove(&mut self, key: &str) -> Result<(), TernaryCacheError> {
        tracing::trace!(key, "cache delete");
        self.delete(key).await.map_err(|error| error.into())
    }

    async fn contains(&self, key: &str) -> Result<bool, TernaryCacheError> {
        Ok(self.get(key).await.map_err(|error| error.into())?.is_some())
    }
}
