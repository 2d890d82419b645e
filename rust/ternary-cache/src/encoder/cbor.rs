use crate::TernaryCacheError;

use super::Encoder;
use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

/// A basic [`Encoder`] implementation that encodes data as IPLD-compatible CBOR
#[derive(Clone, Debug, Default)]
pub struct CborEncoder;

#[async_trait]
impl Encoder for CborEncoder {
    type Error = TernaryCacheError;

    async fn encode<T>(&self, block: &T) -> Result<Vec<u8>, Self::Error>
    where
        T: Serialize + Send + Sync + std::fmt::Debug,
    {
        serde_ipld_dagcbor::to_vec(block)
            .map_err(|error| TernaryCacheError::EncodeFailed(format!("{error}")))
    }

    async fn decode<T>(&self, bytes: &[u8]) -> Result<T, Self::Error>
    where
        T: DeserializeOwned + Send + Sync,
    {
        serde_ipld_dagcbor::from_slice::<T>(bytes)
            .map_err(|error| TernaryCacheError::DecodeFailed(format!("{error}")))
    }
}
