use crate::{Cache, CborEncoder, MeasuredCacheAdapter, MemoryCacheAdapter};

/// A CBOR-encoded [`Cache`] over a fresh [`MemoryCacheAdapter`], for use in
/// tests. The returned adapter shares its entries with the cache.
pub fn make_memory_cache() -> (Cache<CborEncoder, MemoryCacheAdapter>, MemoryCacheAdapter) {
    let adapter = MemoryCacheAdapter::default();
    (Cache::new(CborEncoder, adapter.clone()), adapter)
}

/// Like [`make_memory_cache`], but traffic to the adapter is measured.
pub fn make_measured_cache() -> (
    Cache<CborEncoder, MeasuredCacheAdapter<MemoryCacheAdapter>>,
    MeasuredCacheAdapter<MemoryCacheAdapter>,
) {
    let adapter = MeasuredCacheAdapter::new(MemoryCacheAdapter::default());
    (Cache::new(CborEncoder, adapter.clone()), adapter)
}
