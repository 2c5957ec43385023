use {
    crate::{memory::MemoryStore, traits::EntityStore},
    anyhow::Result,
    std::sync::Arc,
    tracing::info,
    vindexer_common::config::{IndexerConfig, StoreBackend},
};

/// Open the store selected by the configuration
pub fn open_store(config: &IndexerConfig) -> Result<Arc<dyn EntityStore>> {
    match config.store.backend {
        StoreBackend::Memory => {
            info!("Using in-memory entity store; nothing is persisted");
            Ok(Arc::new(MemoryStore::new()))
        }
        #[cfg(feature = "rocksdb")]
        StoreBackend::RocksDb => {
            let store = crate::rocks::RocksStore::open(crate::rocks::RocksStoreConfig {
                path: config.store_path(),
                max_open_files: config.store.max_open_files,
                cache_capacity: config.store.cache_capacity,
            })?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "rocksdb"))]
        StoreBackend::RocksDb => Err(anyhow::anyhow!(
            "RocksDB backend requested but vindexer-store was built without the `rocksdb` feature"
        )),
    }
}
