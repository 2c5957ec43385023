use {
    crate::traits::{EntityBatch, EntityStore},
    anyhow::{anyhow, Result},
    rocksdb::{
        BlockBasedOptions, Cache, ColumnFamilyDescriptor, DBCompressionType, IteratorMode,
        Options, WriteBatch, DB,
    },
    std::{path::PathBuf, sync::Arc},
    tracing::info,
    vindexer_common::types::EntityKind,
};

#[derive(Clone, Debug)]
pub struct RocksStoreConfig {
    pub path: PathBuf,
    pub max_open_files: i32,
    pub cache_capacity: usize,
}

/// RocksDB-backed entity store: one column family per entity kind.
#[derive(Clone)]
pub struct RocksStore {
    db: Arc<DB>,
}

impl RocksStore {
    pub fn open(config: RocksStoreConfig) -> Result<Self> {
        let path = config.path.clone();

        // Create directory if it doesn't exist
        if !path.exists() {
            std::fs::create_dir_all(&path)?;
        }

        // Configure database options
        let mut options = Options::default();
        options.create_if_missing(true);
        options.create_missing_column_families(true);
        options.set_max_open_files(config.max_open_files);
        options.set_compression_type(DBCompressionType::Lz4);
        options.set_bottommost_compression_type(DBCompressionType::Zstd);
        options.increase_parallelism(num_cpus::get() as i32);

        // Configure block-based table options
        let mut block_opts = BlockBasedOptions::default();
        let cache = Cache::new_lru_cache(config.cache_capacity);
        block_opts.set_block_cache(&cache);
        block_opts.set_pin_l0_filter_and_index_blocks_in_cache(true);
        block_opts.set_cache_index_and_filter_blocks(true);
        options.set_block_based_table_factory(&block_opts);

        let descriptors = EntityKind::ALL
            .iter()
            .map(|kind| ColumnFamilyDescriptor::new(kind.as_str(), options.clone()))
            .collect::<Vec<_>>();

        let db = DB::open_cf_descriptors(&options, &path, descriptors)?;
        info!("Opened entity store at {}", path.display());

        Ok(Self { db: Arc::new(db) })
    }

    fn cf(&self, kind: EntityKind) -> Result<&rocksdb::ColumnFamily> {
        self.db
            .cf_handle(kind.as_str())
            .ok_or_else(|| anyhow!("Column family '{}' not found", kind))
    }
}

impl EntityStore for RocksStore {
    fn get_raw(&self, kind: EntityKind, id: &str) -> Result<Option<Vec<u8>>> {
        let cf = self.cf(kind)?;
        Ok(self.db.get_cf(cf, id.as_bytes())?)
    }

    fn write_batch(&self, batch: EntityBatch) -> Result<()> {
        let mut write = WriteBatch::default();
        for ((kind, id), value) in &batch {
            write.put_cf(self.cf(*kind)?, id.as_bytes(), value);
        }
        self.db.write(write)?;
        Ok(())
    }

    fn count(&self, kind: EntityKind) -> Result<usize> {
        let cf = self.cf(kind)?;
        let mut count = 0;
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            item?;
            count += 1;
        }
        Ok(count)
    }

    fn close(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::EntityStoreExt;
    use alloy_primitives::address;
    use vindexer_common::types::Validator;

    #[test]
    fn test_rocks_roundtrip_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let config = RocksStoreConfig {
            path: dir.path().join("entities"),
            max_open_files: 64,
            cache_capacity: 1024 * 1024,
        };
        let validator = Validator::new(address!("0000000000000000000000000000000000000001"), 3, 30);

        {
            let store = RocksStore::open(config.clone()).unwrap();
            store.put(&validator).unwrap();
            store.close().unwrap();
        }

        let store = RocksStore::open(config).unwrap();
        assert_eq!(store.get::<Validator>(&validator.id).unwrap(), Some(validator));
        assert_eq!(store.count(EntityKind::Validator).unwrap(), 1);
    }
}
