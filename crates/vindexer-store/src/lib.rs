//! This is the vindexer-store crate - keeps the derived entity tables

pub mod factory;
pub mod memory;
#[cfg(feature = "rocksdb")]
pub mod rocks;
pub mod traits;
pub mod tx;

pub use factory::open_store;
pub use memory::MemoryStore;
#[cfg(feature = "rocksdb")]
pub use rocks::RocksStore;
pub use traits::{EntityBatch, EntityStore, EntityStoreExt};
pub use tx::StoreTx;

use {
    anyhow::{Context, Result},
    serde::{de::DeserializeOwned, Serialize},
};

pub(crate) fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    bincode::serialize(value).context("Failed to encode entity")
}

pub(crate) fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    bincode::deserialize(bytes).context("Failed to decode entity")
}
