//! In-memory entity store, used for tests and dry runs.

use {
    crate::traits::{EntityBatch, EntityStore},
    anyhow::{anyhow, Result},
    std::{
        collections::{BTreeMap, HashMap},
        sync::RwLock,
    },
    vindexer_common::types::EntityKind,
};

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<EntityKind, BTreeMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EntityStore for MemoryStore {
    fn get_raw(&self, kind: EntityKind, id: &str) -> Result<Option<Vec<u8>>> {
        let tables = self.tables.read().map_err(|e| anyhow!("Lock error: {}", e))?;
        Ok(tables.get(&kind).and_then(|table| table.get(id).cloned()))
    }

    fn write_batch(&self, batch: EntityBatch) -> Result<()> {
        let mut tables = self.tables.write().map_err(|e| anyhow!("Lock error: {}", e))?;
        for ((kind, id), value) in batch {
            tables.entry(kind).or_default().insert(id, value);
        }
        Ok(())
    }

    fn count(&self, kind: EntityKind) -> Result<usize> {
        let tables = self.tables.read().map_err(|e| anyhow!("Lock error: {}", e))?;
        Ok(tables.get(&kind).map_or(0, BTreeMap::len))
    }
}
