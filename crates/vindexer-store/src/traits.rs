use {
    crate::{decode, encode},
    anyhow::Result,
    std::collections::BTreeMap,
    vindexer_common::types::{Entity, EntityKind},
};

/// Writes applied together: either all land or none do.
pub type EntityBatch = BTreeMap<(EntityKind, String), Vec<u8>>;

/// A key-value table per entity kind.
/// Point lookups and atomic batch upserts are the only primitives.
pub trait EntityStore: Send + Sync + 'static {
    /// Get the encoded entity stored under `id`
    fn get_raw(&self, kind: EntityKind, id: &str) -> Result<Option<Vec<u8>>>;

    /// Apply every write of the batch atomically
    fn write_batch(&self, batch: EntityBatch) -> Result<()>;

    /// Number of entities of a kind
    fn count(&self, kind: EntityKind) -> Result<usize>;

    /// Close the storage (flush any pending writes)
    fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// Typed access on top of [`EntityStore`].
pub trait EntityStoreExt {
    fn get<E: Entity>(&self, id: &str) -> Result<Option<E>>;

    fn put<E: Entity>(&self, entity: &E) -> Result<()>;
}

impl<S: EntityStore + ?Sized> EntityStoreExt for S {
    fn get<E: Entity>(&self, id: &str) -> Result<Option<E>> {
        match self.get_raw(E::KIND, id)? {
            Some(bytes) => Ok(Some(decode(&bytes)?)),
            None => Ok(None),
        }
    }

    fn put<E: Entity>(&self, entity: &E) -> Result<()> {
        let mut batch = EntityBatch::new();
        batch.insert((E::KIND, entity.id().to_string()), encode(entity)?);
        self.write_batch(batch)
    }
}
