//! Per-event write overlay
//!
//! Reads see the overlay first and fall through to the store. Nothing reaches
//! the store until [`StoreTx::commit`], which hands every write over as one
//! batch, so a dropped transaction leaves no trace.

use {
    crate::{
        decode, encode,
        traits::{EntityBatch, EntityStore},
    },
    anyhow::Result,
    vindexer_common::types::{Entity, EntityKind},
};

pub struct StoreTx<'a> {
    store: &'a dyn EntityStore,
    pending: EntityBatch,
}

impl<'a> StoreTx<'a> {
    pub fn new(store: &'a dyn EntityStore) -> Self {
        Self {
            store,
            pending: EntityBatch::new(),
        }
    }

    pub fn get<E: Entity>(&self, id: &str) -> Result<Option<E>> {
        if let Some(bytes) = self.pending.get(&(E::KIND, id.to_string())) {
            return Ok(Some(decode(bytes)?));
        }
        match self.store.get_raw(E::KIND, id)? {
            Some(bytes) => Ok(Some(decode(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn put<E: Entity>(&mut self, entity: &E) -> Result<()> {
        self.pending
            .insert((E::KIND, entity.id().to_string()), encode(entity)?);
        Ok(())
    }

    /// Whether `id` was written earlier in this transaction
    pub fn is_pending(&self, kind: EntityKind, id: &str) -> bool {
        self.pending.contains_key(&(kind, id.to_string()))
    }

    /// Whether `id` already exists in the underlying store
    pub fn is_committed(&self, kind: EntityKind, id: &str) -> Result<bool> {
        Ok(self.store.get_raw(kind, id)?.is_some())
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Flush all writes as one batch. Returns the number of entities written.
    pub fn commit(self) -> Result<usize> {
        let written = self.pending.len();
        if written > 0 {
            self.store.write_batch(self.pending)?;
        }
        Ok(written)
    }
}
