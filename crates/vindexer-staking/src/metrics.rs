use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

#[derive(Default)]
pub struct ProcessorMetrics {
    pub events_applied: AtomicU64,
    pub events_rejected: AtomicU64,
    pub blocks_applied: AtomicU64,
    pub inputs_skipped: AtomicU64,
    pub metadata_reverts: AtomicU64,
    pub entities_written: AtomicU64,
}

impl ProcessorMetrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn record_applied(&self, is_block: bool, written: usize) {
        if is_block {
            self.blocks_applied.fetch_add(1, Ordering::Relaxed);
        } else {
            self.events_applied.fetch_add(1, Ordering::Relaxed);
        }
        self.entities_written.fetch_add(written as u64, Ordering::Relaxed);
    }

    pub fn increment_rejected(&self) {
        self.events_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_skipped(&self) {
        self.inputs_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_metadata_reverts(&self) {
        self.metadata_reverts.fetch_add(1, Ordering::Relaxed);
    }
}

impl Debug for ProcessorMetrics {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ProcessorMetrics")
            .field("events_applied", &self.events_applied.load(Ordering::Relaxed))
            .field("events_rejected", &self.events_rejected.load(Ordering::Relaxed))
            .field("blocks_applied", &self.blocks_applied.load(Ordering::Relaxed))
            .field("inputs_skipped", &self.inputs_skipped.load(Ordering::Relaxed))
            .field("metadata_reverts", &self.metadata_reverts.load(Ordering::Relaxed))
            .field("entities_written", &self.entities_written.load(Ordering::Relaxed))
            .finish()
    }
}
