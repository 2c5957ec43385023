//! Event processor
//!
//! Applies one input at a time. Every write an input causes, including the
//! cursor advance, is committed as a single batch; a rejected input commits
//! nothing.

use {
    crate::{
        context::HandlerContext,
        handlers::{self, blocks},
        metadata::MetadataFetcher,
        metrics::ProcessorMetrics,
        Result,
    },
    std::sync::Arc,
    tracing::{debug, error},
    vindexer_common::{
        types::{BlockHeader, IndexerCursor, IndexerInput, LedgerEvent, SINGLETON_ID},
        utils::format_timestamp,
    },
    vindexer_store::{EntityStore, EntityStoreExt},
};

pub struct EventProcessor {
    store: Arc<dyn EntityStore>,
    fetcher: Arc<dyn MetadataFetcher>,
    metrics: Arc<ProcessorMetrics>,
}

impl EventProcessor {
    pub fn new(
        store: Arc<dyn EntityStore>,
        fetcher: Arc<dyn MetadataFetcher>,
        metrics: Arc<ProcessorMetrics>,
    ) -> Self {
        Self {
            store,
            fetcher,
            metrics,
        }
    }

    pub fn store(&self) -> &Arc<dyn EntityStore> {
        &self.store
    }

    pub fn metrics(&self) -> &Arc<ProcessorMetrics> {
        &self.metrics
    }

    /// Last committed position, if anything has been applied
    pub fn cursor(&self) -> Result<Option<IndexerCursor>> {
        Ok(self.store.get(SINGLETON_ID)?)
    }

    pub fn apply(&self, input: &IndexerInput) -> Result<usize> {
        let result = match input {
            IndexerInput::Event(event) => self.apply_event(event),
            IndexerInput::Block(header) => self.apply_block(header),
        };

        if let Err(e) = &result {
            if e.is_rejection() {
                self.metrics.increment_rejected();
            }
            error!("Failed to apply input at {}: {}", input.position(), e);
        }
        result
    }

    pub fn apply_event(&self, event: &LedgerEvent) -> Result<usize> {
        event.validate()?;
        debug!(
            "Applying {} at {} ({})",
            event.name(),
            event.position(),
            format_timestamp(event.block_timestamp)
        );

        let mut ctx = HandlerContext::new(
            self.store.as_ref(),
            self.fetcher.as_ref(),
            &self.metrics,
            event.block_number,
            event.block_timestamp,
        );
        handlers::dispatch(&mut ctx, event)?;
        ctx.advance_cursor(event.position(), false)?;

        let written = ctx.commit()?;
        self.metrics.record_applied(false, written);
        Ok(written)
    }

    pub fn apply_block(&self, header: &BlockHeader) -> Result<usize> {
        header.validate()?;
        debug!(
            "Applying block {} ({})",
            header.number,
            format_timestamp(header.timestamp)
        );

        let mut ctx = HandlerContext::new(
            self.store.as_ref(),
            self.fetcher.as_ref(),
            &self.metrics,
            header.number,
            header.timestamp,
        );
        blocks::handle_block(&mut ctx, header)?;
        ctx.advance_cursor(header.position(), true)?;

        let written = ctx.commit()?;
        self.metrics.record_applied(true, written);
        Ok(written)
    }
}
