//! Per-event handler context
//!
//! Wraps the event's [`StoreTx`] together with the metadata collaborator. All
//! get-or-create logic lives here so every handler initializes entities the
//! same way.

use {
    crate::{
        metadata::{apply_description, apply_info, MetadataFetcher},
        metrics::ProcessorMetrics,
        Result, StakingError,
    },
    alloy_primitives::Address,
    tracing::{debug, warn},
    vindexer_common::{
        types::{
            Entity, EventPosition, IndexerCursor, ProtocolState, Stake, SystemParameters,
            Validator, SINGLETON_ID,
        },
        utils::{address_id, stake_id},
    },
    vindexer_store::{EntityStore, StoreTx},
};

pub struct HandlerContext<'a> {
    tx: StoreTx<'a>,
    fetcher: &'a dyn MetadataFetcher,
    metrics: &'a ProcessorMetrics,
    pub block_number: u64,
    pub timestamp: u64,
}

impl<'a> HandlerContext<'a> {
    pub fn new(
        store: &'a dyn EntityStore,
        fetcher: &'a dyn MetadataFetcher,
        metrics: &'a ProcessorMetrics,
        block_number: u64,
        timestamp: u64,
    ) -> Self {
        Self {
            tx: StoreTx::new(store),
            fetcher,
            metrics,
            block_number,
            timestamp,
        }
    }

    /// Load the validator, creating and enriching it on first reference.
    /// The flag is `true` when this call created it.
    pub fn validator(&mut self, address: &Address) -> Result<(Validator, bool)> {
        if let Some(validator) = self.tx.get::<Validator>(&address_id(address))? {
            return Ok((validator, false));
        }

        let mut validator = Validator::new(*address, self.block_number, self.timestamp);
        self.enrich(&mut validator);
        self.tx.put(&validator)?;
        debug!("Created validator {} at block {}", validator.id, self.block_number);

        Ok((validator, true))
    }

    /// Refresh descriptive metadata and commission info. Reverted reads leave
    /// the existing fields in place.
    pub fn enrich(&self, validator: &mut Validator) {
        match self.fetcher.describe(&validator.address) {
            Ok(description) => apply_description(validator, description),
            Err(reverted) => {
                self.metrics.increment_metadata_reverts();
                warn!("Description read for {} failed: {}", validator.id, reverted);
            }
        }

        match self.fetcher.validator_info(&validator.address) {
            Ok(info) => apply_info(validator, info),
            Err(reverted) => {
                self.metrics.increment_metadata_reverts();
                warn!("Validator info read for {} failed: {}", validator.id, reverted);
            }
        }
    }

    /// Existing stake for the pair. Stakes are only ever created by Staking.
    pub fn stake(&self, staker: &Address, validator: &Address) -> Result<Option<Stake>> {
        Ok(self.tx.get(&stake_id(staker, validator))?)
    }

    /// Load the protocol singleton, creating it on first reference. The
    /// system parameters are read once, alongside that first creation.
    pub fn protocol_state(&mut self) -> Result<ProtocolState> {
        if let Some(state) = self.tx.get::<ProtocolState>(SINGLETON_ID)? {
            return Ok(state);
        }

        let state = ProtocolState::new(self.block_number, self.timestamp);
        self.tx.put(&state)?;

        if self.tx.get::<SystemParameters>(SINGLETON_ID)?.is_none() {
            let parameters = self.system_parameters();
            self.tx.put(&parameters)?;
        }

        Ok(state)
    }

    fn system_parameters(&self) -> SystemParameters {
        let mut parameters = SystemParameters {
            id: SINGLETON_ID.to_string(),
            fetched_at_block: self.block_number,
            ..Default::default()
        };

        match self.fetcher.system_parameters() {
            Ok(reads) => {
                parameters.max_validators = reads.max_validators;
                parameters.min_self_stake = reads.min_self_stake;
                parameters.min_delegation = reads.min_delegation;
                parameters.staking_lock_period = reads.staking_lock_period;
                parameters.withdraw_profit_period = reads.withdraw_profit_period;
                parameters.jail_threshold = reads.jail_threshold;
            }
            Err(reverted) => {
                self.metrics.increment_metadata_reverts();
                warn!("System parameter reads failed: {}", reverted);
            }
        }

        parameters
    }

    pub fn save<E: Entity>(&mut self, entity: &E) -> Result<()> {
        Ok(self.tx.put(entity)?)
    }

    /// Write a history record. Records are immutable once committed; a record
    /// written earlier in this same event may still be replaced.
    pub fn create_record<E: Entity>(&mut self, record: &E) -> Result<()> {
        if E::KIND.is_history() && self.tx.is_committed(E::KIND, record.id())? {
            return Err(StakingError::DuplicateRecord {
                kind: E::KIND,
                id: record.id().to_string(),
            });
        }
        self.save(record)
    }

    /// A record written earlier in this event, if any
    pub fn pending_record<E: Entity>(&self, id: &str) -> Result<Option<E>> {
        if !self.tx.is_pending(E::KIND, id) {
            return Ok(None);
        }
        Ok(self.tx.get(id)?)
    }

    pub fn advance_cursor(&mut self, position: EventPosition, is_block: bool) -> Result<()> {
        let mut cursor = self
            .tx
            .get::<IndexerCursor>(SINGLETON_ID)?
            .unwrap_or_else(IndexerCursor::new);

        cursor.position = Some(position);
        if is_block {
            cursor.blocks_applied += 1;
        } else {
            cursor.events_applied += 1;
        }

        self.save(&cursor)
    }

    /// Commit every write of the event as one batch.
    pub fn commit(self) -> Result<usize> {
        Ok(self.tx.commit()?)
    }
}
