//! Protocol-wide singletons

use {
    super::{Amount, Entity, EntityKind, EventPosition, SINGLETON_ID},
    alloy_primitives::Address,
    serde::{Deserialize, Serialize},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolState {
    pub id: String,
    pub admin: Address,
    pub is_paused: bool,
    pub total_staking: Amount,
    pub total_rewards_distributed: Amount,
    pub total_slashed: Amount,
    pub total_validators: u32,
    pub active_validators: u32,
    pub jailed_validators: u32,
    pub last_updated_block: u64,
    pub last_updated_timestamp: u64,
}

impl ProtocolState {
    pub fn new(block_number: u64, timestamp: u64) -> Self {
        Self {
            id: SINGLETON_ID.to_string(),
            admin: Address::ZERO,
            is_paused: false,
            total_staking: Amount::ZERO,
            total_rewards_distributed: Amount::ZERO,
            total_slashed: Amount::ZERO,
            total_validators: 0,
            active_validators: 0,
            jailed_validators: 0,
            last_updated_block: block_number,
            last_updated_timestamp: timestamp,
        }
    }

    pub fn touch(&mut self, block_number: u64, timestamp: u64) {
        self.last_updated_block = block_number;
        self.last_updated_timestamp = timestamp;
    }
}

impl Entity for ProtocolState {
    const KIND: EntityKind = EntityKind::ProtocolState;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Staking contract parameters, read once when the protocol state is first
/// created. Each field stays `None` if its read reverted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemParameters {
    pub id: String,
    pub max_validators: Option<u64>,
    pub min_self_stake: Option<Amount>,
    pub min_delegation: Option<Amount>,
    pub staking_lock_period: Option<u64>,
    pub withdraw_profit_period: Option<u64>,
    pub jail_threshold: Option<u64>,
    pub fetched_at_block: u64,
}

impl Entity for SystemParameters {
    const KIND: EntityKind = EntityKind::SystemParameters;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Position of the last input applied to the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexerCursor {
    pub id: String,
    /// `None` until the first input has been applied
    pub position: Option<EventPosition>,
    pub events_applied: u64,
    pub blocks_applied: u64,
}

impl IndexerCursor {
    pub fn new() -> Self {
        Self {
            id: SINGLETON_ID.to_string(),
            ..Default::default()
        }
    }

    /// Whether an input at `position` was already applied.
    pub fn covers(&self, position: EventPosition) -> bool {
        self.position.map_or(false, |applied| position <= applied)
    }
}

impl Entity for IndexerCursor {
    const KIND: EntityKind = EntityKind::IndexerCursor;

    fn id(&self) -> &str {
        &self.id
    }
}
