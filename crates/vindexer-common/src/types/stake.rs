//! Stake entity: one per (staker, validator) pair

use {
    super::{Amount, Entity, EntityKind},
    crate::utils::ids::stake_id,
    alloy_primitives::Address,
    serde::{Deserialize, Serialize},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stake {
    pub id: String,
    pub staker: Address,
    /// Id of the owning validator entity
    pub validator: String,
    pub amount: Amount,
    pub total_staked: Amount,
    pub total_withdrawn: Amount,
    pub claimed_rewards: Amount,
    pub is_active: bool,
    pub unstake_block: Option<u64>,
    pub unlock_height: Option<Amount>,
    pub created_at_block: u64,
    pub created_at_timestamp: u64,
    pub last_updated_block: u64,
    pub last_updated_timestamp: u64,
}

impl Stake {
    pub fn new(staker: Address, validator: Address, block_number: u64, timestamp: u64) -> Self {
        Self {
            id: stake_id(&staker, &validator),
            staker,
            validator: crate::utils::ids::address_id(&validator),
            amount: Amount::ZERO,
            total_staked: Amount::ZERO,
            total_withdrawn: Amount::ZERO,
            claimed_rewards: Amount::ZERO,
            is_active: false,
            unstake_block: None,
            unlock_height: None,
            created_at_block: block_number,
            created_at_timestamp: timestamp,
            last_updated_block: block_number,
            last_updated_timestamp: timestamp,
        }
    }

    pub fn touch(&mut self, block_number: u64, timestamp: u64) {
        self.last_updated_block = block_number;
        self.last_updated_timestamp = timestamp;
    }
}

impl Entity for Stake {
    const KIND: EntityKind = EntityKind::Stake;

    fn id(&self) -> &str {
        &self.id
    }
}
