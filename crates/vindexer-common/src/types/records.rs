//! Append-only history records. Written once, never mutated.

use {
    super::{Amount, Entity, EntityKind},
    alloy_primitives::{Address, B256},
    serde::{Deserialize, Serialize},
};

macro_rules! history_record {
    ($ty:ident, $kind:ident) => {
        impl Entity for $ty {
            const KIND: EntityKind = EntityKind::$kind;

            fn id(&self) -> &str {
                &self.id
            }
        }
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorCreatedEvent {
    pub id: String,
    pub validator: String,
    pub reward_address: Address,
    pub block_number: u64,
    pub timestamp: u64,
    pub transaction_hash: B256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlashEvent {
    pub id: String,
    pub validator: String,
    pub amount: Amount,
    pub block_number: u64,
    pub timestamp: u64,
    pub transaction_hash: B256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnstakeEvent {
    pub id: String,
    pub staker: Address,
    pub validator: String,
    pub amount: Amount,
    pub unlock_height: Amount,
    pub block_number: u64,
    pub timestamp: u64,
    pub transaction_hash: B256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawEvent {
    pub id: String,
    pub staker: Address,
    pub validator: String,
    pub amount: Amount,
    pub block_number: u64,
    pub timestamp: u64,
    pub transaction_hash: B256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegatorRewardClaim {
    pub id: String,
    pub delegator: Address,
    pub validator: String,
    pub amount: Amount,
    pub block_number: u64,
    pub timestamp: u64,
    pub transaction_hash: B256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorSetUpdate {
    pub id: String,
    pub validators: Vec<String>,
    pub validator_count: u32,
    pub block_number: u64,
    pub timestamp: u64,
    pub transaction_hash: B256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminChangeEvent {
    pub id: String,
    pub previous_admin: Address,
    pub new_admin: Address,
    pub block_number: u64,
    pub timestamp: u64,
    pub transaction_hash: B256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PauseEvent {
    pub id: String,
    pub is_paused: bool,
    pub block_number: u64,
    pub timestamp: u64,
    pub transaction_hash: B256,
}

/// One recipient's share of a reward distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorReward {
    pub id: String,
    pub validator: String,
    pub amount: Amount,
    pub block_number: u64,
    pub timestamp: u64,
    pub transaction_hash: B256,
    pub distribution_id: String,
}

/// Parent record of a reward distribution. Only the first `reward_count`
/// entries of the emitted lists are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardDistribution {
    pub id: String,
    pub validators: Vec<String>,
    pub rewards: Vec<Amount>,
    pub reward_count: u64,
    pub total_rewards_distributed: Amount,
    pub block_number: u64,
    pub timestamp: u64,
    pub transaction_hash: B256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorBlockPerformance {
    pub id: String,
    pub validator: String,
    pub block_number: u64,
    pub timestamp: u64,
    pub proposer: Address,
    pub signed: bool,
}

history_record!(ValidatorCreatedEvent, ValidatorCreatedEvent);
history_record!(SlashEvent, SlashEvent);
history_record!(UnstakeEvent, UnstakeEvent);
history_record!(WithdrawEvent, WithdrawEvent);
history_record!(DelegatorRewardClaim, DelegatorRewardClaim);
history_record!(ValidatorSetUpdate, ValidatorSetUpdate);
history_record!(AdminChangeEvent, AdminChangeEvent);
history_record!(PauseEvent, PauseEvent);
history_record!(ValidatorReward, ValidatorReward);
history_record!(RewardDistribution, RewardDistribution);
history_record!(ValidatorBlockPerformance, ValidatorBlockPerformance);
