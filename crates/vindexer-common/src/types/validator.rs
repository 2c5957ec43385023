//! Validator entity

use {
    super::{Amount, Entity, EntityKind},
    crate::utils::ids::address_id,
    alloy_primitives::Address,
    serde::{Deserialize, Serialize},
    std::fmt,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidatorStatus {
    Created,
    Active,
    Inactive,
    Jailed,
    Slashed,
}

impl ValidatorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidatorStatus::Created => "Created",
            ValidatorStatus::Active => "Active",
            ValidatorStatus::Inactive => "Inactive",
            ValidatorStatus::Jailed => "Jailed",
            ValidatorStatus::Slashed => "Slashed",
        }
    }
}

impl fmt::Display for ValidatorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Validator {
    /// Lowercase 0x-prefixed validator address
    pub id: String,
    pub address: Address,
    pub reward_address: Address,
    pub status: ValidatorStatus,
    pub staking_amount: Amount,
    pub total_rewards: Amount,
    pub slashed_amount: Amount,
    pub commission_rate: Amount,
    pub is_jailed: bool,
    pub total_stakers: u32,
    pub delegator_count: u32,
    pub signed_blocks: u64,
    pub missed_blocks: u64,
    pub last_signed_block: Option<u64>,
    /// signed / (signed + missed); `None` until a block has been attributed
    pub uptime: Option<f64>,

    pub moniker: Option<String>,
    pub identity: Option<String>,
    pub website: Option<String>,
    pub email: Option<String>,
    pub details: Option<String>,

    pub delegator_reward_pool: Option<Amount>,
    pub reward_per_share: Option<Amount>,

    pub created_at_block: u64,
    pub created_at_timestamp: u64,
    pub updated_at_block: u64,
    pub updated_at_timestamp: u64,
}

impl Validator {
    /// Defaults for a validator seen for the first time. The reward address
    /// points at the validator itself until a ValidatorCreated says otherwise.
    pub fn new(address: Address, block_number: u64, timestamp: u64) -> Self {
        Self {
            id: address_id(&address),
            address,
            reward_address: address,
            status: ValidatorStatus::Created,
            staking_amount: Amount::ZERO,
            total_rewards: Amount::ZERO,
            slashed_amount: Amount::ZERO,
            commission_rate: Amount::ZERO,
            is_jailed: false,
            total_stakers: 0,
            delegator_count: 0,
            signed_blocks: 0,
            missed_blocks: 0,
            last_signed_block: None,
            uptime: None,
            moniker: None,
            identity: None,
            website: None,
            email: None,
            details: None,
            delegator_reward_pool: None,
            reward_per_share: None,
            created_at_block: block_number,
            created_at_timestamp: timestamp,
            updated_at_block: block_number,
            updated_at_timestamp: timestamp,
        }
    }

    pub fn touch(&mut self, block_number: u64, timestamp: u64) {
        self.updated_at_block = block_number;
        self.updated_at_timestamp = timestamp;
    }

    pub fn is_active(&self) -> bool {
        self.status == ValidatorStatus::Active
    }

    pub fn recompute_uptime(&mut self) {
        let total = self.signed_blocks + self.missed_blocks;
        self.uptime = if total > 0 {
            Some(self.signed_blocks as f64 / total as f64)
        } else {
            None
        };
    }
}

impl Entity for Validator {
    const KIND: EntityKind = EntityKind::Validator;

    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn test_new_validator_defaults() {
        let addr = address!("00000000000000000000000000000000000000aa");
        let validator = Validator::new(addr, 10, 1_700_000_000);

        assert_eq!(validator.id, "0x00000000000000000000000000000000000000aa");
        assert_eq!(validator.reward_address, addr);
        assert_eq!(validator.status, ValidatorStatus::Created);
        assert_eq!(validator.staking_amount, Amount::ZERO);
        assert!(validator.moniker.is_none());
        assert!(validator.uptime.is_none());
        assert_eq!(validator.created_at_block, validator.updated_at_block);
    }

    #[test]
    fn test_uptime() {
        let mut validator = Validator::new(Address::ZERO, 1, 1);
        validator.recompute_uptime();
        assert_eq!(validator.uptime, None);

        validator.signed_blocks = 3;
        validator.missed_blocks = 1;
        validator.recompute_uptime();
        assert_eq!(validator.uptime, Some(0.75));
    }
}
