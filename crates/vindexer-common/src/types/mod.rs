//! Entity and event types shared by the store and the handlers

pub mod event;
pub mod protocol;
pub mod records;
pub mod stake;
pub mod validator;

pub use event::{
    BlockHeader, EventKind, EventPosition, IndexerInput, LedgerEvent,
};
pub use protocol::{IndexerCursor, ProtocolState, SystemParameters};
pub use records::*;
pub use stake::Stake;
pub use validator::{Validator, ValidatorStatus};

use {
    serde::{de::DeserializeOwned, Deserialize, Serialize},
    std::fmt,
};

/// Token amounts are exact 256-bit unsigned integers, as emitted by the ledger.
pub type Amount = alloy_primitives::U256;

/// Identity of the singleton entities (protocol state, parameters, cursor).
pub const SINGLETON_ID: &str = "1";

/// One table per entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Validator,
    Stake,
    ProtocolState,
    SystemParameters,
    IndexerCursor,
    ValidatorCreatedEvent,
    SlashEvent,
    UnstakeEvent,
    WithdrawEvent,
    DelegatorRewardClaim,
    ValidatorSetUpdate,
    AdminChangeEvent,
    PauseEvent,
    ValidatorReward,
    RewardDistribution,
    ValidatorBlockPerformance,
}

impl EntityKind {
    pub const ALL: [EntityKind; 16] = [
        EntityKind::Validator,
        EntityKind::Stake,
        EntityKind::ProtocolState,
        EntityKind::SystemParameters,
        EntityKind::IndexerCursor,
        EntityKind::ValidatorCreatedEvent,
        EntityKind::SlashEvent,
        EntityKind::UnstakeEvent,
        EntityKind::WithdrawEvent,
        EntityKind::DelegatorRewardClaim,
        EntityKind::ValidatorSetUpdate,
        EntityKind::AdminChangeEvent,
        EntityKind::PauseEvent,
        EntityKind::ValidatorReward,
        EntityKind::RewardDistribution,
        EntityKind::ValidatorBlockPerformance,
    ];

    /// Table (column family) name
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Validator => "validators",
            EntityKind::Stake => "stakes",
            EntityKind::ProtocolState => "protocol_state",
            EntityKind::SystemParameters => "system_parameters",
            EntityKind::IndexerCursor => "indexer_cursor",
            EntityKind::ValidatorCreatedEvent => "validator_created_events",
            EntityKind::SlashEvent => "slash_events",
            EntityKind::UnstakeEvent => "unstake_events",
            EntityKind::WithdrawEvent => "withdraw_events",
            EntityKind::DelegatorRewardClaim => "delegator_reward_claims",
            EntityKind::ValidatorSetUpdate => "validator_set_updates",
            EntityKind::AdminChangeEvent => "admin_change_events",
            EntityKind::PauseEvent => "pause_events",
            EntityKind::ValidatorReward => "validator_rewards",
            EntityKind::RewardDistribution => "reward_distributions",
            EntityKind::ValidatorBlockPerformance => "validator_block_performances",
        }
    }

    /// History records are append-only and never rewritten once committed.
    pub fn is_history(&self) -> bool {
        !matches!(
            self,
            EntityKind::Validator
                | EntityKind::Stake
                | EntityKind::ProtocolState
                | EntityKind::SystemParameters
                | EntityKind::IndexerCursor
        )
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored entity: knows its table and its identity.
pub trait Entity: Serialize + DeserializeOwned + Clone + fmt::Debug {
    const KIND: EntityKind;

    fn id(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_table_names_are_unique() {
        let names: HashSet<_> = EntityKind::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(names.len(), EntityKind::ALL.len());
    }

    #[test]
    fn test_history_kinds() {
        assert!(!EntityKind::Validator.is_history());
        assert!(!EntityKind::IndexerCursor.is_history());
        assert!(EntityKind::ValidatorReward.is_history());
        assert!(EntityKind::PauseEvent.is_history());
    }
}
