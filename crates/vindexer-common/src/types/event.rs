//! Decoded ledger events and block headers
//!
//! Every event arrives already decoded into a typed payload. [`LedgerEvent::validate`]
//! is the single place where payload shape is checked; handlers downstream rely on it.

use {
    super::Amount,
    alloy_primitives::{Address, B256},
    serde::{Deserialize, Serialize},
    std::fmt,
    thiserror::Error,
};

/// Payload that cannot be applied. Rejects the whole event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed {event} event: {reason}")]
pub struct MalformedEvent {
    pub event: &'static str,
    pub reason: String,
}

impl MalformedEvent {
    pub fn new(event: &'static str, reason: impl Into<String>) -> Self {
        Self {
            event,
            reason: reason.into(),
        }
    }
}

/// Ordering key of an input within the stream. Block ticks sort after every
/// log of their block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventPosition {
    pub block_number: u64,
    pub log_index: u64,
}

impl EventPosition {
    pub fn end_of_block(block_number: u64) -> Self {
        Self {
            block_number,
            log_index: u64::MAX,
        }
    }
}

impl fmt::Display for EventPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.log_index == u64::MAX {
            write!(f, "{}/end", self.block_number)
        } else {
            write!(f, "{}/{}", self.block_number, self.log_index)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardDistributedParams {
    pub validators: Vec<Address>,
    pub rewards: Vec<Amount>,
    /// Number of meaningful entries; authoritative over the list lengths
    pub reward_count: Amount,
}

impl RewardDistributedParams {
    /// Number of entries to read, checked against both lists.
    pub fn count(&self) -> Result<usize, MalformedEvent> {
        let count = u64::try_from(self.reward_count)
            .map_err(|_| MalformedEvent::new("RewardDistributed", "reward count does not fit in 64 bits"))?;
        if count > self.validators.len() as u64 || count > self.rewards.len() as u64 {
            return Err(MalformedEvent::new(
                "RewardDistributed",
                format!(
                    "reward count {} exceeds payload (validators: {}, rewards: {})",
                    count,
                    self.validators.len(),
                    self.rewards.len()
                ),
            ));
        }
        Ok(count as usize)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", content = "params")]
pub enum EventKind {
    ValidatorCreated {
        validator: Address,
        reward_addr: Address,
    },
    ValidatorUpdated {
        validator: Address,
        reward_addr: Address,
    },
    ValidatorSlash {
        validator: Address,
        amount: Amount,
    },
    ValidatorUnjailed {
        validator: Address,
    },
    ValidatorSetUpdated {
        validators: Vec<Address>,
    },
    AddToValidatorCandidate {
        validator: Address,
    },
    RemoveFromValidatorCandidate {
        validator: Address,
    },
    Staking {
        staker: Address,
        validator: Address,
        amount: Amount,
    },
    Unstake {
        staker: Address,
        validator: Address,
        amount: Amount,
        unlock_height: Amount,
    },
    WithdrawStaking {
        staker: Address,
        validator: Address,
        amount: Amount,
    },
    DelegatorRewardsClaimed {
        delegator: Address,
        validator: Address,
        amount: Amount,
    },
    RewardDistributed(RewardDistributedParams),
    WithdrawRewards {
        validator: Address,
        reward_address: Address,
        amount: Amount,
        next_withdraw_block: Amount,
    },
    AdminChanged {
        previous_admin: Address,
        new_admin: Address,
    },
    Paused,
    Unpaused,
}

impl EventKind {
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::ValidatorCreated { .. } => "ValidatorCreated",
            EventKind::ValidatorUpdated { .. } => "ValidatorUpdated",
            EventKind::ValidatorSlash { .. } => "ValidatorSlash",
            EventKind::ValidatorUnjailed { .. } => "ValidatorUnjailed",
            EventKind::ValidatorSetUpdated { .. } => "ValidatorSetUpdated",
            EventKind::AddToValidatorCandidate { .. } => "AddToValidatorCandidate",
            EventKind::RemoveFromValidatorCandidate { .. } => "RemoveFromValidatorCandidate",
            EventKind::Staking { .. } => "Staking",
            EventKind::Unstake { .. } => "Unstake",
            EventKind::WithdrawStaking { .. } => "WithdrawStaking",
            EventKind::DelegatorRewardsClaimed { .. } => "DelegatorRewardsClaimed",
            EventKind::RewardDistributed(_) => "RewardDistributed",
            EventKind::WithdrawRewards { .. } => "WithdrawRewards",
            EventKind::AdminChanged { .. } => "AdminChanged",
            EventKind::Paused => "Paused",
            EventKind::Unpaused => "Unpaused",
        }
    }

    /// Addresses that must identify a real account
    fn required_addresses(&self) -> Vec<(&'static str, &Address)> {
        match self {
            EventKind::ValidatorCreated { validator, .. }
            | EventKind::ValidatorUpdated { validator, .. }
            | EventKind::ValidatorSlash { validator, .. }
            | EventKind::ValidatorUnjailed { validator }
            | EventKind::AddToValidatorCandidate { validator }
            | EventKind::RemoveFromValidatorCandidate { validator }
            | EventKind::WithdrawRewards { validator, .. } => vec![("validator", validator)],
            EventKind::Staking { staker, validator, .. }
            | EventKind::Unstake { staker, validator, .. }
            | EventKind::WithdrawStaking { staker, validator, .. } => {
                vec![("staker", staker), ("validator", validator)]
            }
            EventKind::DelegatorRewardsClaimed { delegator, validator, .. } => {
                vec![("delegator", delegator), ("validator", validator)]
            }
            EventKind::ValidatorSetUpdated { validators } => {
                validators.iter().map(|v| ("validators[]", v)).collect()
            }
            EventKind::RewardDistributed(params) => {
                // only the counted prefix is ever read
                let count = params.count().unwrap_or(0);
                params.validators[..count].iter().map(|v| ("validators[]", v)).collect()
            }
            EventKind::AdminChanged { .. } | EventKind::Paused | EventKind::Unpaused => Vec::new(),
        }
    }
}

/// One decoded log emitted by the staking contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEvent {
    pub block_number: u64,
    pub block_timestamp: u64,
    pub transaction_hash: B256,
    pub log_index: u64,
    pub event: EventKind,
}

impl LedgerEvent {
    pub fn position(&self) -> EventPosition {
        EventPosition {
            block_number: self.block_number,
            log_index: self.log_index,
        }
    }

    pub fn name(&self) -> &'static str {
        self.event.name()
    }

    pub fn validate(&self) -> Result<(), MalformedEvent> {
        if let EventKind::RewardDistributed(params) = &self.event {
            params.count()?;
        }
        for (field, address) in self.event.required_addresses() {
            if address.is_zero() {
                return Err(MalformedEvent::new(
                    self.name(),
                    format!("required address `{}` is missing", field),
                ));
            }
        }
        Ok(())
    }
}

/// Header of a finalized block, fed once per block after its events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub number: u64,
    pub timestamp: u64,
    pub author: Address,
}

impl BlockHeader {
    pub fn position(&self) -> EventPosition {
        EventPosition::end_of_block(self.number)
    }

    pub fn validate(&self) -> Result<(), MalformedEvent> {
        if self.author.is_zero() {
            return Err(MalformedEvent::new("Block", "block author is missing"));
        }
        Ok(())
    }
}

/// One element of the input stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IndexerInput {
    Event(LedgerEvent),
    Block(BlockHeader),
}

impl IndexerInput {
    pub fn position(&self) -> EventPosition {
        match self {
            IndexerInput::Event(event) => event.position(),
            IndexerInput::Block(header) => header.position(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, U256};

    const V1: Address = address!("0000000000000000000000000000000000000001");
    const V2: Address = address!("0000000000000000000000000000000000000002");

    fn event(kind: EventKind) -> LedgerEvent {
        LedgerEvent {
            block_number: 7,
            block_timestamp: 1_700_000_000,
            transaction_hash: B256::repeat_byte(0xab),
            log_index: 3,
            event: kind,
        }
    }

    #[test]
    fn test_reward_count_within_lists() {
        let params = RewardDistributedParams {
            validators: vec![V1, V2, V1],
            rewards: vec![U256::from(1), U256::from(2), U256::from(3)],
            reward_count: U256::from(2),
        };
        assert_eq!(params.count(), Ok(2));
    }

    #[test]
    fn test_reward_count_exceeding_lists_is_malformed() {
        let params = RewardDistributedParams {
            validators: vec![V1, V2],
            rewards: vec![U256::from(1)],
            reward_count: U256::from(2),
        };
        assert!(params.count().is_err());
        assert!(event(EventKind::RewardDistributed(params)).validate().is_err());
    }

    #[test]
    fn test_reward_count_ignores_zero_address_past_count() {
        let params = RewardDistributedParams {
            validators: vec![V1, Address::ZERO],
            rewards: vec![U256::from(1), U256::from(2)],
            reward_count: U256::from(1),
        };
        assert!(event(EventKind::RewardDistributed(params)).validate().is_ok());
    }

    #[test]
    fn test_missing_validator_is_malformed() {
        let err = event(EventKind::ValidatorUnjailed { validator: Address::ZERO })
            .validate()
            .unwrap_err();
        assert_eq!(err.event, "ValidatorUnjailed");
    }

    #[test]
    fn test_admin_change_may_start_from_zero() {
        let ev = event(EventKind::AdminChanged {
            previous_admin: Address::ZERO,
            new_admin: V1,
        });
        assert!(ev.validate().is_ok());
    }

    #[test]
    fn test_block_tick_sorts_after_logs() {
        let log = EventPosition { block_number: 5, log_index: 1_000 };
        assert!(log < EventPosition::end_of_block(5));
        assert!(EventPosition::end_of_block(5) < EventPosition { block_number: 6, log_index: 0 });
    }

    #[test]
    fn test_decode_json_line() {
        let line = r#"{
            "type": "event",
            "block_number": 12,
            "block_timestamp": 1700000000,
            "transaction_hash": "0xabababababababababababababababababababababababababababababababab",
            "log_index": 0,
            "event": {
                "name": "Staking",
                "params": {
                    "staker": "0x00000000000000000000000000000000000000aa",
                    "validator": "0x0000000000000000000000000000000000000001",
                    "amount": "0x64"
                }
            }
        }"#;
        let input: IndexerInput = serde_json::from_str(line).unwrap();
        match input {
            IndexerInput::Event(ev) => {
                assert_eq!(ev.name(), "Staking");
                assert_eq!(ev.position(), EventPosition { block_number: 12, log_index: 0 });
                match ev.event {
                    EventKind::Staking { amount, validator, .. } => {
                        assert_eq!(amount, U256::from(100));
                        assert_eq!(validator, V1);
                    }
                    other => panic!("unexpected event {:?}", other),
                }
            }
            other => panic!("unexpected input {:?}", other),
        }
    }

    #[test]
    fn test_decode_block_and_unit_event() {
        let block: IndexerInput = serde_json::from_str(
            r#"{"type":"block","number":9,"timestamp":1,"author":"0x0000000000000000000000000000000000000002"}"#,
        )
        .unwrap();
        assert_eq!(block.position(), EventPosition::end_of_block(9));

        let paused: EventKind = serde_json::from_str(r#"{"name":"Paused"}"#).unwrap();
        assert_eq!(paused, EventKind::Paused);
    }
}
