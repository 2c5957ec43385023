// crates/vindexer-staking/src/aggregate.rs

//! Incremental maintenance of the protocol-wide counters
//!
//! Counters are never recomputed from the entity set. Decrements clamp at zero;
//! `overwrite_active_validators` is the one place a counter is set outright.

use {
    crate::{Result, StakingError},
    tracing::warn,
    vindexer_common::types::{Amount, ProtocolState},
};

/// Exact addition; overflow rejects the event instead of wrapping.
pub fn checked_add(current: Amount, amount: Amount, what: &str) -> Result<Amount> {
    current
        .checked_add(amount)
        .ok_or_else(|| StakingError::Overflow(format!("{} {} + {}", what, current, amount)))
}

/// Subtract, clamping at zero. Returns the new value and the amount actually removed.
pub fn clamped_sub(current: Amount, amount: Amount) -> (Amount, Amount) {
    let removed = current.min(amount);
    (current - removed, removed)
}

pub trait AggregateState {
    fn record_validator_created(&mut self);

    /// A validator moved into the active set
    fn record_activation(&mut self);

    /// A validator left the active set
    fn record_deactivation(&mut self);

    fn record_unjail(&mut self);

    fn overwrite_active_validators(&mut self, count: u32);

    fn add_staking(&mut self, amount: Amount) -> Result<()>;

    fn remove_staking(&mut self, amount: Amount);

    fn add_slashed(&mut self, amount: Amount) -> Result<()>;

    fn add_rewards_distributed(&mut self, amount: Amount) -> Result<()>;
}

impl AggregateState for ProtocolState {
    fn record_validator_created(&mut self) {
        self.total_validators = self.total_validators.saturating_add(1);
    }

    fn record_activation(&mut self) {
        self.active_validators = self.active_validators.saturating_add(1);
    }

    fn record_deactivation(&mut self) {
        self.active_validators = self.active_validators.saturating_sub(1);
    }

    fn record_unjail(&mut self) {
        self.jailed_validators = self.jailed_validators.saturating_sub(1);
        self.active_validators = self.active_validators.saturating_add(1);
    }

    fn overwrite_active_validators(&mut self, count: u32) {
        if count != self.active_validators {
            warn!(
                "Validator set overwrites active validator count {} -> {}",
                self.active_validators, count
            );
        }
        self.active_validators = count;
    }

    fn add_staking(&mut self, amount: Amount) -> Result<()> {
        self.total_staking = checked_add(self.total_staking, amount, "protocol total staking")?;
        Ok(())
    }

    fn remove_staking(&mut self, amount: Amount) {
        let (remaining, removed) = clamped_sub(self.total_staking, amount);
        if removed < amount {
            warn!(
                "Protocol total staking {} is below unstaked amount {}, clamping at zero",
                self.total_staking, amount
            );
        }
        self.total_staking = remaining;
    }

    fn add_slashed(&mut self, amount: Amount) -> Result<()> {
        self.total_slashed = checked_add(self.total_slashed, amount, "protocol total slashed")?;
        Ok(())
    }

    fn add_rewards_distributed(&mut self, amount: Amount) -> Result<()> {
        self.total_rewards_distributed = checked_add(
            self.total_rewards_distributed,
            amount,
            "protocol total rewards distributed",
        )?;
        Ok(())
    }
}
