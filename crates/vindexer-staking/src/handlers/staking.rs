//! Staking and delegation events
//!
//! A stake is only ever created by `Staking`. Events that reference a pair
//! with no stake still produce their history record, but never fabricate one.

use {
    crate::{
        aggregate::{checked_add, clamped_sub, AggregateState},
        context::HandlerContext,
        Result,
    },
    alloy_primitives::Address,
    tracing::{debug, warn},
    vindexer_common::{
        types::{Amount, DelegatorRewardClaim, LedgerEvent, Stake, UnstakeEvent, WithdrawEvent},
        utils::{address_id, event_id},
    },
};

pub fn handle_staking(
    ctx: &mut HandlerContext<'_>,
    staker: &Address,
    validator_address: &Address,
    amount: Amount,
) -> Result<()> {
    let (mut validator, _) = ctx.validator(validator_address)?;

    let (mut stake, is_new) = match ctx.stake(staker, validator_address)? {
        Some(stake) => (stake, false),
        None => (
            Stake::new(*staker, *validator_address, ctx.block_number, ctx.timestamp),
            true,
        ),
    };
    stake.amount = checked_add(stake.amount, amount, "stake amount")?;
    stake.total_staked = checked_add(stake.total_staked, amount, "stake total staked")?;
    stake.is_active = stake.amount > Amount::ZERO;
    stake.unstake_block = None;
    stake.unlock_height = None;
    stake.touch(ctx.block_number, ctx.timestamp);
    ctx.save(&stake)?;

    validator.staking_amount = checked_add(validator.staking_amount, amount, "validator staking amount")?;
    if is_new {
        validator.total_stakers = validator.total_stakers.saturating_add(1);
        validator.delegator_count = validator.delegator_count.saturating_add(1);
    }
    validator.touch(ctx.block_number, ctx.timestamp);
    ctx.save(&validator)?;

    let mut state = ctx.protocol_state()?;
    state.add_staking(amount)?;
    state.touch(ctx.block_number, ctx.timestamp);
    ctx.save(&state)?;

    debug!("Stake {} now {}", stake.id, stake.amount);
    Ok(())
}

/// Amounts larger than the current stake clamp it at zero; only the amount
/// actually removed is taken off the validator and protocol totals.
pub fn handle_unstake(
    ctx: &mut HandlerContext<'_>,
    event: &LedgerEvent,
    staker: &Address,
    validator_address: &Address,
    amount: Amount,
    unlock_height: Amount,
) -> Result<()> {
    let (mut validator, _) = ctx.validator(validator_address)?;

    match ctx.stake(staker, validator_address)? {
        Some(mut stake) => {
            let (remaining, removed) = clamped_sub(stake.amount, amount);
            if removed < amount {
                warn!(
                    "Unstake of {} exceeds stake {} ({}), clamping at zero",
                    amount, stake.id, stake.amount
                );
            }

            stake.amount = remaining;
            stake.unstake_block = Some(ctx.block_number);
            stake.unlock_height = Some(unlock_height);
            stake.is_active = stake.amount > Amount::ZERO;
            stake.touch(ctx.block_number, ctx.timestamp);
            ctx.save(&stake)?;

            validator.staking_amount = clamped_sub(validator.staking_amount, removed).0;
            if !stake.is_active {
                validator.delegator_count = validator.delegator_count.saturating_sub(1);
            }
            validator.touch(ctx.block_number, ctx.timestamp);
            ctx.save(&validator)?;

            let mut state = ctx.protocol_state()?;
            state.remove_staking(removed);
            state.touch(ctx.block_number, ctx.timestamp);
            ctx.save(&state)?;

            debug!("Stake {} now {}, unlocks at {}", stake.id, stake.amount, unlock_height);
        }
        None => warn!(
            "Unstake by {} from {} without a stake, recording history only",
            address_id(staker),
            validator.id
        ),
    }

    ctx.create_record(&UnstakeEvent {
        id: event_id(&event.transaction_hash, event.log_index),
        staker: *staker,
        validator: validator.id.clone(),
        amount,
        unlock_height,
        block_number: ctx.block_number,
        timestamp: ctx.timestamp,
        transaction_hash: event.transaction_hash,
    })
}

pub fn handle_withdraw(
    ctx: &mut HandlerContext<'_>,
    event: &LedgerEvent,
    staker: &Address,
    validator_address: &Address,
    amount: Amount,
) -> Result<()> {
    let (validator, _) = ctx.validator(validator_address)?;

    match ctx.stake(staker, validator_address)? {
        Some(mut stake) => {
            stake.total_withdrawn = checked_add(stake.total_withdrawn, amount, "stake total withdrawn")?;
            stake.touch(ctx.block_number, ctx.timestamp);
            ctx.save(&stake)?;
        }
        None => warn!(
            "Withdrawal by {} from {} without a stake, recording history only",
            address_id(staker),
            validator.id
        ),
    }

    ctx.create_record(&WithdrawEvent {
        id: event_id(&event.transaction_hash, event.log_index),
        staker: *staker,
        validator: validator.id,
        amount,
        block_number: ctx.block_number,
        timestamp: ctx.timestamp,
        transaction_hash: event.transaction_hash,
    })
}

pub fn handle_rewards_claimed(
    ctx: &mut HandlerContext<'_>,
    event: &LedgerEvent,
    delegator: &Address,
    validator_address: &Address,
    amount: Amount,
) -> Result<()> {
    let (validator, _) = ctx.validator(validator_address)?;

    match ctx.stake(delegator, validator_address)? {
        Some(mut stake) => {
            stake.claimed_rewards = checked_add(stake.claimed_rewards, amount, "stake claimed rewards")?;
            stake.touch(ctx.block_number, ctx.timestamp);
            ctx.save(&stake)?;
        }
        None => warn!(
            "Reward claim by {} from {} without a stake, recording history only",
            address_id(delegator),
            validator.id
        ),
    }

    ctx.create_record(&DelegatorRewardClaim {
        id: event_id(&event.transaction_hash, event.log_index),
        delegator: *delegator,
        validator: validator.id,
        amount,
        block_number: ctx.block_number,
        timestamp: ctx.timestamp,
        transaction_hash: event.transaction_hash,
    })
}

#[cfg(test)]
mod tests {
    use {
        crate::handlers::testing::{apply, event, S1, V1},
        alloy_primitives::U256,
        vindexer_common::{
            types::{EntityKind, EventKind, ProtocolState, Stake, Validator, SINGLETON_ID},
            utils::{address_id, stake_id},
        },
        vindexer_store::{EntityStore, EntityStoreExt, MemoryStore},
    };

    fn stake(store: &MemoryStore) -> Option<Stake> {
        store.get(&stake_id(&S1, &V1)).unwrap()
    }

    fn staking(amount: u64) -> EventKind {
        EventKind::Staking {
            staker: S1,
            validator: V1,
            amount: U256::from(amount),
        }
    }

    fn unstake(amount: u64) -> EventKind {
        EventKind::Unstake {
            staker: S1,
            validator: V1,
            amount: U256::from(amount),
            unlock_height: U256::from(500),
        }
    }

    #[test]
    fn test_stake_amount_tracks_signed_sum() {
        let store = MemoryStore::new();
        let mut expected: i64 = 0;
        let steps: [(bool, u64); 6] = [
            (true, 100),
            (false, 30),
            (true, 5),
            (false, 75),
            (true, 20),
            (false, 1),
        ];

        for (block, (is_stake, amount)) in steps.into_iter().enumerate() {
            let kind = if is_stake { staking(amount) } else { unstake(amount) };
            apply(&store, &event(block as u64 + 1, 0, kind)).unwrap();
            expected += if is_stake { amount as i64 } else { -(amount as i64) };

            let stake = stake(&store).unwrap();
            assert_eq!(stake.amount, U256::from(expected as u64));
            assert_eq!(stake.is_active, expected > 0);
        }

        let validator: Validator = store.get(&address_id(&V1)).unwrap().unwrap();
        assert_eq!(validator.staking_amount, U256::from(19));
        let state: ProtocolState = store.get(SINGLETON_ID).unwrap().unwrap();
        assert_eq!(state.total_staking, U256::from(19));
    }

    #[test]
    fn test_delegator_count_follows_activity() {
        let store = MemoryStore::new();
        apply(&store, &event(1, 0, staking(10))).unwrap();
        apply(&store, &event(2, 0, unstake(10))).unwrap();

        let validator: Validator = store.get(&address_id(&V1)).unwrap().unwrap();
        assert_eq!(validator.total_stakers, 1);
        assert_eq!(validator.delegator_count, 0);

        // Re-staking an existing key does not count it again.
        apply(&store, &event(3, 0, staking(4))).unwrap();
        let validator: Validator = store.get(&address_id(&V1)).unwrap().unwrap();
        assert_eq!(validator.total_stakers, 1);
        assert_eq!(validator.delegator_count, 0);

        let stake = stake(&store).unwrap();
        assert_eq!(stake.total_staked, U256::from(14));
        assert!(stake.unstake_block.is_none());
        assert!(stake.unlock_height.is_none());
    }

    #[test]
    fn test_zero_first_stake_counts_delegator() {
        let store = MemoryStore::new();
        apply(&store, &event(1, 0, staking(0))).unwrap();

        let stake = stake(&store).unwrap();
        assert_eq!(stake.amount, U256::ZERO);
        assert!(!stake.is_active);

        let validator: Validator = store.get(&address_id(&V1)).unwrap().unwrap();
        assert_eq!(validator.total_stakers, 1);
        assert_eq!(validator.delegator_count, 1);
    }

    #[test]
    fn test_unstake_clamps_at_zero() {
        let store = MemoryStore::new();
        apply(&store, &event(1, 0, staking(10))).unwrap();
        apply(&store, &event(2, 0, unstake(25))).unwrap();

        let stake = stake(&store).unwrap();
        assert_eq!(stake.amount, U256::ZERO);
        assert!(!stake.is_active);
        assert_eq!(stake.unstake_block, Some(2));
        assert_eq!(stake.unlock_height, Some(U256::from(500)));

        let state: ProtocolState = store.get(SINGLETON_ID).unwrap().unwrap();
        assert_eq!(state.total_staking, U256::ZERO);
    }

    #[test]
    fn test_unstake_without_stake_records_history_only() {
        let store = MemoryStore::new();
        apply(&store, &event(1, 0, unstake(40))).unwrap();

        assert!(stake(&store).is_none());
        assert_eq!(store.count(EntityKind::UnstakeEvent).unwrap(), 1);
        assert!(store.get::<ProtocolState>(SINGLETON_ID).unwrap().is_none());

        let validator: Validator = store.get(&address_id(&V1)).unwrap().unwrap();
        assert_eq!(validator.staking_amount, U256::ZERO);
    }

    #[test]
    fn test_withdraw_and_claim_without_stake_record_history_only() {
        let store = MemoryStore::new();
        apply(
            &store,
            &event(1, 0, EventKind::WithdrawStaking {
                staker: S1,
                validator: V1,
                amount: U256::from(8),
            }),
        )
        .unwrap();
        apply(
            &store,
            &event(1, 1, EventKind::DelegatorRewardsClaimed {
                delegator: S1,
                validator: V1,
                amount: U256::from(3),
            }),
        )
        .unwrap();

        assert!(stake(&store).is_none());
        assert_eq!(store.count(EntityKind::WithdrawEvent).unwrap(), 1);
        assert_eq!(store.count(EntityKind::DelegatorRewardClaim).unwrap(), 1);
        assert!(store.get::<ProtocolState>(SINGLETON_ID).unwrap().is_none());
    }

    #[test]
    fn test_withdraw_and_claim_accumulate() {
        let store = MemoryStore::new();
        apply(&store, &event(1, 0, staking(50))).unwrap();
        for block in 2..4 {
            apply(
                &store,
                &event(block, 0, EventKind::WithdrawStaking {
                    staker: S1,
                    validator: V1,
                    amount: U256::from(8),
                }),
            )
            .unwrap();
            apply(
                &store,
                &event(block, 1, EventKind::DelegatorRewardsClaimed {
                    delegator: S1,
                    validator: V1,
                    amount: U256::from(3),
                }),
            )
            .unwrap();
        }

        let stake = stake(&store).unwrap();
        assert_eq!(stake.total_withdrawn, U256::from(16));
        assert_eq!(stake.claimed_rewards, U256::from(6));
        assert_eq!(stake.amount, U256::from(50));
        assert_eq!(stake.last_updated_block, 3);
        assert_eq!(store.count(EntityKind::WithdrawEvent).unwrap(), 2);
        assert_eq!(store.count(EntityKind::DelegatorRewardClaim).unwrap(), 2);
    }
}
