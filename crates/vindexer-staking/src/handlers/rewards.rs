//! Reward distribution and validator reward withdrawals
//!
//! The emitted `reward_count` is authoritative: entries at or past it are never
//! read, whatever the list lengths.

use {
    crate::{
        aggregate::{checked_add, AggregateState},
        context::HandlerContext,
        Result,
    },
    alloy_primitives::Address,
    tracing::{debug, info},
    vindexer_common::{
        types::{
            event::RewardDistributedParams, Amount, LedgerEvent, RewardDistribution,
            ValidatorReward,
        },
        utils::{address_id, event_id, reward_id},
    },
};

pub fn handle_distributed(
    ctx: &mut HandlerContext<'_>,
    event: &LedgerEvent,
    params: &RewardDistributedParams,
) -> Result<()> {
    let count = params.count()?;
    let distribution_id = event_id(&event.transaction_hash, event.log_index);
    let mut total = Amount::ZERO;

    for (address, amount) in params.validators.iter().zip(&params.rewards).take(count) {
        total = checked_add(total, *amount, "distribution total")?;

        let (mut validator, _) = ctx.validator(address)?;
        validator.total_rewards = checked_add(validator.total_rewards, *amount, "validator total rewards")?;
        validator.touch(ctx.block_number, ctx.timestamp);
        ctx.save(&validator)?;

        // a validator listed twice in one distribution shares a single record
        let id = reward_id(address, ctx.block_number, event.log_index);
        let reward = match ctx.pending_record::<ValidatorReward>(&id)? {
            Some(mut reward) => {
                reward.amount = checked_add(reward.amount, *amount, "validator reward")?;
                reward
            }
            None => ValidatorReward {
                id,
                validator: validator.id.clone(),
                amount: *amount,
                block_number: ctx.block_number,
                timestamp: ctx.timestamp,
                transaction_hash: event.transaction_hash,
                distribution_id: distribution_id.clone(),
            },
        };
        ctx.create_record(&reward)?;
    }

    ctx.create_record(&RewardDistribution {
        id: distribution_id.clone(),
        validators: params.validators[..count].iter().map(address_id).collect(),
        rewards: params.rewards[..count].to_vec(),
        reward_count: count as u64,
        total_rewards_distributed: total,
        block_number: ctx.block_number,
        timestamp: ctx.timestamp,
        transaction_hash: event.transaction_hash,
    })?;

    let mut state = ctx.protocol_state()?;
    state.add_rewards_distributed(total)?;
    state.touch(ctx.block_number, ctx.timestamp);
    ctx.save(&state)?;

    info!(
        "Distribution {} paid {} to {} validators",
        distribution_id, total, count
    );
    Ok(())
}

/// Validators withdrawing their own rewards. Only the timestamps move; the
/// payout goes to the reward address.
pub fn handle_withdraw_rewards(
    ctx: &mut HandlerContext<'_>,
    address: &Address,
    reward_address: &Address,
    amount: Amount,
) -> Result<()> {
    let (mut validator, _) = ctx.validator(address)?;
    validator.touch(ctx.block_number, ctx.timestamp);
    ctx.save(&validator)?;

    debug!(
        "Validator {} withdrew {} in rewards to {}",
        validator.id,
        amount,
        address_id(reward_address)
    );
    Ok(())
}
