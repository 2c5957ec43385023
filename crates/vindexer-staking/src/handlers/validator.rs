//! Validator lifecycle events

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
            event::MalformedEvent, Amount, LedgerEvent, SlashEvent, ValidatorCreatedEvent,
            ValidatorSetUpdate, ValidatorStatus,
        },
        utils::{address_id, event_id},
    },
};

pub fn handle_created(
    ctx: &mut HandlerContext<'_>,
    event: &LedgerEvent,
    address: &Address,
    reward_address: &Address,
) -> Result<()> {
    let (mut validator, _) = ctx.validator(address)?;
    validator.reward_address = *reward_address;
    validator.status = ValidatorStatus::Created;
    validator.touch(ctx.block_number, ctx.timestamp);
    ctx.save(&validator)?;

    ctx.create_record(&ValidatorCreatedEvent {
        id: event_id(&event.transaction_hash, event.log_index),
        validator: validator.id.clone(),
        reward_address: *reward_address,
        block_number: ctx.block_number,
        timestamp: ctx.timestamp,
        transaction_hash: event.transaction_hash,
    })?;

    let mut state = ctx.protocol_state()?;
    state.record_validator_created();
    state.touch(ctx.block_number, ctx.timestamp);
    ctx.save(&state)?;

    info!(
        "Validator {} created (reward address {}), {} validators total",
        validator.id,
        address_id(reward_address),
        state.total_validators
    );
    Ok(())
}

/// Reward address change. Metadata is read again unless the validator was
/// created (and therefore already read) by this same call.
pub fn handle_updated(
    ctx: &mut HandlerContext<'_>,
    address: &Address,
    reward_address: &Address,
) -> Result<()> {
    let (mut validator, created) = ctx.validator(address)?;
    validator.reward_address = *reward_address;
    if !created {
        ctx.enrich(&mut validator);
    }
    validator.touch(ctx.block_number, ctx.timestamp);
    ctx.save(&validator)?;

    debug!("Validator {} updated", validator.id);
    Ok(())
}

pub fn handle_slash(
    ctx: &mut HandlerContext<'_>,
    event: &LedgerEvent,
    address: &Address,
    amount: Amount,
) -> Result<()> {
    let (mut validator, _) = ctx.validator(address)?;
    validator.slashed_amount = checked_add(validator.slashed_amount, amount, "validator slashed amount")?;
    validator.status = ValidatorStatus::Slashed;
    validator.touch(ctx.block_number, ctx.timestamp);
    ctx.save(&validator)?;

    ctx.create_record(&SlashEvent {
        id: event_id(&event.transaction_hash, event.log_index),
        validator: validator.id.clone(),
        amount,
        block_number: ctx.block_number,
        timestamp: ctx.timestamp,
        transaction_hash: event.transaction_hash,
    })?;

    let mut state = ctx.protocol_state()?;
    state.add_slashed(amount)?;
    state.touch(ctx.block_number, ctx.timestamp);
    ctx.save(&state)?;

    info!("Validator {} slashed by {}", validator.id, amount);
    Ok(())
}

pub fn handle_unjailed(ctx: &mut HandlerContext<'_>, address: &Address) -> Result<()> {
    let (mut validator, _) = ctx.validator(address)?;
    validator.is_jailed = false;
    validator.status = ValidatorStatus::Active;
    validator.touch(ctx.block_number, ctx.timestamp);
    ctx.save(&validator)?;

    let mut state = ctx.protocol_state()?;
    state.record_unjail();
    state.touch(ctx.block_number, ctx.timestamp);
    ctx.save(&state)?;

    info!("Validator {} unjailed", validator.id);
    Ok(())
}

/// The emitted set replaces the active validator count outright, whatever the
/// incremental counters said before.
pub fn handle_set_updated(
    ctx: &mut HandlerContext<'_>,
    event: &LedgerEvent,
    validators: &[Address],
) -> Result<()> {
    let validator_count = u32::try_from(validators.len()).map_err(|_| {
        MalformedEvent::new("ValidatorSetUpdated", "validator set does not fit in 32 bits")
    })?;

    ctx.create_record(&ValidatorSetUpdate {
        id: event_id(&event.transaction_hash, event.log_index),
        validators: validators.iter().map(address_id).collect(),
        validator_count,
        block_number: ctx.block_number,
        timestamp: ctx.timestamp,
        transaction_hash: event.transaction_hash,
    })?;

    for address in validators {
        let (mut validator, _) = ctx.validator(address)?;
        validator.status = ValidatorStatus::Active;
        validator.touch(ctx.block_number, ctx.timestamp);
        ctx.save(&validator)?;
    }

    let mut state = ctx.protocol_state()?;
    state.overwrite_active_validators(validator_count);
    state.touch(ctx.block_number, ctx.timestamp);
    ctx.save(&state)?;

    info!("Validator set updated with {} validators", validator_count);
    Ok(())
}

pub fn handle_add_candidate(ctx: &mut HandlerContext<'_>, address: &Address) -> Result<()> {
    let (mut validator, _) = ctx.validator(address)?;
    let was_active = validator.is_active();
    validator.status = ValidatorStatus::Active;
    validator.touch(ctx.block_number, ctx.timestamp);
    ctx.save(&validator)?;

    if !was_active {
        let mut state = ctx.protocol_state()?;
        state.record_activation();
        state.touch(ctx.block_number, ctx.timestamp);
        ctx.save(&state)?;
    }

    debug!("Validator {} is a candidate (was active: {})", validator.id, was_active);
    Ok(())
}

pub fn handle_remove_candidate(ctx: &mut HandlerContext<'_>, address: &Address) -> Result<()> {
    let (mut validator, _) = ctx.validator(address)?;
    let was_active = validator.is_active();
    validator.status = ValidatorStatus::Inactive;
    validator.touch(ctx.block_number, ctx.timestamp);
    ctx.save(&validator)?;

    if was_active {
        let mut state = ctx.protocol_state()?;
        state.record_deactivation();
        state.touch(ctx.block_number, ctx.timestamp);
        ctx.save(&state)?;
    }

    debug!("Validator {} removed from candidates (was active: {})", validator.id, was_active);
    Ok(())
}
