//! One transition function per event kind
//!
//! Handlers only touch the entities named for their event and always advance
//! the updated block/timestamp of whatever they mutate.

pub mod blocks;
pub mod governance;
pub mod rewards;
pub mod staking;
pub mod validator;

use {
    crate::{context::HandlerContext, Result},
    vindexer_common::types::{EventKind, LedgerEvent},
};

pub fn dispatch(ctx: &mut HandlerContext<'_>, event: &LedgerEvent) -> Result<()> {
    match &event.event {
        EventKind::ValidatorCreated {
            validator,
            reward_addr,
        } => validator::handle_created(ctx, event, validator, reward_addr),
        EventKind::ValidatorUpdated {
            validator,
            reward_addr,
        } => validator::handle_updated(ctx, validator, reward_addr),
        EventKind::ValidatorSlash { validator, amount } => {
            validator::handle_slash(ctx, event, validator, *amount)
        }
        EventKind::ValidatorUnjailed { validator } => validator::handle_unjailed(ctx, validator),
        EventKind::ValidatorSetUpdated { validators } => {
            validator::handle_set_updated(ctx, event, validators)
        }
        EventKind::AddToValidatorCandidate { validator } => {
            validator::handle_add_candidate(ctx, validator)
        }
        EventKind::RemoveFromValidatorCandidate { validator } => {
            validator::handle_remove_candidate(ctx, validator)
        }
        EventKind::Staking {
            staker,
            validator,
            amount,
        } => staking::handle_staking(ctx, staker, validator, *amount),
        EventKind::Unstake {
            staker,
            validator,
            amount,
            unlock_height,
        } => staking::handle_unstake(ctx, event, staker, validator, *amount, *unlock_height),
        EventKind::WithdrawStaking {
            staker,
            validator,
            amount,
        } => staking::handle_withdraw(ctx, event, staker, validator, *amount),
        EventKind::DelegatorRewardsClaimed {
            delegator,
            validator,
            amount,
        } => staking::handle_rewards_claimed(ctx, event, delegator, validator, *amount),
        EventKind::RewardDistributed(params) => rewards::handle_distributed(ctx, event, params),
        EventKind::WithdrawRewards {
            validator,
            reward_address,
            amount,
            ..
        } => rewards::handle_withdraw_rewards(ctx, validator, reward_address, *amount),
        EventKind::AdminChanged {
            previous_admin,
            new_admin,
        } => governance::handle_admin_changed(ctx, event, previous_admin, new_admin),
        EventKind::Paused => governance::handle_pause(ctx, event, true),
        EventKind::Unpaused => governance::handle_pause(ctx, event, false),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use {
        super::dispatch,
        crate::{
            context::HandlerContext,
            metadata::{MockMetadataFetcher, Reverted},
            metrics::ProcessorMetrics,
            Result,
        },
        alloy_primitives::{address, Address, B256},
        vindexer_common::types::{EventKind, LedgerEvent},
        vindexer_store::MemoryStore,
    };

    pub const V1: Address = address!("0000000000000000000000000000000000000001");
    pub const V2: Address = address!("0000000000000000000000000000000000000002");
    pub const V3: Address = address!("0000000000000000000000000000000000000003");
    pub const S1: Address = address!("00000000000000000000000000000000000000aa");

    pub fn reverting_fetcher() -> MockMetadataFetcher {
        let mut fetcher = MockMetadataFetcher::new();
        fetcher
            .expect_describe()
            .returning(|_| Err(Reverted("no code".to_string())));
        fetcher
            .expect_validator_info()
            .returning(|_| Err(Reverted("no code".to_string())));
        fetcher
            .expect_system_parameters()
            .returning(|| Err(Reverted("no code".to_string())));
        fetcher
    }

    pub fn event(block_number: u64, log_index: u64, kind: EventKind) -> LedgerEvent {
        LedgerEvent {
            block_number,
            block_timestamp: 1_700_000_000 + block_number * 12,
            transaction_hash: B256::with_last_byte(block_number as u8),
            log_index,
            event: kind,
        }
    }

    /// Dispatch one event against the store and commit it
    pub fn apply(store: &MemoryStore, event: &LedgerEvent) -> Result<usize> {
        let fetcher = reverting_fetcher();
        let metrics = ProcessorMetrics::default();
        let mut ctx = HandlerContext::new(
            store,
            &fetcher,
            &metrics,
            event.block_number,
            event.block_timestamp,
        );
        dispatch(&mut ctx, event)?;
        ctx.commit()
    }
}
