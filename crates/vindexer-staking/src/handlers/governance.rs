use {
    crate::{context::HandlerContext, Result},
    alloy_primitives::Address,
    tracing::info,
    vindexer_common::{
        types::{AdminChangeEvent, LedgerEvent, PauseEvent},
        utils::{address_id, event_id},
    },
};

pub fn handle_admin_changed(
    ctx: &mut HandlerContext<'_>,
    event: &LedgerEvent,
    previous_admin: &Address,
    new_admin: &Address,
) -> Result<()> {
    let mut state = ctx.protocol_state()?;
    state.admin = *new_admin;
    state.touch(ctx.block_number, ctx.timestamp);
    ctx.save(&state)?;

    ctx.create_record(&AdminChangeEvent {
        id: event_id(&event.transaction_hash, event.log_index),
        previous_admin: *previous_admin,
        new_admin: *new_admin,
        block_number: ctx.block_number,
        timestamp: ctx.timestamp,
        transaction_hash: event.transaction_hash,
    })?;

    info!(
        "Admin changed from {} to {}",
        address_id(previous_admin),
        address_id(new_admin)
    );
    Ok(())
}

/// Paused and Unpaused
pub fn handle_pause(ctx: &mut HandlerContext<'_>, event: &LedgerEvent, is_paused: bool) -> Result<()> {
    let mut state = ctx.protocol_state()?;
    state.is_paused = is_paused;
    state.touch(ctx.block_number, ctx.timestamp);
    ctx.save(&state)?;

    ctx.create_record(&PauseEvent {
        id: event_id(&event.transaction_hash, event.log_index),
        is_paused,
        block_number: ctx.block_number,
        timestamp: ctx.timestamp,
        transaction_hash: event.transaction_hash,
    })?;

    info!("Protocol {}", if is_paused { "paused" } else { "unpaused" });
    Ok(())
}

#[cfg(test)]
mod tests {
    use {
        crate::handlers::testing::{apply, event, V1, V2},
        alloy_primitives::Address,
        vindexer_common::types::{EntityKind, EventKind, ProtocolState, SINGLETON_ID},
        vindexer_store::{EntityStore, EntityStoreExt, MemoryStore},
    };

    #[test]
    fn test_admin_change() {
        let store = MemoryStore::new();
        apply(
            &store,
            &event(1, 0, EventKind::AdminChanged {
                previous_admin: Address::ZERO,
                new_admin: V1,
            }),
        )
        .unwrap();
        apply(
            &store,
            &event(2, 0, EventKind::AdminChanged {
                previous_admin: V1,
                new_admin: V2,
            }),
        )
        .unwrap();

        let state: ProtocolState = store.get(SINGLETON_ID).unwrap().unwrap();
        assert_eq!(state.admin, V2);
        assert_eq!(state.last_updated_block, 2);
        assert_eq!(store.count(EntityKind::AdminChangeEvent).unwrap(), 2);
    }

    #[test]
    fn test_pause_toggle() {
        let store = MemoryStore::new();
        apply(&store, &event(1, 0, EventKind::Paused)).unwrap();
        let state: ProtocolState = store.get(SINGLETON_ID).unwrap().unwrap();
        assert!(state.is_paused);

        apply(&store, &event(2, 0, EventKind::Unpaused)).unwrap();
        let state: ProtocolState = store.get(SINGLETON_ID).unwrap().unwrap();
        assert!(!state.is_paused);
        assert_eq!(store.count(EntityKind::PauseEvent).unwrap(), 2);
    }
}
