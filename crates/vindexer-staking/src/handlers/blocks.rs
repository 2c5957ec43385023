//! Per-finalized-block signer statistics

use {
    crate::{context::HandlerContext, Result},
    tracing::debug,
    vindexer_common::{
        types::{BlockHeader, ValidatorBlockPerformance},
        utils::performance_id,
    },
};

/// Credit the block's author with a signed block. No input carries missed
/// signatures, so `missed_blocks` stays at zero.
pub fn handle_block(ctx: &mut HandlerContext<'_>, header: &BlockHeader) -> Result<()> {
    let (mut validator, _) = ctx.validator(&header.author)?;
    validator.signed_blocks = validator.signed_blocks.saturating_add(1);
    validator.last_signed_block = Some(header.number);
    validator.recompute_uptime();
    validator.touch(header.number, header.timestamp);
    ctx.save(&validator)?;

    ctx.create_record(&ValidatorBlockPerformance {
        id: performance_id(&header.author, header.number),
        validator: validator.id.clone(),
        block_number: header.number,
        timestamp: header.timestamp,
        proposer: header.author,
        signed: true,
    })?;

    debug!(
        "Block {} signed by {} ({} signed)",
        header.number, validator.id, validator.signed_blocks
    );
    Ok(())
}
