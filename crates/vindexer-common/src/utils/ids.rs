//! Deterministic entity identities

use alloy_primitives::{hex, Address, B256};

/// Lowercase, 0x-prefixed hex form of an address.
pub fn address_id(address: &Address) -> String {
    hex::encode_prefixed(address)
}

pub fn hash_hex(hash: &B256) -> String {
    hex::encode_prefixed(hash)
}

/// `{staker}-{validator}`
pub fn stake_id(staker: &Address, validator: &Address) -> String {
    format!("{}-{}", address_id(staker), address_id(validator))
}

/// `{txHash}-{logIndex}`, used by every per-log history record.
pub fn event_id(transaction_hash: &B256, log_index: u64) -> String {
    format!("{}-{}", hash_hex(transaction_hash), log_index)
}

/// `{validator}-{blockNumber}-{logIndex}`
pub fn reward_id(validator: &Address, block_number: u64, log_index: u64) -> String {
    format!("{}-{}-{}", address_id(validator), block_number, log_index)
}

/// `{validator}-{blockNumber}`
pub fn performance_id(validator: &Address, block_number: u64) -> String {
    format!("{}-{}", address_id(validator), block_number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn test_composite_keys() {
        let staker = address!("00000000000000000000000000000000000000AA");
        let validator = address!("0000000000000000000000000000000000001000");

        assert_eq!(
            stake_id(&staker, &validator),
            "0x00000000000000000000000000000000000000aa-0x0000000000000000000000000000000000001000"
        );
        assert_eq!(
            reward_id(&validator, 42, 7),
            "0x0000000000000000000000000000000000001000-42-7"
        );
        assert_eq!(performance_id(&validator, 42), "0x0000000000000000000000000000000000001000-42");

        let hash = B256::repeat_byte(0x01);
        assert_eq!(event_id(&hash, 3), format!("0x{}-3", "01".repeat(32)));
    }
}
