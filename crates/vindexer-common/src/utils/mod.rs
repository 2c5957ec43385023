//! Utility functions and helpers

pub mod ids;
mod time;

pub use ids::{address_id, event_id, hash_hex, performance_id, reward_id, stake_id};
pub use time::format_timestamp;
