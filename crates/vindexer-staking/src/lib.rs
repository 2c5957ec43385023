//! Validator staking indexer core
//! Folds decoded staking-contract events into validator, stake and protocol entities

pub mod aggregate;
pub mod context;
pub mod handlers;
pub mod metadata;
pub mod metrics;
pub mod processor;
pub mod runner;

pub use metadata::{MetadataFetcher, NoopMetadataFetcher, StaticMetadataFetcher};
pub use metrics::ProcessorMetrics;
pub use processor::EventProcessor;
pub use runner::{Runner, RunSummary, StreamItem};

use thiserror::Error;
use vindexer_common::types::{event::MalformedEvent, EntityKind};

/// Errors that can occur while applying an input
#[derive(Error, Debug)]
pub enum StakingError {
    #[error(transparent)]
    Malformed(#[from] MalformedEvent),

    #[error("Amount overflow: {0}")]
    Overflow(String),

    #[error("History record {kind} `{id}` already exists")]
    DuplicateRecord { kind: EntityKind, id: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StakingError {
    /// The input itself is at fault: drop it and keep indexing.
    /// Anything else (storage failures) stops the stream.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, StakingError::Other(_))
    }
}

pub type Result<T> = std::result::Result<T, StakingError>;
