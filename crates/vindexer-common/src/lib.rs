pub mod config;
pub mod errors;
pub mod types;
pub mod utils;

pub use config::{IndexerConfig, MetadataConfig, StoreBackend, StoreConfig};
pub use errors::{Error, Result};
pub use types::*;
