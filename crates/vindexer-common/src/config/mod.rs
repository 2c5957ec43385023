//! Configuration types for the vindexer system

mod store;

pub use store::{StoreBackend, StoreConfig};

use {
    serde::{Deserialize, Serialize},
    std::{fs, path::{Path, PathBuf}},
};

use crate::errors::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexerConfig {
    pub data_dir: PathBuf,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub metadata: MetadataConfig,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Skip inputs already covered by the persisted cursor
    #[serde(default)]
    pub resume: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetadataConfig {
    /// JSON snapshot of validator descriptions and system parameters.
    /// Without one every metadata read reverts.
    pub snapshot_path: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            store: StoreConfig::default(),
            metadata: MetadataConfig::default(),
            log_level: default_log_level(),
            resume: false,
        }
    }
}

impl IndexerConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config = serde_json::from_str::<Self>(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.store.max_open_files <= 0 {
            return Err(Error::Config(format!(
                "max_open_files must be positive, got {}",
                self.store.max_open_files
            )));
        }
        if self.log_level.trim().is_empty() {
            return Err(Error::Config("log_level must not be empty".to_string()));
        }
        Ok(())
    }

    /// Location of the entity database
    pub fn store_path(&self) -> PathBuf {
        if self.store.path.is_absolute() {
            self.store.path.clone()
        } else {
            self.data_dir.join(&self.store.path)
        }
    }
}
