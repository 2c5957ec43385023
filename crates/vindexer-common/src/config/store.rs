use {
    serde::{Deserialize, Serialize},
    std::path::PathBuf,
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    RocksDb,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Storage configuration
    #[serde(default)]
    pub backend: StoreBackend,
    /// Database directory; relative paths are resolved against `data_dir`
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
    #[serde(default = "default_max_open_files")]
    pub max_open_files: i32,
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            path: default_store_path(),
            max_open_files: default_max_open_files(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

fn default_store_path() -> PathBuf {
    PathBuf::from("entities")
}

fn default_max_open_files() -> i32 {
    1000
}

fn default_cache_capacity() -> usize {
    100 * 1024 * 1024
}
