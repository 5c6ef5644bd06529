//! Registry configuration and startup.
//!
//! Settings come from an optional TOML file, overridden by `NAMESERVICE_*`
//! environment variables (`NAMESERVICE_STORE__BACKEND=sled`).

use crate::errors::*;
use crate::genesis::{init_genesis, validate_genesis, GenesisState};
use crate::keeper::Keeper;
use config::{Config, Environment, File as ConfigFile};
use nameservice_storage::{KvStore, MemoryStore, SledStore};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    Sled,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
    #[serde(default = "default_tree")]
    pub tree: String,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("./data/nameservice")
}

fn default_tree() -> String {
    "nameservice".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            path: default_store_path(),
            tree: default_tree(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NameserviceConfig {
    #[serde(default)]
    pub store: StoreConfig,
    /// Genesis file imported into an empty store at startup.
    #[serde(default)]
    pub genesis_path: Option<PathBuf>,
}

impl NameserviceConfig {
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = config_path {
            if !path.exists() {
                return Err(NameserviceError::Config(config::ConfigError::NotFound(
                    path.display().to_string(),
                )));
            }
            builder = builder.add_source(ConfigFile::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix("NAMESERVICE")
                .prefix_separator("_")
                .separator("__"),
        );

        Ok(builder.build()?.try_deserialize()?)
    }

    pub fn open_store(&self) -> Result<Box<dyn KvStore>> {
        let store: Box<dyn KvStore> = match self.store.backend {
            StoreBackend::Memory => Box::new(MemoryStore::new()),
            StoreBackend::Sled => Box::new(SledStore::new(&self.store.path, &self.store.tree)?),
        };
        Ok(store)
    }
}

/// Open the configured store and, when it holds no records yet, import the
/// configured genesis file.
pub fn bootstrap(config: &NameserviceConfig, keeper: &Keeper) -> Result<Box<dyn KvStore>> {
    let store = config.open_store()?;

    let Some(genesis_path) = &config.genesis_path else {
        return Ok(store);
    };

    if keeper.names(store.as_ref()).next().is_some() {
        info!(
            target: "nameservice",
            "Store already populated, skipping genesis {}",
            genesis_path.display()
        );
        return Ok(store);
    }

    let genesis = GenesisState::from_json_file(genesis_path)?;
    validate_genesis(&genesis)?;
    init_genesis(keeper, store.as_ref(), &genesis)?;
    Ok(store)
}
