//! Genesis import and export.
//!
//! A genesis file is the full registry snapshot: one [`NameRecord`] per name,
//! in key order when exported.

use crate::errors::*;
use crate::keeper::Keeper;
use nameservice_storage::KvStore;
use nameservice_types::NameRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisState {
    #[serde(default)]
    pub whois_records: Vec<NameRecord>,
}

impl GenesisState {
    pub fn new(whois_records: Vec<NameRecord>) -> Self {
        Self { whois_records }
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, serde_json::to_vec_pretty(self)?)?;
        Ok(())
    }
}

/// Genesis with no registered names.
pub fn default_genesis() -> GenesisState {
    GenesisState::default()
}

/// Reject records that could not have been produced by the registry.
pub fn validate_genesis(state: &GenesisState) -> Result<()> {
    let mut seen = HashSet::new();

    for record in &state.whois_records {
        let invalid = |reason: &str| {
            NameserviceError::Validation(format!(
                "invalid whois record {:?}: {}",
                record.name, reason
            ))
        };

        if record.name.is_empty() {
            return Err(invalid("missing name"));
        }
        if record.owner.is_none() {
            return Err(invalid("missing owner"));
        }
        if record.value.is_empty() {
            return Err(invalid("missing value"));
        }
        let Some(price) = &record.price else {
            return Err(invalid("missing price"));
        };
        if let Err(e) = price.validate() {
            return Err(invalid(&format!("invalid price: {e}")));
        }
        if !seen.insert(record.name.as_str()) {
            return Err(invalid("duplicate name"));
        }
    }

    Ok(())
}

/// Load every record into the store. Owner-less records are dropped by the keeper.
pub fn init_genesis(keeper: &Keeper, store: &dyn KvStore, state: &GenesisState) -> Result<()> {
    for record in &state.whois_records {
        keeper.set_record(store, &record.name, &record.to_whois())?;
    }
    info!(
        target: "nameservice",
        "Imported {} genesis records",
        state.whois_records.len()
    );
    Ok(())
}

/// Snapshot the whole registry in key order.
pub fn export_genesis(keeper: &Keeper, store: &dyn KvStore) -> Result<GenesisState> {
    let whois_records = keeper
        .iter(store)
        .map(|entry| entry.map(|(name, whois)| NameRecord::new(name, whois)))
        .collect::<Result<Vec<_>>>()?;

    info!(
        target: "nameservice",
        "Exported {} genesis records",
        whois_records.len()
    );
    Ok(GenesisState { whois_records })
}
