//! Read-only registry queries

use crate::errors::*;
use crate::keeper::Keeper;
use nameservice_storage::KvStore;
use nameservice_types::WhoIs;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const QUERY_RESOLVE: &str = "resolve";
pub const QUERY_WHOIS: &str = "whois";
pub const QUERY_NAMES: &str = "names";

/// Response of the `resolve` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResResolve {
    pub value: String,
}

impl fmt::Display for QueryResResolve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Response of the `names` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryResNames(pub Vec<String>);

impl fmt::Display for QueryResNames {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("\n"))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Querier {
    keeper: Keeper,
}

impl Querier {
    pub fn new(keeper: Keeper) -> Self {
        Self { keeper }
    }

    /// Value a name points at. Names that were never given a value do not resolve.
    pub fn resolve(&self, store: &dyn KvStore, name: &str) -> Result<String> {
        let value = self.keeper.get_value(store, name)?;
        if value.is_empty() {
            return Err(NameserviceError::NameNotFound {
                name: name.to_string(),
            });
        }
        Ok(value)
    }

    /// Full record for a name; the unclaimed default when absent.
    pub fn whois(&self, store: &dyn KvStore, name: &str) -> Result<WhoIs> {
        self.keeper.get_record(store, name)
    }

    /// Every registered name in key order.
    pub fn names(&self, store: &dyn KvStore) -> Result<Vec<String>> {
        self.keeper.names(store).collect()
    }

    /// Route a query path (`resolve/<name>`, `whois/<name>`, `names`) and
    /// return the JSON-encoded response.
    pub fn query(&self, store: &dyn KvStore, path: &[&str]) -> Result<Vec<u8>> {
        match path {
            [QUERY_RESOLVE, name, ..] => {
                let value = self.resolve(store, name)?;
                Ok(serde_json::to_vec_pretty(&QueryResResolve { value })?)
            }
            [QUERY_WHOIS, name, ..] => Ok(serde_json::to_vec_pretty(&self.whois(store, name)?)?),
            [QUERY_NAMES, ..] => Ok(serde_json::to_vec_pretty(&QueryResNames(
                self.names(store)?,
            ))?),
            [endpoint, ..] => Err(NameserviceError::UnknownRequest(format!(
                "unknown nameservice query endpoint: {endpoint}"
            ))),
            [] => Err(NameserviceError::UnknownRequest(
                "empty nameservice query path".to_string(),
            )),
        }
    }
}
