//! Storage-facing access to registry records.
//!
//! The keeper is the only component that reads or writes registry keys. It
//! owns no store: every call receives the store handle of the operation being
//! applied.

use crate::errors::*;
use nameservice_storage::KvStore;
use nameservice_types::{AccountId, Coins, WhoIs};
use tracing::{debug, trace};

#[derive(Debug, Clone, Default)]
pub struct Keeper {
    /// Prepended to every name so the registry can share a store.
    prefix: Vec<u8>,
}

impl Keeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(prefix: impl Into<Vec<u8>>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    fn key(&self, name: &str) -> Vec<u8> {
        let mut key = Vec::with_capacity(self.prefix.len() + name.len());
        key.extend_from_slice(&self.prefix);
        key.extend_from_slice(name.as_bytes());
        key
    }

    /// Record stored under `name`, or the unclaimed default.
    pub fn get_record(&self, store: &dyn KvStore, name: &str) -> Result<WhoIs> {
        match store.get(&self.key(name))? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(WhoIs::default()),
        }
    }

    /// Persist `record` under `name`. Records without an owner are dropped.
    pub fn set_record(&self, store: &dyn KvStore, name: &str, record: &WhoIs) -> Result<()> {
        if record.owner.is_none() {
            trace!(target: "nameservice", "Dropping owner-less record for {}", name);
            return Ok(());
        }
        let bytes = serde_json::to_vec(record)?;
        store.set(&self.key(name), &bytes)?;
        debug!(target: "nameservice", "Stored record for {}", name);
        Ok(())
    }

    pub fn delete_record(&self, store: &dyn KvStore, name: &str) -> Result<()> {
        store.delete(&self.key(name))?;
        debug!(target: "nameservice", "Deleted record for {}", name);
        Ok(())
    }

    pub fn exists(&self, store: &dyn KvStore, name: &str) -> Result<bool> {
        Ok(store.has(&self.key(name))?)
    }

    pub fn get_value(&self, store: &dyn KvStore, name: &str) -> Result<String> {
        Ok(self.get_record(store, name)?.value)
    }

    pub fn set_value(&self, store: &dyn KvStore, name: &str, value: &str) -> Result<()> {
        let mut record = self.get_record(store, name)?;
        record.value = value.to_string();
        self.set_record(store, name, &record)
    }

    pub fn get_owner(&self, store: &dyn KvStore, name: &str) -> Result<Option<AccountId>> {
        Ok(self.get_record(store, name)?.owner)
    }

    pub fn set_owner(&self, store: &dyn KvStore, name: &str, owner: AccountId) -> Result<()> {
        let mut record = self.get_record(store, name)?;
        record.owner = Some(owner);
        self.set_record(store, name, &record)
    }

    pub fn has_owner(&self, store: &dyn KvStore, name: &str) -> Result<bool> {
        Ok(self.get_owner(store, name)?.is_some())
    }

    pub fn get_price(&self, store: &dyn KvStore, name: &str) -> Result<Coins> {
        Ok(self.get_record(store, name)?.price)
    }

    pub fn set_price(&self, store: &dyn KvStore, name: &str, price: Coins) -> Result<()> {
        let mut record = self.get_record(store, name)?;
        record.price = price;
        self.set_record(store, name, &record)
    }

    /// Every persisted record in ascending byte order of its name.
    ///
    /// The iterator is lazy and read-only; call again to restart from the
    /// current state.
    pub fn iter<'a>(
        &'a self,
        store: &'a dyn KvStore,
    ) -> impl Iterator<Item = Result<(String, WhoIs)>> + 'a {
        store.prefix_iter(&self.prefix).map(move |entry| -> Result<(String, WhoIs)> {
            let (key, bytes) = entry?;
            let name = String::from_utf8_lossy(&key[self.prefix.len()..]).into_owned();
            let record: WhoIs = serde_json::from_slice(&bytes)?;
            Ok((name, record))
        })
    }

    /// Names of all persisted records, in iteration order.
    pub fn names<'a>(&'a self, store: &'a dyn KvStore) -> impl Iterator<Item = Result<String>> + 'a {
        store.prefix_iter(&self.prefix).map(move |entry| -> Result<String> {
            let (key, _) = entry?;
            Ok(String::from_utf8_lossy(&key[self.prefix.len()..]).into_owned())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nameservice_storage::MemoryStore;
    use nameservice_types::min_name_price;

    fn account(b: u8) -> AccountId {
        AccountId::new([b; 32])
    }

    fn claimed(value: &str, owner: u8, price: &str) -> WhoIs {
        WhoIs {
            value: value.into(),
            owner: Some(account(owner)),
            price: price.parse().unwrap(),
        }
    }

    #[test]
    fn test_missing_name_reads_default() {
        let store = MemoryStore::new();
        let keeper = Keeper::new();

        let record = keeper.get_record(&store, "never-written").unwrap();
        assert_eq!(record.value, "");
        assert_eq!(record.owner, None);
        assert_eq!(record.price, min_name_price());
        assert!(!keeper.exists(&store, "never-written").unwrap());
    }

    #[test]
    fn test_ownerless_record_is_not_persisted() {
        let store = MemoryStore::new();
        let keeper = Keeper::new();

        let record = WhoIs {
            value: "junk".into(),
            ..Default::default()
        };
        keeper.set_record(&store, "alice", &record).unwrap();
        assert!(store.is_empty());

        // field setters on an unclaimed name go through the same guard
        keeper.set_value(&store, "alice", "1.2.3.4").unwrap();
        keeper
            .set_price(&store, "alice", "5nametoken".parse().unwrap())
            .unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_field_accessors_round_trip() {
        let store = MemoryStore::new();
        let keeper = Keeper::new();

        keeper.set_owner(&store, "alice", account(1)).unwrap();
        assert!(keeper.has_owner(&store, "alice").unwrap());
        assert_eq!(keeper.get_price(&store, "alice").unwrap(), min_name_price());

        keeper.set_value(&store, "alice", "1.2.3.4").unwrap();
        keeper
            .set_price(&store, "alice", "9nametoken".parse().unwrap())
            .unwrap();

        assert_eq!(
            keeper.get_record(&store, "alice").unwrap(),
            claimed("1.2.3.4", 1, "9nametoken")
        );
        assert_eq!(keeper.get_value(&store, "alice").unwrap(), "1.2.3.4");
    }

    #[test]
    fn test_delete_is_unconditional() {
        let store = MemoryStore::new();
        let keeper = Keeper::new();

        keeper
            .set_record(&store, "alice", &claimed("v", 1, "1nametoken"))
            .unwrap();
        keeper.delete_record(&store, "alice").unwrap();
        keeper.delete_record(&store, "alice").unwrap();
        assert!(!keeper.exists(&store, "alice").unwrap());
        assert_eq!(keeper.get_record(&store, "alice").unwrap(), WhoIs::default());
    }

    #[test]
    fn test_iteration_is_sorted_and_scoped_to_prefix() {
        let store = MemoryStore::new();
        let keeper = Keeper::with_prefix("ns/");
        let other = Keeper::with_prefix("other/");

        for name in ["carol", "alice", "bob"] {
            keeper
                .set_record(&store, name, &claimed(name, 1, "1nametoken"))
                .unwrap();
        }
        other
            .set_record(&store, "zed", &claimed("zed", 2, "1nametoken"))
            .unwrap();

        let names: Vec<String> = keeper.names(&store).collect::<Result<_>>().unwrap();
        assert_eq!(names, vec!["alice", "bob", "carol"]);

        let records: Vec<(String, WhoIs)> = keeper.iter(&store).collect::<Result<_>>().unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].1.value, "bob");
    }
}
