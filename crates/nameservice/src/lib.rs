//! Name registry state machine
//!
//! Maps human-readable names to ownership records inside a deterministic,
//! replicated runtime. The runtime supplies the key-value store and the
//! account ledger; this crate supplies:
//!
//! - [`Keeper`]: reads and writes records against the store
//! - [`Handler`]: validates and applies `SetName`, `BuyName` and `DeleteName`
//! - [`Querier`]: `resolve`, `whois` and `names` lookups
//! - [`genesis`]: validation, import and export of full snapshots

pub mod config;
pub mod errors;
pub mod genesis;
pub mod handler;
pub mod keeper;
pub mod querier;

pub use self::config::{bootstrap, NameserviceConfig, StoreBackend, StoreConfig};
pub use errors::*;
pub use genesis::{default_genesis, export_genesis, init_genesis, validate_genesis, GenesisState};
pub use handler::Handler;
pub use keeper::Keeper;
pub use querier::{QueryResNames, QueryResResolve, Querier};
