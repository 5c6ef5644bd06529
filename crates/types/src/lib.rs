//! Shared types for the name registry.
//!
//! Account identifiers, multi-denomination amounts, the stored record and the
//! operations that mutate it.

pub mod address;
pub mod coins;
pub mod msg;
pub mod record;

pub use address::*;
pub use coins::*;
pub use msg::*;
pub use record::*;
