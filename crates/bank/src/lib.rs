//! Account ledger interface
//!
//! The name registry never owns balances; it moves funds through an
//! [`AccountLedger`] supplied by the host runtime. This crate defines that
//! interface plus in-memory implementations for nodes without a real bank and
//! for tests.

pub mod account_ledger;

pub use account_ledger::{AccountLedger, BankError, InMemoryAccountLedger, MockAccountLedger};
