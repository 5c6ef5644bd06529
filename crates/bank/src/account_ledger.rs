//! Account ledger interface for registry payments
//!
//! Debits and transfers are all-or-nothing across denominations: either every
//! coin of the amount moves, or no balance changes.

use nameservice_types::{AccountId, Coins, CoinsError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

/// Errors surfaced by the account ledger.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BankError {
    #[error("insufficient funds: account {account} has {available}, needs {required}")]
    InsufficientFunds {
        account: AccountId,
        available: Coins,
        required: Coins,
    },
    #[error("balance overflow: {0}")]
    Overflow(#[from] CoinsError),
    #[error("total supply {supply} cannot cover a debit of {required}")]
    SupplyUnderflow { supply: Coins, required: Coins },
}

pub type Result<T> = std::result::Result<T, BankError>;

/// Interface for account ledger operations.
pub trait AccountLedger: Send + Sync {
    /// Add `amount` to an account, minting it into supply.
    fn credit(&mut self, account: &AccountId, amount: &Coins) -> Result<()>;

    /// Remove `amount` from an account, burning it from supply.
    fn debit(&mut self, account: &AccountId, amount: &Coins) -> Result<()>;

    /// Move `amount` from one account to another.
    fn transfer(&mut self, from: &AccountId, to: &AccountId, amount: &Coins) -> Result<()>;

    /// Current balance, empty when the account is unknown.
    fn balance(&self, account: &AccountId) -> Coins;

    /// Total supply across all accounts.
    fn total_supply(&self) -> Coins;
}

// -----------------------------------------------------------------------------
// In-memory implementation (for node runtime or testing)
// -----------------------------------------------------------------------------
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryAccountLedger {
    balances: HashMap<AccountId, Coins>,
    total_supply: Coins,
}

impl InMemoryAccountLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger pre-funded with the given balances.
    pub fn with_balances(balances: impl IntoIterator<Item = (AccountId, Coins)>) -> Result<Self> {
        let mut ledger = Self::new();
        for (account, amount) in balances {
            ledger.credit(&account, &amount)?;
        }
        Ok(ledger)
    }

    fn withdrawn(&self, account: &AccountId, amount: &Coins) -> Result<Coins> {
        let available = self.balance(account);
        available
            .checked_sub(amount)
            .ok_or_else(|| BankError::InsufficientFunds {
                account: *account,
                available,
                required: amount.clone(),
            })
    }
}

impl AccountLedger for InMemoryAccountLedger {
    fn credit(&mut self, account: &AccountId, amount: &Coins) -> Result<()> {
        let balance = self.balance(account).checked_add(amount)?;
        let supply = self.total_supply.checked_add(amount)?;
        self.balances.insert(*account, balance);
        self.total_supply = supply;
        Ok(())
    }

    fn debit(&mut self, account: &AccountId, amount: &Coins) -> Result<()> {
        let remaining = self.withdrawn(account, amount)?;
        let supply = self.total_supply.checked_sub(amount).ok_or_else(|| {
            BankError::SupplyUnderflow {
                supply: self.total_supply.clone(),
                required: amount.clone(),
            }
        })?;
        self.balances.insert(*account, remaining);
        self.total_supply = supply;
        debug!(target: "bank", "Debited {} from {}", amount, account);
        Ok(())
    }

    fn transfer(&mut self, from: &AccountId, to: &AccountId, amount: &Coins) -> Result<()> {
        let remaining = self.withdrawn(from, amount)?;
        if from == to {
            return Ok(());
        }
        let received = self.balance(to).checked_add(amount)?;
        self.balances.insert(*from, remaining);
        self.balances.insert(*to, received);
        debug!(target: "bank", "Transferred {} from {} to {}", amount, from, to);
        Ok(())
    }

    fn balance(&self, account: &AccountId) -> Coins {
        self.balances.get(account).cloned().unwrap_or_default()
    }

    fn total_supply(&self) -> Coins {
        self.total_supply.clone()
    }
}

// -----------------------------------------------------------------------------
// Mock ledger (records every movement for assertions)
// -----------------------------------------------------------------------------
#[derive(Debug, Clone, Default)]
pub struct MockAccountLedger {
    inner: InMemoryAccountLedger,
    debit_calls: Vec<(AccountId, Coins)>,
    transfer_calls: Vec<(AccountId, AccountId, Coins)>,
}

impl MockAccountLedger {
    pub fn new(inner: InMemoryAccountLedger) -> Self {
        Self {
            inner,
            debit_calls: Vec::new(),
            transfer_calls: Vec::new(),
        }
    }

    pub fn get_debit_calls(&self) -> &[(AccountId, Coins)] {
        &self.debit_calls
    }

    pub fn get_transfer_calls(&self) -> &[(AccountId, AccountId, Coins)] {
        &self.transfer_calls
    }

    pub fn clear_calls(&mut self) {
        self.debit_calls.clear();
        self.transfer_calls.clear();
    }
}

impl AccountLedger for MockAccountLedger {
    fn credit(&mut self, account: &AccountId, amount: &Coins) -> Result<()> {
        self.inner.credit(account, amount)
    }

    fn debit(&mut self, account: &AccountId, amount: &Coins) -> Result<()> {
        self.debit_calls.push((*account, amount.clone()));
        self.inner.debit(account, amount)
    }

    fn transfer(&mut self, from: &AccountId, to: &AccountId, amount: &Coins) -> Result<()> {
        self.transfer_calls.push((*from, *to, amount.clone()));
        self.inner.transfer(from, to, amount)
    }

    fn balance(&self, account: &AccountId) -> Coins {
        self.inner.balance(account)
    }

    fn total_supply(&self) -> Coins {
        self.inner.total_supply()
    }
}
