//! Transition handler for registry operations.
//!
//! Every operation checks all of its preconditions before the first write.
//! For purchases the funds movement is the first write; the record is only
//! touched once the account ledger has accepted it.

use crate::errors::*;
use crate::keeper::Keeper;
use nameservice_bank::AccountLedger;
use nameservice_storage::KvStore;
use nameservice_types::{BuyNameOp, DeleteNameOp, NameOperation, SetNameOp};
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct Handler {
    keeper: Keeper,
}

impl Handler {
    pub fn new(keeper: Keeper) -> Self {
        Self { keeper }
    }

    pub fn keeper(&self) -> &Keeper {
        &self.keeper
    }

    /// Validate and apply a single operation.
    pub fn handle(
        &self,
        store: &dyn KvStore,
        bank: &mut dyn AccountLedger,
        op: &NameOperation,
    ) -> Result<()> {
        op.validate_basic()?;
        match op {
            NameOperation::SetName(op) => self.set_name(store, op),
            NameOperation::BuyName(op) => self.buy_name(store, bank, op),
            NameOperation::DeleteName(op) => self.delete_name(store, op),
        }
    }

    /// Change the value of a name. Only the recorded owner may do so.
    pub fn set_name(&self, store: &dyn KvStore, op: &SetNameOp) -> Result<()> {
        if self.keeper.get_owner(store, &op.name)? != Some(op.owner) {
            return Err(NameserviceError::Unauthorized {
                name: op.name.clone(),
            });
        }

        self.keeper.set_value(store, &op.name, &op.value)?;
        debug!(target: "nameservice", "Set {} -> {}", op.name, op.value);
        Ok(())
    }

    /// Buy a name for `bid`.
    ///
    /// A claimed name is paid to its current owner; an unclaimed one is paid
    /// into the registry by debiting the buyer.
    pub fn buy_name(
        &self,
        store: &dyn KvStore,
        bank: &mut dyn AccountLedger,
        op: &BuyNameOp,
    ) -> Result<()> {
        let mut record = self.keeper.get_record(store, &op.name)?;

        if record.price.dominates(&op.bid) {
            return Err(NameserviceError::InsufficientBid {
                name: op.name.clone(),
                price: record.price,
                bid: op.bid.clone(),
            });
        }

        match record.owner {
            Some(current_owner) => bank.transfer(&op.buyer, &current_owner, &op.bid)?,
            None => bank.debit(&op.buyer, &op.bid)?,
        }

        record.owner = Some(op.buyer);
        record.price = op.bid.clone();
        self.keeper.set_record(store, &op.name, &record)?;

        debug!(
            target: "nameservice",
            "{} bought {} for {}", op.buyer, op.name, op.bid
        );
        Ok(())
    }

    /// Remove a name. Only the recorded owner may do so.
    pub fn delete_name(&self, store: &dyn KvStore, op: &DeleteNameOp) -> Result<()> {
        if !self.keeper.exists(store, &op.name)? {
            return Err(NameserviceError::NameNotFound {
                name: op.name.clone(),
            });
        }

        if self.keeper.get_owner(store, &op.name)? != Some(op.owner) {
            return Err(NameserviceError::Unauthorized {
                name: op.name.clone(),
            });
        }

        self.keeper.delete_record(store, &op.name)?;
        debug!(target: "nameservice", "Deleted {}", op.name);
        Ok(())
    }
}
