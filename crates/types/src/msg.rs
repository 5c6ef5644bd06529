use crate::address::AccountId;
use crate::coins::Coins;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Route shared by every registry operation.
pub const ROUTER_KEY: &str = "nameservice";

/// State-changing operation submitted to the registry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NameOperation {
    /// Point an owned name at a new value.
    SetName(SetNameOp),
    /// Buy a name at or above its current price.
    BuyName(BuyNameOp),
    /// Remove an owned name from the registry.
    DeleteName(DeleteNameOp),
}

impl NameOperation {
    pub fn route(&self) -> &'static str {
        ROUTER_KEY
    }

    pub fn msg_type(&self) -> &'static str {
        match self {
            NameOperation::SetName(_) => "set_name",
            NameOperation::BuyName(_) => "buy_name",
            NameOperation::DeleteName(_) => "delete_name",
        }
    }

    /// Name targeted by this operation.
    pub fn name(&self) -> &str {
        match self {
            NameOperation::SetName(op) => &op.name,
            NameOperation::BuyName(op) => &op.name,
            NameOperation::DeleteName(op) => &op.name,
        }
    }

    /// Accounts that must have signed the enclosing transaction.
    pub fn signers(&self) -> Vec<AccountId> {
        match self {
            NameOperation::SetName(op) => vec![op.owner],
            NameOperation::BuyName(op) => vec![op.buyer],
            NameOperation::DeleteName(op) => vec![op.owner],
        }
    }

    /// Stateless checks that do not need the store.
    pub fn validate_basic(&self) -> Result<(), NameOperationError> {
        if self.name().is_empty() {
            return Err(NameOperationError::EmptyName);
        }
        match self {
            NameOperation::SetName(op) if op.value.is_empty() => Err(NameOperationError::EmptyValue),
            NameOperation::BuyName(op) => op
                .bid
                .validate()
                .map_err(|e| NameOperationError::InvalidBid(e.to_string())),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SetNameOp {
    pub name: String,
    pub value: String,
    pub owner: AccountId,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BuyNameOp {
    pub name: String,
    pub bid: Coins,
    pub buyer: AccountId,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteNameOp {
    pub name: String,
    pub owner: AccountId,
}

impl From<SetNameOp> for NameOperation {
    fn from(op: SetNameOp) -> Self {
        NameOperation::SetName(op)
    }
}

impl From<BuyNameOp> for NameOperation {
    fn from(op: BuyNameOp) -> Self {
        NameOperation::BuyName(op)
    }
}

impl From<DeleteNameOp> for NameOperation {
    fn from(op: DeleteNameOp) -> Self {
        NameOperation::DeleteName(op)
    }
}

/// Errors raised by stateless operation validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NameOperationError {
    #[error("name cannot be empty")]
    EmptyName,
    #[error("value cannot be empty")]
    EmptyValue,
    #[error("bid must be a non-empty set of positive coins: {0}")]
    InvalidBid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(b: u8) -> AccountId {
        AccountId::new([b; 32])
    }

    #[test]
    fn json_is_tagged_by_kind() {
        let op = NameOperation::DeleteName(DeleteNameOp {
            name: "alice".into(),
            owner: account(1),
        });
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(json["kind"], "delete_name");
        assert_eq!(json["name"], "alice");

        let back: NameOperation = serde_json::from_value(json).unwrap();
        assert_eq!(back, op);
    }

    #[test]
    fn buy_name_json_round_trip() {
        let op: NameOperation = BuyNameOp {
            name: "alice".into(),
            bid: "10nametoken,340282366920938463463374607431768211455stake"
                .parse()
                .unwrap(),
            buyer: account(2),
        }
        .into();

        let json = serde_json::to_string(&op).unwrap();
        assert!(json.contains(r#""kind":"buy_name""#));
        assert!(json.contains(r#"{"denom":"nametoken","amount":"10"}"#));

        let back: NameOperation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, op);
    }

    #[test]
    fn metadata_follows_variant() {
        let op: NameOperation = BuyNameOp {
            name: "alice".into(),
            bid: "10nametoken".parse().unwrap(),
            buyer: account(2),
        }
        .into();
        assert_eq!(op.route(), "nameservice");
        assert_eq!(op.msg_type(), "buy_name");
        assert_eq!(op.signers(), vec![account(2)]);
    }

    #[test]
    fn validate_basic_rejects_empty_fields() {
        let set: NameOperation = SetNameOp {
            name: "alice".into(),
            value: String::new(),
            owner: account(1),
        }
        .into();
        assert_eq!(set.validate_basic(), Err(NameOperationError::EmptyValue));

        let delete: NameOperation = DeleteNameOp {
            name: String::new(),
            owner: account(1),
        }
        .into();
        assert_eq!(delete.validate_basic(), Err(NameOperationError::EmptyName));

        let buy: NameOperation = BuyNameOp {
            name: "alice".into(),
            bid: Coins::empty(),
            buyer: account(1),
        }
        .into();
        assert!(matches!(
            buy.validate_basic(),
            Err(NameOperationError::InvalidBid(_))
        ));
    }
}
