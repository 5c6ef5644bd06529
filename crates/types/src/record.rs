//! Registry records.

use crate::address::AccountId;
use crate::coins::{Coin, Coins};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Denomination of the minimum price of an unclaimed name.
pub const MIN_NAME_PRICE_DENOM: &str = "nametoken";
/// Amount of the minimum price of an unclaimed name.
pub const MIN_NAME_PRICE_AMOUNT: u128 = 1;

/// Price every unclaimed name starts at (`1nametoken`).
pub fn min_name_price() -> Coins {
    Coins::from_coin(Coin::new(MIN_NAME_PRICE_AMOUNT, MIN_NAME_PRICE_DENOM))
}

/// Ownership record stored under a name.
///
/// `Default` is the unclaimed record: empty value, no owner, minimum price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhoIs {
    pub value: String,
    pub owner: Option<AccountId>,
    pub price: Coins,
}

impl WhoIs {
    pub fn is_claimed(&self) -> bool {
        self.owner.is_some()
    }
}

impl Default for WhoIs {
    fn default() -> Self {
        Self {
            value: String::new(),
            owner: None,
            price: min_name_price(),
        }
    }
}

impl fmt::Display for WhoIs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let owner = self
            .owner
            .map(|o| o.to_string())
            .unwrap_or_default();
        write!(
            f,
            "Owner: {}\nValue: {}\nPrice: {}",
            owner, self.value, self.price
        )
    }
}

/// A named record as it appears in genesis files and exports.
///
/// Unlike [`WhoIs`], every field is optional so malformed genesis input can
/// be represented and rejected by validation instead of failing to parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRecord {
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub owner: Option<AccountId>,
    #[serde(default)]
    pub price: Option<Coins>,
}

impl NameRecord {
    pub fn new(name: impl Into<String>, whois: WhoIs) -> Self {
        Self {
            name: name.into(),
            value: whois.value,
            owner: whois.owner,
            price: Some(whois.price),
        }
    }

    /// Stored form of this record. An absent price falls back to the minimum.
    pub fn to_whois(&self) -> WhoIs {
        WhoIs {
            value: self.value.clone(),
            owner: self.owner,
            price: self.price.clone().unwrap_or_else(min_name_price),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_record_is_unclaimed_at_minimum_price() {
        let whois = WhoIs::default();
        assert!(whois.value.is_empty());
        assert!(!whois.is_claimed());
        assert_eq!(whois.price.to_string(), "1nametoken");
    }

    #[test]
    fn display_lists_fields() {
        let whois = WhoIs {
            value: "1.2.3.4".into(),
            owner: Some(AccountId::new([0u8; 32])),
            price: "7nametoken".parse().unwrap(),
        };
        let text = whois.to_string();
        assert!(text.contains("Value: 1.2.3.4"));
        assert!(text.contains("Price: 7nametoken"));
        assert!(text.starts_with("Owner: i0000"));
    }

    #[test]
    fn name_record_missing_fields_parse_as_absent() {
        let record: NameRecord = serde_json::from_str(r#"{"name":"alice"}"#).unwrap();
        assert_eq!(record.owner, None);
        assert_eq!(record.price, None);
        assert!(record.value.is_empty());
        assert_eq!(record.to_whois(), WhoIs::default());
    }
}
