//! Multi-denomination amounts.
//!
//! A [`Coins`] bag holds at most one [`Coin`] per denomination, sorted by
//! denom. Amounts are unsigned so a bag can never go negative; subtraction is
//! checked and fails as a whole when any denomination would underflow.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while building or parsing coin amounts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoinsError {
    #[error("invalid denom: {0:?}")]
    InvalidDenom(String),
    #[error("coin amount for {denom} must be positive")]
    ZeroAmount { denom: String },
    #[error("duplicate denom: {0}")]
    DuplicateDenom(String),
    #[error("coins are not sorted by denom")]
    Unsorted,
    #[error("coin list is empty")]
    Empty,
    #[error("cannot parse coin from {0:?}")]
    Parse(String),
    #[error("amount overflow for {denom}")]
    Overflow { denom: String },
}

/// Checks that a denom is 3-64 chars, starts with a lowercase letter and only
/// uses `[a-z0-9/._-]`.
pub fn validate_denom(denom: &str) -> Result<(), CoinsError> {
    let valid_len = (3..=64).contains(&denom.len());
    let starts_alpha = denom.chars().next().is_some_and(|c| c.is_ascii_lowercase());
    let valid_chars = denom
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '/' | '.' | '-' | '_'));

    if valid_len && starts_alpha && valid_chars {
        Ok(())
    } else {
        Err(CoinsError::InvalidDenom(denom.to_string()))
    }
}

/// A single denomination amount.
///
/// The amount is encoded as a decimal string in JSON.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    #[serde(
        serialize_with = "serialize_amount",
        deserialize_with = "deserialize_amount"
    )]
    pub amount: u128,
}

fn serialize_amount<S>(amount: &u128, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&amount.to_string())
}

fn deserialize_amount<'de, D>(deserializer: D) -> Result<u128, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    value
        .parse()
        .map_err(|err| serde::de::Error::custom(format!("invalid amount {value:?}: {err}")))
}

impl Coin {
    pub fn new(amount: u128, denom: impl Into<String>) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

impl FromStr for Coin {
    type Err = CoinsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| CoinsError::Parse(s.to_string()))?;
        let (amount, denom) = s.split_at(split);
        let amount = amount
            .parse::<u128>()
            .map_err(|_| CoinsError::Parse(s.to_string()))?;
        validate_denom(denom)?;
        Ok(Coin::new(amount, denom))
    }
}

/// Sorted, denom-unique bag of coins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Coins(Vec<Coin>);

impl Coins {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Build a bag from a single coin. Zero amounts produce an empty bag.
    pub fn from_coin(coin: Coin) -> Self {
        if coin.amount == 0 {
            Self::empty()
        } else {
            Self(vec![coin])
        }
    }

    /// Build a bag from arbitrary coins, sorting them and rejecting
    /// duplicates, zero amounts and malformed denoms.
    pub fn try_new(mut coins: Vec<Coin>) -> Result<Self, CoinsError> {
        coins.sort_by(|a, b| a.denom.cmp(&b.denom));
        let coins = Self(coins);
        if coins.is_empty() {
            return Ok(coins);
        }
        coins.validate()?;
        Ok(coins)
    }

    /// Full validity check: non-empty, sorted, unique, positive, well-formed denoms.
    pub fn validate(&self) -> Result<(), CoinsError> {
        if self.0.is_empty() {
            return Err(CoinsError::Empty);
        }
        for (i, coin) in self.0.iter().enumerate() {
            validate_denom(&coin.denom)?;
            if coin.amount == 0 {
                return Err(CoinsError::ZeroAmount {
                    denom: coin.denom.clone(),
                });
            }
            if i > 0 {
                let prev = &self.0[i - 1].denom;
                if prev == &coin.denom {
                    return Err(CoinsError::DuplicateDenom(coin.denom.clone()));
                }
                if prev > &coin.denom {
                    return Err(CoinsError::Unsorted);
                }
            }
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Coin> {
        self.0.iter()
    }

    pub fn denoms(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|c| c.denom.as_str())
    }

    /// Amount held in `denom`, zero when absent.
    pub fn amount_of(&self, denom: &str) -> u128 {
        self.0
            .binary_search_by(|c| c.denom.as_str().cmp(denom))
            .map(|i| self.0[i].amount)
            .unwrap_or(0)
    }

    /// Whether `self` strictly dominates `other`.
    ///
    /// Only denominations present in both bags are compared; `self` dominates
    /// when every shared denomination holds strictly more in `self`. Bags that
    /// share no denomination are not comparable and count as dominated, so a
    /// bid paid in foreign units never outbids a price.
    pub fn dominates(&self, other: &Coins) -> bool {
        let mut shared = self
            .0
            .iter()
            .filter(|c| other.amount_of(&c.denom) > 0)
            .peekable();

        if shared.peek().is_none() {
            return true;
        }
        shared.all(|c| c.amount > other.amount_of(&c.denom))
    }

    /// Whether every denomination of `other` is covered by `self`.
    pub fn is_all_gte(&self, other: &Coins) -> bool {
        other.0.iter().all(|c| self.amount_of(&c.denom) >= c.amount)
    }

    /// Denomination-wise sum.
    pub fn checked_add(&self, other: &Coins) -> Result<Coins, CoinsError> {
        let mut out = self.0.clone();
        for coin in &other.0 {
            match out.binary_search_by(|c| c.denom.cmp(&coin.denom)) {
                Ok(i) => {
                    out[i].amount = out[i].amount.checked_add(coin.amount).ok_or_else(|| {
                        CoinsError::Overflow {
                            denom: coin.denom.clone(),
                        }
                    })?;
                }
                Err(i) if coin.amount > 0 => out.insert(i, coin.clone()),
                Err(_) => {}
            }
        }
        Ok(Coins(out))
    }

    /// Denomination-wise difference; `None` when any denomination would go
    /// negative. Denominations that reach zero are removed.
    pub fn checked_sub(&self, other: &Coins) -> Option<Coins> {
        if !self.is_all_gte(other) {
            return None;
        }
        let out = self
            .0
            .iter()
            .map(|c| Coin::new(c.amount - other.amount_of(&c.denom), c.denom.clone()))
            .filter(|c| c.amount > 0)
            .collect();
        Some(Coins(out))
    }
}

impl From<Coin> for Coins {
    fn from(coin: Coin) -> Self {
        Coins::from_coin(coin)
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&parts.join(","))
    }
}

impl FromStr for Coins {
    type Err = CoinsError;

    /// Parses `10nametoken,5stake`. The empty string parses to an empty bag.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Ok(Coins::empty());
        }
        let coins = s
            .split(',')
            .map(Coin::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        Coins::try_new(coins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coins(s: &str) -> Coins {
        s.parse().unwrap()
    }

    #[test]
    fn parse_sorts_denoms() {
        let c = coins("5stake,10nametoken");
        assert_eq!(c.to_string(), "10nametoken,5stake");
        assert_eq!(c.amount_of("stake"), 5);
        assert_eq!(c.amount_of("missing"), 0);
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!(matches!(
            "nametoken".parse::<Coins>(),
            Err(CoinsError::Parse(_))
        ));
        assert!(matches!(
            "10Name".parse::<Coins>(),
            Err(CoinsError::InvalidDenom(_))
        ));
        assert!(matches!(
            "0nametoken".parse::<Coins>(),
            Err(CoinsError::ZeroAmount { .. })
        ));
        assert!(matches!(
            "1abc,2abc".parse::<Coins>(),
            Err(CoinsError::DuplicateDenom(_))
        ));
    }

    #[test]
    fn unsorted_bag_is_invalid() {
        let raw: Coins =
            serde_json::from_str(r#"[{"denom":"stake","amount":"1"},{"denom":"abc","amount":"1"}]"#)
                .unwrap();
        assert_eq!(raw.validate(), Err(CoinsError::Unsorted));
        assert_eq!(Coins::empty().validate(), Err(CoinsError::Empty));
    }

    #[test]
    fn single_denom_dominance() {
        let price = coins("10nametoken");
        assert!(price.dominates(&coins("5nametoken")));
        assert!(!price.dominates(&coins("10nametoken")));
        assert!(!price.dominates(&coins("11nametoken")));
    }

    #[test]
    fn multi_denom_dominance_compares_shared_units() {
        let price = coins("10nametoken,10stake");
        assert!(price.dominates(&coins("5nametoken,5stake")));
        assert!(!price.dominates(&coins("5nametoken,20stake")));
        // shared unit only: nametoken below price
        assert!(price.dominates(&coins("9nametoken,100zeta")));
        // no shared unit at all
        assert!(price.dominates(&coins("100zeta")));
        assert!(price.dominates(&Coins::empty()));
    }

    #[test]
    fn add_and_sub() {
        let a = coins("10nametoken,3stake");
        let b = coins("4nametoken,3stake");
        assert_eq!(a.checked_sub(&b), Some(coins("6nametoken")));
        assert_eq!(b.checked_sub(&a), None);
        assert_eq!(b.checked_add(&coins("1abc")).unwrap(), coins("1abc,4nametoken,3stake"));
    }

    #[test]
    fn amounts_encode_as_decimal_strings() {
        let big = Coins::from_coin(Coin::new(u128::MAX, "nametoken"));
        let json = serde_json::to_string(&big).unwrap();
        assert_eq!(
            json,
            format!(r#"[{{"denom":"nametoken","amount":"{}"}}]"#, u128::MAX)
        );
        assert_eq!(serde_json::from_str::<Coins>(&json).unwrap(), big);

        assert!(serde_json::from_str::<Coins>(r#"[{"denom":"nametoken","amount":"-1"}]"#).is_err());
        assert!(serde_json::from_str::<Coins>(r#"[{"denom":"nametoken","amount":"ten"}]"#).is_err());
    }

    #[test]
    fn add_overflow_is_reported() {
        let max = Coins::from_coin(Coin::new(u128::MAX, "nametoken"));
        assert!(matches!(
            max.checked_add(&coins("1nametoken")),
            Err(CoinsError::Overflow { .. })
        ));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn arbitrary_coins() -> impl Strategy<Value = Coins> {
            prop::collection::btree_map("[a-z]{3,6}", 1u128..=1_000_000, 0..4).prop_map(|m| {
                Coins::try_new(m.into_iter().map(|(d, a)| Coin::new(a, d)).collect()).unwrap()
            })
        }

        proptest! {
            #[test]
            fn sub_undoes_add(a in arbitrary_coins(), b in arbitrary_coins()) {
                let sum = a.checked_add(&b).unwrap();
                prop_assert!(sum.is_all_gte(&a));
                prop_assert_eq!(sum.checked_sub(&b), Some(a));
            }

            #[test]
            fn nothing_dominates_itself(a in arbitrary_coins()) {
                prop_assume!(!a.is_empty());
                prop_assert!(!a.dominates(&a));
            }
        }
    }
}
