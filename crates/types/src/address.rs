use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Errors raised when parsing an [`AccountId`] from text.
#[derive(Debug, thiserror::Error)]
pub enum AccountIdError {
    #[error("account id must start with 'i'")]
    MissingPrefix,
    #[error("account id must carry {expected} hex characters, got {actual}")]
    WrongLength { expected: usize, actual: usize },
    #[error("account id payload is not valid hexadecimal")]
    NotHex(#[from] hex::FromHexError),
}

/// Identifier of an account held by the host runtime's account ledger.
///
/// Rendered as `i` followed by 64 lowercase hex characters, in text and in JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId([u8; 32]);

impl AccountId {
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl FromStr for AccountId {
    type Err = AccountIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let payload = s.strip_prefix('i').ok_or(AccountIdError::MissingPrefix)?;
        let mut bytes = [0u8; 32];
        if payload.len() != bytes.len() * 2 {
            return Err(AccountIdError::WrongLength {
                expected: bytes.len() * 2,
                actual: payload.len(),
            });
        }
        hex::decode_to_slice(payload, &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for AccountId {
    type Error = AccountIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AccountId> for String {
    fn from(value: AccountId) -> Self {
        value.to_string()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "i{}", hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_form_round_trips() {
        let id = AccountId::new([0xABu8; 32]);
        let encoded = id.to_string();
        assert_eq!(encoded, format!("i{}", "ab".repeat(32)));
        assert_eq!(encoded.parse::<AccountId>().unwrap(), id);
    }

    #[test]
    fn malformed_ids_are_rejected() {
        let no_prefix = "00".repeat(32);
        assert!(matches!(
            no_prefix.parse::<AccountId>(),
            Err(AccountIdError::MissingPrefix)
        ));

        let short = format!("i{}", "00".repeat(31));
        assert!(matches!(
            short.parse::<AccountId>(),
            Err(AccountIdError::WrongLength { expected: 64, actual: 62 })
        ));

        let not_hex = format!("i{}", "gg".repeat(32));
        assert!(matches!(
            not_hex.parse::<AccountId>(),
            Err(AccountIdError::NotHex(_))
        ));
    }

    #[test]
    fn json_rejects_malformed_ids() {
        let id = AccountId::new([1u8; 32]);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(serde_json::from_str::<AccountId>(&json).unwrap(), id);
        assert!(serde_json::from_str::<AccountId>(r#""i0102""#).is_err());
    }
}
