use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub mod payload;
pub mod transaction;

pub use payload::PayloadError;
pub use transaction::{
    EntryFunction, RawTransaction, SignedTransaction, TransactionAuthenticator,
    TransactionPayload,
};

/// A 32-byte on-chain account address.
///
/// Human-readable formats (JSON, display) carry the `0x`-prefixed hex
/// string; the binary (BCS) form is the raw 32 bytes with no length prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountAddress([u8; 32]);

/// Scheme byte appended to the public key before hashing. Single-signer
/// ed25519 accounts use scheme 0.
const ED25519_SCHEME: u8 = 0;

impl AccountAddress {
    pub const LENGTH: usize = 32;

    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Derives the address of a single-signer ed25519 account:
    /// `sha3_256(public_key || scheme_byte)`.
    pub fn from_ed25519_public_key(public_key: &[u8; 32]) -> Self {
        use sha3::{Digest, Sha3_256};
        let mut hasher = Sha3_256::new();
        hasher.update(public_key);
        hasher.update([ED25519_SCHEME]);
        Self(hasher.finalize().into())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex_literal(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex_literal())
    }
}

#[derive(Debug, Error)]
pub enum AddressParseError {
    #[error("account address must be 1-64 hex characters, got {0}")]
    Length(usize),
    #[error("invalid hex in account address: {0}")]
    Hex(#[from] hex::FromHexError),
}

impl FromStr for AccountAddress {
    type Err = AddressParseError;

    /// Accepts the address with or without the `0x` prefix; short forms
    /// are zero-padded on the left, matching how framework addresses such
    /// as `0x1` are written.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        if stripped.is_empty() || stripped.len() > 64 {
            return Err(AddressParseError::Length(stripped.len()));
        }
        let padded = format!("{:0>64}", stripped);
        let bytes = hex::decode(padded)?;
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| AddressParseError::Length(stripped.len()))?;
        Ok(Self(bytes))
    }
}

impl Serialize for AccountAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_hex_literal())
        } else {
            serializer.serialize_newtype_struct("AccountAddress", &self.0)
        }
    }
}

impl<'de> Deserialize<'de> for AccountAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            s.parse().map_err(de::Error::custom)
        } else {
            #[derive(Deserialize)]
            #[serde(rename = "AccountAddress")]
            struct Value([u8; 32]);
            Value::deserialize(deserializer).map(|v| AccountAddress(v.0))
        }
    }
}

/// Network identifier baked into every signed transaction. Signing against
/// the wrong chain id makes the transaction invalid on submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainId(pub u8);

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
