//! Wire-level transaction types. Field and variant order in this module is
//! the BCS encoding order and must not be rearranged.

use serde::ser::SerializeStructVariant;
use serde::{Serialize, Serializer};
use std::fmt;

use crate::{AccountAddress, ChainId};

/// Domain-separation prefix mixed into every raw-transaction signing
/// message.
const RAW_TRANSACTION_SALT: &[u8] = b"APTOS::RawTransaction";

/// A Move identifier: a module or function name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identifier(String);

impl Identifier {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fully qualified module name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleId {
    pub address: AccountAddress,
    pub name: Identifier,
}

/// Fully qualified struct name, e.g. `0x1::aptos_coin::AptosCoin`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructTag {
    pub address: AccountAddress,
    pub module: Identifier,
    pub name: Identifier,
    pub type_args: Vec<TypeTag>,
}

/// The Move type grammar, as far as entry-function type arguments need it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TypeTag {
    Bool,
    U8,
    U64,
    U128,
    Address,
    Signer,
    Vector(Box<TypeTag>),
    Struct(Box<StructTag>),
}

/// An entry-function invocation: target module and function, type
/// arguments, and the already-BCS-encoded argument blobs in declaration
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryFunction {
    pub module: ModuleId,
    pub function: Identifier,
    pub ty_args: Vec<TypeTag>,
    pub args: Vec<Vec<u8>>,
}

impl EntryFunction {
    pub fn new(
        module: ModuleId,
        function: Identifier,
        ty_args: Vec<TypeTag>,
        args: Vec<Vec<u8>>,
    ) -> Self {
        Self {
            module,
            function,
            ty_args,
            args,
        }
    }
}

/// What a transaction executes. Entry functions are variant 2 on the wire;
/// scripts (0) and module bundles (1) are never produced by this crate,
/// but the index must hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionPayload {
    EntryFunction(EntryFunction),
}

impl Serialize for TransactionPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TransactionPayload::EntryFunction(entry_function) => serializer
                .serialize_newtype_variant(
                    "TransactionPayload",
                    2,
                    "EntryFunction",
                    entry_function,
                ),
        }
    }
}

/// The transaction as the sender authorizes it, before signing.
#[derive(Debug, Clone, Serialize)]
pub struct RawTransaction {
    pub sender: AccountAddress,
    pub sequence_number: u64,
    pub payload: TransactionPayload,
    pub max_gas_amount: u64,
    pub gas_unit_price: u64,
    pub expiration_timestamp_secs: u64,
    pub chain_id: ChainId,
}

impl RawTransaction {
    /// The exact byte string the sender signs: the hashed domain prefix
    /// followed by the BCS encoding of the transaction.
    pub fn signing_message(&self) -> Result<Vec<u8>, bcs::Error> {
        use sha3::{Digest, Sha3_256};
        let mut message = Sha3_256::digest(RAW_TRANSACTION_SALT).to_vec();
        message.extend(bcs::to_bytes(self)?);
        Ok(message)
    }
}

/// 32-byte ed25519 public key; length-prefixed bytes on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ed25519PublicKey(pub [u8; 32]);

impl Serialize for Ed25519PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&format!("0x{}", hex::encode(self.0)))
        } else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

/// 64-byte ed25519 signature; length-prefixed bytes on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ed25519Signature(pub [u8; 64]);

impl Serialize for Ed25519Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&format!("0x{}", hex::encode(self.0)))
        } else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

/// Sender authentication. Single ed25519 is variant 0 on the wire.
#[derive(Debug, Clone)]
pub enum TransactionAuthenticator {
    Ed25519 {
        public_key: Ed25519PublicKey,
        signature: Ed25519Signature,
    },
}

impl Serialize for TransactionAuthenticator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TransactionAuthenticator::Ed25519 {
                public_key,
                signature,
            } => {
                let mut sv = serializer.serialize_struct_variant(
                    "TransactionAuthenticator",
                    0,
                    "Ed25519",
                    2,
                )?;
                sv.serialize_field("public_key", public_key)?;
                sv.serialize_field("signature", signature)?;
                sv.end()
            }
        }
    }
}

/// A raw transaction plus the sender's authenticator; immutable once
/// built, submitted exactly once.
#[derive(Debug, Clone, Serialize)]
pub struct SignedTransaction {
    pub raw_txn: RawTransaction,
    pub authenticator: TransactionAuthenticator,
}

impl SignedTransaction {
    /// The BCS bytes submitted to the node.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bcs::Error> {
        bcs::to_bytes(self)
    }
}
