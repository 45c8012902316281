//! Local account management: keypair generation, persistence, signing.

use std::fs;
use std::path::Path;

use ed25519_dalek::{Signer, SigningKey};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use octa_common::transaction::{Ed25519PublicKey, Ed25519Signature, TransactionAuthenticator};
use octa_common::{AccountAddress, RawTransaction, SignedTransaction};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read key file: {0}")]
    Io(#[from] std::io::Error),
    #[error("key file is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("invalid key material: {0}")]
    InvalidKey(String),
}

/// On-disk form of a persisted account.
#[derive(Serialize, Deserialize)]
struct StoredAccount {
    account_address: String,
    private_key: String,
}

/// An ed25519 keypair together with its derived on-chain address.
pub struct LocalAccount {
    signing_key: SigningKey,
    address: AccountAddress,
}

impl LocalAccount {
    /// Creates an account with a fresh random keypair.
    pub fn generate() -> Self {
        let mut secret = [0u8; 32];
        OsRng.fill_bytes(&mut secret);
        Self::from_private_key_bytes(secret)
    }

    pub fn from_private_key_bytes(secret: [u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(&secret);
        let address =
            AccountAddress::from_ed25519_public_key(&signing_key.verifying_key().to_bytes());
        Self {
            signing_key,
            address,
        }
    }

    /// Loads a previously stored account. A missing or unreadable key file
    /// is an ordinary outcome the caller recovers from, not a crash.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let contents = fs::read_to_string(path)?;
        let stored: StoredAccount = serde_json::from_str(&contents)?;
        let secret = decode_key(&stored.private_key)?;
        Ok(Self::from_private_key_bytes(secret))
    }

    /// Persists the keypair so a later run loads the same account instead
    /// of generating a new one.
    pub fn store(&self, path: impl AsRef<Path>) -> Result<(), LoadError> {
        let stored = StoredAccount {
            account_address: self.address.to_hex_literal(),
            private_key: format!("0x{}", hex::encode(self.signing_key.to_bytes())),
        };
        fs::write(path, serde_json::to_string_pretty(&stored)?)?;
        Ok(())
    }

    pub fn address(&self) -> AccountAddress {
        self.address
    }

    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// Signs a raw transaction, producing the submittable form.
    pub fn sign_transaction(
        &self,
        raw_txn: RawTransaction,
    ) -> Result<SignedTransaction, bcs::Error> {
        let message = raw_txn.signing_message()?;
        let signature = self.signing_key.sign(&message);
        Ok(SignedTransaction {
            raw_txn,
            authenticator: TransactionAuthenticator::Ed25519 {
                public_key: Ed25519PublicKey(self.public_key_bytes()),
                signature: Ed25519Signature(signature.to_bytes()),
            },
        })
    }
}

fn decode_key(hex_str: &str) -> Result<[u8; 32], LoadError> {
    let stripped = hex_str.strip_prefix("0x").unwrap_or(hex_str);
    let bytes = hex::decode(stripped).map_err(|e| LoadError::InvalidKey(e.to_string()))?;
    bytes
        .try_into()
        .map_err(|_| LoadError::InvalidKey("expected a 32-byte private key".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Verifier, VerifyingKey};
    use octa_common::{payload, ChainId};
    use tempfile::tempdir;

    fn sample_raw_transaction(sender: &LocalAccount) -> RawTransaction {
        let recipients = vec![AccountAddress::new([3u8; 32])];
        RawTransaction {
            sender: sender.address(),
            sequence_number: 0,
            payload: payload::batch_transfer(&recipients, &[1000]).unwrap(),
            max_gas_amount: 100_000,
            gas_unit_price: 100,
            expiration_timestamp_secs: 1_700_000_000,
            chain_id: ChainId(2),
        }
    }

    #[test]
    fn test_generated_accounts_are_distinct() {
        assert_ne!(
            LocalAccount::generate().address(),
            LocalAccount::generate().address()
        );
    }

    #[test]
    fn test_address_derivation_is_idempotent() {
        let secret = [9u8; 32];
        let first = LocalAccount::from_private_key_bytes(secret);
        let second = LocalAccount::from_private_key_bytes(secret);
        assert_eq!(first.address(), second.address());
    }

    #[test]
    fn test_store_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("alice.key");

        let account = LocalAccount::generate();
        account.store(&path).unwrap();

        let reloaded = LocalAccount::load(&path).unwrap();
        assert_eq!(reloaded.address(), account.address());
        assert_eq!(reloaded.public_key_bytes(), account.public_key_bytes());

        // Loading a second time still yields the same account.
        let again = LocalAccount::load(&path).unwrap();
        assert_eq!(again.address(), account.address());
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let result = LocalAccount::load(dir.path().join("absent.key"));
        assert!(matches!(result, Err(LoadError::Io(_))));
    }

    #[test]
    fn test_load_rejects_corrupt_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("garbage.key");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            LocalAccount::load(&path),
            Err(LoadError::Malformed(_))
        ));
    }

    #[test]
    fn test_load_rejects_short_key() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("short.key");
        fs::write(
            &path,
            r#"{"account_address": "0x1", "private_key": "0xabcd"}"#,
        )
        .unwrap();
        assert!(matches!(
            LocalAccount::load(&path),
            Err(LoadError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_signature_verifies_against_signing_message() {
        let account = LocalAccount::from_private_key_bytes([5u8; 32]);
        let raw_txn = sample_raw_transaction(&account);
        let message = raw_txn.signing_message().unwrap();

        let signed = account.sign_transaction(raw_txn).unwrap();
        let TransactionAuthenticator::Ed25519 {
            public_key,
            signature,
        } = signed.authenticator;

        let verifying_key = VerifyingKey::from_bytes(&public_key.0).unwrap();
        let signature = ed25519_dalek::Signature::from_bytes(&signature.0);
        assert!(verifying_key.verify(&message, &signature).is_ok());
    }

    #[test]
    fn test_signed_transaction_encodes() {
        let account = LocalAccount::from_private_key_bytes([5u8; 32]);
        let raw_txn = sample_raw_transaction(&account);
        let signed = account.sign_transaction(raw_txn).unwrap();
        let bytes = signed.to_bytes().unwrap();
        assert_eq!(&bytes[..32], account.address().as_bytes());
    }
}
