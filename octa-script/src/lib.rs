//! Helpers for the batch-transfer driver binary.

use std::path::Path;

use tracing::info;

use octa_client::{ClientError, FaucetClient, LocalAccount};

/// Block-explorer origin for the report's transaction link.
pub const EXPLORER_BASE_URL: &str = "https://explorer.aptoslabs.com";

/// Explorer page for a committed transaction version.
pub fn explorer_url(version: u64) -> String {
    format!("{EXPLORER_BASE_URL}/txn/{version}?network=testnet")
}

/// Formats a balance for the report. Accounts with nothing to query print
/// as `unknown` rather than failing the report.
pub fn display_balance(balance: Option<u64>) -> String {
    match balance {
        Some(value) => value.to_string(),
        None => "unknown".to_string(),
    }
}

/// Loads the sender account from `key_file`, or generates, stores, and
/// faucet-funds a fresh one when no usable key file is present.
pub async fn load_or_create_sender(
    key_file: &Path,
    faucet_client: &FaucetClient,
    funding_amount: u64,
) -> Result<LocalAccount, ClientError> {
    match LocalAccount::load(key_file) {
        Ok(account) => {
            info!(address = %account.address(), "loaded existing sender account");
            Ok(account)
        }
        Err(err) => {
            info!(%err, "no usable key file, generating a fresh sender");
            let account = LocalAccount::generate();
            account.store(key_file)?;
            faucet_client.fund_account(account.address(), funding_amount).await?;
            Ok(account)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explorer_url_format() {
        assert_eq!(
            explorer_url(562),
            "https://explorer.aptoslabs.com/txn/562?network=testnet"
        );
    }

    #[test]
    fn test_display_balance_known() {
        assert_eq!(display_balance(Some(100_000_000)), "100000000");
    }

    #[test]
    fn test_display_balance_absent() {
        assert_eq!(display_balance(None), "unknown");
    }
}
