//! Faucet client for crediting test funds on non-production networks.

use tracing::info;

use octa_common::AccountAddress;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::rest::RestClient;

/// Client for the faucet service. Funding transactions are waited to
/// finality through the paired REST client before the call returns, so a
/// successful `fund_account` means the octas are spendable.
pub struct FaucetClient {
    client: reqwest::Client,
    base_url: String,
    rest_client: RestClient,
}

impl FaucetClient {
    pub fn new(config: &ClientConfig, rest_client: RestClient) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.faucet_url.trim_end_matches('/').to_string(),
            rest_client,
        }
    }

    /// Credits `amount` octas to `address`, creating the account on-chain
    /// if it does not exist yet.
    pub async fn fund_account(&self, address: AccountAddress, amount: u64) -> Result<()> {
        let url = format!(
            "{}/mint?amount={}&address={}",
            self.base_url, amount, address
        );
        let response = self.client.post(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::Faucet(format!(
                "mint returned {status}: {message}"
            )));
        }

        // The faucet answers with the hashes of the transactions it
        // submitted on our behalf.
        let hashes: Vec<String> = response.json().await?;
        for hash in &hashes {
            self.rest_client.wait_for_transaction(hash).await?;
        }

        info!(%address, amount, "faucet funding confirmed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_faucet_client_creation() {
        let config = ClientConfig::default();
        let rest_client = RestClient::new(&config).unwrap();
        let _faucet = FaucetClient::new(&config, rest_client);
    }
}
