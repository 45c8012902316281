//! REST client for a fullnode's v1 API.

use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::{Deserialize, Deserializer};
use tokio::sync::OnceCell;
use tracing::debug;

use octa_common::{payload, AccountAddress, ChainId, RawTransaction, SignedTransaction, TransactionPayload};

use crate::account::LocalAccount;
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};

/// Content type for BCS-encoded signed-transaction submission.
const BCS_SIGNED_TXN_CONTENT_TYPE: &str = "application/x.aptos.signed_transaction+bcs";

/// Resource holding an account's native coin balance.
const APTOS_COIN_STORE: &str = "0x1::coin::CoinStore<0x1::aptos_coin::AptosCoin>";

/// Chain-level metadata reported by the node root endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerInfo {
    pub chain_id: u8,
    #[serde(deserialize_with = "u64_from_str")]
    pub ledger_version: u64,
    #[serde(deserialize_with = "u64_from_str")]
    pub ledger_timestamp: u64,
}

/// On-chain account metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountData {
    #[serde(deserialize_with = "u64_from_str")]
    pub sequence_number: u64,
    pub authentication_key: String,
}

/// Submission acknowledgement; the transaction is not final yet.
#[derive(Debug, Clone, Deserialize)]
pub struct PendingTransaction {
    pub hash: String,
}

/// A transaction the chain has committed.
#[derive(Debug, Clone, Deserialize)]
pub struct ExecutedTransaction {
    #[serde(deserialize_with = "u64_from_str")]
    pub version: u64,
    pub hash: String,
    pub success: bool,
    pub vm_status: String,
    #[serde(deserialize_with = "u64_from_str")]
    pub gas_used: u64,
}

/// Async client for the fullnode REST API.
///
/// Cloning is cheap; clones share the underlying connection pool, and the
/// pool is released when the last clone goes out of scope.
#[derive(Clone)]
pub struct RestClient {
    client: reqwest::Client,
    base_url: String,
    config: ClientConfig,
    chain_id: Arc<OnceCell<ChainId>>,
}

impl RestClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url: config.node_url.trim_end_matches('/').to_string(),
            config: config.clone(),
            chain_id: Arc::new(OnceCell::new()),
        })
    }

    pub async fn ledger_info(&self) -> Result<LedgerInfo> {
        let url = format!("{}/", self.base_url);
        let response = self.client.get(&url).send().await?;
        json_or_api_error(response).await
    }

    /// Chain id of the connected network, fetched once per client and
    /// cached for every subsequent signing.
    pub async fn chain_id(&self) -> Result<ChainId> {
        let id = self
            .chain_id
            .get_or_try_init(|| async {
                let info = self.ledger_info().await?;
                Ok::<_, ClientError>(ChainId(info.chain_id))
            })
            .await?;
        Ok(*id)
    }

    pub async fn account(&self, address: AccountAddress) -> Result<AccountData> {
        let url = format!("{}/accounts/{}", self.base_url, address);
        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ClientError::AccountNotFound(address));
        }
        json_or_api_error(response).await
    }

    pub async fn account_resource(
        &self,
        address: AccountAddress,
        resource_type: &str,
    ) -> Result<serde_json::Value> {
        let url = format!(
            "{}/accounts/{}/resource/{}",
            self.base_url, address, resource_type
        );
        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ClientError::AccountNotFound(address));
        }
        json_or_api_error(response).await
    }

    /// Balance of the account's native coin store, in octas. Fails for
    /// accounts with no coin store on-chain.
    pub async fn account_balance(&self, address: AccountAddress) -> Result<u64> {
        let resource = self.account_resource(address, APTOS_COIN_STORE).await?;
        let value = resource
            .pointer("/data/coin/value")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                ClientError::UnexpectedResponse("coin store without a value field".into())
            })?;
        value
            .parse()
            .map_err(|_| ClientError::UnexpectedResponse(format!("non-numeric balance: {value}")))
    }

    /// Best-effort balance lookup. Accounts that do not exist on-chain yet
    /// are an expected outcome and resolve to `None`; no failure reaches
    /// the caller.
    pub async fn maybe_balance(&self, address: AccountAddress) -> Option<u64> {
        match self.account_balance(address).await {
            Ok(balance) => Some(balance),
            Err(err) => {
                debug!(%address, %err, "balance unavailable");
                None
            }
        }
    }

    /// Builds and signs a transaction invoking `payload` from `sender`,
    /// using the live sequence number and the cached chain id.
    pub async fn create_signed_transaction(
        &self,
        sender: &LocalAccount,
        payload: TransactionPayload,
    ) -> Result<SignedTransaction> {
        let sequence_number = self.account(sender.address()).await?.sequence_number;
        let chain_id = self.chain_id().await?;
        let raw_txn = RawTransaction {
            sender: sender.address(),
            sequence_number,
            payload,
            max_gas_amount: self.config.max_gas_amount,
            gas_unit_price: self.config.gas_unit_price,
            expiration_timestamp_secs: unix_now_secs() + self.config.expiration_secs,
            chain_id,
        };
        Ok(sender.sign_transaction(raw_txn)?)
    }

    pub async fn submit_bcs(&self, signed: &SignedTransaction) -> Result<PendingTransaction> {
        let url = format!("{}/transactions", self.base_url);
        let body = signed.to_bytes()?;
        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, BCS_SIGNED_TXN_CONTENT_TYPE)
            .body(body)
            .send()
            .await?;
        json_or_api_error(response).await
    }

    /// Blocks until the transaction leaves the pending state, then checks
    /// its execution status. Gives up after the configured wait timeout.
    pub async fn wait_for_transaction(&self, hash: &str) -> Result<ExecutedTransaction> {
        let deadline = Instant::now() + self.config.wait.timeout;
        loop {
            if let Some(executed) = self.committed_transaction(hash).await? {
                if !executed.success {
                    return Err(ClientError::TransactionFailed {
                        hash: hash.to_string(),
                        vm_status: executed.vm_status,
                    });
                }
                return Ok(executed);
            }
            if Instant::now() >= deadline {
                return Err(ClientError::ConfirmationTimeout {
                    hash: hash.to_string(),
                });
            }
            tokio::time::sleep(self.config.wait.poll_interval).await;
        }
    }

    /// `Ok(None)` while the transaction is pending or not yet known to
    /// this node.
    async fn committed_transaction(&self, hash: &str) -> Result<Option<ExecutedTransaction>> {
        let url = format!("{}/transactions/by_hash/{}", self.base_url, hash);
        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let value: serde_json::Value = json_or_api_error(response).await?;
        match value.get("type").and_then(|t| t.as_str()) {
            Some("pending_transaction") => Ok(None),
            Some("user_transaction") => Ok(Some(serde_json::from_value(value)?)),
            other => Err(ClientError::UnexpectedResponse(format!(
                "unexpected transaction type: {other:?}"
            ))),
        }
    }

    pub async fn submit_and_wait(&self, signed: &SignedTransaction) -> Result<ExecutedTransaction> {
        let pending = self.submit_bcs(signed).await?;
        self.wait_for_transaction(&pending.hash).await
    }

    /// Moves `amounts[i]` octas from `sender` to `recipients[i]` in a
    /// single transaction. The sequences are validated before anything is
    /// signed or sent, and the whole batch commits or fails as one unit.
    pub async fn batch_transfer(
        &self,
        sender: &LocalAccount,
        recipients: &[AccountAddress],
        amounts: &[u64],
    ) -> Result<ExecutedTransaction> {
        let payload = payload::batch_transfer(recipients, amounts)?;
        let signed = self.create_signed_transaction(sender, payload).await?;
        self.submit_and_wait(&signed).await
    }

    /// Single-recipient transfer, creating the recipient account on-chain
    /// if it does not exist yet.
    pub async fn transfer(
        &self,
        sender: &LocalAccount,
        to: AccountAddress,
        amount: u64,
    ) -> Result<ExecutedTransaction> {
        let payload = payload::transfer(to, amount)?;
        let signed = self.create_signed_transaction(sender, payload).await?;
        self.submit_and_wait(&signed).await
    }
}

async fn json_or_api_error<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        Ok(response.json().await?)
    } else {
        let message = response.text().await.unwrap_or_default();
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

fn unix_now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

fn u64_from_str<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<u64, D::Error> {
    let s = String::deserialize(deserializer)?;
    s.parse().map_err(serde::de::Error::custom)
}
