use octa_client::{ClientConfig, LocalAccount, RestClient};
use octa_common::{payload, AccountAddress, ChainId, RawTransaction};
use tempfile::tempdir;

// Everything up to submission is local: key handling, payload building,
// signing, and wire encoding.
#[test]
fn test_offline_signing_pipeline() {
    let dir = tempdir().unwrap();
    let key_file = dir.path().join("alice.key");

    let sender = LocalAccount::generate();
    sender.store(&key_file).unwrap();
    let sender = LocalAccount::load(&key_file).unwrap();

    let recipients: Vec<AccountAddress> = (0..4)
        .map(|_| LocalAccount::generate().address())
        .collect();
    let amounts = vec![1000, 2000, 3000, 4000];

    let payload = payload::batch_transfer(&recipients, &amounts).unwrap();
    let raw_txn = RawTransaction {
        sender: sender.address(),
        sequence_number: 0,
        payload,
        max_gas_amount: 100_000,
        gas_unit_price: 100,
        expiration_timestamp_secs: 1_700_000_000,
        chain_id: ChainId(2),
    };
    let raw_len = bcs::to_bytes(&raw_txn).unwrap().len();

    let signed = sender.sign_transaction(raw_txn).unwrap();
    let bytes = signed.to_bytes().unwrap();

    // Sender address leads the wire form; the ed25519 authenticator adds
    // a fixed 99 bytes.
    assert_eq!(&bytes[..32], sender.address().as_bytes());
    assert_eq!(bytes.len(), raw_len + 99);
}

#[test]
fn test_mismatched_batch_never_reaches_signing() {
    let recipients = vec![LocalAccount::generate().address()];
    let amounts = vec![1000, 2000];
    assert!(payload::batch_transfer(&recipients, &amounts).is_err());
}

#[tokio::test]
async fn test_unreachable_node_yields_absent_balances_for_all() {
    let config = ClientConfig {
        node_url: "http://127.0.0.1:1".to_string(),
        ..ClientConfig::default()
    };
    let client = RestClient::new(&config).unwrap();

    let addresses: Vec<AccountAddress> = (0..5)
        .map(|_| LocalAccount::generate().address())
        .collect();
    let balances =
        futures::future::join_all(addresses.iter().map(|a| client.maybe_balance(*a))).await;

    assert_eq!(balances.len(), 5);
    assert!(balances.iter().all(|b| b.is_none()));
}
