use octa_client::{ClientConfig, FaucetClient, LocalAccount, RestClient};
use octa_script::load_or_create_sender;
use tempfile::tempdir;

fn offline_clients() -> (RestClient, FaucetClient) {
    // Nothing listens on port 1, so any attempt to fund would fail loudly.
    let config = ClientConfig {
        node_url: "http://127.0.0.1:1".to_string(),
        faucet_url: "http://127.0.0.1:1".to_string(),
        ..ClientConfig::default()
    };
    let rest_client = RestClient::new(&config).unwrap();
    let faucet_client = FaucetClient::new(&config, rest_client.clone());
    (rest_client, faucet_client)
}

// A key file that already exists must be loaded as-is; the faucet is never
// consulted on that path.
#[tokio::test]
async fn test_bootstrap_loads_existing_account_without_funding() {
    let dir = tempdir().unwrap();
    let key_file = dir.path().join("alice.key");

    let original = LocalAccount::generate();
    original.store(&key_file).unwrap();

    let (_rest, faucet) = offline_clients();
    let first = load_or_create_sender(&key_file, &faucet, 100_000_000)
        .await
        .unwrap();
    let second = load_or_create_sender(&key_file, &faucet, 100_000_000)
        .await
        .unwrap();

    assert_eq!(first.address(), original.address());
    assert_eq!(second.address(), original.address());
}

// With no key file and no reachable faucet, bootstrap fails instead of
// pretending the sender is funded; the generated key is still persisted.
#[tokio::test]
async fn test_bootstrap_generation_requires_the_faucet() {
    let dir = tempdir().unwrap();
    let key_file = dir.path().join("alice.key");

    let (_rest, faucet) = offline_clients();
    let result = load_or_create_sender(&key_file, &faucet, 100_000_000).await;

    assert!(result.is_err());
    assert!(key_file.exists());
    assert!(LocalAccount::load(&key_file).is_ok());
}
