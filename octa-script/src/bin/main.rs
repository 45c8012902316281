use std::path::PathBuf;
use std::process;

use clap::Parser;
use futures::future::join_all;
use tracing::error;

use octa_client::{ClientConfig, ClientError, FaucetClient, LocalAccount, RestClient};
use octa_common::AccountAddress;
use octa_script::{display_balance, explorer_url, load_or_create_sender};

/// Spread octas over freshly generated recipient accounts in one batch
/// transaction, reporting balances before and after.
#[derive(Parser, Debug)]
#[command(name = "octa")]
struct Args {
    /// Key file holding the sender account; created on first run
    #[arg(long, default_value = "alice.key")]
    key_file: PathBuf,

    /// Octas to send, one freshly generated recipient per amount
    #[arg(long, value_delimiter = ',', default_values_t = vec![1000u64, 2000, 3000, 4000])]
    amounts: Vec<u64>,

    /// Faucet credit for a newly generated sender, in octas
    #[arg(long, default_value_t = 100_000_000)]
    fund: u64,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    if let Err(err) = run(args).await {
        error!("run failed: {err}");
        process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), ClientError> {
    let config = ClientConfig::from_env();
    let rest_client = RestClient::new(&config)?;
    let faucet_client = FaucetClient::new(&config, rest_client.clone());

    let sender = load_or_create_sender(&args.key_file, &faucet_client, args.fund).await?;
    let recipients: Vec<LocalAccount> = (0..args.amounts.len())
        .map(|_| LocalAccount::generate())
        .collect();
    let recipient_addresses: Vec<AccountAddress> =
        recipients.iter().map(|r| r.address()).collect();

    println!("\n=== Addresses ===");
    println!("Sender: {}", sender.address());
    for (i, address) in recipient_addresses.iter().enumerate() {
        println!("Recipient {}: {}", i + 1, address);
    }

    print_balances("Initial Balances", &rest_client, sender.address(), &recipient_addresses)
        .await;

    let executed = rest_client
        .batch_transfer(&sender, &recipient_addresses, &args.amounts)
        .await?;
    println!("\n=== Transaction ===");
    println!("{}\n", explorer_url(executed.version));

    print_balances("Final Balances", &rest_client, sender.address(), &recipient_addresses)
        .await;

    Ok(())
}

async fn print_balances(
    title: &str,
    rest_client: &RestClient,
    sender: AccountAddress,
    recipients: &[AccountAddress],
) {
    let mut addresses = vec![sender];
    addresses.extend_from_slice(recipients);

    // Each lookup folds its own failure into absence, so the join itself
    // cannot fail.
    let balances = join_all(
        addresses
            .iter()
            .map(|address| rest_client.maybe_balance(*address)),
    )
    .await;

    println!("\n=== {title} ===");
    println!("Sender: {}", display_balance(balances[0]));
    for (i, balance) in balances[1..].iter().enumerate() {
        println!("Recipient {}: {}", i + 1, display_balance(*balance));
    }
}
