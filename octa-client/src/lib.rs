pub mod account;
pub mod config;
pub mod error;
pub mod faucet;
pub mod rest;

pub use account::{LoadError, LocalAccount};
pub use config::{ClientConfig, WaitConfig};
pub use error::ClientError;
pub use faucet::FaucetClient;
pub use rest::{ExecutedTransaction, PendingTransaction, RestClient};
