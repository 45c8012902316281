//! Builders for the framework `aptos_account` entry functions.

use serde::Serialize;
use thiserror::Error;

use crate::transaction::{
    EntryFunction, Identifier, ModuleId, StructTag, TransactionPayload, TypeTag,
};
use crate::AccountAddress;

const CORE_CODE_ADDRESS_BYTES: [u8; 32] = {
    let mut bytes = [0u8; 32];
    bytes[31] = 1;
    bytes
};

/// Address of the framework account hosting `aptos_account` and
/// `aptos_coin`.
pub const CORE_CODE_ADDRESS: AccountAddress = AccountAddress::new(CORE_CODE_ADDRESS_BYTES);

const ACCOUNT_MODULE: &str = "aptos_account";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("batch is empty")]
    Empty,
    #[error("recipient and amount counts differ: {recipients} recipients, {amounts} amounts")]
    LengthMismatch { recipients: usize, amounts: usize },
    #[error("argument encoding failed: {0}")]
    Encoding(String),
}

impl From<bcs::Error> for PayloadError {
    fn from(err: bcs::Error) -> Self {
        PayloadError::Encoding(err.to_string())
    }
}

/// Builds `0x1::aptos_account::batch_transfer`, moving `amounts[i]` octas
/// to `recipients[i]`.
///
/// The two sequences must have the same non-zero length. This is checked
/// here, before anything is signed or submitted.
pub fn batch_transfer(
    recipients: &[AccountAddress],
    amounts: &[u64],
) -> Result<TransactionPayload, PayloadError> {
    if recipients.is_empty() && amounts.is_empty() {
        return Err(PayloadError::Empty);
    }
    if recipients.len() != amounts.len() {
        return Err(PayloadError::LengthMismatch {
            recipients: recipients.len(),
            amounts: amounts.len(),
        });
    }
    let args = vec![encode_arg(&recipients)?, encode_arg(&amounts)?];
    Ok(entry_function("batch_transfer", vec![], args))
}

/// Builds `0x1::aptos_account::transfer`. The recipient account is created
/// on-chain if it does not exist yet.
pub fn transfer(to: AccountAddress, amount: u64) -> Result<TransactionPayload, PayloadError> {
    let args = vec![encode_arg(&to)?, encode_arg(&amount)?];
    Ok(entry_function("transfer", vec![], args))
}

/// Builds `0x1::aptos_account::transfer_coins<CoinType>` for an arbitrary
/// coin type.
pub fn transfer_coins(
    to: AccountAddress,
    amount: u64,
    coin_type: TypeTag,
) -> Result<TransactionPayload, PayloadError> {
    let args = vec![encode_arg(&to)?, encode_arg(&amount)?];
    Ok(entry_function("transfer_coins", vec![coin_type], args))
}

/// The native coin type, `0x1::aptos_coin::AptosCoin`.
pub fn aptos_coin_type_tag() -> TypeTag {
    TypeTag::Struct(Box::new(StructTag {
        address: CORE_CODE_ADDRESS,
        module: Identifier::new("aptos_coin"),
        name: Identifier::new("AptosCoin"),
        type_args: vec![],
    }))
}

fn entry_function(
    function: &str,
    ty_args: Vec<TypeTag>,
    args: Vec<Vec<u8>>,
) -> TransactionPayload {
    TransactionPayload::EntryFunction(EntryFunction::new(
        ModuleId {
            address: CORE_CODE_ADDRESS,
            name: Identifier::new(ACCOUNT_MODULE),
        },
        Identifier::new(function),
        ty_args,
        args,
    ))
}

fn encode_arg<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, PayloadError> {
    Ok(bcs::to_bytes(value)?)
}
