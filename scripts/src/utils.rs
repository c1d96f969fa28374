//! Utilities for the super app scripts

use std::str::FromStr;

use alloy::{
    contract::{CallBuilder, CallDecoder},
    network::Ethereum,
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::TransactionReceipt,
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use alloy_primitives::{aliases::I96, Address, TxHash, I256};
use tokio::time::sleep;

use crate::{
    constants::{RECEIPT_POLL_ATTEMPTS, RECEIPT_POLL_INTERVAL},
    errors::ScriptError,
};

/// Sets up the client with which the scripts send transactions, signing with
/// the given private key. Returns the client and the signer's address.
pub fn setup_client(priv_key: &str, rpc_url: &str) -> Result<(DynProvider, Address), ScriptError> {
    let signer = PrivateKeySigner::from_str(priv_key)
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    let deployer = signer.address();

    let url = Url::parse(rpc_url).map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    let provider = ProviderBuilder::new().wallet(signer).connect_http(url);

    Ok((DynProvider::new(provider), deployer))
}

/// Send a transaction and wait for it to succeed
pub async fn send_tx<P: Provider, C: CallDecoder>(
    tx: CallBuilder<P, C, Ethereum>,
) -> Result<TransactionReceipt, ScriptError> {
    let pending = tx
        .send()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    wait_for_receipt(pending.provider(), *pending.tx_hash(), ScriptError::ContractInteraction)
        .await
}

/// Poll for the receipt of a sent transaction, failing with `err` if it
/// reverted or was not mined in time
pub async fn wait_for_receipt<P: Provider>(
    provider: &P,
    tx_hash: TxHash,
    err: fn(String) -> ScriptError,
) -> Result<TransactionReceipt, ScriptError> {
    for _ in 0..RECEIPT_POLL_ATTEMPTS {
        let receipt = provider
            .get_transaction_receipt(tx_hash)
            .await
            .map_err(|e| err(e.to_string()))?;

        match receipt {
            Some(receipt) if receipt.status() => return Ok(receipt),
            Some(_) => return Err(err(format!("tx {:#x} reverted", tx_hash))),
            None => sleep(RECEIPT_POLL_INTERVAL).await,
        }
    }

    Err(err(format!(
        "tx {:#x} not mined after {} receipt requests",
        tx_hash, RECEIPT_POLL_ATTEMPTS
    )))
}

/// Parse a flow rate, in wei per second
pub fn parse_flow_rate(s: &str) -> Result<I96, String> {
    I96::from_dec_str(s).map_err(|e| format!("invalid flow rate {s}: {e}"))
}

/// Parse a signed tile coordinate
pub fn parse_coordinate(s: &str) -> Result<I256, String> {
    I256::from_dec_str(s).map_err(|e| format!("invalid coordinate {s}: {e}"))
}
