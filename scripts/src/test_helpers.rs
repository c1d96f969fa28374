//! Helpers for driving the scripts against a mocked RPC transport

use alloy::{
    providers::{Provider, ProviderBuilder},
    transports::mock::Asserter,
};
use alloy_primitives::{Address, Bytes, B256};
use alloy_sol_types::SolValue;
use serde_json::{json, Value};

/// A provider answering from `asserter`'s queue, without fillers, so that
/// sending a transaction is a single `eth_sendTransaction` request
pub(crate) fn mock_provider() -> (impl Provider + Clone, Asserter) {
    let asserter = Asserter::new();
    let provider = ProviderBuilder::new()
        .disable_recommended_fillers()
        .connect_mocked_client(asserter.clone());

    (provider, asserter)
}

/// A receipt for the transaction with the given hash
pub(crate) fn receipt(tx_hash: B256, success: bool, contract_address: Option<Address>) -> Value {
    json!({
        "type": "0x2",
        "status": if success { "0x1" } else { "0x0" },
        "cumulativeGasUsed": "0x5208",
        "logs": [],
        "logsBloom": format!("0x{}", "0".repeat(512)),
        "transactionHash": tx_hash,
        "transactionIndex": "0x0",
        "blockHash": B256::repeat_byte(0xbb),
        "blockNumber": "0x1",
        "gasUsed": "0x5208",
        "effectiveGasPrice": "0x1",
        "from": Address::repeat_byte(0xf3),
        "to": if contract_address.is_some() { Value::Null } else { json!(Address::repeat_byte(0xc0)) },
        "contractAddress": contract_address,
    })
}

/// Queue the responses to a transaction that is sent then mined
pub(crate) fn push_mined_tx(asserter: &Asserter, tx_hash: B256, contract_address: Option<Address>) {
    asserter.push_success(&tx_hash);
    asserter.push_success(&receipt(tx_hash, true, contract_address));
}

/// Queue the response to an `eth_call` returning `value`
pub(crate) fn push_call_result<T: SolValue>(asserter: &Asserter, value: T) {
    asserter.push_success(&Bytes::from(value.abi_encode()));
}
