//! Deployment of pure super tokens

use alloy::providers::Provider;
use alloy_primitives::Address;
use superapp_abi::{superfluid::ISuperToken, tokens::IPureSuperToken};
use tracing::{info, warn};

use crate::{artifacts::Artifact, deploy::deploy_contract, errors::ScriptError, utils::send_tx};

/// The initializer arguments of a pure super token
#[derive(Clone, Debug)]
pub struct TokenParams {
    /// The super token factory the token registers with
    pub factory: Address,
    /// The token name
    pub name: String,
    /// The token symbol
    pub symbol: String,
    /// The account receiving the initial supply
    pub receiver: Address,
}

/// Deploy a pure super token logic contract from `artifact` and initialize it
pub async fn deploy_pure_super_token<P: Provider>(
    provider: &P,
    artifact: &Artifact,
    params: TokenParams,
) -> Result<Address, ScriptError> {
    let address = deploy_contract(provider, artifact, &[]).await?;
    info!("{} deployed to: {:#x}", artifact.contract_name, address);

    let token = IPureSuperToken::new(address, provider);
    let TokenParams {
        factory,
        name,
        symbol,
        receiver,
    } = params;
    send_tx(token.initialize(factory, name, symbol, receiver)).await?;

    // The token is live at this point, a failed read is only reported
    let token = ISuperToken::new(address, provider);
    match token.balanceOf(receiver).call().await {
        Ok(balance) => info!("initial supply of {:#x}: {}", receiver, balance),
        Err(e) => warn!("could not read the balance of {:#x}: {}", receiver, e),
    }

    Ok(address)
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{B256, U256};

    use super::*;
    use crate::test_helpers::{mock_provider, push_call_result, push_mined_tx};

    /// A minimal token artifact
    const TOKEN_JSON: &str = r#"{
        "contractName": "GoldLiteProxy",
        "sourceName": "src/GoldLiteProxy.sol",
        "abi": [],
        "bytecode": "0x6080604052"
    }"#;

    fn params() -> TokenParams {
        TokenParams {
            factory: Address::repeat_byte(0xfa),
            name: "Astro Gold Lite".to_string(),
            symbol: "ALITE".to_string(),
            receiver: Address::repeat_byte(0x5e),
        }
    }

    #[tokio::test]
    async fn test_deploy_token() {
        let (provider, asserter) = mock_provider();
        let artifact = Artifact::from_json(TOKEN_JSON).unwrap();
        let token = Address::repeat_byte(0x70);

        push_mined_tx(&asserter, B256::repeat_byte(1), Some(token));
        push_mined_tx(&asserter, B256::repeat_byte(2), None);
        push_call_result(&asserter, U256::from(1_000_000u64));

        let address = deploy_pure_super_token(&provider, &artifact, params()).await.unwrap();
        assert_eq!(address, token);
    }

    #[tokio::test]
    async fn test_failed_balance_read_keeps_token() {
        let (provider, asserter) = mock_provider();
        let artifact = Artifact::from_json(TOKEN_JSON).unwrap();
        let token = Address::repeat_byte(0x70);

        push_mined_tx(&asserter, B256::repeat_byte(1), Some(token));
        push_mined_tx(&asserter, B256::repeat_byte(2), None);
        asserter.push_failure_msg("header not found");

        let address = deploy_pure_super_token(&provider, &artifact, params()).await.unwrap();
        assert_eq!(address, token);
    }

    #[tokio::test]
    async fn test_failed_initialize_is_error() {
        let (provider, asserter) = mock_provider();
        let artifact = Artifact::from_json(TOKEN_JSON).unwrap();

        push_mined_tx(&asserter, B256::repeat_byte(1), Some(Address::repeat_byte(0x70)));
        asserter.push_failure_msg("execution reverted");

        let res = deploy_pure_super_token(&provider, &artifact, params()).await;
        assert!(matches!(res, Err(ScriptError::ContractInteraction(_))));
    }
}
