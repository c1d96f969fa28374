//! Implementations of the various scripts

use alloy::providers::Provider;
use alloy_primitives::{Address, Bytes};
use alloy_sol_types::{SolCall, SolValue};
use superapp_abi::{
    mission_control::IMissionControlStream::initializeCall,
    superfluid::{IConstantFlowAgreementV1, ISuperfluid},
    user_data::{encode_place_orders, encode_update_orders, PlaceOrder, RemoveOrder},
};
use tracing::{info, warn};

use crate::{
    cli::{
        DeployArgs, DeployLiteTokenArgs, DeploySuperAppArgs, DeployTokenArgs, TileFlowRequest,
        TokenArgs, UpgradeSuperAppArgs,
    },
    constants::{
        LITE_TOKEN_CONTRACT, LITE_TOKEN_KEY, LITE_TOKEN_SOURCE, MINTABLE_TOKEN_CONTRACT,
        MINTABLE_TOKEN_KEY, MINTABLE_TOKEN_SOURCE, MISSION_CONTROL_STREAM_CONTRACT,
        MISSION_CONTROL_STREAM_KEY, MISSION_CONTROL_STREAM_PROXY_KEY,
        MISSION_CONTROL_STREAM_SOURCE, VERIFICATION_SETTLE_DELAY,
    },
    context::ScriptContext,
    deploy::{deploy_and_verify, deploy_contract, deploy_transparent_proxy, ProxyArtifacts},
    deployments::write_deployment,
    errors::ScriptError,
    flows::{mutate_flow, FlowAction, FlowParams},
    tokens::{deploy_pure_super_token, TokenParams},
    upgrade::upgrade_proxy,
    verify::EtherscanVerifier,
};

/// Deploy the super app without a proxy, then verify it
pub async fn deploy(args: DeployArgs, ctx: &ScriptContext) -> Result<(), ScriptError> {
    let network = ctx.network().await?;
    info!("host: {:#x}", network.host);
    info!("Mission Control: {:#x}", args.mission);
    info!("Accepted Super Token 1: {:#x}", args.token1);
    info!("Accepted Super Token 2: {:#x}", args.token2);

    let artifact = ctx.artifact(MISSION_CONTROL_STREAM_SOURCE, MISSION_CONTROL_STREAM_CONTRACT)?;
    let constructor_args = Bytes::from(
        (network.host, args.token1, args.token2, args.mission, args.registration_key)
            .abi_encode_params(),
    );

    let verifier = EtherscanVerifier::new(
        network.explorer_api_url.clone(),
        ctx.etherscan_api_key.clone(),
    )?;
    let record = deploy_and_verify(
        &ctx.provider,
        &verifier,
        &artifact,
        constructor_args,
        VERIFICATION_SETTLE_DELAY,
    )
    .await?;

    info!("verification: {:?}", record.verification);
    write_deployment(&ctx.deployments_path, MISSION_CONTROL_STREAM_KEY, &record)
}

/// Deploy the super app behind a transparent proxy, initializing it through
/// the proxy
pub async fn deploy_super_app(
    args: DeploySuperAppArgs,
    ctx: &ScriptContext,
) -> Result<(), ScriptError> {
    let network = ctx.network().await?;
    info!("Mission Control: {:#x}", args.mission);
    info!("Accepted Super Token 1: {:#x}", args.token1);
    info!("Accepted Super Token 2: {:#x}", args.token2);

    let implementation_artifact =
        ctx.artifact(MISSION_CONTROL_STREAM_SOURCE, MISSION_CONTROL_STREAM_CONTRACT)?;
    let proxy_artifacts = ProxyArtifacts::locate(&ctx.artifacts_dir, &ctx.node_modules_dir)?;

    let implementation =
        deploy_contract(&ctx.provider, &implementation_artifact, &[]).await?;
    info!("{} implementation deployed to: {:#x}", MISSION_CONTROL_STREAM_CONTRACT, implementation);

    let init_calldata = Bytes::from(
        initializeCall {
            host: network.host,
            acceptedToken1: args.token1,
            acceptedToken2: args.token2,
            missionControl: args.mission,
        }
        .abi_encode(),
    );

    let owner = args.owner.unwrap_or(ctx.deployer);
    let deployment = deploy_transparent_proxy(
        &ctx.provider,
        &proxy_artifacts,
        implementation,
        owner,
        ctx.deployer,
        init_calldata,
    )
    .await?;

    info!("{} deployed to: {:#x}", MISSION_CONTROL_STREAM_CONTRACT, deployment.proxy);
    info!("proxy admin: {:#x}", deployment.proxy_admin);
    write_deployment(&ctx.deployments_path, MISSION_CONTROL_STREAM_PROXY_KEY, &deployment)
}

/// Upgrade the super app proxy to a new implementation
pub async fn upgrade_super_app(
    args: UpgradeSuperAppArgs,
    ctx: &ScriptContext,
) -> Result<(), ScriptError> {
    ctx.network().await?;
    info!("Super App: {:#x}", args.superapp);
    if let (Some(token1), Some(token2)) = (args.token1, args.token2) {
        info!("Accepted Super Token 1: {:#x}", token1);
        info!("Accepted Super Token 2: {:#x}", token2);
    }

    let implementation_artifact =
        ctx.artifact(MISSION_CONTROL_STREAM_SOURCE, MISSION_CONTROL_STREAM_CONTRACT)?;
    let deployment = upgrade_proxy(
        &ctx.provider,
        args.superapp,
        &implementation_artifact,
        ctx.deployer,
    )
    .await?;

    info!("{} upgraded at: {:#x}", MISSION_CONTROL_STREAM_CONTRACT, deployment.proxy);
    write_deployment(&ctx.deployments_path, MISSION_CONTROL_STREAM_PROXY_KEY, &deployment)
}

/// Deploy the mintable pure super token
pub async fn deploy_token(args: DeployTokenArgs, ctx: &ScriptContext) -> Result<(), ScriptError> {
    let (name, symbol) = (args.name(), args.symbol());
    deploy_named_token(
        ctx,
        &args.token,
        name,
        symbol,
        (MINTABLE_TOKEN_SOURCE, MINTABLE_TOKEN_CONTRACT),
        MINTABLE_TOKEN_KEY,
    )
    .await
}

/// Deploy the lite pure super token
pub async fn deploy_lite_token(
    args: DeployLiteTokenArgs,
    ctx: &ScriptContext,
) -> Result<(), ScriptError> {
    let (name, symbol) = (args.name(), args.symbol());
    deploy_named_token(
        ctx,
        &args.token,
        name,
        symbol,
        (LITE_TOKEN_SOURCE, LITE_TOKEN_CONTRACT),
        LITE_TOKEN_KEY,
    )
    .await
}

/// Deploy the token logic contract at `(source, contract)` and record it
/// under `key`
async fn deploy_named_token(
    ctx: &ScriptContext,
    args: &TokenArgs,
    name: String,
    symbol: String,
    (source, contract): (&str, &str),
    key: &str,
) -> Result<(), ScriptError> {
    let network = ctx.network().await?;
    let receiver = args.receiver.unwrap_or(ctx.deployer);
    info!("super token factory: {:#x}", network.super_token_factory);

    let host = ISuperfluid::new(network.host, &ctx.provider);
    let host_factory = host
        .getSuperTokenFactory()
        .call()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    if host_factory != network.super_token_factory {
        warn!("host reports super token factory {:#x}", host_factory);
    }

    info!("name: {}", name);
    info!("symbol: {}", symbol);
    info!("receiver: {:#x}", receiver);

    let artifact = ctx.artifact(source, contract)?;
    let params = TokenParams {
        factory: network.super_token_factory,
        name,
        symbol,
        receiver,
    };
    let address = deploy_pure_super_token(&ctx.provider, &artifact, params).await?;

    write_deployment(&ctx.deployments_path, key, &address)
}

/// Build the user data the super app expects for the given flow mutation
pub fn tile_user_data(action: FlowAction, request: &TileFlowRequest) -> Bytes {
    let place: Vec<PlaceOrder> = request
        .place
        .iter()
        .map(|tile| {
            let [x, y, z] = tile.coordinates;
            PlaceOrder::new(x, y, z, tile.token_id, tile.token)
        })
        .collect();

    match action {
        FlowAction::Create => encode_place_orders(&place),
        FlowAction::Update => {
            let remove: Vec<RemoveOrder> = request
                .remove
                .iter()
                .map(|&[x, y, z]| RemoveOrder::new(x, y, z))
                .collect();
            encode_update_orders(&place, &remove)
        }
        FlowAction::Delete => Bytes::new(),
    }
}

/// Create, update or delete the flow to the super app, placing or removing
/// tiles along the way
pub async fn mutate_tile_flow(
    action: FlowAction,
    request: TileFlowRequest,
    ctx: &ScriptContext,
) -> Result<(), ScriptError> {
    let network = ctx.network().await?;
    info!("action: {} flow via {}", action, request.route);
    info!("super token: {:#x}", request.token);
    info!("receiver: {:#x}", request.receiver);
    if action != FlowAction::Delete {
        info!("flow rate: {}", request.flow_rate);
    }

    let params = FlowParams {
        sender: ctx.deployer,
        receiver: request.receiver,
        token: request.token,
        flow_rate: request.flow_rate,
        user_data: tile_user_data(action, &request),
    };
    let receipt = mutate_flow(&ctx.provider, network, request.route, action, &params).await?;
    info!("tx: {:#x}", receipt.transaction_hash);

    log_flow(&ctx.provider, network.cfa_v1, &params).await;
    Ok(())
}

/// Log the state of the flow after a mutation. The mutation is already
/// mined, so a failed read only warns.
async fn log_flow<P: Provider>(provider: &P, cfa: Address, params: &FlowParams) {
    let cfa = IConstantFlowAgreementV1::new(cfa, provider);
    match cfa.getFlow(params.token, params.sender, params.receiver).call().await {
        Ok(flow) => info!("current flow rate: {}", flow.flowRate),
        Err(e) => warn!("could not read the flow after the mutation: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use alloy::{primitives::U64, providers::DynProvider, transports::mock::Asserter};
    use alloy_primitives::{address, B256, I256, U256};
    use superapp_abi::user_data::{decode_place_orders, decode_update_orders};

    use super::*;
    use crate::{
        cli::Tile,
        flows::FlowRoute,
        networks::NetworkTable,
        test_helpers::{mock_provider, push_mined_tx},
        utils::{parse_coordinate, parse_flow_rate},
    };

    /// Mumbai, present in the builtin network table
    const MUMBAI_CHAIN_ID: u64 = 80001;

    /// A context whose client answers from the returned asserter
    fn mock_context() -> (ScriptContext, Asserter) {
        let (provider, asserter) = mock_provider();
        let ctx = ScriptContext {
            provider: DynProvider::new(provider),
            deployer: Address::repeat_byte(0x5e),
            rpc_url: "http://localhost:8545".to_string(),
            networks: NetworkTable::builtin(),
            artifacts_dir: PathBuf::from("artifacts"),
            deployments_path: PathBuf::from("deployments.json"),
            node_modules_dir: PathBuf::from("node_modules"),
            etherscan_api_key: String::new(),
        };

        (ctx, asserter)
    }

    /// Place the tile at (0, -2, 2) and remove the same coordinates
    fn request() -> TileFlowRequest {
        let coordinates = [
            I256::ZERO,
            parse_coordinate("-2").unwrap(),
            parse_coordinate("2").unwrap(),
        ];

        TileFlowRequest {
            token: address!("0x934aedA8514B6d3f1Aa8B0B9f7d050907B6d6EAD"),
            receiver: address!("0xf2cef2CF8ddc8b8e0E16d7995A58F8aAf435FF24"),
            route: FlowRoute::Host,
            flow_rate: parse_flow_rate("385802469135").unwrap(),
            place: Some(Tile {
                coordinates,
                token_id: U256::from(7),
                token: address!("0xF8a6a111daD517C56942A5BE4521163737003FF8"),
            }),
            remove: Some(coordinates),
        }
    }

    #[test]
    fn test_create_user_data_places_tile() {
        let data = tile_user_data(FlowAction::Create, &request());
        let orders = decode_place_orders(&data).unwrap();

        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].tokenId, U256::from(7));
    }

    #[test]
    fn test_update_user_data_places_and_removes() {
        let data = tile_user_data(FlowAction::Update, &request());
        let (place, remove) = decode_update_orders(&data).unwrap();

        assert_eq!(place.len(), 1);
        assert_eq!(remove.len(), 1);
        assert_eq!(remove[0], place[0].to_remove_order());
    }

    #[test]
    fn test_delete_user_data_is_empty() {
        assert!(tile_user_data(FlowAction::Delete, &request()).is_empty());
    }

    #[tokio::test]
    async fn test_mined_flow_survives_failed_read() {
        let (ctx, asserter) = mock_context();
        asserter.push_success(&U64::from(MUMBAI_CHAIN_ID));
        push_mined_tx(&asserter, B256::repeat_byte(1), None);
        asserter.push_failure_msg("header not found");

        let res = mutate_tile_flow(FlowAction::Update, request(), &ctx).await;
        assert!(res.is_ok());
    }

    #[tokio::test]
    async fn test_reverted_flow_is_error() {
        let (ctx, asserter) = mock_context();
        let tx_hash = B256::repeat_byte(1);
        asserter.push_success(&U64::from(MUMBAI_CHAIN_ID));
        asserter.push_success(&tx_hash);
        asserter.push_success(&crate::test_helpers::receipt(tx_hash, false, None));

        let res = mutate_tile_flow(FlowAction::Delete, request(), &ctx).await;
        assert!(matches!(res, Err(ScriptError::ContractInteraction(_))));
    }
}
