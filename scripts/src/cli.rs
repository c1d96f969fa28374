//! Definitions of CLI arguments and commands for the super app scripts

use std::path::PathBuf;

use alloy_primitives::{aliases::I96, Address, I256, U256};
use clap::{Args, Parser, Subcommand};

use crate::{
    commands::{
        deploy, deploy_lite_token, deploy_super_app, deploy_token, mutate_tile_flow,
        upgrade_super_app,
    },
    constants::{
        DEFAULT_ARTIFACTS_DIR, DEFAULT_DEPLOYMENTS_PATH, DEFAULT_NODE_MODULES_DIR, DEFAULT_RPC_URL,
        DEFAULT_TILE_FLOW_RATE,
        LITE_TOKEN_NAME, LITE_TOKEN_SYMBOL, MINTABLE_TOKEN_NAME, MINTABLE_TOKEN_SYMBOL,
    },
    context::ScriptContext,
    errors::ScriptError,
    flows::{FlowAction, FlowRoute},
    utils::{parse_coordinate, parse_flow_rate},
};

/// Deploy and drive the Mission Control super app
#[derive(Parser)]
#[command(name = "superapp-scripts")]
pub struct Cli {
    /// Private key of the deployer
    #[arg(short, long, env = "PRIVATE_KEY", hide_env_values = true)]
    pub priv_key: String,

    /// Network RPC URL
    #[arg(short, long, env = "RPC_URL", default_value = DEFAULT_RPC_URL)]
    pub rpc_url: String,

    /// Block explorer API key used for source verification
    #[arg(long, env = "ETHERSCAN_API_KEY", default_value = "", hide_env_values = true)]
    pub etherscan_api_key: String,

    /// Hardhat build output directory
    #[arg(long, default_value = DEFAULT_ARTIFACTS_DIR)]
    pub artifacts: PathBuf,

    /// File in which deployed addresses are recorded
    #[arg(long, default_value = DEFAULT_DEPLOYMENTS_PATH)]
    pub deployments: PathBuf,

    /// Package directory searched for the OpenZeppelin upgrades build when
    /// the project build has no transparent proxy
    #[arg(long, default_value = DEFAULT_NODE_MODULES_DIR)]
    pub node_modules: PathBuf,

    /// JSON file of network descriptors merged over the builtin ones
    #[arg(long)]
    pub networks: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

/// The scripts
#[derive(Subcommand)]
pub enum Command {
    /// Deploy the super app without a proxy and verify it
    Deploy(DeployArgs),
    /// Deploy the super app behind a transparent proxy
    DeploySuperApp(DeploySuperAppArgs),
    /// Upgrade the super app proxy
    UpgradeSuperApp(UpgradeSuperAppArgs),
    /// Deploy the mintable pure super token
    DeployToken(DeployTokenArgs),
    /// Deploy the lite pure super token
    DeployLiteToken(DeployLiteTokenArgs),
    /// Open a stream to the super app
    CreateFlow(CreateFlowArgs),
    /// Update the stream to the super app
    UpdateFlow(UpdateFlowArgs),
    /// Close the stream to the super app
    DeleteFlow(DeleteFlowArgs),
}

impl Command {
    /// Run the command against the given context
    pub async fn run(self, ctx: &ScriptContext) -> Result<(), ScriptError> {
        match self {
            Command::Deploy(args) => deploy(args, ctx).await,
            Command::DeploySuperApp(args) => deploy_super_app(args, ctx).await,
            Command::UpgradeSuperApp(args) => upgrade_super_app(args, ctx).await,
            Command::DeployToken(args) => deploy_token(args, ctx).await,
            Command::DeployLiteToken(args) => deploy_lite_token(args, ctx).await,
            Command::CreateFlow(args) => {
                mutate_tile_flow(FlowAction::Create, args.into(), ctx).await
            }
            Command::UpdateFlow(args) => {
                mutate_tile_flow(FlowAction::Update, args.into(), ctx).await
            }
            Command::DeleteFlow(args) => {
                mutate_tile_flow(FlowAction::Delete, args.into(), ctx).await
            }
        }
    }
}

/// Deploy the `MissionControlStream` super app without a proxy, then verify
/// its sources on the block explorer
#[derive(Args)]
pub struct DeployArgs {
    /// First accepted super token
    #[arg(long)]
    pub token1: Address,

    /// Second accepted super token
    #[arg(long)]
    pub token2: Address,

    /// Mission Control contract
    #[arg(long)]
    pub mission: Address,

    /// Super app registration key, empty on networks that don't require one
    #[arg(long, default_value = "")]
    pub registration_key: String,
}

/// Deploy the `MissionControlStream` super app behind a
/// [`TransparentUpgradeableProxy`](https://docs.openzeppelin.com/contracts/5.x/api/proxy#transparent_proxy),
/// initializing it in the same transaction.
///
/// The proxy deploys its own `ProxyAdmin`, through which upgrades are made.
#[derive(Args)]
pub struct DeploySuperAppArgs {
    /// Mission Control contract
    #[arg(long)]
    pub mission: Address,

    /// First accepted super token
    #[arg(long)]
    pub token1: Address,

    /// Second accepted super token
    #[arg(long)]
    pub token2: Address,

    /// Owner of the proxy admin, defaults to the deployer
    #[arg(long)]
    pub owner: Option<Address>,
}

/// Upgrade the super app proxy to a freshly deployed implementation
#[derive(Args)]
pub struct UpgradeSuperAppArgs {
    /// Address of the super app proxy
    #[arg(long)]
    pub superapp: Address,

    /// First accepted super token, logged only
    #[arg(long)]
    pub token1: Option<Address>,

    /// Second accepted super token, logged only
    #[arg(long)]
    pub token2: Option<Address>,
}

/// The name, symbol and supply receiver of a new super token
#[derive(Args)]
pub struct TokenArgs {
    /// Token name
    #[arg(long)]
    pub name: Option<String>,

    /// Token symbol
    #[arg(long)]
    pub symbol: Option<String>,

    /// Receiver of the initial supply, defaults to the deployer
    #[arg(long)]
    pub receiver: Option<Address>,
}

/// Deploy and initialize the mintable pure super token
#[derive(Args)]
pub struct DeployTokenArgs {
    /// The token parameters
    #[command(flatten)]
    pub token: TokenArgs,
}

impl DeployTokenArgs {
    /// The token name, or its default
    pub fn name(&self) -> String {
        self.token.name.clone().unwrap_or_else(|| MINTABLE_TOKEN_NAME.to_string())
    }

    /// The token symbol, or its default
    pub fn symbol(&self) -> String {
        self.token.symbol.clone().unwrap_or_else(|| MINTABLE_TOKEN_SYMBOL.to_string())
    }
}

/// Deploy and initialize the lite pure super token
#[derive(Args)]
pub struct DeployLiteTokenArgs {
    /// The token parameters
    #[command(flatten)]
    pub token: TokenArgs,
}

impl DeployLiteTokenArgs {
    /// The token name, or its default
    pub fn name(&self) -> String {
        self.token.name.clone().unwrap_or_else(|| LITE_TOKEN_NAME.to_string())
    }

    /// The token symbol, or its default
    pub fn symbol(&self) -> String {
        self.token.symbol.clone().unwrap_or_else(|| LITE_TOKEN_SYMBOL.to_string())
    }
}

/// The stream a flow command acts on
#[derive(Args)]
pub struct FlowTarget {
    /// Super token being streamed
    #[arg(long)]
    pub token: Address,

    /// Receiver of the stream, usually the super app
    #[arg(long)]
    pub receiver: Address,

    /// Contract through which the flow is mutated
    #[arg(long, value_enum, default_value_t = FlowRoute::Forwarder)]
    pub route: FlowRoute,
}

/// The tile to place on the map
#[derive(Args)]
pub struct TileArgs {
    /// X coordinate of the tile
    #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
    pub x: I256,

    /// Y coordinate of the tile
    #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
    pub y: I256,

    /// Z coordinate of the tile
    #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
    pub z: I256,

    /// Token id of the tile
    #[arg(long)]
    pub tile_token_id: U256,

    /// Token contract of the tile
    #[arg(long)]
    pub tile_token: Address,
}

/// Open a stream to the super app, placing a tile
#[derive(Args)]
pub struct CreateFlowArgs {
    /// The stream acted on
    #[command(flatten)]
    pub target: FlowTarget,

    /// The tile placed
    #[command(flatten)]
    pub tile: TileArgs,

    /// Flow rate in wei per second
    #[arg(long, value_parser = parse_flow_rate, default_value = DEFAULT_TILE_FLOW_RATE)]
    pub flow_rate: I96,
}

/// Change the stream to the super app, placing a tile and removing another
#[derive(Args)]
pub struct UpdateFlowArgs {
    /// The stream acted on
    #[command(flatten)]
    pub target: FlowTarget,

    /// The tile placed
    #[command(flatten)]
    pub tile: TileArgs,

    /// Flow rate in wei per second
    #[arg(long, value_parser = parse_flow_rate, default_value = DEFAULT_TILE_FLOW_RATE)]
    pub flow_rate: I96,

    /// X coordinate of the tile to remove, defaults to the placed tile
    #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
    pub remove_x: Option<I256>,

    /// Y coordinate of the tile to remove, defaults to the placed tile
    #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
    pub remove_y: Option<I256>,

    /// Z coordinate of the tile to remove, defaults to the placed tile
    #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
    pub remove_z: Option<I256>,
}

/// Close the stream to the super app
#[derive(Args)]
pub struct DeleteFlowArgs {
    /// The stream acted on
    #[command(flatten)]
    pub target: FlowTarget,
}

/// A tile placement, as understood by the super app
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tile {
    /// The tile coordinates
    pub coordinates: [I256; 3],
    /// The token id of the tile
    pub token_id: U256,
    /// The token contract of the tile
    pub token: Address,
}

impl From<&TileArgs> for Tile {
    fn from(args: &TileArgs) -> Self {
        Self {
            coordinates: [args.x, args.y, args.z],
            token_id: args.tile_token_id,
            token: args.tile_token,
        }
    }
}

/// A flow command with its arguments normalized
#[derive(Clone, Debug)]
pub struct TileFlowRequest {
    /// Super token being streamed
    pub token: Address,
    /// Receiver of the stream
    pub receiver: Address,
    /// Contract through which the flow is mutated
    pub route: FlowRoute,
    /// Flow rate in wei per second, zero on deletion
    pub flow_rate: I96,
    /// The tile placed, absent on deletion
    pub place: Option<Tile>,
    /// The coordinates of the tile removed, only present on update
    pub remove: Option<[I256; 3]>,
}

impl From<CreateFlowArgs> for TileFlowRequest {
    fn from(args: CreateFlowArgs) -> Self {
        Self {
            token: args.target.token,
            receiver: args.target.receiver,
            route: args.target.route,
            flow_rate: args.flow_rate,
            place: Some(Tile::from(&args.tile)),
            remove: None,
        }
    }
}

impl From<UpdateFlowArgs> for TileFlowRequest {
    fn from(args: UpdateFlowArgs) -> Self {
        let remove = [
            args.remove_x.unwrap_or(args.tile.x),
            args.remove_y.unwrap_or(args.tile.y),
            args.remove_z.unwrap_or(args.tile.z),
        ];

        Self {
            token: args.target.token,
            receiver: args.target.receiver,
            route: args.target.route,
            flow_rate: args.flow_rate,
            place: Some(Tile::from(&args.tile)),
            remove: Some(remove),
        }
    }
}

impl From<DeleteFlowArgs> for TileFlowRequest {
    fn from(args: DeleteFlowArgs) -> Self {
        Self {
            token: args.target.token,
            receiver: args.target.receiver,
            route: args.target.route,
            flow_rate: I96::ZERO,
            place: None,
            remove: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::address;

    use super::*;

    /// Parse a command line, prefixed with the binary name and a private key
    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["superapp-scripts", "--priv-key", "0x01"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    const TOKEN: &str = "0x934aedA8514B6d3f1Aa8B0B9f7d050907B6d6EAD";
    const SUPER_APP: &str = "0xf2cef2CF8ddc8b8e0E16d7995A58F8aAf435FF24";
    const TILE_TOKEN: &str = "0xF8a6a111daD517C56942A5BE4521163737003FF8";

    #[test]
    fn test_update_flow_defaults() {
        let cli = parse(&[
            "update-flow", "--token", TOKEN, "--receiver", SUPER_APP, "--x", "0", "--y", "-2",
            "--z", "2", "--tile-token-id", "7", "--tile-token", TILE_TOKEN,
        ]);
        let Command::UpdateFlow(args) = cli.command else {
            panic!("expected update-flow");
        };

        let request = TileFlowRequest::from(args);
        let place = request.place.unwrap();
        assert_eq!(request.flow_rate, parse_flow_rate(DEFAULT_TILE_FLOW_RATE).unwrap());
        assert_eq!(request.route, FlowRoute::Forwarder);
        assert_eq!(place.token, address!("0xF8a6a111daD517C56942A5BE4521163737003FF8"));
        assert_eq!(place.token_id, U256::from(7));
        assert_eq!(request.remove, Some(place.coordinates));
        assert_eq!(place.coordinates[1], parse_coordinate("-2").unwrap());
    }

    #[test]
    fn test_delete_flow_has_no_tile() {
        let cli = parse(&[
            "delete-flow", "--token", TOKEN, "--receiver", SUPER_APP, "--route", "host",
        ]);
        let Command::DeleteFlow(args) = cli.command else {
            panic!("expected delete-flow");
        };

        let request = TileFlowRequest::from(args);
        assert_eq!(request.route, FlowRoute::Host);
        assert!(request.place.is_none());
        assert!(request.remove.is_none());
        assert_eq!(request.flow_rate, I96::ZERO);
    }

    #[test]
    fn test_global_defaults() {
        let cli = parse(&["deploy-lite-token"]);
        assert_eq!(cli.rpc_url, DEFAULT_RPC_URL);
        assert_eq!(cli.artifacts, PathBuf::from(DEFAULT_ARTIFACTS_DIR));
        assert_eq!(cli.node_modules, PathBuf::from(DEFAULT_NODE_MODULES_DIR));
        assert!(cli.networks.is_none());

        let Command::DeployLiteToken(args) = cli.command else {
            panic!("expected deploy-lite-token");
        };
        assert_eq!(args.name(), LITE_TOKEN_NAME);
        assert_eq!(args.symbol(), LITE_TOKEN_SYMBOL);
    }

    #[test]
    fn test_deploy_requires_addresses() {
        let res = Cli::try_parse_from([
            "superapp-scripts", "--priv-key", "0x01", "deploy", "--token1", "not-an-address",
        ]);
        assert!(res.is_err());
    }
}
