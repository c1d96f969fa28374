//! The state shared by every command: the signing client and the resolved
//! configuration

use std::path::{Path, PathBuf};

use alloy::providers::DynProvider;
use alloy_primitives::Address;
use tracing::info;

use crate::{
    artifacts::Artifact,
    errors::ScriptError,
    networks::{resolve_network, NetworkDescriptor, NetworkTable},
    utils::setup_client,
};

/// Everything a command needs to act on a network
pub struct ScriptContext {
    /// The signing client
    pub provider: DynProvider,
    /// The address transactions are sent from
    pub deployer: Address,
    /// The RPC URL the client is connected to
    pub rpc_url: String,
    /// The known Superfluid networks
    pub networks: NetworkTable,
    /// The Hardhat build output directory
    pub artifacts_dir: PathBuf,
    /// The deployments file
    pub deployments_path: PathBuf,
    /// The package directory holding the OpenZeppelin upgrades build
    pub node_modules_dir: PathBuf,
    /// The block explorer API key, empty if none was configured
    pub etherscan_api_key: String,
}

impl ScriptContext {
    /// Build the context, merging the networks in `networks_override`, if
    /// any, over the builtin table
    pub fn new(
        priv_key: &str,
        rpc_url: String,
        networks_override: Option<&Path>,
        artifacts_dir: PathBuf,
        deployments_path: PathBuf,
        node_modules_dir: PathBuf,
        etherscan_api_key: String,
    ) -> Result<Self, ScriptError> {
        let (provider, deployer) = setup_client(priv_key, &rpc_url)?;

        let mut networks = NetworkTable::builtin();
        if let Some(path) = networks_override {
            networks = networks.merge(NetworkTable::from_file(path)?);
        }

        Ok(Self {
            provider,
            deployer,
            rpc_url,
            networks,
            artifacts_dir,
            deployments_path,
            node_modules_dir,
            etherscan_api_key,
        })
    }

    /// Resolve the network the client is connected to and log where the
    /// command is about to act
    pub async fn network(&self) -> Result<&NetworkDescriptor, ScriptError> {
        let network = resolve_network(&self.provider, &self.networks).await?;
        info!("rpc: {}", self.rpc_url);
        info!("deployer address: {:#x}", self.deployer);

        Ok(network)
    }

    /// Load an artifact from the build output directory
    pub fn artifact(&self, source_name: &str, contract_name: &str) -> Result<Artifact, ScriptError> {
        Artifact::load(&self.artifacts_dir, source_name, contract_name)
    }
}
