//! Superfluid network metadata, keyed by chain id
//!
//! The builtin table mirrors the entries of `@superfluid-finance/metadata` for
//! the networks this project is deployed to. A JSON file with the same shape
//! may be merged over it to add networks or replace addresses.

use std::{collections::BTreeMap, fs, path::Path};

use alloy::providers::Provider;
use alloy_primitives::{address, Address};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{constants::CFA_V1_FORWARDER_ADDRESS, errors::ScriptError};

/// The well-known Superfluid contracts of a single network
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDescriptor {
    /// The canonical name of the network
    pub name: String,
    /// EIP-155 chain ID of the network
    pub chain_id: u64,
    /// The Superfluid host contract
    pub host: Address,
    /// The constant flow agreement contract
    pub cfa_v1: Address,
    /// The CFAv1 forwarder contract
    #[serde(default = "default_forwarder")]
    pub cfa_v1_forwarder: Address,
    /// The super token factory contract
    pub super_token_factory: Address,
    /// The block explorer API endpoint used for source verification
    #[serde(default)]
    pub explorer_api_url: Option<String>,
}

/// The serde default for the forwarder address
fn default_forwarder() -> Address {
    CFA_V1_FORWARDER_ADDRESS
}

impl NetworkDescriptor {
    /// Construct a descriptor from its well-known addresses
    fn new(
        name: &str,
        chain_id: u64,
        host: Address,
        cfa_v1: Address,
        super_token_factory: Address,
        explorer_api_url: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            chain_id,
            host,
            cfa_v1,
            cfa_v1_forwarder: CFA_V1_FORWARDER_ADDRESS,
            super_token_factory,
            explorer_api_url: Some(explorer_api_url.to_string()),
        }
    }
}

/// A table of network descriptors keyed by chain id
#[derive(Clone, Debug, Default)]
pub struct NetworkTable {
    /// The descriptors, keyed by chain id
    networks: BTreeMap<u64, NetworkDescriptor>,
}

impl NetworkTable {
    /// Build a table from a list of descriptors; later entries win
    pub fn new(networks: impl IntoIterator<Item = NetworkDescriptor>) -> Self {
        Self {
            networks: networks.into_iter().map(|n| (n.chain_id, n)).collect(),
        }
    }

    /// The published Superfluid v1 deployments
    pub fn builtin() -> Self {
        Self::new([
            NetworkDescriptor::new(
                "eth-mainnet",
                1,
                address!("0x4E583d9390082B65Bef884b629DFA426114CED6d"),
                address!("0x2844c1BBdA121E9E43105630b9C8310e5c72744b"),
                address!("0x0422689cc4087b6B7280e0a7e7F655200ec86Ae1"),
                "https://api.etherscan.io/api",
            ),
            NetworkDescriptor::new(
                "eth-goerli",
                5,
                address!("0x22ff293e14F1EC3A09B137e9e06084AFd63adDF9"),
                address!("0xEd6BcbF6907D4feEEe8a8875543249bEa9D308E8"),
                address!("0x94f26B4c8AD12B18c12f38E878618f7664bdcCE2"),
                "https://api-goerli.etherscan.io/api",
            ),
            NetworkDescriptor::new(
                "optimism-mainnet",
                10,
                address!("0x567c4B141ED61923967cA25Ef4906C8781069a10"),
                address!("0x204C6f131bb7F258b2Ea1593f5309911d8E458eD"),
                address!("0x8276469A443D5C6B7146BED45e2abCaD3B6adad9"),
                "https://api-optimistic.etherscan.io/api",
            ),
            NetworkDescriptor::new(
                "xdai-mainnet",
                100,
                address!("0x2dFe937cD98Ab92e59cF3139138f18c823a4efE7"),
                address!("0xEbdA4ceF883A7B12c4E669Ebc58927FBa8447C7D"),
                address!("0x23410e2659380784498509698ed70E414D384880"),
                "https://api.gnosisscan.io/api",
            ),
            NetworkDescriptor::new(
                "polygon-mainnet",
                137,
                address!("0x3E14dC1b13c488a8d5D310918780c983bD5982E7"),
                address!("0x6EeE6060f715257b970700bc2656De21dEdF074C"),
                address!("0x2C90719f25B10Fc5646c82DA3240C76Fa5BcCF34"),
                "https://api.polygonscan.com/api",
            ),
            NetworkDescriptor::new(
                "arbitrum-one",
                42161,
                address!("0xCf8Acb4eF033efF16E8080aed4c7D5B9285D2192"),
                address!("0x731FdBB12944973B500518aea61942381d7e240D"),
                address!("0x1C21Ead77fd45C84a4c916Db7A6635D0C6FF09D6"),
                "https://api.arbiscan.io/api",
            ),
            NetworkDescriptor::new(
                "polygon-mumbai",
                80001,
                address!("0xEB796bdb90fFA0f28255275e16936D25d3418603"),
                address!("0x49e565Ed1bdc17F3d220f72DF0857C26FA83F873"),
                address!("0x200657E2f123761662567A1744f9ACAe50dF47E6"),
                "https://api-testnet.polygonscan.com/api",
            ),
        ])
    }

    /// Load a table from a JSON array of descriptors
    pub fn from_file(path: &Path) -> Result<Self, ScriptError> {
        let contents = fs::read_to_string(path).map_err(|e| {
            ScriptError::ReadFile(format!("{}: {}", path.display(), e))
        })?;
        let networks: Vec<NetworkDescriptor> =
            serde_json::from_str(&contents).map_err(|e| ScriptError::Serde(e.to_string()))?;

        Ok(Self::new(networks))
    }

    /// Merge another table over this one, replacing entries with the same chain id
    pub fn merge(mut self, other: NetworkTable) -> Self {
        self.networks.extend(other.networks);
        self
    }

    /// Look up the descriptor for the given chain id
    pub fn resolve(&self, chain_id: u64) -> Option<&NetworkDescriptor> {
        self.networks.get(&chain_id)
    }
}

/// Fetch the chain id of the connected node and resolve its descriptor.
///
/// An unknown chain is an error, so that no transaction is ever sent to a
/// network whose Superfluid addresses are unknown.
pub async fn resolve_network<'a, P: Provider>(
    provider: &P,
    table: &'a NetworkTable,
) -> Result<&'a NetworkDescriptor, ScriptError> {
    let chain_id = provider
        .get_chain_id()
        .await
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

    let network = table
        .resolve(chain_id)
        .ok_or(ScriptError::UnknownNetwork(chain_id))?;

    info!("network: {}", network.name);
    info!("chainId: {}", chain_id);
    Ok(network)
}
