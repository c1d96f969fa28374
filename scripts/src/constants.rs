//! Constants used in the super app scripts

use std::time::Duration;

use alloy_primitives::{address, b256, Address, B256};

// -----------
// | Network |
// -----------

/// The RPC URL used when none is configured, a local Hardhat / Anvil node
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

/// The address of the CFAv1 forwarder, identical on every Superfluid network
pub const CFA_V1_FORWARDER_ADDRESS: Address = address!("0xcfA132E353cB4E398080B9700609bb008eceB125");

// -------------
// | Artifacts |
// -------------

/// The default Hardhat build output directory
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";

/// The extension Hardhat gives the debug file sitting next to each artifact
pub const DEBUG_FILE_EXTENSION: &str = "dbg.json";

/// The source file of the Mission Control stream super app
pub const MISSION_CONTROL_STREAM_SOURCE: &str = "src/MissionControlStream.sol";

/// The contract name of the Mission Control stream super app
pub const MISSION_CONTROL_STREAM_CONTRACT: &str = "MissionControlStream";

/// The source file of the mintable pure super token
pub const MINTABLE_TOKEN_SOURCE: &str = "src/MintablePureSuperToken.sol";

/// The contract name of the mintable pure super token
pub const MINTABLE_TOKEN_CONTRACT: &str = "MintablePureSuperToken";

/// The source file of the lite pure super token
pub const LITE_TOKEN_SOURCE: &str = "src/GoldLiteProxy.sol";

/// The contract name of the lite pure super token
pub const LITE_TOKEN_CONTRACT: &str = "GoldLiteProxy";

/// The default `node_modules` directory of the Hardhat project
pub const DEFAULT_NODE_MODULES_DIR: &str = "node_modules";

/// The build output bundled with the OpenZeppelin upgrades plugin, relative
/// to `node_modules`. It holds the proxy contracts `deployProxy` deploys.
pub const UPGRADES_CORE_ARTIFACTS_DIR: &str = "@openzeppelin/upgrades-core/artifacts";

/// The source file of the OpenZeppelin transparent proxy
pub const TRANSPARENT_PROXY_SOURCE: &str =
    "@openzeppelin/contracts/proxy/transparent/TransparentUpgradeableProxy.sol";

/// The contract name of the OpenZeppelin transparent proxy
pub const TRANSPARENT_PROXY_CONTRACT: &str = "TransparentUpgradeableProxy";

/// The source file of the OpenZeppelin proxy admin
pub const PROXY_ADMIN_SOURCE: &str = "@openzeppelin/contracts/proxy/transparent/ProxyAdmin.sol";

/// The contract name of the OpenZeppelin proxy admin
pub const PROXY_ADMIN_CONTRACT: &str = "ProxyAdmin";

// ---------
// | Proxy |
// ---------

/// The storage slot containing the proxy admin contract address in the upgradeable proxy.
///
/// This is specified in EIP1967: https://eips.ethereum.org/EIPS/eip-1967#admin-address
pub const PROXY_ADMIN_STORAGE_SLOT: B256 =
    b256!("0xb53127684a568b3173ae13b9f8a6016e243e63b6e8ee1178d6a717850b5d6103");

/// The name of the proxy constructor's second input in OpenZeppelin 5.x,
/// where the proxy deploys its own admin owned by that address
pub const PROXY_INITIAL_OWNER_INPUT: &str = "initialOwner";

/// The `UPGRADE_INTERFACE_VERSION` of the 5.x proxy admin
pub const UPGRADE_INTERFACE_V5: &str = "5.0.0";

// ----------------
// | Transactions |
// ----------------

/// The number of times to ask for the receipt of a sent transaction
pub const RECEIPT_POLL_ATTEMPTS: usize = 60;

/// The interval between two receipt requests
pub const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(2);

// ----------------
// | Verification |
// ----------------

/// How long to wait after a deployment before asking the explorer to verify
/// it, so that the explorer has indexed the creation transaction
pub const VERIFICATION_SETTLE_DELAY: Duration = Duration::from_secs(15);

/// The number of times to poll the explorer for the outcome of a verification
pub const VERIFY_STATUS_POLL_ATTEMPTS: usize = 5;

/// The interval between two verification status polls
pub const VERIFY_STATUS_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// The timeout applied to each explorer API request
pub const EXPLORER_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The code format used when submitting sources to the explorer
pub const STANDARD_JSON_CODE_FORMAT: &str = "solidity-standard-json-input";

/// The explorer API result for a submission that is still being processed
pub const VERIFY_PENDING_RESULT: &str = "Pending in queue";

/// The explorer API result fragment for a contract that is already verified
pub const ALREADY_VERIFIED_RESULT: &str = "already verified";

// ---------
// | Flows |
// ---------

/// The price per second, in wei, of renting a single tile
pub const DEFAULT_TILE_FLOW_RATE: &str = "385802469135";

// ----------
// | Tokens |
// ----------

/// The default name of the mintable pure super token
pub const MINTABLE_TOKEN_NAME: &str = "Astro Gold";

/// The default symbol of the mintable pure super token
pub const MINTABLE_TOKEN_SYMBOL: &str = "AGOLD";

/// The default name of the lite pure super token
pub const LITE_TOKEN_NAME: &str = "Astro Gold Lite";

/// The default symbol of the lite pure super token
pub const LITE_TOKEN_SYMBOL: &str = "ALITE";

// ---------------
// | Deployments |
// ---------------

/// The default path of the deployments file
pub const DEFAULT_DEPLOYMENTS_PATH: &str = "deployments.json";

/// The super app deployed without a proxy, key in the deployments file
pub const MISSION_CONTROL_STREAM_KEY: &str = "MissionControlStream";

/// The super app proxy deployment, key in the deployments file
pub const MISSION_CONTROL_STREAM_PROXY_KEY: &str = "MissionControlStreamProxy";

/// The mintable pure super token, key in the deployments file
pub const MINTABLE_TOKEN_KEY: &str = "MintablePureSuperToken";

/// The lite pure super token, key in the deployments file
pub const LITE_TOKEN_KEY: &str = "GoldLiteProxy";
