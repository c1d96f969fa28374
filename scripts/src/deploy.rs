//! Contract deployment: plain deployments with best-effort verification, and
//! OpenZeppelin transparent proxies

use std::{path::Path, time::Duration};

use alloy::{
    network::TransactionBuilder, providers::Provider, rpc::types::TransactionRequest,
};
use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::SolValue;
use serde::{Deserialize, Serialize};
use superapp_abi::proxy::IProxyAdmin;
use tracing::{info, warn};

use crate::{
    artifacts::Artifact,
    constants::{
        PROXY_ADMIN_CONTRACT, PROXY_ADMIN_SOURCE, PROXY_ADMIN_STORAGE_SLOT,
        PROXY_INITIAL_OWNER_INPUT, TRANSPARENT_PROXY_CONTRACT, TRANSPARENT_PROXY_SOURCE,
        UPGRADES_CORE_ARTIFACTS_DIR,
    },
    errors::ScriptError,
    utils::{send_tx, wait_for_receipt},
    verify::{verify_after_settling, SourceVerifier, VerificationRequest, VerificationStatus},
};

/// The outcome of a plain deployment
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    /// The fully qualified name of the deployed contract
    pub contract_name: String,
    /// The address of the deployed contract
    pub address: Address,
    /// The ABI-encoded constructor arguments
    pub constructor_arguments: Bytes,
    /// Whether the sources were verified on the block explorer
    pub verification: VerificationStatus,
}

/// The contracts making up a transparent proxy deployment
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyDeployment {
    /// The proxy, i.e. the address users interact with
    pub proxy: Address,
    /// The `ProxyAdmin` allowed to upgrade the proxy
    pub proxy_admin: Address,
    /// The implementation the proxy currently delegates to
    pub implementation: Address,
}

/// Send a creation transaction for the artifact and return the address of the
/// new contract
pub async fn deploy_contract<P: Provider>(
    provider: &P,
    artifact: &Artifact,
    constructor_args: &[u8],
) -> Result<Address, ScriptError> {
    let tx = TransactionRequest::default().with_deploy_code(artifact.deploy_code(constructor_args));

    let pending = provider
        .send_transaction(tx)
        .await
        .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;
    let receipt =
        wait_for_receipt(provider, *pending.tx_hash(), ScriptError::ContractDeployment).await?;

    receipt.contract_address.ok_or_else(|| {
        ScriptError::ContractDeployment(format!(
            "no contract address in receipt of tx {:#x}",
            receipt.transaction_hash
        ))
    })
}

/// Deploy the artifact, then verify its sources once the explorer has had
/// time to index the deployment.
///
/// Verification is best-effort: its failure is recorded in the returned
/// record but never fails the deployment.
pub async fn deploy_and_verify<P: Provider, V: SourceVerifier>(
    provider: &P,
    verifier: &V,
    artifact: &Artifact,
    constructor_args: Bytes,
    settle_delay: Duration,
) -> Result<DeploymentRecord, ScriptError> {
    let address = deploy_contract(provider, artifact, &constructor_args).await?;
    info!("{} deployed to: {:#x}", artifact.contract_name, address);

    let record = match artifact.verification_request(address, &constructor_args) {
        Ok(request) => finalize_deployment(verifier, request, settle_delay).await,
        Err(e) => {
            warn!("cannot verify {}: {}", artifact.contract_name, e);
            DeploymentRecord {
                contract_name: artifact.fully_qualified_name(),
                address,
                constructor_arguments: constructor_args,
                verification: VerificationStatus::Failed {
                    reason: e.to_string(),
                },
            }
        }
    };

    Ok(record)
}

/// Verify a completed deployment and build its record
pub async fn finalize_deployment<V: SourceVerifier>(
    verifier: &V,
    request: VerificationRequest,
    settle_delay: Duration,
) -> DeploymentRecord {
    let verification = verify_after_settling(verifier, &request, settle_delay).await;
    DeploymentRecord {
        contract_name: request.contract_name,
        address: request.address,
        constructor_arguments: request.constructor_arguments,
        verification,
    }
}

/// The compiled OpenZeppelin contracts making up a transparent proxy
#[derive(Clone, Debug)]
pub struct ProxyArtifacts {
    /// The `TransparentUpgradeableProxy`
    pub proxy: Artifact,
    /// The `ProxyAdmin` to deploy ahead of a 4.x proxy. A 5.x proxy deploys
    /// its own admin, so this is `None` for it.
    pub proxy_admin: Option<Artifact>,
}

impl ProxyArtifacts {
    /// Find the proxy contracts, first in the project's own build output,
    /// then in the build bundled with the OpenZeppelin upgrades plugin
    pub fn locate(artifacts_dir: &Path, node_modules_dir: &Path) -> Result<Self, ScriptError> {
        let bundled_dir = node_modules_dir.join(UPGRADES_CORE_ARTIFACTS_DIR);

        let mut failures = Vec::new();
        for dir in [artifacts_dir, bundled_dir.as_path()] {
            match Self::load(dir) {
                Ok(artifacts) => {
                    info!("proxy artifacts: {}", dir.display());
                    return Ok(artifacts);
                }
                Err(e) => failures.push(e.to_string()),
            }
        }

        Err(ScriptError::ArtifactParsing(format!(
            "no transparent proxy artifact found ({})",
            failures.join("; ")
        )))
    }

    /// Load the proxy contracts from a single build output directory
    fn load(dir: &Path) -> Result<Self, ScriptError> {
        let proxy = Artifact::load(dir, TRANSPARENT_PROXY_SOURCE, TRANSPARENT_PROXY_CONTRACT)?;
        let proxy_admin = if deploys_own_admin(&proxy) {
            None
        } else {
            Some(Artifact::load(dir, PROXY_ADMIN_SOURCE, PROXY_ADMIN_CONTRACT)?)
        };

        Ok(Self { proxy, proxy_admin })
    }
}

/// Whether the proxy is an OpenZeppelin 5.x proxy, whose constructor takes the
/// owner of the admin it deploys rather than an existing admin
fn deploys_own_admin(proxy: &Artifact) -> bool {
    proxy.constructor_inputs().get(1) == Some(&PROXY_INITIAL_OWNER_INPUT)
}

/// Deploy an OpenZeppelin `TransparentUpgradeableProxy` in front of
/// `implementation`, calling it with `init_calldata` in the same transaction.
///
/// A 5.x proxy deploys its own `ProxyAdmin`, owned by `owner`. For a 4.x
/// proxy the admin is deployed first by `deployer`, and handed over to `owner`
/// once the proxy is up. Either way the admin address is read back from the
/// proxy's storage.
pub async fn deploy_transparent_proxy<P: Provider>(
    provider: &P,
    artifacts: &ProxyArtifacts,
    implementation: Address,
    owner: Address,
    deployer: Address,
    init_calldata: Bytes,
) -> Result<ProxyDeployment, ScriptError> {
    let admin_arg = match &artifacts.proxy_admin {
        None => owner,
        Some(admin_artifact) => {
            let admin = deploy_contract(provider, admin_artifact, &[]).await?;
            info!("{} deployed to: {:#x}", admin_artifact.contract_name, admin);
            admin
        }
    };

    let constructor_args = (implementation, admin_arg, init_calldata).abi_encode_params();
    let proxy = deploy_contract(provider, &artifacts.proxy, &constructor_args).await?;
    let proxy_admin = read_proxy_admin(provider, proxy).await?;

    if artifacts.proxy_admin.is_some() && owner != deployer {
        let admin = IProxyAdmin::new(proxy_admin, provider);
        send_tx(admin.transferOwnership(owner)).await?;
        info!("proxy admin ownership transferred to: {:#x}", owner);
    }

    Ok(ProxyDeployment {
        proxy,
        proxy_admin,
        implementation,
    })
}

/// Read the admin of an EIP-1967 proxy.
///
/// Fails with [`ScriptError::ProxyNotFound`] if there is no contract at the
/// address, or if its admin slot is empty.
pub async fn read_proxy_admin<P: Provider>(
    provider: &P,
    proxy: Address,
) -> Result<Address, ScriptError> {
    let code = provider
        .get_code_at(proxy)
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    if code.is_empty() {
        return Err(ScriptError::ProxyNotFound(format!(
            "no contract deployed at {:#x}",
            proxy
        )));
    }

    // This is the recommended way to get the proxy admin address:
    // https://github.com/OpenZeppelin/openzeppelin-contracts/blob/v5.0.0/contracts/proxy/ERC1967/ERC1967Utils.sol#L104-L106
    let slot = provider
        .get_storage_at(proxy, U256::from_be_bytes(PROXY_ADMIN_STORAGE_SLOT.0))
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    let admin = Address::from_word(B256::from(slot.to_be_bytes::<32>()));

    if admin.is_zero() {
        return Err(ScriptError::ProxyNotFound(format!(
            "{:#x} has no EIP-1967 admin",
            proxy
        )));
    }

    Ok(admin)
}
