//! Upgrades of the super app behind its transparent proxy

use alloy::{network::TransactionBuilder, providers::Provider, rpc::types::TransactionRequest};
use alloy_primitives::{Address, Bytes};
use alloy_sol_types::SolCall;
use superapp_abi::proxy::IProxyAdmin::{self, upgradeAndCallCall, upgradeCall};
use tracing::info;

use crate::{
    artifacts::Artifact,
    constants::UPGRADE_INTERFACE_V5,
    deploy::{deploy_contract, read_proxy_admin, ProxyDeployment},
    errors::ScriptError,
    utils::wait_for_receipt,
};

/// The upgrade entry point exposed by a `ProxyAdmin`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdminInterface {
    /// OpenZeppelin 4.x: `upgrade(proxy, implementation)`. Its
    /// `upgradeAndCall` always calls the implementation, even with empty data.
    V4,
    /// OpenZeppelin 5.x: `upgradeAndCall(proxy, implementation, data)` only
    V5,
}

impl AdminInterface {
    /// Classify an admin by its `UPGRADE_INTERFACE_VERSION`, `None` if the
    /// admin does not have one
    pub fn from_version(version: Option<&str>) -> Result<Self, ScriptError> {
        match version {
            None => Ok(AdminInterface::V4),
            Some(UPGRADE_INTERFACE_V5) => Ok(AdminInterface::V5),
            Some(other) => Err(ScriptError::ContractInteraction(format!(
                "unsupported proxy admin upgrade interface {other}"
            ))),
        }
    }

    /// The admin calldata upgrading `proxy` to `implementation`, without
    /// calling the new implementation
    pub fn upgrade_calldata(&self, proxy: Address, implementation: Address) -> Bytes {
        let calldata = match self {
            AdminInterface::V4 => upgradeCall {
                proxy,
                implementation,
            }
            .abi_encode(),
            AdminInterface::V5 => upgradeAndCallCall {
                proxy,
                implementation,
                data: Bytes::new(),
            }
            .abi_encode(),
        };

        calldata.into()
    }
}

/// Deploy a new implementation from `implementation` and point `proxy` at it.
///
/// The proxy, its admin and the admin's owner are checked before anything is
/// sent, so an address that does not hold a proxy, or a `signer` that cannot
/// upgrade it, fails without a transaction. A failed upgrade transaction
/// leaves the proxy on its previous implementation.
pub async fn upgrade_proxy<P: Provider>(
    provider: &P,
    proxy: Address,
    implementation: &Artifact,
    signer: Address,
) -> Result<ProxyDeployment, ScriptError> {
    let proxy_admin = read_proxy_admin(provider, proxy).await?;
    info!("proxy admin: {:#x}", proxy_admin);

    let admin = IProxyAdmin::new(proxy_admin, provider);
    let owner = admin
        .owner()
        .call()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    if owner != signer {
        return Err(ScriptError::Unauthorized(format!(
            "{:#x} is owned by {:#x}, not {:#x}",
            proxy_admin, owner, signer
        )));
    }

    // 4.x admins have no such getter, the call reverts
    let version = admin.UPGRADE_INTERFACE_VERSION().call().await.ok();
    let interface = AdminInterface::from_version(version.as_deref())?;
    info!("proxy admin interface: {:?}", interface);

    let implementation_address = deploy_contract(provider, implementation, &[]).await?;
    info!(
        "new {} implementation deployed to: {:#x}",
        implementation.contract_name, implementation_address
    );

    let tx = TransactionRequest::default()
        .with_from(signer)
        .with_to(proxy_admin)
        .with_input(interface.upgrade_calldata(proxy, implementation_address));
    let pending = provider
        .send_transaction(tx)
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    wait_for_receipt(provider, *pending.tx_hash(), ScriptError::ContractInteraction).await?;

    Ok(ProxyDeployment {
        proxy,
        proxy_admin,
        implementation: implementation_address,
    })
}
