//! Bindings for the OpenZeppelin `ProxyAdmin` in front of each
//! `TransparentUpgradeableProxy`
//!
//! Covers both the 4.x admin, deployed separately and exposing `upgrade`, and
//! the 5.x admin the proxy deploys itself, which only has `upgradeAndCall`
//! and reports `UPGRADE_INTERFACE_VERSION`.

use alloy::sol;

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface IProxyAdmin {
        function UPGRADE_INTERFACE_VERSION() external view returns (string memory);
        function upgrade(address proxy, address implementation) external;
        function upgradeAndCall(address proxy, address implementation, bytes memory data) external payable;
        function owner() external view returns (address);
        function transferOwnership(address newOwner) external;
    }
}
