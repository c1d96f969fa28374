//! Bindings for the Superfluid host, the constant flow agreement and the
//! CFA forwarder
//!
//! Only the methods the scripts call are declared here; the full interfaces
//! live in `@superfluid-finance/ethereum-contracts`.

use alloy::sol;

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface ISuperfluid {
        function callAgreement(
            address agreementClass,
            bytes calldata callData,
            bytes calldata userData
        ) external returns (bytes memory returnedData);

        function getSuperTokenFactory() external view returns (address factory);
    }
}

// The agreement takes an `ISuperfluidToken`, which is an `address` on the wire
sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface IConstantFlowAgreementV1 {
        function createFlow(
            address token,
            address receiver,
            int96 flowRate,
            bytes calldata ctx
        ) external returns (bytes memory newCtx);

        function updateFlow(
            address token,
            address receiver,
            int96 flowRate,
            bytes calldata ctx
        ) external returns (bytes memory newCtx);

        function deleteFlow(
            address token,
            address sender,
            address receiver,
            bytes calldata ctx
        ) external returns (bytes memory newCtx);

        function getFlow(address token, address sender, address receiver)
            external
            view
            returns (uint256 timestamp, int96 flowRate, uint256 deposit, uint256 owedDeposit);
    }
}

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface ICFAv1Forwarder {
        function createFlow(
            address token,
            address sender,
            address receiver,
            int96 flowrate,
            bytes memory userData
        ) external returns (bool);

        function updateFlow(
            address token,
            address sender,
            address receiver,
            int96 flowrate,
            bytes memory userData
        ) external returns (bool);

        function deleteFlow(
            address token,
            address sender,
            address receiver,
            bytes memory userData
        ) external returns (bool);
    }
}

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface ISuperToken {
        function balanceOf(address account) external view returns (uint256);
    }
}
