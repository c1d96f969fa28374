//! Bindings for the `MissionControlStream` super app

use alloy::sol;

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface IMissionControlStream {
        /// Initializer invoked through the transparent proxy on deployment
        function initialize(
            address host,
            address acceptedToken1,
            address acceptedToken2,
            address missionControl
        ) external;
    }
}
