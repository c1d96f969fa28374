//! Bindings for the pure super token logic contracts
//!
//! Both the mintable token and the lite variant expose the same initializer,
//! which registers the token with the super token factory and mints the
//! initial supply to `receiver`.

use alloy::sol;

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface IPureSuperToken {
        function initialize(
            address factory,
            string memory name,
            string memory symbol,
            address receiver
        ) external;
    }
}
