//! Solidity bindings for the Superfluid contracts and the Mission Control
//! stream super app, along with the user data codec the super app expects
//! alongside flow mutations.

#![deny(missing_docs)]

pub mod mission_control;
pub mod proxy;
pub mod superfluid;
pub mod tokens;
pub mod user_data;
