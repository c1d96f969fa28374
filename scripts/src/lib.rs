//! Scripts for deploying, upgrading and streaming to the Mission Control
//! super app.

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod artifacts;
pub mod cli;
mod commands;
pub mod constants;
pub mod context;
pub mod deploy;
pub mod deployments;
pub mod errors;
pub mod flows;
pub mod networks;
#[cfg(test)]
mod test_helpers;
pub mod tokens;
pub mod upgrade;
pub mod utils;
pub mod verify;
