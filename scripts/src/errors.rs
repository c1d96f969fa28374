//! Definitions of errors that can occur during the execution of the super app scripts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// Errors that can occur during the execution of the super app scripts
#[derive(Debug)]
pub enum ScriptError {
    /// Error reading a file (deployments, network overrides, build info)
    ReadFile(String),
    /// Error writing a file
    WriteFile(String),
    /// Error parsing a compilation artifact
    ArtifactParsing(String),
    /// Error initializing the RPC client
    ClientInitialization(String),
    /// The connected chain has no entry in the network table
    UnknownNetwork(u64),
    /// Error deploying a contract
    ContractDeployment(String),
    /// Error calling a contract method
    ContractInteraction(String),
    /// The given address does not hold an upgradeable proxy
    ProxyNotFound(String),
    /// The signer is not allowed to perform the operation
    Unauthorized(String),
    /// Error verifying contract source code on the block explorer
    Verification(String),
    /// Error de/serializing a JSON document
    Serde(String),
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::ReadFile(s) => write!(f, "error reading file: {}", s),
            ScriptError::WriteFile(s) => write!(f, "error writing file: {}", s),
            ScriptError::ArtifactParsing(s) => write!(f, "error parsing artifact: {}", s),
            ScriptError::ClientInitialization(s) => write!(f, "error initializing client: {}", s),
            ScriptError::UnknownNetwork(chain_id) => {
                write!(f, "no network metadata found for chain id {}", chain_id)
            }
            ScriptError::ContractDeployment(s) => write!(f, "error deploying contract: {}", s),
            ScriptError::ContractInteraction(s) => {
                write!(f, "error interacting with contract: {}", s)
            }
            ScriptError::ProxyNotFound(s) => write!(f, "proxy not found: {}", s),
            ScriptError::Unauthorized(s) => write!(f, "unauthorized: {}", s),
            ScriptError::Verification(s) => write!(f, "error verifying contract: {}", s),
            ScriptError::Serde(s) => write!(f, "error de/serializing: {}", s),
        }
    }
}

impl Error for ScriptError {}
