//! Loading of Hardhat compilation artifacts from the build output directory
//!
//! Each contract compiles to `<artifacts>/<source>/<Name>.json`, next to a
//! `<Name>.dbg.json` file pointing at the `build-info` file that holds the
//! compiler version and standard JSON input for the compilation. The former
//! is needed to deploy, the latter to verify sources on a block explorer.

use std::{
    fs,
    path::{Path, PathBuf},
};

use alloy_primitives::{Address, Bytes};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::{
    constants::DEBUG_FILE_EXTENSION, errors::ScriptError, verify::VerificationRequest,
};

/// A compiled contract
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    /// The name of the contract
    pub contract_name: String,
    /// The source file the contract is defined in, relative to the project root
    pub source_name: String,
    /// The ABI of the contract
    #[serde(default)]
    pub abi: Vec<Value>,
    /// The creation bytecode of the contract
    pub bytecode: Bytes,
    /// The build info file of the compilation that produced this artifact, or
    /// why it could not be found
    #[serde(skip, default = "build_info_not_loaded")]
    build_info_path: Result<PathBuf, String>,
}

/// The serde default for the build info path of an artifact parsed on its own
fn build_info_not_loaded() -> Result<PathBuf, String> {
    Err("artifact was not loaded from a build output directory".to_string())
}

/// The debug file Hardhat writes next to each artifact
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DebugFile {
    /// Path of the build info file, relative to the debug file
    build_info: String,
}

/// The subset of a Hardhat build info file needed for source verification
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildInfo {
    /// The full compiler version, e.g. `0.8.17+commit.8df45f5f`
    pub solc_long_version: String,
    /// The standard JSON input given to the compiler
    pub input: Value,
}

impl Artifact {
    /// Parse an artifact from its JSON representation
    pub fn from_json(json: &str) -> Result<Self, ScriptError> {
        serde_json::from_str(json).map_err(|e| ScriptError::ArtifactParsing(e.to_string()))
    }

    /// Load the artifact of `contract_name`, defined in `source_name`, from the
    /// given build output directory
    pub fn load(
        artifacts_dir: &Path,
        source_name: &str,
        contract_name: &str,
    ) -> Result<Self, ScriptError> {
        let source_dir = artifacts_dir.join(source_name);
        let artifact_path = source_dir.join(format!("{contract_name}.json"));
        let contents = fs::read_to_string(&artifact_path).map_err(|e| {
            ScriptError::ArtifactParsing(format!("{}: {}", artifact_path.display(), e))
        })?;

        let mut artifact = Self::from_json(&contents)?;
        let debug_path = source_dir.join(format!("{contract_name}.{DEBUG_FILE_EXTENSION}"));
        let build_info_path = read_build_info_path(&debug_path);
        if let Err(e) = &build_info_path {
            warn!("no build info for {}: {}", artifact.fully_qualified_name(), e);
        }
        artifact.build_info_path = build_info_path;

        Ok(artifact)
    }

    /// The fully qualified name of the contract, e.g.
    /// `src/MissionControlStream.sol:MissionControlStream`
    pub fn fully_qualified_name(&self) -> String {
        format!("{}:{}", self.source_name, self.contract_name)
    }

    /// The names of the constructor inputs, empty if there is no constructor
    pub fn constructor_inputs(&self) -> Vec<&str> {
        self.abi
            .iter()
            .find(|item| item["type"] == "constructor")
            .and_then(|constructor| constructor["inputs"].as_array())
            .map(|inputs| inputs.iter().filter_map(|input| input["name"].as_str()).collect())
            .unwrap_or_default()
    }

    /// The data of a creation transaction: the bytecode followed by the
    /// ABI-encoded constructor arguments
    pub fn deploy_code(&self, constructor_args: &[u8]) -> Bytes {
        let mut code = Vec::with_capacity(self.bytecode.len() + constructor_args.len());
        code.extend_from_slice(&self.bytecode);
        code.extend_from_slice(constructor_args);
        code.into()
    }

    /// Read the build info of the compilation that produced this artifact
    pub fn build_info(&self) -> Result<BuildInfo, ScriptError> {
        let path = self.build_info_path.as_ref().map_err(|e| {
            ScriptError::ArtifactParsing(format!(
                "no build info found for {}: {}",
                self.fully_qualified_name(),
                e
            ))
        })?;

        let contents = fs::read_to_string(path)
            .map_err(|e| ScriptError::ReadFile(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&contents).map_err(|e| ScriptError::ArtifactParsing(e.to_string()))
    }

    /// Build the explorer verification request for a deployment of this
    /// artifact at `address`
    pub fn verification_request(
        &self,
        address: Address,
        constructor_args: &Bytes,
    ) -> Result<VerificationRequest, ScriptError> {
        let build_info = self.build_info()?;
        Ok(VerificationRequest {
            address,
            contract_name: self.fully_qualified_name(),
            compiler_version: format!("v{}", build_info.solc_long_version),
            standard_json_input: build_info.input,
            constructor_arguments: constructor_args.clone(),
        })
    }
}

/// Resolve the build info path referenced by a debug file
fn read_build_info_path(debug_path: &Path) -> Result<PathBuf, String> {
    let contents =
        fs::read_to_string(debug_path).map_err(|e| format!("{}: {}", debug_path.display(), e))?;
    let debug: DebugFile =
        serde_json::from_str(&contents).map_err(|e| format!("{}: {}", debug_path.display(), e))?;

    let dir = debug_path.parent().unwrap_or(Path::new(""));
    Ok(dir.join(debug.build_info))
}
