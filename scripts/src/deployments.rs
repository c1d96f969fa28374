//! Reading and writing the deployments file, a JSON object mapping a
//! deployment key to what was deployed under it

use std::{fs, path::Path};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::errors::ScriptError;

/// Read the whole deployments file
fn read_deployments(path: &Path) -> Result<Map<String, Value>, ScriptError> {
    let contents = fs::read_to_string(path)
        .map_err(|e| ScriptError::ReadFile(format!("{}: {}", path.display(), e)))?;

    serde_json::from_str(&contents).map_err(|e| ScriptError::Serde(e.to_string()))
}

/// Read the entry stored under `key`
pub fn read_deployment<T: DeserializeOwned>(path: &Path, key: &str) -> Result<T, ScriptError> {
    let deployments = read_deployments(path)?;
    let value = deployments.get(key).cloned().ok_or_else(|| {
        ScriptError::ReadFile(format!(
            "key {} not found in deployments file {}",
            key,
            path.display()
        ))
    })?;

    serde_json::from_value(value).map_err(|e| ScriptError::Serde(e.to_string()))
}

/// Store `value` under `key`, creating the file if it doesn't exist
pub fn write_deployment<T: Serialize>(path: &Path, key: &str, value: &T) -> Result<(), ScriptError> {
    let mut deployments = if path.exists() {
        read_deployments(path)?
    } else {
        Map::new()
    };

    let value = serde_json::to_value(value).map_err(|e| ScriptError::Serde(e.to_string()))?;
    deployments.insert(key.to_string(), value);

    let contents = serde_json::to_string_pretty(&Value::Object(deployments))
        .map_err(|e| ScriptError::Serde(e.to_string()))?;
    fs::write(path, contents)
        .map_err(|e| ScriptError::WriteFile(format!("{}: {}", path.display(), e)))
}
