//! Best-effort source verification on an Etherscan-compatible block explorer
//!
//! Verification never fails a deployment: its outcome is reported as a
//! [`VerificationStatus`] next to the deployed address.

use std::time::Duration;

use alloy_primitives::{Address, Bytes};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::{
    constants::{
        ALREADY_VERIFIED_RESULT, EXPLORER_REQUEST_TIMEOUT, STANDARD_JSON_CODE_FORMAT,
        VERIFY_PENDING_RESULT, VERIFY_STATUS_POLL_ATTEMPTS, VERIFY_STATUS_POLL_INTERVAL,
    },
    errors::ScriptError,
};

/// The outcome of a source verification attempt
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum VerificationStatus {
    /// The explorer accepted the sources
    Verified,
    /// The explorer could not be reached or rejected the sources
    Failed {
        /// Why verification failed
        reason: String,
    },
}

impl VerificationStatus {
    /// Whether the sources were verified
    pub fn is_verified(&self) -> bool {
        matches!(self, VerificationStatus::Verified)
    }
}

/// Everything the explorer needs to verify a deployment
#[derive(Clone, Debug)]
pub struct VerificationRequest {
    /// The address of the deployed contract
    pub address: Address,
    /// The fully qualified name of the contract
    pub contract_name: String,
    /// The compiler version, in the explorer's `v0.8.17+commit.8df45f5f` format
    pub compiler_version: String,
    /// The standard JSON input the contract was compiled from
    pub standard_json_input: Value,
    /// The ABI-encoded constructor arguments the contract was deployed with
    pub constructor_arguments: Bytes,
}

/// A service able to verify contract sources
#[allow(async_fn_in_trait)]
pub trait SourceVerifier {
    /// Submit the request and wait for the explorer's verdict
    async fn verify(&self, request: &VerificationRequest) -> Result<(), ScriptError>;
}

/// Wait for `delay`, then verify the request, converting any error into a
/// failed status
pub async fn verify_after_settling<V: SourceVerifier>(
    verifier: &V,
    request: &VerificationRequest,
    delay: Duration,
) -> VerificationStatus {
    if !delay.is_zero() {
        info!(
            "waiting {}s for the explorer to index {:#x}",
            delay.as_secs(),
            request.address
        );
        sleep(delay).await;
    }

    match verifier.verify(request).await {
        Ok(()) => {
            info!("verified {} at {:#x}", request.contract_name, request.address);
            VerificationStatus::Verified
        }
        Err(e) => {
            warn!("verification of {:#x} failed: {}", request.address, e);
            VerificationStatus::Failed {
                reason: e.to_string(),
            }
        }
    }
}

// ------------------
// | Etherscan APIs |
// ------------------

/// A response from the Etherscan contract API
#[derive(Debug, Deserialize)]
struct EtherscanResponse {
    /// "1" on success, "0" on failure
    status: String,
    /// A short human readable message
    message: String,
    /// The GUID of a submission, or the outcome of a status check
    result: String,
}

/// The state of a submitted verification, as reported by the explorer
#[derive(Debug, PartialEq, Eq)]
enum CheckStatus {
    /// The explorer has verified the sources
    Verified,
    /// The submission is still queued
    Pending,
    /// The explorer rejected the sources
    Failed(String),
}

impl EtherscanResponse {
    /// Interpret the response to a source submission, returning the GUID
    /// to poll, or `None` if the contract was already verified
    fn submission_guid(self) -> Result<Option<String>, ScriptError> {
        if self.status == "1" {
            return Ok(Some(self.result));
        }

        if self.result.to_lowercase().contains(ALREADY_VERIFIED_RESULT) {
            return Ok(None);
        }

        Err(ScriptError::Verification(format!(
            "{}: {}",
            self.message, self.result
        )))
    }

    /// Interpret the response to a status check
    fn check_status(&self) -> CheckStatus {
        if self.result == VERIFY_PENDING_RESULT {
            CheckStatus::Pending
        } else if self.status == "1"
            || self.result.to_lowercase().contains(ALREADY_VERIFIED_RESULT)
        {
            CheckStatus::Verified
        } else {
            CheckStatus::Failed(self.result.clone())
        }
    }
}

/// Verifies sources through an Etherscan-compatible explorer API
pub struct EtherscanVerifier {
    /// The HTTP client
    client: Client,
    /// The explorer API endpoint, if the network has one
    api_url: Option<String>,
    /// The explorer API key, empty if none was configured
    api_key: String,
}

impl EtherscanVerifier {
    /// Create a verifier for the given endpoint and API key
    pub fn new(api_url: Option<String>, api_key: String) -> Result<Self, ScriptError> {
        let client = Client::builder()
            .timeout(EXPLORER_REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

        Ok(Self {
            client,
            api_url,
            api_key,
        })
    }

    /// The configured endpoint, or an error if verification is not possible
    fn endpoint(&self) -> Result<&str, ScriptError> {
        if self.api_key.is_empty() {
            return Err(ScriptError::Verification(
                "no explorer API key configured".to_string(),
            ));
        }

        self.api_url.as_deref().ok_or_else(|| {
            ScriptError::Verification("no explorer API endpoint for this network".to_string())
        })
    }

    /// Submit the sources, returning the GUID of the submission
    async fn submit(
        &self,
        url: &str,
        request: &VerificationRequest,
    ) -> Result<Option<String>, ScriptError> {
        let source_code = serde_json::to_string(&request.standard_json_input)
            .map_err(|e| ScriptError::Serde(e.to_string()))?;
        let address = format!("{:#x}", request.address);
        let constructor_args = hex::encode(&request.constructor_arguments);

        let params = [
            ("apikey", self.api_key.as_str()),
            ("module", "contract"),
            ("action", "verifysourcecode"),
            ("contractaddress", address.as_str()),
            ("sourceCode", source_code.as_str()),
            ("codeformat", STANDARD_JSON_CODE_FORMAT),
            ("contractname", request.contract_name.as_str()),
            ("compilerversion", request.compiler_version.as_str()),
            // The misspelling is part of the explorer API
            ("constructorArguements", constructor_args.as_str()),
        ];

        let response: EtherscanResponse = self
            .client
            .post(url)
            .form(&params)
            .send()
            .await
            .map_err(|e| ScriptError::Verification(e.to_string()))?
            .json()
            .await
            .map_err(|e| ScriptError::Verification(e.to_string()))?;

        response.submission_guid()
    }

    /// Fetch the status of a submission
    async fn check(&self, url: &str, guid: &str) -> Result<CheckStatus, ScriptError> {
        let params = [
            ("apikey", self.api_key.as_str()),
            ("module", "contract"),
            ("action", "checkverifystatus"),
            ("guid", guid),
        ];

        let response: EtherscanResponse = self
            .client
            .get(url)
            .query(&params)
            .send()
            .await
            .map_err(|e| ScriptError::Verification(e.to_string()))?
            .json()
            .await
            .map_err(|e| ScriptError::Verification(e.to_string()))?;

        Ok(response.check_status())
    }
}

impl SourceVerifier for EtherscanVerifier {
    async fn verify(&self, request: &VerificationRequest) -> Result<(), ScriptError> {
        let url = self.endpoint()?;
        let guid = match self.submit(url, request).await? {
            Some(guid) => guid,
            None => {
                info!("{:#x} is already verified", request.address);
                return Ok(());
            }
        };
        info!("submitted sources for verification, guid {guid}");

        for _ in 0..VERIFY_STATUS_POLL_ATTEMPTS {
            sleep(VERIFY_STATUS_POLL_INTERVAL).await;
            match self.check(url, &guid).await? {
                CheckStatus::Verified => return Ok(()),
                CheckStatus::Pending => continue,
                CheckStatus::Failed(reason) => return Err(ScriptError::Verification(reason)),
            }
        }

        Err(ScriptError::Verification(format!(
            "verification still pending after {} status checks",
            VERIFY_STATUS_POLL_ATTEMPTS
        )))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::Cell;

    use serde_json::json;

    use super::*;

    /// A verifier with a canned verdict that counts its invocations
    pub(crate) struct MockVerifier {
        /// Whether verification succeeds
        pub succeed: bool,
        /// The number of times `verify` was called
        pub calls: Cell<usize>,
    }

    impl MockVerifier {
        /// A verifier that always succeeds or always fails
        pub(crate) fn new(succeed: bool) -> Self {
            Self {
                succeed,
                calls: Cell::new(0),
            }
        }
    }

    impl SourceVerifier for MockVerifier {
        async fn verify(&self, _request: &VerificationRequest) -> Result<(), ScriptError> {
            self.calls.set(self.calls.get() + 1);
            if self.succeed {
                Ok(())
            } else {
                Err(ScriptError::Verification("Fail - Unable to verify".to_string()))
            }
        }
    }

    /// A request for a deployment at a fixed address
    pub(crate) fn dummy_request() -> VerificationRequest {
        VerificationRequest {
            address: Address::repeat_byte(0xab),
            contract_name: "src/MissionControlStream.sol:MissionControlStream".to_string(),
            compiler_version: "v0.8.17+commit.8df45f5f".to_string(),
            standard_json_input: json!({ "language": "Solidity" }),
            constructor_arguments: Bytes::from(vec![0u8; 32]),
        }
    }

    fn response(status: &str, message: &str, result: &str) -> EtherscanResponse {
        EtherscanResponse {
            status: status.to_string(),
            message: message.to_string(),
            result: result.to_string(),
        }
    }

    #[tokio::test]
    async fn test_failed_verification_is_swallowed() {
        let verifier = MockVerifier::new(false);
        let status = verify_after_settling(&verifier, &dummy_request(), Duration::ZERO).await;

        assert_eq!(verifier.calls.get(), 1);
        assert_eq!(
            status,
            VerificationStatus::Failed {
                reason: "error verifying contract: Fail - Unable to verify".to_string()
            }
        );
        assert!(!status.is_verified());
    }

    #[tokio::test]
    async fn test_successful_verification() {
        let verifier = MockVerifier::new(true);
        let status = verify_after_settling(&verifier, &dummy_request(), Duration::ZERO).await;

        assert!(status.is_verified());
    }

    #[tokio::test]
    async fn test_missing_api_key_fails() {
        let verifier =
            EtherscanVerifier::new(Some("https://api.etherscan.io/api".to_string()), String::new())
                .unwrap();
        let status = verify_after_settling(&verifier, &dummy_request(), Duration::ZERO).await;

        assert!(matches!(status, VerificationStatus::Failed { .. }));
    }

    #[tokio::test]
    async fn test_missing_endpoint_fails() {
        let verifier = EtherscanVerifier::new(None, "KEY".to_string()).unwrap();
        let res = verifier.verify(&dummy_request()).await;

        assert!(matches!(res, Err(ScriptError::Verification(_))));
    }

    #[test]
    fn test_submission_guid() {
        let guid = response("1", "OK", "ezq878u486pzijkvvmerl6a9mzwhv6sefgvqi5tkwceejc7tvn")
            .submission_guid()
            .unwrap();
        assert_eq!(
            guid.as_deref(),
            Some("ezq878u486pzijkvvmerl6a9mzwhv6sefgvqi5tkwceejc7tvn")
        );

        let already = response("0", "NOTOK", "Contract source code already verified")
            .submission_guid()
            .unwrap();
        assert_eq!(already, None);

        let rejected = response("0", "NOTOK", "Invalid API Key").submission_guid();
        assert!(matches!(rejected, Err(ScriptError::Verification(_))));
    }

    #[test]
    fn test_check_status() {
        assert_eq!(
            response("0", "NOTOK", VERIFY_PENDING_RESULT).check_status(),
            CheckStatus::Pending
        );
        assert_eq!(
            response("1", "OK", "Pass - Verified").check_status(),
            CheckStatus::Verified
        );
        assert_eq!(
            response("0", "NOTOK", "Already Verified").check_status(),
            CheckStatus::Verified
        );
        assert_eq!(
            response("0", "NOTOK", "Fail - Unable to verify").check_status(),
            CheckStatus::Failed("Fail - Unable to verify".to_string())
        );
    }

    #[test]
    fn test_status_serialization() {
        let failed = VerificationStatus::Failed {
            reason: "timeout".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            json!({ "status": "failed", "reason": "timeout" })
        );
        assert_eq!(
            serde_json::to_value(VerificationStatus::Verified).unwrap(),
            json!({ "status": "verified" })
        );
    }
}
