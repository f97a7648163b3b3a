//! # Remote Validation Boundary
//!
//! The resolver consumes online validation as a capability (the
//! [`RemoteValidator`] trait) so that tests substitute deterministic
//! in-memory variants and the HTTP layer stays swappable.
//!
//! [`HttpValidator`] is the shipped implementation: a single authenticated
//! POST against the Tuish validation endpoint. Every transport-level failure
//! (connect, timeout, DNS, non-2xx status, a body that is not the expected
//! JSON) collapses to `network_error` at this boundary; the resolver's
//! graceful-degradation rules depend on that mapping.

use crate::error::{SdkError, SdkErrorExt};
use crate::verdict::{LicenseDetails, LicenseStatus, ReasonCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Production API base URL.
pub const DEFAULT_API_URL: &str = "https://tuish-api-production.doug-lance.workers.dev";

/// Network timeout applied to validation calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// What the validation service said about a license.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteOutcome {
    /// Whether the server considers the license valid.
    pub valid: bool,
    /// Failure reason when `valid` is false.
    pub reason: Option<ReasonCode>,
    /// Server-side license details, when provided.
    pub license: Option<LicenseDetails>,
}

impl RemoteOutcome {
    /// The uniform outcome for any transport-level failure.
    #[must_use]
    pub const fn network_error() -> Self {
        Self { valid: false, reason: Some(ReasonCode::NetworkError), license: None }
    }
}

/// Capability for validating a license against the authoritative service.
pub trait RemoteValidator {
    /// Validates a license for a machine. Infallible by design: transport
    /// failures are reported as `network_error` outcomes, never as errors.
    fn validate(&self, license_key: &str, machine_fingerprint: &str) -> RemoteOutcome;
}

/// HTTP implementation of [`RemoteValidator`] against the Tuish API.
#[derive(Debug)]
pub struct HttpValidator {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::blocking::Client,
}

impl HttpValidator {
    /// Builds a validator for `base_url` (the production URL when `None`),
    /// authenticating with `api_key` when one is configured.
    ///
    /// # Errors
    /// Returns [`SdkError::Http`] if the underlying HTTP client cannot be
    /// constructed (TLS backend initialization, essentially).
    pub fn new(base_url: Option<&str>, api_key: Option<String>) -> Result<Self, SdkError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .context("Failed to build validation HTTP client")?;

        Ok(Self {
            base_url: base_url.unwrap_or(DEFAULT_API_URL).trim_end_matches('/').to_owned(),
            api_key,
            client,
        })
    }

    /// The base URL this validator talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl RemoteValidator for HttpValidator {
    fn validate(&self, license_key: &str, machine_fingerprint: &str) -> RemoteOutcome {
        let url = format!("{}/v1/licenses/validate", self.base_url);
        debug!(%url, "Validating license online");

        let mut request = self
            .client
            .post(&url)
            .json(&ValidateRequest { license_key, machine_fingerprint });
        if let Some(api_key) = &self.api_key {
            request = request.header("X-API-Key", api_key);
        }

        let response = match request.send() {
            Ok(response) => response,
            Err(e) => {
                debug!(error = %e, "Validation request failed");
                return RemoteOutcome::network_error();
            },
        };

        let status = response.status();
        if !status.is_success() {
            debug!(%status, "Validation endpoint returned an error status");
            return RemoteOutcome::network_error();
        }

        match response.json::<ValidateResponse>() {
            Ok(body) => RemoteOutcome {
                valid: body.valid,
                reason: body.reason,
                license: body.license.map(LicenseDetails::from),
            },
            Err(e) => {
                debug!(error = %e, "Validation response was not the expected JSON");
                RemoteOutcome::network_error()
            },
        }
    }
}

/// Request body in the API's camelCase wire form.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidateRequest<'a> {
    license_key: &'a str,
    machine_fingerprint: &'a str,
}

/// Response body in the API's camelCase wire form. Reason and status values
/// are snake_case strings, matching [`ReasonCode`] and [`LicenseStatus`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValidateResponse {
    valid: bool,
    #[serde(default)]
    reason: Option<ReasonCode>,
    #[serde(default)]
    license: Option<WireLicenseDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireLicenseDetails {
    id: String,
    product_id: String,
    #[serde(default)]
    features: Vec<String>,
    status: LicenseStatus,
    issued_at: i64,
    #[serde(default)]
    expires_at: Option<i64>,
}

impl From<WireLicenseDetails> for LicenseDetails {
    fn from(wire: WireLicenseDetails) -> Self {
        Self {
            id: wire.id,
            product_id: wire.product_id,
            features: wire.features,
            status: wire.status,
            issued_at: wire.issued_at,
            expires_at: wire.expires_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_uses_camel_case_keys() {
        let body = serde_json::to_string(&ValidateRequest {
            license_key: "key",
            machine_fingerprint: "fp",
        })
        .unwrap();
        assert_eq!(body, r#"{"licenseKey":"key","machineFingerprint":"fp"}"#);
    }

    #[test]
    fn response_parses_camel_case_license_details() {
        let json = r#"{
            "valid": true,
            "license": {
                "id": "lic_1",
                "productId": "prod_1",
                "features": ["pro"],
                "status": "active",
                "issuedAt": 1700000000000,
                "expiresAt": null
            }
        }"#;
        let parsed: ValidateResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.valid);
        let license = parsed.license.map(LicenseDetails::from).unwrap();
        assert_eq!(license.product_id, "prod_1");
        assert_eq!(license.status, LicenseStatus::Active);
        assert_eq!(license.expires_at, None);
    }

    #[test]
    fn response_parses_snake_case_reasons() {
        let json = r#"{"valid": false, "reason": "machine_mismatch"}"#;
        let parsed: ValidateResponse = serde_json::from_str(json).unwrap();
        assert!(!parsed.valid);
        assert_eq!(parsed.reason, Some(ReasonCode::MachineMismatch));
    }

    #[test]
    fn base_url_is_normalized() {
        let validator = HttpValidator::new(Some("https://example.test/"), None).unwrap();
        assert_eq!(validator.base_url(), "https://example.test");
    }
}
