//! The resolver's output model.
//!
//! A [`Verdict`] is the single record every license check produces, whether
//! the answer came from the offline cache, the validation service, or
//! nowhere. Two invariants hold at this boundary:
//!
//! * `valid == true` implies `license` is present.
//! * `reason == NetworkError` implies `source == Online` and `valid == false`.

use serde::{Deserialize, Serialize};
use tuish_licensing::LicensePayload;
use tuish_licensing::verifier::VerifyReason;

/// The closed set of reasons a license check can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    /// No cached token and no server-side entitlement.
    NotFound,
    /// The license expired.
    Expired,
    /// The server declared the license invalid.
    Revoked,
    /// Structural decode failure.
    InvalidFormat,
    /// The Ed25519 check failed.
    InvalidSignature,
    /// The token is bound to a different machine.
    MachineMismatch,
    /// The validation service could not be reached.
    NetworkError,
}

impl From<VerifyReason> for ReasonCode {
    fn from(reason: VerifyReason) -> Self {
        match reason {
            VerifyReason::InvalidFormat => Self::InvalidFormat,
            VerifyReason::InvalidSignature => Self::InvalidSignature,
            VerifyReason::Expired => Self::Expired,
            VerifyReason::MachineMismatch => Self::MachineMismatch,
        }
    }
}

/// Where a verdict came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictSource {
    /// Decided by the offline cryptographic check alone.
    Offline,
    /// Decided by the validation service.
    Online,
    /// No cached license existed to check.
    NotFound,
}

/// Lifecycle state reported alongside license details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LicenseStatus {
    Active,
    Expired,
    Revoked,
}

/// Caller-facing license details, shaped for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseDetails {
    /// License identifier.
    pub id: String,
    /// Product identifier.
    pub product_id: String,
    /// Feature flags unlocked by this license.
    pub features: Vec<String>,
    /// Lifecycle state.
    pub status: LicenseStatus,
    /// Issued-at, milliseconds since the Unix epoch.
    pub issued_at: i64,
    /// Expiry in milliseconds, absent for perpetual licenses.
    pub expires_at: Option<i64>,
}

impl LicenseDetails {
    /// Builds display details from a decoded token payload.
    #[must_use]
    pub fn from_payload(payload: &LicensePayload, status: LicenseStatus) -> Self {
        Self {
            id: payload.lid.clone(),
            product_id: payload.pid.clone(),
            features: payload.features.clone(),
            status,
            issued_at: payload.iat,
            expires_at: payload.exp,
        }
    }
}

/// The outcome of a license check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    /// Whether the user holds a valid entitlement right now.
    pub valid: bool,
    /// Failure reason; `None` when `valid` is true.
    pub reason: Option<ReasonCode>,
    /// Which subsystem decided.
    pub source: VerdictSource,
    /// License details; always present when `valid` is true.
    pub license: Option<LicenseDetails>,
}

impl Verdict {
    pub(crate) const fn not_found() -> Self {
        Self {
            valid: false,
            reason: Some(ReasonCode::NotFound),
            source: VerdictSource::NotFound,
            license: None,
        }
    }

    pub(crate) fn offline_valid(payload: &LicensePayload) -> Self {
        Self {
            valid: true,
            reason: None,
            source: VerdictSource::Offline,
            license: Some(LicenseDetails::from_payload(payload, LicenseStatus::Active)),
        }
    }
}
