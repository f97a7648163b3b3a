pub mod activate;
pub mod deactivate;
pub mod fingerprint;
pub mod inspect;
#[cfg(feature = "issuance")]
pub mod issue;
pub mod status;

use tuish::{ReasonCode, Verdict, VerdictSource};

/// Renders a verdict for humans; JSON mode is handled by the callers.
pub(crate) fn print_verdict(verdict: &Verdict) {
    if verdict.valid {
        let source = match verdict.source {
            VerdictSource::Offline => "verified offline",
            VerdictSource::Online => "validated online",
            VerdictSource::NotFound => "not found",
        };
        println!("✅ License valid ({source})");
    } else {
        println!("❌ License invalid: {}", reason_label(verdict.reason));
    }

    if let Some(license) = &verdict.license {
        println!("   License:  {}", license.id);
        println!("   Product:  {}", license.product_id);
        if !license.features.is_empty() {
            println!("   Features: {}", license.features.join(", "));
        }
        match license.expires_at {
            Some(expires_at) => println!("   Expires:  {expires_at} (epoch ms)"),
            None => println!("   Expires:  never (perpetual)"),
        }
    }
}

pub(crate) fn reason_label(reason: Option<ReasonCode>) -> &'static str {
    match reason {
        Some(ReasonCode::NotFound) => "no license found",
        Some(ReasonCode::Expired) => "license expired",
        Some(ReasonCode::Revoked) => "license revoked",
        Some(ReasonCode::InvalidFormat) => "malformed license key",
        Some(ReasonCode::InvalidSignature) => "invalid signature",
        Some(ReasonCode::MachineMismatch) => "bound to a different machine",
        Some(ReasonCode::NetworkError) => "validation service unreachable",
        None => "unknown",
    }
}
