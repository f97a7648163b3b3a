//! # Machine Fingerprint
//!
//! Licenses may be bound to a machine via a stable fingerprint: the lowercase
//! hex SHA-256 of `hostname:username:platform:arch`. The platform and
//! architecture names are normalized to one cross-SDK vocabulary so that the
//! same physical machine produces the same fingerprint no matter which SDK
//! computed it:
//!
//! | native            | normalized |
//! |-------------------|------------|
//! | `macos`           | `darwin`   |
//! | `windows`         | `win32`    |
//! | `x86_64`, `amd64` | `x64`      |
//! | `aarch64`, `arm64`| `arm64`    |
//! | `x86`, `i386`, `i686` | `ia32` |
//!
//! Anything else passes through lowercased.
//!
//! A component that cannot be read contributes the empty string instead of
//! failing the call; the fingerprint stays stable as long as the failures do.
//! These values are identifiers, not secrets, but avoid logging them at info
//! level.

use sha2::{Digest, Sha256};
use tracing::debug;

/// Computes this machine's fingerprint.
///
/// Deterministic per host; callers that check repeatedly should cache the
/// first result for the life of the process.
#[must_use]
pub fn machine_fingerprint() -> String {
    let platform = map_platform(std::env::consts::OS);
    let arch = map_arch(std::env::consts::ARCH);
    fingerprint_from_parts(&host_name(), &user_name(), &platform, &arch)
}

/// Hashes the four fingerprint components in their canonical order.
///
/// Exposed separately so the hash can be computed for known component values
/// (fixtures, support tooling) without touching the host.
#[must_use]
pub fn fingerprint_from_parts(
    hostname: &str,
    username: &str,
    platform: &str,
    arch: &str,
) -> String {
    let input = format!("{hostname}:{username}:{platform}:{arch}");
    let digest = Sha256::digest(input.as_bytes());
    hex::encode(digest)
}

/// Normalizes an OS family name to the cross-SDK vocabulary.
#[must_use]
pub fn map_platform(raw: &str) -> String {
    match raw.to_lowercase().as_str() {
        "macos" => "darwin".to_owned(),
        "windows" => "win32".to_owned(),
        other => other.to_owned(),
    }
}

/// Normalizes a machine architecture name to the cross-SDK vocabulary.
#[must_use]
pub fn map_arch(raw: &str) -> String {
    match raw.to_lowercase().as_str() {
        "x86_64" | "amd64" => "x64".to_owned(),
        "aarch64" | "arm64" => "arm64".to_owned(),
        "x86" | "i386" | "i686" => "ia32".to_owned(),
        other => other.to_owned(),
    }
}

fn host_name() -> String {
    match hostname::get() {
        Ok(name) => name.to_string_lossy().into_owned(),
        Err(e) => {
            debug!(error = %e, "Hostname lookup failed, using empty component");
            String::new()
        },
    }
}

fn user_name() -> String {
    match whoami::fallible::username() {
        Ok(name) => name,
        Err(e) => {
            debug!(error = %e, "Username lookup failed, using empty component");
            String::new()
        },
    }
}
