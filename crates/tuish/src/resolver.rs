//! # License Resolution
//!
//! The state machine that turns a cache lookup, an offline cryptographic
//! check, and at most one online validation call into a single [`Verdict`].
//!
//! The decision tree, including where cache writes happen, is an
//! interoperability contract:
//!
//! * Fresh cache + offline valid → answer offline, no network touched.
//! * Stale cache + offline valid → refresh online; a network failure
//!   degrades gracefully back to the offline answer.
//! * Server says invalid → authoritative: the cached record is purged.
//! * Offline expired → the server may resurrect a renewed license; if it
//!   does not, the record is purged.
//! * Tampered, malformed, or wrong-machine records are purged eagerly and
//!   never trusted.

use crate::cache::LicenseCache;
use crate::clock::Clock;
use crate::remote::RemoteValidator;
use crate::verdict::{LicenseDetails, LicenseStatus, ReasonCode, Verdict, VerdictSource};
use std::sync::OnceLock;
use tracing::debug;
use tuish_licensing::verifier::{Verification, VerifyReason, verify_license};
use tuish_licensing::{LicensePayload, fingerprint};

/// Resolves license checks for one product.
///
/// The cache, remote validator, and clock are injected capabilities; tests
/// freeze the clock and substitute an in-memory validator to make every
/// branch deterministic.
#[derive(Debug)]
pub struct Resolver<V, C> {
    product_id: String,
    public_key: [u8; 32],
    cache: LicenseCache,
    validator: V,
    clock: C,
    fingerprint: OnceLock<String>,
}

impl<V: RemoteValidator, C: Clock> Resolver<V, C> {
    pub fn new(
        product_id: impl Into<String>,
        public_key: [u8; 32],
        cache: LicenseCache,
        validator: V,
        clock: C,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            public_key,
            cache,
            validator,
            clock,
            fingerprint: OnceLock::new(),
        }
    }

    /// This machine's fingerprint, computed once per resolver.
    pub fn machine_fingerprint(&self) -> &str {
        self.fingerprint.get_or_init(fingerprint::machine_fingerprint)
    }

    /// Runs a full license check: cache, offline verification, and online
    /// validation when the cached record is stale or expired.
    pub fn check(&self) -> Verdict {
        let Some(cached) = self.cache.load(&self.product_id) else {
            debug!(product = %self.product_id, "No cached license found");
            return Verdict::not_found();
        };

        let now_ms = self.clock.now_ms();
        let fingerprint = self.machine_fingerprint().to_owned();
        let offline =
            verify_license(&cached.license_key, &self.public_key, Some(&fingerprint), now_ms);

        match offline {
            Verification::Valid(payload) => {
                let fresh = !LicenseCache::needs_refresh(&cached, now_ms);
                self.resolve_offline_valid(&cached.license_key, &payload, &fingerprint, now_ms, fresh)
            },
            Verification::Invalid { reason: VerifyReason::Expired, payload } => {
                self.resolve_offline_expired(&cached.license_key, payload, &fingerprint)
            },
            Verification::Invalid { reason, payload } => {
                // Signature, format, or machine mismatch: never trusted.
                debug!(?reason, "Offline verification failed, purging cache");
                self.cache.remove(&self.product_id);
                Verdict {
                    valid: false,
                    reason: Some(reason.into()),
                    source: VerdictSource::Offline,
                    license: payload
                        .map(|p| LicenseDetails::from_payload(&p, LicenseStatus::Revoked)),
                }
            },
        }
    }

    /// Stores a pasted or freshly purchased license key, then re-checks.
    pub fn store(&self, license_key: &str) -> Verdict {
        let fingerprint = self.machine_fingerprint().to_owned();
        self.cache.save(&self.product_id, license_key, &fingerprint, self.clock.now_ms());
        self.check()
    }

    /// The cached license key, without any verification.
    #[must_use]
    pub fn cached_license_key(&self) -> Option<String> {
        self.cache.load(&self.product_id).map(|record| record.license_key)
    }

    /// Drops the cached license for this product.
    pub fn clear(&self) {
        self.cache.remove(&self.product_id);
    }

    /// A clock reading, for display helpers living above the resolver.
    pub(crate) fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    /// The injected remote validator.
    pub fn validator(&self) -> &V {
        &self.validator
    }

    /// The injected cache.
    pub fn cache(&self) -> &LicenseCache {
        &self.cache
    }

    /// Offline verification succeeded: answer from the cache when it is
    /// fresh, otherwise refresh opportunistically.
    fn resolve_offline_valid(
        &self,
        license_key: &str,
        payload: &LicensePayload,
        fingerprint: &str,
        now_ms: i64,
        fresh: bool,
    ) -> Verdict {
        if fresh {
            debug!("Cache fresh, offline verification succeeded");
            return Verdict::offline_valid(payload);
        }

        debug!("Cache needs refresh, validating online");
        let online = self.validator.validate(license_key, fingerprint);

        if online.valid {
            self.cache.save(&self.product_id, license_key, fingerprint, now_ms);
            return Verdict {
                valid: true,
                reason: None,
                source: VerdictSource::Online,
                license: online
                    .license
                    .or_else(|| Some(LicenseDetails::from_payload(payload, LicenseStatus::Active))),
            };
        }

        if online.reason == Some(ReasonCode::NetworkError) {
            debug!("Validation unreachable, trusting offline verification");
            return Verdict::offline_valid(payload);
        }

        // The server is authoritative about revocation.
        debug!(reason = ?online.reason, "Server invalidated license, purging cache");
        self.cache.remove(&self.product_id);
        Verdict {
            valid: false,
            reason: online.reason,
            source: VerdictSource::Online,
            license: online.license,
        }
    }

    /// The cached token is expired offline: only the server can resurrect a
    /// renewed license.
    fn resolve_offline_expired(
        &self,
        license_key: &str,
        payload: Option<LicensePayload>,
        fingerprint: &str,
    ) -> Verdict {
        debug!("Cached token expired, checking for renewal online");
        let online = self.validator.validate(license_key, fingerprint);

        if !online.valid {
            self.cache.remove(&self.product_id);
            return Verdict {
                valid: false,
                reason: online.reason,
                source: VerdictSource::Online,
                license: online.license,
            };
        }

        Verdict {
            valid: true,
            reason: None,
            source: VerdictSource::Online,
            license: online.license.or_else(|| {
                payload
                    .as_ref()
                    .map(|p| LicenseDetails::from_payload(p, LicenseStatus::Active))
            }),
        }
    }
}
