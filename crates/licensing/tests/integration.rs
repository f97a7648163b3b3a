use ed25519_dalek::SigningKey;
use tuish_licensing::synthesizer::{spki_public_key, synthesize_token};
use tuish_licensing::verifier::{
    Verification, VerifyReason, extract_payload, is_expired, time_remaining_ms, verify_license,
};
use tuish_licensing::{LicensePayload, SignedLicense, key::parse_public_key};

const NOW_MS: i64 = 1_700_000_000_000;

fn keypair() -> ([u8; 32], [u8; 32]) {
    let seed = [7u8; 32];
    let public: [u8; 32] = SigningKey::from_bytes(&seed).verifying_key().to_bytes();
    (seed, public)
}

fn sample_payload() -> LicensePayload {
    LicensePayload {
        lid: "lic_test123".to_owned(),
        pid: "prod_test456".to_owned(),
        cid: "cus_789".to_owned(),
        did: "dev_001".to_owned(),
        features: vec![],
        iat: NOW_MS - 3_600_000,
        exp: None,
        mid: String::new(),
    }
}

fn token_with(mutator: impl FnOnce(&mut LicensePayload)) -> String {
    let (seed, _) = keypair();
    let mut payload = sample_payload();
    mutator(&mut payload);
    synthesize_token(&seed, &payload).unwrap()
}

#[test]
fn fresh_token_round_trips_and_verifies() {
    let (_, public) = keypair();
    let token = token_with(|_| {});

    let parsed = SignedLicense::parse(&token).unwrap();
    assert_eq!(parsed.header.alg, "ed25519");
    assert_eq!(parsed.header.ver, 1);
    assert_eq!(parsed.payload, sample_payload());

    let result = verify_license(&token, &public, None, NOW_MS);
    assert_eq!(result, Verification::Valid(sample_payload()));
}

#[test]
fn expired_token_reports_expired_with_payload() {
    let (_, public) = keypair();
    let token = token_with(|p| p.exp = Some(NOW_MS - 1));

    let result = verify_license(&token, &public, None, NOW_MS);
    assert_eq!(result.reason(), Some(VerifyReason::Expired));
    assert!(result.payload().is_some(), "expired tokens still expose their claims");
}

#[test]
fn future_expiry_still_verifies() {
    let (_, public) = keypair();
    let token = token_with(|p| p.exp = Some(NOW_MS + 3_600_000));
    assert!(verify_license(&token, &public, None, NOW_MS).is_valid());
}

#[test]
fn signature_check_precedes_expiry() {
    // Expired AND signed by the wrong key: the verdict must be the signature,
    // otherwise unsigned tokens would leak their claims through the reason.
    let wrong_seed = [9u8; 32];
    let (_, public) = keypair();
    let mut payload = sample_payload();
    payload.exp = Some(NOW_MS - 1);
    let token = synthesize_token(&wrong_seed, &payload).unwrap();

    let result = verify_license(&token, &public, None, NOW_MS);
    assert_eq!(result.reason(), Some(VerifyReason::InvalidSignature));
    assert!(result.payload().is_none());
}

#[test]
fn machine_binding_matrix() {
    let (_, public) = keypair();

    // Empty mid matches every machine.
    let unbound = token_with(|_| {});
    assert!(verify_license(&unbound, &public, Some("machine-b"), NOW_MS).is_valid());

    // Bound mid matches only itself.
    let bound = token_with(|p| p.mid = "machine-a".to_owned());
    assert!(verify_license(&bound, &public, Some("machine-a"), NOW_MS).is_valid());

    let result = verify_license(&bound, &public, Some("machine-b"), NOW_MS);
    assert_eq!(result.reason(), Some(VerifyReason::MachineMismatch));
    assert!(result.payload().is_some());

    // Omitting the machine id disables the check.
    assert!(verify_license(&bound, &public, None, NOW_MS).is_valid());
}

#[test]
fn tampered_signature_is_rejected() {
    let (_, public) = keypair();
    let token = token_with(|_| {});

    let dot = token.rfind('.').unwrap();
    // Flip a character in the middle of the signature segment; the segment
    // still decodes, so the failure is cryptographic, not structural.
    let target = dot + 10;
    let original = token.as_bytes()[target];
    let replacement = if original == b'A' { b'B' } else { b'A' };
    let mut bytes = token.into_bytes();
    bytes[target] = replacement;
    let tampered = String::from_utf8(bytes).unwrap();

    let result = verify_license(&tampered, &public, None, NOW_MS);
    assert_eq!(result.reason(), Some(VerifyReason::InvalidSignature));
}

#[test]
fn tampered_payload_is_rejected_as_signature_failure() {
    let (_, public) = keypair();
    let generous = token_with(|p| p.features = vec!["pro".to_owned()]);
    let modest = token_with(|p| p.features = vec!["lite".to_owned()]);

    // Graft the generous payload onto the modest token's signature.
    let generous_payload = generous.split('.').nth(1).unwrap();
    let mut parts: Vec<&str> = modest.split('.').collect();
    parts[1] = generous_payload;
    let franken = parts.join(".");

    let result = verify_license(&franken, &public, None, NOW_MS);
    assert_eq!(result.reason(), Some(VerifyReason::InvalidSignature));
}

#[test]
fn malformed_tokens_report_invalid_format() {
    let (_, public) = keypair();
    for bad in ["not-a-license", "one", "a.b", "a.b.c.d", "..sig", "h..s", "h.p."] {
        let result = verify_license(bad, &public, None, NOW_MS);
        assert_eq!(result.reason(), Some(VerifyReason::InvalidFormat), "input: {bad:?}");
        assert!(result.payload().is_none());
    }
}

#[test]
fn header_constants_are_enforced() {
    let (seed, public) = keypair();
    let token = synthesize_token(&seed, &sample_payload()).unwrap();
    let parts: Vec<&str> = token.split('.').collect();

    for header_json in
        [r#"{"alg":"ED25519","ver":1}"#, r#"{"alg":"ed25519","ver":2}"#, r#"{"ver":1}"#]
    {
        let segment = tuish_licensing::codec::encode_base64url(header_json.as_bytes());
        let doctored = format!("{segment}.{}.{}", parts[1], parts[2]);
        let result = verify_license(&doctored, &public, None, NOW_MS);
        assert_eq!(result.reason(), Some(VerifyReason::InvalidFormat), "header: {header_json}");
    }

    // Extra unknown header fields are tolerated (signature still fails since
    // the header bytes changed, but the parse must succeed).
    let extended = r#"{"alg":"ed25519","ver":1,"kid":"k1"}"#;
    let segment = tuish_licensing::codec::encode_base64url(extended.as_bytes());
    let doctored = format!("{segment}.{}.{}", parts[1], parts[2]);
    assert!(SignedLicense::parse(&doctored).is_some());
    let result = verify_license(&doctored, &public, None, NOW_MS);
    assert_eq!(result.reason(), Some(VerifyReason::InvalidSignature));
}

#[test]
fn display_helpers_work_without_a_key() {
    let perpetual = token_with(|_| {});
    let expiring = token_with(|p| p.exp = Some(NOW_MS + 60_000));
    let expired = token_with(|p| p.exp = Some(NOW_MS - 60_000));

    assert_eq!(extract_payload(&perpetual).unwrap().lid, "lic_test123");
    assert!(extract_payload("garbage").is_none());

    assert!(!is_expired(&perpetual, NOW_MS));
    assert!(!is_expired(&expiring, NOW_MS));
    assert!(is_expired(&expired, NOW_MS));
    assert!(is_expired("garbage", NOW_MS));

    assert_eq!(time_remaining_ms(&perpetual, NOW_MS), None);
    assert_eq!(time_remaining_ms(&expiring, NOW_MS), Some(60_000));
    assert_eq!(time_remaining_ms(&expired, NOW_MS), Some(-60_000));
    assert_eq!(time_remaining_ms("garbage", NOW_MS), None);
}

#[test]
fn spki_form_round_trips_through_key_parser() {
    let (seed, public) = keypair();
    let verifying = SigningKey::from_bytes(&seed).verifying_key();

    let spki = spki_public_key(&verifying);
    assert!(spki.starts_with("MCow"));
    assert_eq!(parse_public_key(&spki).unwrap(), public);

    let hex_form = hex::encode(public);
    assert_eq!(parse_public_key(&hex_form).unwrap(), public);
}
