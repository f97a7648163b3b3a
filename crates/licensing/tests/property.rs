use ed25519_dalek::SigningKey;
use proptest::prelude::*;
use tuish_licensing::synthesizer::synthesize_token;
use tuish_licensing::verifier::{VerifyReason, verify_license};
use tuish_licensing::{LicensePayload, SignedLicense};

const NOW_MS: i64 = 1_700_000_000_000;
const SEED: [u8; 32] = [7u8; 32];

const BASE64URL_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

fn public_key() -> [u8; 32] {
    SigningKey::from_bytes(&SEED).verifying_key().to_bytes()
}

fn arb_payload() -> impl Strategy<Value = LicensePayload> {
    (
        "[a-z0-9_]{1,24}",
        "[a-z0-9_]{1,24}",
        "[a-z0-9_]{1,24}",
        "[a-z0-9_]{1,24}",
        proptest::collection::vec("[a-z-]{1,12}", 0..4),
        0..NOW_MS,
        prop_oneof![Just(None), (NOW_MS + 1..i64::MAX).prop_map(Some)],
    )
        .prop_map(|(lid, pid, cid, did, features, iat, exp)| LicensePayload {
            lid,
            pid,
            cid,
            did,
            features,
            iat,
            exp,
            mid: String::new(),
        })
}

proptest! {
    // Parsing is total: any input yields Some or None, never a panic.
    #[test]
    fn parse_never_panics(input in ".{0,256}") {
        let _ = SignedLicense::parse(&input);
    }

    #[test]
    fn parse_never_panics_on_dotted_ascii(input in "[A-Za-z0-9._=-]{0,128}") {
        let _ = SignedLicense::parse(&input);
    }

    // A freshly signed, unexpired, any-machine token always round-trips and
    // verifies, whatever the claims.
    #[test]
    fn synthesized_tokens_round_trip(payload in arb_payload(), machine in "[a-f0-9]{8}") {
        let token = synthesize_token(&SEED, &payload).unwrap();

        let parsed = SignedLicense::parse(&token).unwrap();
        prop_assert_eq!(&parsed.payload, &payload);

        let result = verify_license(&token, &public_key(), Some(&machine), NOW_MS);
        prop_assert!(result.is_valid());
    }

    // Any single-character change anywhere in the token either breaks the
    // structure or breaks the signature. It can never surface as `expired`
    // or `machine_mismatch`, and it can never verify: the signature covers
    // every byte of the header and payload segments.
    #[test]
    fn single_character_mutations_never_verify(
        payload in arb_payload(),
        index in any::<prop::sample::Index>(),
        replacement in any::<prop::sample::Index>(),
    ) {
        let token = synthesize_token(&SEED, &payload).unwrap();
        let bytes = token.as_bytes();

        let target = index.index(bytes.len());
        prop_assume!(bytes[target] != b'.');

        let replacement = BASE64URL_ALPHABET[replacement.index(BASE64URL_ALPHABET.len())];
        prop_assume!(replacement != bytes[target]);

        let mut mutated = bytes.to_vec();
        mutated[target] = replacement;
        let mutated = String::from_utf8(mutated).unwrap();

        let result = verify_license(&mutated, &public_key(), None, NOW_MS);
        prop_assert!(!result.is_valid());
        let reason = result.reason().unwrap();
        prop_assert!(
            reason == VerifyReason::InvalidSignature || reason == VerifyReason::InvalidFormat,
            "unexpected reason {:?}",
            reason
        );
    }
}
