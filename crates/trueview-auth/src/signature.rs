//! Inbound webhook signature verification.
//!
//! The CRM signs each delivery with HMAC-SHA256 over the exact raw request
//! body and sends the hex digest in a header. Verification recomputes the
//! digest and compares in constant time; every failure mode (bad hex,
//! length mismatch, digest mismatch) collapses to `false`.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Compute the hex-encoded HMAC-SHA256 signature for a payload.
#[must_use]
pub fn compute_signature(payload: &[u8], secret: &[u8]) -> String {
    let mut mac =
        <HmacSha256 as Mac>::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// Verify a hex-encoded HMAC-SHA256 signature over the raw payload bytes.
///
/// Never panics and never errors: any mismatch returns `false`.
#[must_use]
pub fn verify_signature(payload: &[u8], provided_hex: &str, secret: &[u8]) -> bool {
    let computed = compute_signature(payload, secret);
    constant_time_eq(provided_hex.as_bytes(), computed.as_bytes())
}

/// Constant-time byte comparison to prevent timing side channels.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    use subtle::ConstantTimeEq;
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"webhook-shared-secret";

    #[test]
    fn round_trip_verifies() {
        let body = br#"{"eventType":"project.booked"}"#;
        let sig = compute_signature(body, SECRET);
        assert!(verify_signature(body, &sig, SECRET));
    }

    #[test]
    fn signature_is_hex_sha256() {
        let sig = compute_signature(b"payload", SECRET);
        assert_eq!(sig.len(), 64);
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn mutated_body_fails() {
        let body = b"payload-bytes";
        let sig = compute_signature(body, SECRET);
        // Flip a single bit of the body.
        let mut mutated = body.to_vec();
        mutated[0] ^= 0x01;
        assert!(!verify_signature(&mutated, &sig, SECRET));
    }

    #[test]
    fn mutated_signature_fails() {
        let body = b"payload-bytes";
        let sig = compute_signature(body, SECRET);
        // Flip one hex character.
        let mut chars: Vec<char> = sig.chars().collect();
        chars[0] = if chars[0] == '0' { '1' } else { '0' };
        let mutated: String = chars.into_iter().collect();
        assert!(!verify_signature(body, &mutated, SECRET));
    }

    #[test]
    fn wrong_secret_fails() {
        let body = b"payload";
        let sig = compute_signature(body, SECRET);
        assert!(!verify_signature(body, &sig, b"another-secret"));
    }

    #[test]
    fn length_mismatch_is_false_not_panic() {
        assert!(!verify_signature(b"payload", "abc", SECRET));
        assert!(!verify_signature(b"payload", "", SECRET));
    }

    #[test]
    fn non_hex_signature_is_false() {
        assert!(!verify_signature(b"payload", "not-hex-at-all!", SECRET));
    }

    #[test]
    fn every_single_bit_flip_fails() {
        let body = b"idempotency";
        let sig = compute_signature(body, SECRET);

        for byte in 0..body.len() {
            for bit in 0..8 {
                let mut mutated = body.to_vec();
                mutated[byte] ^= 1 << bit;
                assert!(
                    !verify_signature(&mutated, &sig, SECRET),
                    "bit flip at byte {byte} bit {bit} must invalidate"
                );
            }
        }
    }
}
