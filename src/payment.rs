//! Payment-gateway signature verification.
//!
//! The gateway signs `"{order_id}|{payment_id}"` with HMAC-SHA256 under the
//! shared key secret and sends the hex digest back with the client's
//! confirmation. Every mutating subscription call re-derives the digest and
//! refuses to touch state on a mismatch.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Hex HMAC-SHA256 digest the gateway is expected to have produced.
pub fn expected_signature(key_secret: &str, order_id: &str, payment_id: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(key_secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(format!("{order_id}|{payment_id}").as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Constant-time comparison of the supplied signature against the derived
/// one, so the check leaks no timing information.
pub fn verify_signature(
    key_secret: &str,
    order_id: &str,
    payment_id: &str,
    supplied: &str,
) -> bool {
    let expected = expected_signature(key_secret, order_id, payment_id);
    expected.as_bytes().ct_eq(supplied.as_bytes()).into()
}

/// Key secret handed to handlers through actix app data.
#[derive(Clone)]
pub struct PaymentSecret(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test_key_secret";

    #[test]
    fn correct_signature_verifies() {
        let sig = expected_signature(SECRET, "order_123", "pay_456");
        assert!(verify_signature(SECRET, "order_123", "pay_456", &sig));
    }

    #[test]
    fn tampered_payment_id_fails() {
        let sig = expected_signature(SECRET, "order_123", "pay_456");
        assert!(!verify_signature(SECRET, "order_123", "pay_457", &sig));
    }

    #[test]
    fn wrong_secret_fails() {
        let sig = expected_signature("other_secret", "order_123", "pay_456");
        assert!(!verify_signature(SECRET, "order_123", "pay_456", &sig));
    }

    #[test]
    fn truncated_signature_fails() {
        let sig = expected_signature(SECRET, "order_123", "pay_456");
        assert!(!verify_signature(SECRET, "order_123", "pay_456", &sig[..10]));
        assert!(!verify_signature(SECRET, "order_123", "pay_456", ""));
    }

    #[test]
    fn digest_is_lowercase_hex_of_sha256_length() {
        let sig = expected_signature(SECRET, "a", "b");
        assert_eq!(sig.len(), 64);
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
