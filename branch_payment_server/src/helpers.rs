use hmac::{Hmac, Mac};
use sha2::Sha512;

/// Compute the hex-encoded HMAC-SHA512 of `data` under `secret`.
///
/// This matches how the payment provider signs webhook bodies: the raw request body is signed with the merchant
/// secret key and the digest travels in the signature header.
pub fn calculate_hmac(secret: &str, data: &[u8]) -> String {
    let mut mac = Hmac::<Sha512>::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any size");
    mac.update(data);
    hex::encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn signatures_are_stable_and_key_dependent() {
        let body = br#"{"event":"charge.success","data":{"reference":"ref_1"}}"#;
        let a = calculate_hmac("sk_test_key", body);
        let b = calculate_hmac("sk_test_key", body);
        let c = calculate_hmac("sk_other_key", body);
        assert_eq!(a, b);
        assert_ne!(a, c);
        // SHA-512 digests are 64 bytes, i.e. 128 hex characters.
        assert_eq!(a.len(), 128);
        assert!(a.chars().all(|ch| ch.is_ascii_hexdigit()));
    }

    #[test]
    fn signatures_change_with_the_body() {
        let a = calculate_hmac("sk_test_key", b"{}");
        let b = calculate_hmac("sk_test_key", b"{ }");
        assert_ne!(a, b);
    }
}
