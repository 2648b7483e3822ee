/*!
 * Credential Comparison
 *
 * Constant-time equality for shared secrets (bot tokens, admin passwords).
 * Both operands are hashed to fixed-length digests before comparison, so
 * the comparison time is independent of where the inputs diverge.
 */

use sha2::{Digest, Sha256};

/// Compare two secrets in constant time.
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    let digest_a = Sha256::digest(a.as_bytes());
    let digest_b = Sha256::digest(b.as_bytes());

    let mut diff = 0u8;
    for (x, y) in digest_a.iter().zip(digest_b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_secrets_match() {
        assert!(constant_time_eq("s3cret-token", "s3cret-token"));
        assert!(constant_time_eq("", ""));
    }

    #[test]
    fn test_different_secrets_do_not_match() {
        assert!(!constant_time_eq("s3cret-token", "s3cret-tokeN"));
        assert!(!constant_time_eq("short", "a much longer secret"));
        assert!(!constant_time_eq("s3cret", ""));
    }
}
