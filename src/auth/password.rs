use sha2::{Digest, Sha256};

/// Hashes a password into a hex-encoded SHA-256 digest of the password
/// concatenated with the server secret.
///
/// Deterministic: the same input always produces the same digest, which is
/// what the equality-based verification below relies on. This is a plain
/// keyed digest, not a salted slow KDF.
pub fn hash_password(password: &str, secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(secret.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Verifies a password by recomputing the digest and comparing it against the
/// stored one in constant time.
pub fn verify_password(password: &str, secret: &str, stored_hash: &str) -> bool {
    constant_time_compare(&hash_password(password, secret), stored_hash)
}

/// Constant-time string comparison.
///
/// Always compares the full length so the comparison time does not leak where
/// the strings first differ.
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }

    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_hashing_is_deterministic() {
        let password = "test_password123";
        let hash1 = hash_password(password, SECRET);
        let hash2 = hash_password(password, SECRET);

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64); // SHA-256 hex
    }

    #[test]
    fn test_different_inputs_differ() {
        assert_ne!(
            hash_password("password-a", SECRET),
            hash_password("password-b", SECRET)
        );
        // Same password under a different secret also differs
        assert_ne!(
            hash_password("password-a", SECRET),
            hash_password("password-a", "other-secret")
        );
    }

    #[test]
    fn test_password_verification() {
        let password = "test_password123";
        let hashed = hash_password(password, SECRET);

        assert!(verify_password(password, SECRET, &hashed));
        assert!(!verify_password("wrong_password", SECRET, &hashed));
        assert!(!verify_password(password, "wrong-secret", &hashed));
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("hello", "hello"));
        assert!(constant_time_compare("", ""));
        assert!(!constant_time_compare("hello", "world"));
        assert!(!constant_time_compare("hello", "hello2"));
        assert!(!constant_time_compare("short", "longer string"));
    }
}
