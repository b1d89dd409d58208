use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Newtype for password to prevent accidental logging
#[derive(Clone)]
pub struct Password(String);

impl Password {
    pub fn new(password: String) -> Self {
        Self(password)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(****)")
    }
}

/// SHA-256 hex digest of a password, as persisted in the device registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Compute the one-way digest stored for a registered device.
pub fn digest_password(password: &Password) -> PasswordDigest {
    let digest = Sha256::digest(password.as_str().as_bytes());
    PasswordDigest(hex::encode(digest))
}

/// Check a submitted password against a stored digest.
pub fn verify_password(password: &Password, stored: &PasswordDigest) -> bool {
    digest_password(password) == *stored
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_sha256_hex() {
        let digest = digest_password(&Password::new("p1".to_string()));

        // 32 bytes, hex encoded
        assert_eq!(digest.as_str().len(), 64);
        assert!(digest.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_digest_is_deterministic() {
        let a = digest_password(&Password::new("same".to_string()));
        let b = digest_password(&Password::new("same".to_string()));
        assert_eq!(a, b);
    }

    #[test]
    fn test_verify_password_correct() {
        let password = Password::new("mySecurePassword123".to_string());
        let digest = digest_password(&password);
        assert!(verify_password(&password, &digest));
    }

    #[test]
    fn test_verify_password_incorrect() {
        let digest = digest_password(&Password::new("mySecurePassword123".to_string()));
        let wrong = Password::new("wrongPassword".to_string());
        assert!(!verify_password(&wrong, &digest));
    }

    #[test]
    fn test_debug_does_not_leak() {
        let password = Password::new("secret".to_string());
        assert!(!format!("{:?}", password).contains("secret"));
    }
}
