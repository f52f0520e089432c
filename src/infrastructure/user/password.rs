//! Password hashing and credential verification

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as Argon2PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use sha2::{Digest, Sha256};
use std::fmt::Debug;
use std::sync::Arc;
use tracing::warn;

use crate::domain::user::{is_bcrypt_hash, CredentialFormat, StoredCredential};
use crate::domain::DomainError;

/// Trait for password hashing operations
pub trait PasswordHasher: Send + Sync + Debug {
    /// Hash a password
    fn hash(&self, password: &str) -> Result<String, DomainError>;

    /// Verify a password against a hash
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Argon2-based password hasher.
///
/// New hashes are always Argon2id; bcrypt hashes imported from older
/// deployments are still accepted on verification.
#[derive(Debug, Clone, Default)]
pub struct Argon2Hasher;

impl Argon2Hasher {
    /// Create a new Argon2 hasher
    pub fn new() -> Self {
        Self
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DomainError::internal(format!("Failed to hash password: {}", e)))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        if is_bcrypt_hash(hash) {
            return bcrypt::verify(password, hash).unwrap_or(false);
        }

        let parsed_hash = match PasswordHash::new(hash) {
            Ok(h) => h,
            Err(_) => return false,
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

/// Decides whether a plaintext password matches a stored credential
#[derive(Debug)]
pub struct CredentialVerifier<H: PasswordHasher> {
    hasher: Arc<H>,
    allow_legacy_plaintext: bool,
}

impl<H: PasswordHasher> CredentialVerifier<H> {
    pub fn new(hasher: Arc<H>, allow_legacy_plaintext: bool) -> Self {
        Self {
            hasher,
            allow_legacy_plaintext,
        }
    }

    pub fn allows_legacy_plaintext(&self) -> bool {
        self.allow_legacy_plaintext
    }

    pub fn verify(&self, password: &str, credential: &StoredCredential) -> bool {
        match credential.format() {
            CredentialFormat::Hashed => self.hasher.verify(password, credential.value()),
            CredentialFormat::LegacyPlaintext if self.allow_legacy_plaintext => {
                digests_match(password, credential.value())
            }
            CredentialFormat::LegacyPlaintext => {
                warn!("Rejecting plaintext credential while legacy fallback is disabled");
                false
            }
        }
    }
}

/// Compare two secrets through their SHA-256 digests so the comparison
/// length does not depend on the input.
fn digests_match(a: &str, b: &str) -> bool {
    let a = Sha256::digest(a.as_bytes());
    let b = Sha256::digest(b.as_bytes());
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = Argon2Hasher::new();
        let password = "Passw0rd";

        let hash = hasher.hash(password).unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(hasher.verify(password, &hash));
        assert!(!hasher.verify("wrong1", &hash));
    }

    #[test]
    fn test_hash_is_unique() {
        let hasher = Argon2Hasher::new();
        let password = "Passw0rd";

        let hash1 = hasher.hash(password).unwrap();
        let hash2 = hasher.hash(password).unwrap();

        // Hashes should be different due to random salt
        assert_ne!(hash1, hash2);

        assert!(hasher.verify(password, &hash1));
        assert!(hasher.verify(password, &hash2));
    }

    #[test]
    fn test_verify_invalid_hash() {
        let hasher = Argon2Hasher::new();

        assert!(!hasher.verify("password", "invalid_hash_format"));
        assert!(!hasher.verify("password", ""));
        assert!(!hasher.verify("password", "$2b$not-a-bcrypt-hash"));
    }

    #[test]
    fn test_verify_bcrypt_hash() {
        let hasher = Argon2Hasher::new();
        let hash = bcrypt::hash("Passw0rd", 4).unwrap();

        assert!(hasher.verify("Passw0rd", &hash));
        assert!(!hasher.verify("wrong1", &hash));
    }

    #[test]
    fn test_verifier_hashed_credential() {
        let hasher = Arc::new(Argon2Hasher::new());
        let credential = StoredCredential::hashed(hasher.hash("Passw0rd").unwrap());
        let verifier = CredentialVerifier::new(hasher, false);

        assert!(verifier.verify("Passw0rd", &credential));
        assert!(!verifier.verify("wrong1", &credential));
    }

    #[test]
    fn test_verifier_legacy_plaintext_requires_flag() {
        let credential = StoredCredential::legacy_plaintext("Passw0rd");

        let strict = CredentialVerifier::new(Arc::new(Argon2Hasher::new()), false);
        assert!(!strict.verify("Passw0rd", &credential));

        let lenient = CredentialVerifier::new(Arc::new(Argon2Hasher::new()), true);
        assert!(lenient.verify("Passw0rd", &credential));
        assert!(!lenient.verify("Passw0rd ", &credential));
    }

    #[test]
    fn test_plaintext_never_checked_against_hash_path() {
        // A legacy value is compared literally, never parsed as a hash
        let hasher = Arc::new(Argon2Hasher::new());
        let hash = hasher.hash("Passw0rd").unwrap();
        let credential = StoredCredential::legacy_plaintext(hash.clone());
        let verifier = CredentialVerifier::new(hasher, true);

        assert!(!verifier.verify("Passw0rd", &credential));
        assert!(verifier.verify(&hash, &credential));
    }
}
